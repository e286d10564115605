/*
MIT License

Copyright (c) 2026 Raja Lehtihet and Wael El Oraiby

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Expression compilation.

use super::*;
use crate::ast::{BinOp, LogicOp, UnaryOp};
use std::collections::BTreeMap;

fn unary_helper(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Neg => "neg",
        UnaryOp::Plus => "plus",
        UnaryOp::Not => "not",
    }
}

/// Native source for an operator applied to two scalars.
fn native_source(op: BinOp, left: &str, right: &str) -> String {
    match op {
        BinOp::Pow => format!("{left}.powf({right})"),
        BinOp::Approx => format!("approx({left}, {right})"),
        _ => format!("({left} {} {right})", op.symbol()),
    }
}

impl Compiler {
    /// Compiles one expression.
    pub fn compile_expr(&mut self, expr: &Expr) -> Code {
        match &expr.kind {
            ExprKind::Number(value) => {
                let value = *value;
                Code::new(format_number(value), true, thunk(move |_| Ok(Value::Number(value))))
            }
            ExprKind::Str(text) => {
                let source = format!("{text:?}");
                let text: Rc<str> = Rc::from(text.as_str());
                Code::new(source, false, thunk(move |_| Ok(Value::Str(text.clone()))))
            }
            ExprKind::Bool(value) => {
                let value = *value;
                Code::new(value.to_string(), false, thunk(move |_| Ok(Value::Bool(value))))
            }
            ExprKind::Null => Code::new("null".to_string(), false, thunk(|_| Ok(Value::Null))),
            ExprKind::Ident(name) => {
                let source = self.name_source(name);
                let name = name.clone();
                Code::new(
                    source,
                    false,
                    thunk(move |interp| Ok(interp.resolve(&name, ResolveOptions::default()))),
                )
            }
            ExprKind::Array(items) => {
                let codes: Vec<Code> = items.iter().map(|item| self.compile_expr(item)).collect();
                let source = format!("[{}]", join_sources(&codes));
                let runs = runs_of(codes);
                Code::new(
                    source,
                    false,
                    thunk(move |interp| Ok(Value::array(run_all(&runs, interp)?))),
                )
            }
            ExprKind::Object(fields) => self.compile_object(fields),
            ExprKind::Unary { op, operand } => self.compile_unary(*op, operand, &expr.span),
            ExprKind::Binary { op, left, right } => {
                self.compile_binary(*op, left, right, &expr.span)
            }
            ExprKind::Logical { op, left, right } => self.compile_logical(*op, left, right),
            ExprKind::Conditional {
                cond,
                then,
                otherwise,
            } => {
                let cond = self.compile_expr(cond);
                let then = self.compile_expr(then);
                let otherwise = self.compile_expr(otherwise);
                let source = format!(
                    "if truthy({}) {{ {} }} else {{ {} }}",
                    cond.source, then.source, otherwise.source
                );
                let scalar = then.scalar && otherwise.scalar;
                let (cond, then, otherwise) = (cond.run, then.run, otherwise.run);
                Code::new(
                    source,
                    scalar,
                    thunk(move |interp| {
                        if cond(interp)?.is_truthy() {
                            then(interp)
                        } else {
                            otherwise(interp)
                        }
                    }),
                )
            }
            ExprKind::Member { object, property } => {
                let object = self.compile_expr(object);
                let source = format!("get({}, {property:?})", object.source);
                let (object, property, span) = (object.run, property.clone(), expr.span.clone());
                Code::new(
                    source,
                    false,
                    thunk(move |interp| {
                        let object = object(interp)?;
                        interp.get_member(&object, &property, &span)
                    }),
                )
            }
            ExprKind::Index { object, index } => {
                let object = self.compile_expr(object);
                let index = self.compile_expr(index);
                let source = format!("index({}, {})", object.source, index.source);
                let (object, index, span) = (object.run, index.run, expr.span.clone());
                Code::new(
                    source,
                    false,
                    thunk(move |interp| {
                        let object = object(interp)?;
                        let index = index(interp)?;
                        interp.get_index(&object, &index, &span)
                    }),
                )
            }
            ExprKind::Call {
                callee,
                args,
                attrs,
            } => self.compile_call(callee, args, attrs.as_deref(), &expr.span),
            ExprKind::Function(lit) => self.compile_literal(Body::Function(lit.clone())),
            ExprKind::Map(lit) => self.compile_literal(Body::Map(lit.clone())),
        }
    }

    fn compile_object(&mut self, fields: &[(String, Expr)]) -> Code {
        let mut compiled = Vec::with_capacity(fields.len());
        for (key, value) in fields {
            compiled.push((key.clone(), self.compile_expr(value)));
        }
        let source = format!(
            "<<{}>>",
            compiled
                .iter()
                .map(|(key, code)| format!("{key}: {}", code.source))
                .collect::<Vec<_>>()
                .join(", ")
        );
        let runs: Vec<(String, Thunk)> = compiled
            .into_iter()
            .map(|(key, code)| (key, code.run))
            .collect();
        Code::new(
            source,
            false,
            thunk(move |interp| {
                let mut fields = BTreeMap::new();
                for (key, run) in &runs {
                    fields.insert(key.clone(), run(interp)?);
                }
                Ok(Value::object(fields))
            }),
        )
    }

    fn compile_unary(&mut self, op: UnaryOp, operand: &Expr, span: &SourceSpan) -> Code {
        let operand = self.compile_expr(operand);
        if op == UnaryOp::Neg && operand.scalar {
            let source = format!("-{}", operand.source);
            let operand = operand.run;
            return Code::new(
                source,
                true,
                thunk(move |interp| Ok(Value::Number(-number(operand(interp)?)))),
            );
        }
        let source = format!("ops::{}({})", unary_helper(op), operand.source);
        let (operand, span) = (operand.run, span.clone());
        Code::new(
            source,
            false,
            thunk(move |interp| {
                let value = operand(interp)?;
                ops::unary(op, &value).map_err(|err| err.or_at(&span))
            }),
        )
    }

    fn compile_binary(&mut self, op: BinOp, left: &Expr, right: &Expr, span: &SourceSpan) -> Code {
        let left = self.compile_expr(left);
        let right = self.compile_expr(right);
        if left.scalar && right.scalar {
            // Both sides are numbers: native f64 arithmetic.
            let source = native_source(op, &left.source, &right.source);
            let (l, r) = (left.run, right.run);
            return Code::new(
                source,
                op.is_arithmetic(),
                thunk(move |interp| {
                    let a = number(l(interp)?);
                    let b = number(r(interp)?);
                    Ok(ops::scalar(op, a, b, interp.options().approx_tolerance))
                }),
            );
        }
        let source = format!("ops::{}({}, {})", op.helper(), left.source, right.source);
        let (l, r, span) = (left.run, right.run, span.clone());
        Code::new(
            source,
            false,
            thunk(move |interp| {
                let a = l(interp)?;
                let b = r(interp)?;
                ops::binary(op, &a, &b, interp.options()).map_err(|err| err.or_at(&span))
            }),
        )
    }

    fn compile_logical(&mut self, op: LogicOp, left: &Expr, right: &Expr) -> Code {
        let left = self.compile_expr(left);
        let right = self.compile_expr(right);
        let source = format!("({} {} {})", left.source, op.symbol(), right.source);
        let (l, r) = (left.run, right.run);
        Code::new(
            source,
            false,
            thunk(move |interp| {
                let left = l(interp)?;
                match (op, left.is_truthy()) {
                    (LogicOp::And, false) | (LogicOp::Or, true) => Ok(left),
                    _ => r(interp),
                }
            }),
        )
    }

    /// Function and map literals compile their body once; each evaluation
    /// closes over the scope current at that time.
    fn compile_literal(&mut self, body: Body) -> Code {
        let compiled = Rc::new(self.compile_body(&body));
        let source = format!("closure({})", compiled.source());
        Code::new(
            source,
            false,
            thunk(move |interp| {
                let scope = interp.scopes().current();
                Ok(interp.bind_closure(body.clone(), scope, Backend::Compiled(compiled.clone())))
            }),
        )
    }
}

pub(super) fn join_sources(codes: &[Code]) -> String {
    codes
        .iter()
        .map(|code| code.source.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub(super) fn runs_of(codes: Vec<Code>) -> Vec<Thunk> {
    codes.into_iter().map(|code| code.run).collect()
}

pub(super) fn run_all(runs: &[Thunk], interp: &mut Interpreter) -> Result<Vec<Value>, ScriptError> {
    let mut values = Vec::with_capacity(runs.len());
    for run in runs {
        values.push(run(interp)?);
    }
    Ok(values)
}
