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

//! Symbolic expander: derivative expansion and algebraic simplification.
//!
//! Everything here is a pure AST-to-AST rewrite that runs between parsing
//! and evaluation.

mod derivative;
mod hash;
mod simplify;

pub use derivative::{called_functions, derivative};
use derivative::DIFFERENTIABLE;
pub use hash::{same_structure, structural_hash};
pub use simplify::{simplify, simplify_statements};

use crate::ast::{Expr, ExprKind, FunctionLit, MapLit, Program, Stmt, StmtKind, Target};
use crate::config::Options;
use crate::diagnostics::ScriptError;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Maps the expander may differentiate by name, and the names that hide a
/// function with a known derivative.
#[derive(Debug, Clone, Default)]
pub struct KnownMaps {
    maps: HashMap<String, Rc<MapLit>>,
    rebound: HashSet<String>,
}

impl KnownMaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Rc<MapLit>> {
        self.maps.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, lit: Rc<MapLit>) {
        self.maps.insert(name.into(), lit);
    }

    pub fn remove(&mut self, name: &str) {
        self.maps.remove(name);
    }

    /// Records that `name` is bound by the script. Binding a catalog name
    /// such as `sin` stops the expander from applying its rule.
    pub fn bind(&mut self, name: &str) {
        if DIFFERENTIABLE.contains(&name) {
            self.rebound.insert(name.to_string());
        }
    }

    /// Returns whether `name` no longer refers to the catalog function.
    pub fn is_rebound(&self, name: &str) -> bool {
        self.rebound.contains(name)
    }
}

/// Name of the derivative operator.
pub const DERIVATIVE_OPERATOR: &str = "D";

/// Expands `D(...)` calls and, when enabled, simplifies the whole program.
///
/// `known` holds maps already bound in the interpreter; maps assigned at the
/// top level of `program` join them as statements are visited.
pub fn expand_program(
    program: Program,
    known: &KnownMaps,
    options: &Options,
) -> Result<Program, ScriptError> {
    let mut expander = Expander {
        known: known.clone(),
        expand_derivatives: options.expand_derivatives,
        function_depth: 0,
    };
    let mut statements = program
        .statements
        .iter()
        .map(|stmt| expander.statement(stmt))
        .collect::<Result<Vec<_>, _>>()?;
    if options.simplify {
        statements = simplify_statements(&statements);
    }
    Ok(Program { statements })
}

/// Expands `D(...)` inside a single expression.
pub fn expand_expression(expr: &Expr, known: &KnownMaps, options: &Options) -> Result<Expr, ScriptError> {
    let mut expander = Expander {
        known: known.clone(),
        expand_derivatives: options.expand_derivatives,
        function_depth: 0,
    };
    let expanded = expander.expr(expr)?;
    Ok(if options.simplify {
        simplify(&expanded)
    } else {
        expanded
    })
}

/// Treats `target` as a map: map literals, and function literals whose body
/// is a single `return`.
pub fn as_map(target: &Expr) -> Option<Rc<MapLit>> {
    match &target.kind {
        ExprKind::Map(lit) => Some(lit.clone()),
        ExprKind::Function(lit) => lit.single_return().map(|body| {
            Rc::new(MapLit {
                params: lit.params.clone(),
                body: body.clone(),
                span: lit.span.clone(),
            })
        }),
        _ => None,
    }
}

struct Expander {
    known: KnownMaps,
    expand_derivatives: bool,
    /// Assignments inside function bodies bind call-local names.
    function_depth: usize,
}

impl Expander {
    fn boxed(&mut self, stmt: &Stmt) -> Result<Box<Stmt>, ScriptError> {
        Ok(Box::new(self.statement(stmt)?))
    }

    fn statements(&mut self, statements: &[Stmt]) -> Result<Vec<Stmt>, ScriptError> {
        statements.iter().map(|stmt| self.statement(stmt)).collect()
    }

    fn statement(&mut self, stmt: &Stmt) -> Result<Stmt, ScriptError> {
        let kind = match &stmt.kind {
            StmtKind::Empty => StmtKind::Empty,
            StmtKind::Expr(expr) => StmtKind::Expr(self.expr(expr)?),
            StmtKind::Assign { target, value } => {
                let value = self.expr(value)?;
                let target = match target {
                    Target::Ident(name) => {
                        self.track(name, &value);
                        Target::Ident(name.clone())
                    }
                    Target::Member { object, property } => Target::Member {
                        object: self.expr(object)?,
                        property: property.clone(),
                    },
                    Target::Index { object, index } => Target::Index {
                        object: self.expr(object)?,
                        index: self.expr(index)?,
                    },
                };
                StmtKind::Assign { target, value }
            }
            StmtKind::Block(body) => StmtKind::Block(self.statements(body)?),
            StmtKind::If {
                cond,
                then,
                otherwise,
            } => StmtKind::If {
                cond: self.expr(cond)?,
                then: self.boxed(then)?,
                otherwise: match otherwise {
                    Some(stmt) => Some(self.boxed(stmt)?),
                    None => None,
                },
            },
            StmtKind::While { cond, body } => StmtKind::While {
                cond: self.expr(cond)?,
                body: self.boxed(body)?,
            },
            StmtKind::DoWhile { body, cond } => StmtKind::DoWhile {
                body: self.boxed(body)?,
                cond: self.expr(cond)?,
            },
            StmtKind::For {
                init,
                cond,
                step,
                body,
            } => StmtKind::For {
                init: match init {
                    Some(stmt) => Some(self.boxed(stmt)?),
                    None => None,
                },
                cond: match cond {
                    Some(expr) => Some(self.expr(expr)?),
                    None => None,
                },
                step: match step {
                    Some(stmt) => Some(self.boxed(stmt)?),
                    None => None,
                },
                body: self.boxed(body)?,
            },
            StmtKind::Return(value) => StmtKind::Return(match value {
                Some(expr) => Some(self.expr(expr)?),
                None => None,
            }),
            StmtKind::Use(name) => StmtKind::Use(name.clone()),
            StmtKind::Delete(expr) => StmtKind::Delete(self.expr(expr)?),
        };
        Ok(Stmt::new(kind, stmt.span.clone()))
    }

    /// Remembers (or forgets) `name` as a differentiable map.
    fn track(&mut self, name: &str, value: &Expr) {
        self.known.bind(name);
        if self.function_depth > 0 {
            return;
        }
        match as_map(value) {
            Some(lit) => {
                log::trace!("expander tracks map '{name}'");
                self.known.insert(name.to_string(), lit);
            }
            None => {
                self.known.remove(name);
            }
        }
    }

    fn boxed_expr(&mut self, expr: &Expr) -> Result<Box<Expr>, ScriptError> {
        Ok(Box::new(self.expr(expr)?))
    }

    fn exprs(&mut self, exprs: &[Expr]) -> Result<Vec<Expr>, ScriptError> {
        exprs.iter().map(|expr| self.expr(expr)).collect()
    }

    fn expr(&mut self, expr: &Expr) -> Result<Expr, ScriptError> {
        let kind = match &expr.kind {
            ExprKind::Number(_)
            | ExprKind::Str(_)
            | ExprKind::Bool(_)
            | ExprKind::Null
            | ExprKind::Ident(_) => return Ok(expr.clone()),
            ExprKind::Array(items) => ExprKind::Array(self.exprs(items)?),
            ExprKind::Object(fields) => ExprKind::Object(
                fields
                    .iter()
                    .map(|(key, value)| Ok((key.clone(), self.expr(value)?)))
                    .collect::<Result<_, ScriptError>>()?,
            ),
            ExprKind::Unary { op, operand } => ExprKind::Unary {
                op: *op,
                operand: self.boxed_expr(operand)?,
            },
            ExprKind::Binary { op, left, right } => ExprKind::Binary {
                op: *op,
                left: self.boxed_expr(left)?,
                right: self.boxed_expr(right)?,
            },
            ExprKind::Logical { op, left, right } => ExprKind::Logical {
                op: *op,
                left: self.boxed_expr(left)?,
                right: self.boxed_expr(right)?,
            },
            ExprKind::Conditional {
                cond,
                then,
                otherwise,
            } => ExprKind::Conditional {
                cond: self.boxed_expr(cond)?,
                then: self.boxed_expr(then)?,
                otherwise: self.boxed_expr(otherwise)?,
            },
            ExprKind::Member { object, property } => ExprKind::Member {
                object: self.boxed_expr(object)?,
                property: property.clone(),
            },
            ExprKind::Index { object, index } => ExprKind::Index {
                object: self.boxed_expr(object)?,
                index: self.boxed_expr(index)?,
            },
            ExprKind::Call {
                callee,
                args,
                attrs,
            } => {
                let callee = self.boxed_expr(callee)?;
                let args = self.exprs(args)?;
                let attrs = match attrs {
                    Some(attrs) => Some(self.boxed_expr(attrs)?),
                    None => None,
                };
                if self.expand_derivatives
                    && attrs.is_none()
                    && callee.as_ident() == Some(DERIVATIVE_OPERATOR)
                {
                    return self.derivative_call(callee, args, expr);
                }
                ExprKind::Call {
                    callee,
                    args,
                    attrs,
                }
            }
            ExprKind::Function(lit) => {
                self.bind_params(&lit.params);
                self.function_depth += 1;
                let body = self.statements(&lit.body);
                self.function_depth -= 1;
                ExprKind::Function(Rc::new(FunctionLit {
                    params: lit.params.clone(),
                    body: body?,
                    span: lit.span.clone(),
                }))
            }
            ExprKind::Map(lit) => {
                self.bind_params(&lit.params);
                ExprKind::Map(Rc::new(MapLit {
                    params: lit.params.clone(),
                    body: self.expr(&lit.body)?,
                    span: lit.span.clone(),
                }))
            }
        };
        Ok(Expr::new(kind, expr.span.clone()))
    }

    fn bind_params(&mut self, params: &[String]) {
        for param in params {
            self.known.bind(param);
        }
    }

    /// Returns whether every function `lit` calls by name still means the
    /// catalog function, so its symbolic rule applies.
    fn rules_apply(&self, lit: &MapLit) -> bool {
        called_functions(&lit.body).iter().all(|(name, _)| {
            !self.known.is_rebound(name) && !lit.params.iter().any(|param| param == name)
        })
    }

    /// Replaces `D(target [, var])` by the derivative map, or keeps the call
    /// for the runtime `D` when the target is not known statically.
    fn derivative_call(
        &mut self,
        callee: Box<Expr>,
        mut args: Vec<Expr>,
        call: &Expr,
    ) -> Result<Expr, ScriptError> {
        let target = match args.first() {
            Some(target) if args.len() <= 2 => match &target.kind {
                ExprKind::Ident(name) => self.known.get(name).cloned(),
                _ => as_map(target),
            },
            _ => None,
        }
        .filter(|lit| self.rules_apply(lit));
        let var = match args.get(1).map(|arg| &arg.kind) {
            None => Some(None),
            Some(ExprKind::Ident(name)) | Some(ExprKind::Str(name)) => Some(Some(name.clone())),
            Some(_) => None,
        };
        if let (Some(lit), Some(var)) = (target, var) {
            let var = var
                .or_else(|| lit.params.first().cloned())
                .unwrap_or_default();
            log::debug!("expanding D with respect to '{var}' at line {}", call.span.line);
            let body = simplify(&derivative(&lit.body, &var)?);
            return Ok(Expr::new(
                ExprKind::Map(Rc::new(MapLit {
                    params: lit.params.clone(),
                    body,
                    span: call.span.clone(),
                })),
                call.span.clone(),
            ));
        }
        // The runtime `D` takes the variable by name.
        if let Some(arg) = args.get_mut(1) {
            if let ExprKind::Ident(name) = &arg.kind {
                arg.kind = ExprKind::Str(name.clone());
            }
        }
        Ok(Expr::new(
            ExprKind::Call {
                callee,
                args,
                attrs: None,
            },
            call.span.clone(),
        ))
    }
}
