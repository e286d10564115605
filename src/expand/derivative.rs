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

//! Symbolic differentiation.
//!
//! Results are raw rule applications; callers run [`super::simplify`] on
//! them.

use crate::ast::{BinOp, Expr, ExprKind, SourceSpan, UnaryOp};
use crate::diagnostics::ScriptError;

/// Functions with a known derivative.
pub const DIFFERENTIABLE: &[&str] = &[
    "sin", "cos", "tan", "cot", "sec", "csc", "asin", "acos", "atan", "acot", "sinh", "cosh",
    "tanh", "coth", "asinh", "acosh", "atanh", "exp", "ln", "log", "log2", "log10", "sqrt",
    "cbrt", "abs", "pow",
];

/// Returns whether `expr` mentions the identifier `var`.
pub fn depends_on(expr: &Expr, var: &str) -> bool {
    match &expr.kind {
        ExprKind::Number(_) | ExprKind::Str(_) | ExprKind::Bool(_) | ExprKind::Null => false,
        ExprKind::Ident(name) => name == var,
        ExprKind::Array(items) => items.iter().any(|item| depends_on(item, var)),
        ExprKind::Object(fields) => fields.iter().any(|(_, value)| depends_on(value, var)),
        ExprKind::Unary { operand, .. } => depends_on(operand, var),
        ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
            depends_on(left, var) || depends_on(right, var)
        }
        ExprKind::Conditional {
            cond,
            then,
            otherwise,
        } => depends_on(cond, var) || depends_on(then, var) || depends_on(otherwise, var),
        ExprKind::Member { object, .. } => depends_on(object, var),
        ExprKind::Index { object, index } => depends_on(object, var) || depends_on(index, var),
        ExprKind::Call { callee, args, .. } => {
            depends_on(callee, var) || args.iter().any(|arg| depends_on(arg, var))
        }
        // Parameters of a nested literal shadow `var`.
        ExprKind::Map(lit) => !lit.params.iter().any(|p| p == var) && depends_on(&lit.body, var),
        ExprKind::Function(lit) => !lit.params.iter().any(|p| p == var),
    }
}

/// Names and positions of every function called by name inside `expr`.
pub fn called_functions(expr: &Expr) -> Vec<(String, SourceSpan)> {
    let mut found = Vec::new();
    collect_calls(expr, &mut found);
    found
}

fn collect_calls(expr: &Expr, found: &mut Vec<(String, SourceSpan)>) {
    match &expr.kind {
        ExprKind::Call { callee, args, .. } => {
            match callee.as_ident() {
                Some(name) => found.push((name.to_string(), expr.span.clone())),
                None => collect_calls(callee, found),
            }
            args.iter().for_each(|arg| collect_calls(arg, found));
        }
        ExprKind::Unary { operand, .. } => collect_calls(operand, found),
        ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
            collect_calls(left, found);
            collect_calls(right, found);
        }
        ExprKind::Conditional {
            cond,
            then,
            otherwise,
        } => {
            collect_calls(cond, found);
            collect_calls(then, found);
            collect_calls(otherwise, found);
        }
        ExprKind::Array(items) => items.iter().for_each(|item| collect_calls(item, found)),
        ExprKind::Member { object, .. } => collect_calls(object, found),
        ExprKind::Index { object, index } => {
            collect_calls(object, found);
            collect_calls(index, found);
        }
        _ => {}
    }
}

/// Node builder anchored at one span.
struct Build<'a> {
    span: &'a SourceSpan,
}

impl Build<'_> {
    fn num(&self, value: f64) -> Expr {
        Expr::number(value, self.span.clone())
    }

    fn bin(&self, op: BinOp, left: Expr, right: Expr) -> Expr {
        let mut expr = Expr::binary(op, left, right);
        expr.span = self.span.clone();
        expr
    }

    fn add(&self, left: Expr, right: Expr) -> Expr {
        self.bin(BinOp::Add, left, right)
    }

    fn sub(&self, left: Expr, right: Expr) -> Expr {
        self.bin(BinOp::Sub, left, right)
    }

    fn mul(&self, left: Expr, right: Expr) -> Expr {
        self.bin(BinOp::Mul, left, right)
    }

    fn div(&self, left: Expr, right: Expr) -> Expr {
        self.bin(BinOp::Div, left, right)
    }

    fn pow(&self, left: Expr, right: Expr) -> Expr {
        self.bin(BinOp::Pow, left, right)
    }

    fn neg(&self, operand: Expr) -> Expr {
        Expr::unary(UnaryOp::Neg, operand, self.span.clone())
    }

    fn call(&self, name: &str, arg: Expr) -> Expr {
        Expr::call(name, vec![arg], self.span.clone())
    }

    /// `1 / e`
    fn recip(&self, e: Expr) -> Expr {
        self.div(self.num(1.0), e)
    }

    /// `1 - u^2`
    fn one_minus_sq(&self, u: &Expr) -> Expr {
        self.sub(self.num(1.0), self.pow(u.clone(), self.num(2.0)))
    }

    /// `1 + u^2`
    fn one_plus_sq(&self, u: &Expr) -> Expr {
        self.add(self.num(1.0), self.pow(u.clone(), self.num(2.0)))
    }
}

/// Derivative of `expr` with respect to `var`.
pub fn derivative(expr: &Expr, var: &str) -> Result<Expr, ScriptError> {
    let b = Build { span: &expr.span };
    if !depends_on(expr, var) {
        return Ok(b.num(0.0));
    }
    match &expr.kind {
        ExprKind::Ident(_) => Ok(b.num(1.0)),
        ExprKind::Unary {
            op: UnaryOp::Neg,
            operand,
        } => Ok(b.neg(derivative(operand, var)?)),
        ExprKind::Unary {
            op: UnaryOp::Plus,
            operand,
        } => derivative(operand, var),
        ExprKind::Binary { op, left, right } => binary(&b, *op, left, right, var, expr),
        ExprKind::Conditional {
            cond,
            then,
            otherwise,
        } => Ok(Expr::new(
            ExprKind::Conditional {
                cond: cond.clone(),
                then: Box::new(derivative(then, var)?),
                otherwise: Box::new(derivative(otherwise, var)?),
            },
            expr.span.clone(),
        )),
        ExprKind::Call { callee, args, .. } => {
            let Some(name) = callee.as_ident() else {
                return Err(ScriptError::derivative(callee.to_string(), &expr.span));
            };
            call(&b, name, args, var, expr)
        }
        _ => Err(ScriptError::derivative(construct_name(expr), &expr.span)),
    }
}

fn construct_name(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Unary { op, .. } => op.symbol().to_string(),
        ExprKind::Logical { op, .. } => op.symbol().to_string(),
        ExprKind::Array(_) => "array".to_string(),
        ExprKind::Object(_) => "object".to_string(),
        ExprKind::Member { property, .. } => format!(".{property}"),
        ExprKind::Index { .. } => "[]".to_string(),
        ExprKind::Function(_) => "function".to_string(),
        ExprKind::Map(_) => "map".to_string(),
        _ => expr.to_string(),
    }
}

fn binary(
    b: &Build<'_>,
    op: BinOp,
    u: &Expr,
    v: &Expr,
    var: &str,
    whole: &Expr,
) -> Result<Expr, ScriptError> {
    match op {
        BinOp::Add => Ok(b.add(derivative(u, var)?, derivative(v, var)?)),
        BinOp::Sub => Ok(b.sub(derivative(u, var)?, derivative(v, var)?)),
        BinOp::Mul => {
            let du = derivative(u, var)?;
            let dv = derivative(v, var)?;
            Ok(b.add(b.mul(du, v.clone()), b.mul(u.clone(), dv)))
        }
        BinOp::Div => {
            let du = derivative(u, var)?;
            let dv = derivative(v, var)?;
            let numerator = b.sub(b.mul(du, v.clone()), b.mul(u.clone(), dv));
            Ok(b.div(numerator, b.pow(v.clone(), b.num(2.0))))
        }
        BinOp::Pow => power(b, u, v, var),
        _ => Err(ScriptError::derivative(op.symbol(), &whole.span)),
    }
}

/// `d(u^v)` with the constant-exponent and constant-base shortcuts.
fn power(b: &Build<'_>, u: &Expr, v: &Expr, var: &str) -> Result<Expr, ScriptError> {
    let u_dep = depends_on(u, var);
    let v_dep = depends_on(v, var);
    if !v_dep {
        // v * u^(v-1) * u'
        let reduced = b.pow(u.clone(), b.sub(v.clone(), b.num(1.0)));
        return Ok(b.mul(b.mul(v.clone(), reduced), derivative(u, var)?));
    }
    let u_pow_v = b.pow(u.clone(), v.clone());
    if !u_dep {
        // u^v * ln(u) * v'
        return Ok(b.mul(
            b.mul(u_pow_v, b.call("ln", u.clone())),
            derivative(v, var)?,
        ));
    }
    // u^v * (v' * ln(u) + v * u' / u)
    let du = derivative(u, var)?;
    let dv = derivative(v, var)?;
    let inner = b.add(
        b.mul(dv, b.call("ln", u.clone())),
        b.div(b.mul(v.clone(), du), u.clone()),
    );
    Ok(b.mul(u_pow_v, inner))
}

fn call(
    b: &Build<'_>,
    name: &str,
    args: &[Expr],
    var: &str,
    whole: &Expr,
) -> Result<Expr, ScriptError> {
    match (name, args) {
        ("pow", [base, exponent]) => return power(b, base, exponent, var),
        // log(x, base) == ln(x) / ln(base)
        ("log", [x, base]) => {
            let quotient = b.div(b.call("ln", x.clone()), b.call("ln", base.clone()));
            return derivative(&quotient, var);
        }
        _ => {}
    }
    let [u] = args else {
        return Err(ScriptError::derivative(name, &whole.span));
    };
    let outer = match name {
        "sin" => b.call("cos", u.clone()),
        "cos" => b.neg(b.call("sin", u.clone())),
        "tan" => b.recip(b.pow(b.call("cos", u.clone()), b.num(2.0))),
        "cot" => b.neg(b.recip(b.pow(b.call("sin", u.clone()), b.num(2.0)))),
        "sec" => b.mul(b.call("sec", u.clone()), b.call("tan", u.clone())),
        "csc" => b.neg(b.mul(b.call("csc", u.clone()), b.call("cot", u.clone()))),
        "asin" => b.recip(b.call("sqrt", b.one_minus_sq(u))),
        "acos" => b.neg(b.recip(b.call("sqrt", b.one_minus_sq(u)))),
        "atan" => b.recip(b.one_plus_sq(u)),
        "acot" => b.neg(b.recip(b.one_plus_sq(u))),
        "sinh" => b.call("cosh", u.clone()),
        "cosh" => b.call("sinh", u.clone()),
        "tanh" => b.sub(b.num(1.0), b.pow(b.call("tanh", u.clone()), b.num(2.0))),
        "coth" => b.sub(b.num(1.0), b.pow(b.call("coth", u.clone()), b.num(2.0))),
        "asinh" => b.recip(b.call(
            "sqrt",
            b.add(b.pow(u.clone(), b.num(2.0)), b.num(1.0)),
        )),
        "acosh" => b.recip(b.call(
            "sqrt",
            b.sub(b.pow(u.clone(), b.num(2.0)), b.num(1.0)),
        )),
        "atanh" => b.recip(b.one_minus_sq(u)),
        "exp" => b.call("exp", u.clone()),
        "ln" | "log" => b.recip(u.clone()),
        "log2" => b.recip(b.mul(u.clone(), b.call("ln", b.num(2.0)))),
        "log10" => b.recip(b.mul(u.clone(), b.call("ln", b.num(10.0)))),
        "sqrt" => b.recip(b.mul(b.num(2.0), b.call("sqrt", u.clone()))),
        "cbrt" => b.recip(b.mul(
            b.num(3.0),
            b.pow(b.call("cbrt", u.clone()), b.num(2.0)),
        )),
        "abs" => b.call("sign", u.clone()),
        _ => return Err(ScriptError::derivative(name, &whole.span)),
    };
    // Chain rule.
    Ok(b.mul(outer, derivative(u, var)?))
}
