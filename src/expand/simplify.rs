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

//! Algebraic simplification.
//!
//! Children are simplified first; when a rule fires at a node the rewritten
//! node is simplified again, so the result is a fixed point and running the
//! simplifier twice changes nothing. Operands are assumed to be numbers.

use super::hash::equivalent;
use crate::ast::{BinOp, Expr, ExprKind, FunctionLit, MapLit, SourceSpan, Stmt, StmtKind, Target, UnaryOp};
use crate::runtime::ops::arith_f64;
use std::rc::Rc;

/// Returns the simplified form of `expr`.
pub fn simplify(expr: &Expr) -> Expr {
    let node = simplify_children(expr);
    match rewrite(&node) {
        Some(next) => {
            log::trace!("simplify {node} => {next}");
            simplify(&next)
        }
        None => node,
    }
}

/// Simplifies every expression inside a statement list.
pub fn simplify_statements(statements: &[Stmt]) -> Vec<Stmt> {
    statements.iter().map(simplify_statement).collect()
}

fn simplify_boxed(stmt: &Stmt) -> Box<Stmt> {
    Box::new(simplify_statement(stmt))
}

fn simplify_statement(stmt: &Stmt) -> Stmt {
    let kind = match &stmt.kind {
        StmtKind::Empty => StmtKind::Empty,
        StmtKind::Expr(expr) => StmtKind::Expr(simplify(expr)),
        StmtKind::Assign { target, value } => StmtKind::Assign {
            target: match target {
                Target::Ident(name) => Target::Ident(name.clone()),
                Target::Member { object, property } => Target::Member {
                    object: simplify(object),
                    property: property.clone(),
                },
                Target::Index { object, index } => Target::Index {
                    object: simplify(object),
                    index: simplify(index),
                },
            },
            value: simplify(value),
        },
        StmtKind::Block(body) => StmtKind::Block(simplify_statements(body)),
        StmtKind::If {
            cond,
            then,
            otherwise,
        } => StmtKind::If {
            cond: simplify(cond),
            then: simplify_boxed(then),
            otherwise: otherwise.as_deref().map(simplify_boxed),
        },
        StmtKind::While { cond, body } => StmtKind::While {
            cond: simplify(cond),
            body: simplify_boxed(body),
        },
        StmtKind::DoWhile { body, cond } => StmtKind::DoWhile {
            body: simplify_boxed(body),
            cond: simplify(cond),
        },
        StmtKind::For {
            init,
            cond,
            step,
            body,
        } => StmtKind::For {
            init: init.as_deref().map(simplify_boxed),
            cond: cond.as_ref().map(simplify),
            step: step.as_deref().map(simplify_boxed),
            body: simplify_boxed(body),
        },
        StmtKind::Return(value) => StmtKind::Return(value.as_ref().map(simplify)),
        StmtKind::Use(name) => StmtKind::Use(name.clone()),
        StmtKind::Delete(expr) => StmtKind::Delete(simplify(expr)),
    };
    Stmt::new(kind, stmt.span.clone())
}

fn boxed(expr: &Expr) -> Box<Expr> {
    Box::new(simplify(expr))
}

fn simplify_children(expr: &Expr) -> Expr {
    let kind = match &expr.kind {
        ExprKind::Number(_)
        | ExprKind::Str(_)
        | ExprKind::Bool(_)
        | ExprKind::Null
        | ExprKind::Ident(_) => return expr.clone(),
        ExprKind::Array(items) => ExprKind::Array(items.iter().map(simplify).collect()),
        ExprKind::Object(fields) => ExprKind::Object(
            fields
                .iter()
                .map(|(key, value)| (key.clone(), simplify(value)))
                .collect(),
        ),
        ExprKind::Unary { op, operand } => ExprKind::Unary {
            op: *op,
            operand: boxed(operand),
        },
        ExprKind::Binary { op, left, right } => ExprKind::Binary {
            op: *op,
            left: boxed(left),
            right: boxed(right),
        },
        ExprKind::Logical { op, left, right } => ExprKind::Logical {
            op: *op,
            left: boxed(left),
            right: boxed(right),
        },
        ExprKind::Conditional {
            cond,
            then,
            otherwise,
        } => ExprKind::Conditional {
            cond: boxed(cond),
            then: boxed(then),
            otherwise: boxed(otherwise),
        },
        ExprKind::Member { object, property } => ExprKind::Member {
            object: boxed(object),
            property: property.clone(),
        },
        ExprKind::Index { object, index } => ExprKind::Index {
            object: boxed(object),
            index: boxed(index),
        },
        ExprKind::Call {
            callee,
            args,
            attrs,
        } => ExprKind::Call {
            callee: boxed(callee),
            args: args.iter().map(simplify).collect(),
            attrs: attrs.as_deref().map(boxed),
        },
        ExprKind::Function(lit) => ExprKind::Function(Rc::new(FunctionLit {
            params: lit.params.clone(),
            body: simplify_statements(&lit.body),
            span: lit.span.clone(),
        })),
        ExprKind::Map(lit) => ExprKind::Map(Rc::new(MapLit {
            params: lit.params.clone(),
            body: simplify(&lit.body),
            span: lit.span.clone(),
        })),
    };
    Expr::new(kind, expr.span.clone())
}

fn num(value: f64, span: &SourceSpan) -> Expr {
    Expr::number(value, span.clone())
}

fn neg(operand: Expr, span: &SourceSpan) -> Expr {
    Expr::unary(UnaryOp::Neg, operand, span.clone())
}

fn bin(op: BinOp, left: Expr, right: Expr, span: &SourceSpan) -> Expr {
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        span.clone(),
    )
}

fn negated(expr: &Expr) -> Option<&Expr> {
    match &expr.kind {
        ExprKind::Unary {
            op: UnaryOp::Neg,
            operand,
        } => Some(operand),
        _ => None,
    }
}

fn power_parts(expr: &Expr) -> Option<(&Expr, &Expr)> {
    match &expr.kind {
        ExprKind::Binary {
            op: BinOp::Pow,
            left,
            right,
        } => Some((left, right)),
        _ => None,
    }
}

/// Literals the arithmetic rules must leave alone.
fn non_numeric(expr: &Expr) -> bool {
    matches!(
        expr.kind,
        ExprKind::Str(_)
            | ExprKind::Bool(_)
            | ExprKind::Null
            | ExprKind::Array(_)
            | ExprKind::Object(_)
            | ExprKind::Function(_)
            | ExprKind::Map(_)
    )
}

/// One rewrite step at the root of `node`.
fn rewrite(node: &Expr) -> Option<Expr> {
    match &node.kind {
        ExprKind::Unary {
            op: UnaryOp::Neg,
            operand,
        } => match &operand.kind {
            ExprKind::Number(value) => Some(num(-value, &node.span)),
            ExprKind::Unary {
                op: UnaryOp::Neg,
                operand: inner,
            } => Some((**inner).clone()),
            _ => None,
        },
        ExprKind::Binary { op, left, right } => {
            if non_numeric(left) || non_numeric(right) {
                return None;
            }
            let span = &node.span;
            fold_constants(*op, left, right, span)
                .or_else(|| identity(*op, left, right, span))
                .or_else(|| propagate_negation(*op, left, right, span))
                .or_else(|| combine_exponents(*op, left, right, span))
                .or_else(|| repeated_operand(*op, left, right, span))
        }
        _ => None,
    }
}

fn fold_constants(op: BinOp, left: &Expr, right: &Expr, span: &SourceSpan) -> Option<Expr> {
    if !op.is_arithmetic() {
        return None;
    }
    let value = arith_f64(op, left.as_number()?, right.as_number()?);
    value.is_finite().then(|| num(value, span))
}

fn identity(op: BinOp, left: &Expr, right: &Expr, span: &SourceSpan) -> Option<Expr> {
    let l = left.as_number();
    let r = right.as_number();
    match op {
        BinOp::Add if r == Some(0.0) => Some(left.clone()),
        BinOp::Add if l == Some(0.0) => Some(right.clone()),
        BinOp::Sub if r == Some(0.0) => Some(left.clone()),
        BinOp::Sub if l == Some(0.0) => Some(neg(right.clone(), span)),
        BinOp::Mul if l == Some(0.0) || r == Some(0.0) => Some(num(0.0, span)),
        BinOp::Mul if r == Some(1.0) => Some(left.clone()),
        BinOp::Mul if l == Some(1.0) => Some(right.clone()),
        BinOp::Div if r == Some(1.0) => Some(left.clone()),
        BinOp::Div if l == Some(0.0) && r != Some(0.0) => Some(num(0.0, span)),
        BinOp::Pow if r == Some(1.0) => Some(left.clone()),
        BinOp::Pow if r == Some(0.0) => Some(num(1.0, span)),
        _ => None,
    }
}

/// Moves a unary minus out of products and quotients.
fn propagate_negation(op: BinOp, left: &Expr, right: &Expr, span: &SourceSpan) -> Option<Expr> {
    if !matches!(op, BinOp::Mul | BinOp::Div) {
        return None;
    }
    match (negated(left), negated(right)) {
        (Some(a), Some(b)) => Some(bin(op, a.clone(), b.clone(), span)),
        (Some(a), None) => Some(neg(bin(op, a.clone(), right.clone(), span), span)),
        (None, Some(b)) => Some(neg(bin(op, left.clone(), b.clone(), span), span)),
        (None, None) => None,
    }
}

fn combine_exponents(op: BinOp, left: &Expr, right: &Expr, span: &SourceSpan) -> Option<Expr> {
    let one = || num(1.0, span);
    // Exponent combinator: `+` for products, `-` for quotients.
    let merge = match op {
        BinOp::Mul => BinOp::Add,
        BinOp::Div => BinOp::Sub,
        _ => return None,
    };
    let lp = power_parts(left);
    let rp = power_parts(right);
    if let (Some((x, a)), Some((y, b))) = (lp, rp) {
        if equivalent(x, y) {
            let exponent = bin(merge, a.clone(), b.clone(), span);
            return Some(bin(BinOp::Pow, x.clone(), exponent, span));
        }
    }
    if let Some((x, a)) = lp {
        if equivalent(x, right) {
            // x^a * x, x^a / x
            let exponent = bin(merge, a.clone(), one(), span);
            return Some(bin(BinOp::Pow, x.clone(), exponent, span));
        }
    }
    if let Some((y, b)) = rp {
        if equivalent(left, y) {
            // x * x^a, x / x^a
            let exponent = match op {
                BinOp::Mul => bin(BinOp::Add, b.clone(), one(), span),
                _ => bin(BinOp::Sub, one(), b.clone(), span),
            };
            return Some(bin(BinOp::Pow, y.clone(), exponent, span));
        }
    }
    None
}

/// `x-x`, `x/x`, `x*x` and `x+x` for structurally equal operands.
fn repeated_operand(op: BinOp, left: &Expr, right: &Expr, span: &SourceSpan) -> Option<Expr> {
    if !equivalent(left, right) {
        return None;
    }
    match op {
        BinOp::Sub => Some(num(0.0, span)),
        BinOp::Div if left.as_number() != Some(0.0) => Some(num(1.0, span)),
        BinOp::Mul => Some(bin(BinOp::Pow, left.clone(), num(2.0, span), span)),
        BinOp::Add => Some(bin(BinOp::Mul, num(2.0, span), left.clone(), span)),
        _ => None,
    }
}
