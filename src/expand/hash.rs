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

//! Structural hashing and equality of expressions.
//!
//! Both ignore source spans, so two occurrences of `x*y` in different
//! places of a script compare equal.

use crate::ast::{Expr, ExprKind};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::mem::discriminant;
use std::rc::Rc;

/// Hash of an expression's shape and payloads.
pub fn structural_hash(expr: &Expr) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_into(expr, &mut hasher);
    hasher.finish()
}

fn number_bits(value: f64) -> u64 {
    // `0.0 == -0.0`, so both must hash alike.
    if value == 0.0 { 0 } else { value.to_bits() }
}

fn hash_into(expr: &Expr, hasher: &mut DefaultHasher) {
    discriminant(&expr.kind).hash(hasher);
    match &expr.kind {
        ExprKind::Number(value) => number_bits(*value).hash(hasher),
        ExprKind::Str(text) => text.hash(hasher),
        ExprKind::Bool(value) => value.hash(hasher),
        ExprKind::Null => {}
        ExprKind::Ident(name) => name.hash(hasher),
        ExprKind::Array(items) => {
            items.len().hash(hasher);
            items.iter().for_each(|item| hash_into(item, hasher));
        }
        ExprKind::Object(fields) => {
            fields.len().hash(hasher);
            for (key, value) in fields {
                key.hash(hasher);
                hash_into(value, hasher);
            }
        }
        ExprKind::Unary { op, operand } => {
            op.hash(hasher);
            hash_into(operand, hasher);
        }
        ExprKind::Binary { op, left, right } => {
            op.hash(hasher);
            hash_into(left, hasher);
            hash_into(right, hasher);
        }
        ExprKind::Logical { op, left, right } => {
            op.hash(hasher);
            hash_into(left, hasher);
            hash_into(right, hasher);
        }
        ExprKind::Conditional {
            cond,
            then,
            otherwise,
        } => {
            hash_into(cond, hasher);
            hash_into(then, hasher);
            hash_into(otherwise, hasher);
        }
        ExprKind::Member { object, property } => {
            hash_into(object, hasher);
            property.hash(hasher);
        }
        ExprKind::Index { object, index } => {
            hash_into(object, hasher);
            hash_into(index, hasher);
        }
        ExprKind::Call {
            callee,
            args,
            attrs,
        } => {
            hash_into(callee, hasher);
            args.len().hash(hasher);
            args.iter().for_each(|arg| hash_into(arg, hasher));
            if let Some(attrs) = attrs {
                hash_into(attrs, hasher);
            }
        }
        ExprKind::Function(lit) => {
            lit.params.hash(hasher);
            lit.body.len().hash(hasher);
        }
        ExprKind::Map(lit) => {
            lit.params.hash(hasher);
            hash_into(&lit.body, hasher);
        }
    }
}

fn same_list(a: &[Expr], b: &[Expr]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same_structure(x, y))
}

/// Span-insensitive structural equality.
pub fn same_structure(a: &Expr, b: &Expr) -> bool {
    match (&a.kind, &b.kind) {
        (ExprKind::Number(x), ExprKind::Number(y)) => x == y,
        (ExprKind::Str(x), ExprKind::Str(y)) => x == y,
        (ExprKind::Bool(x), ExprKind::Bool(y)) => x == y,
        (ExprKind::Null, ExprKind::Null) => true,
        (ExprKind::Ident(x), ExprKind::Ident(y)) => x == y,
        (ExprKind::Array(x), ExprKind::Array(y)) => same_list(x, y),
        (ExprKind::Object(x), ExprKind::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .zip(y)
                    .all(|((kx, vx), (ky, vy))| kx == ky && same_structure(vx, vy))
        }
        (
            ExprKind::Unary { op, operand },
            ExprKind::Unary {
                op: op2,
                operand: operand2,
            },
        ) => op == op2 && same_structure(operand, operand2),
        (
            ExprKind::Binary { op, left, right },
            ExprKind::Binary {
                op: op2,
                left: left2,
                right: right2,
            },
        ) => op == op2 && same_structure(left, left2) && same_structure(right, right2),
        (
            ExprKind::Logical { op, left, right },
            ExprKind::Logical {
                op: op2,
                left: left2,
                right: right2,
            },
        ) => op == op2 && same_structure(left, left2) && same_structure(right, right2),
        (
            ExprKind::Conditional {
                cond,
                then,
                otherwise,
            },
            ExprKind::Conditional {
                cond: cond2,
                then: then2,
                otherwise: otherwise2,
            },
        ) => {
            same_structure(cond, cond2)
                && same_structure(then, then2)
                && same_structure(otherwise, otherwise2)
        }
        (
            ExprKind::Member { object, property },
            ExprKind::Member {
                object: object2,
                property: property2,
            },
        ) => property == property2 && same_structure(object, object2),
        (
            ExprKind::Index { object, index },
            ExprKind::Index {
                object: object2,
                index: index2,
            },
        ) => same_structure(object, object2) && same_structure(index, index2),
        (
            ExprKind::Call {
                callee,
                args,
                attrs,
            },
            ExprKind::Call {
                callee: callee2,
                args: args2,
                attrs: attrs2,
            },
        ) => {
            let attrs_match = match (attrs, attrs2) {
                (Some(x), Some(y)) => same_structure(x, y),
                (None, None) => true,
                _ => false,
            };
            attrs_match && same_structure(callee, callee2) && same_list(args, args2)
        }
        (ExprKind::Function(x), ExprKind::Function(y)) => Rc::ptr_eq(x, y) || x == y,
        (ExprKind::Map(x), ExprKind::Map(y)) => {
            x.params == y.params && same_structure(&x.body, &y.body)
        }
        _ => false,
    }
}

/// Fast check combining the hash and full comparison.
pub(crate) fn equivalent(a: &Expr, b: &Expr) -> bool {
    structural_hash(a) == structural_hash(b) && same_structure(a, b)
}
