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

//! Polymorphic operator semantics.
//!
//! Both execution backends route every non-scalar operation through
//! [`binary`] and [`unary`], so they agree on arrays, intervals and strings.

use crate::ast::{BinOp, SourceSpan, UnaryOp};
use crate::config::Options;
use crate::diagnostics::ScriptError;
use crate::runtime::interval::Interval;
use crate::runtime::value::{ArrayRef, MAX_NESTING, Value};
use std::cmp::Ordering;
use std::rc::Rc;

/// Applies a binary operator to two values.
pub fn binary(op: BinOp, left: &Value, right: &Value, options: &Options) -> Result<Value, ScriptError> {
    match op {
        BinOp::Eq => Ok(Value::Bool(loose_equals(left, right))),
        BinOp::Ne => Ok(Value::Bool(!loose_equals(left, right))),
        BinOp::Approx => approx_equals(left, right, options.approx_tolerance, 0).map(Value::Bool),
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => compare(op, left, right).map(Value::Bool),
        _ => arithmetic(op, left, right, options),
    }
}

/// Applies a prefix operator.
pub fn unary(op: UnaryOp, operand: &Value) -> Result<Value, ScriptError> {
    match (op, operand) {
        (UnaryOp::Not, value) => Ok(Value::Bool(!value.is_truthy())),
        (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
        (UnaryOp::Neg, Value::Interval(iv)) => Ok(Value::Interval(iv.neg())),
        (UnaryOp::Neg, Value::Array(items)) => {
            let negated = items
                .borrow()
                .iter()
                .map(|item| unary(UnaryOp::Neg, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::array(negated))
        }
        (UnaryOp::Plus, Value::Number(_) | Value::Interval(_)) => Ok(operand.clone()),
        (UnaryOp::Plus, Value::Bool(b)) => Ok(Value::Number(if *b { 1.0 } else { 0.0 })),
        (UnaryOp::Plus, Value::Str(s)) => Ok(Value::Number(s.trim().parse().unwrap_or(f64::NAN))),
        (op, value) => Err(type_error(format!(
            "operator '{}' cannot be applied to {}",
            op.symbol(),
            value.kind()
        ))),
    }
}

/// Native arithmetic on two numbers.
pub fn arith_f64(op: BinOp, a: f64, b: f64) -> f64 {
    match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => a / b,
        // f64 `%` truncates toward zero like the script remainder.
        BinOp::Mod => a % b,
        BinOp::Pow => a.powf(b),
        _ => f64::NAN,
    }
}

/// Native evaluation of any binary operator on two numbers.
pub fn scalar(op: BinOp, a: f64, b: f64, tolerance: f64) -> Value {
    match op {
        BinOp::Eq => Value::Bool(a == b),
        BinOp::Ne => Value::Bool(a != b),
        BinOp::Approx => Value::Bool((a - b).abs() < tolerance),
        BinOp::Lt => Value::Bool(a < b),
        BinOp::Le => Value::Bool(a <= b),
        BinOp::Gt => Value::Bool(a > b),
        BinOp::Ge => Value::Bool(a >= b),
        _ => Value::Number(arith_f64(op, a, b)),
    }
}

/// Equality used by `==`: values of different kinds are unequal, except
/// that `null` equals `undefined` and a number equals its degenerate interval.
pub fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null | Value::Undefined, Value::Null | Value::Undefined) => true,
        (Value::Number(n), Value::Interval(iv)) | (Value::Interval(iv), Value::Number(n)) => {
            iv.lo == *n && iv.hi == *n
        }
        _ => left == right,
    }
}

fn approx_equals(left: &Value, right: &Value, tolerance: f64, depth: usize) -> Result<bool, ScriptError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((a - b).abs() < tolerance),
        (Value::Interval(_), _) | (_, Value::Interval(_)) => {
            match (left.as_interval(), right.as_interval()) {
                (Some(a), Some(b)) => {
                    Ok((a.lo - b.lo).abs() < tolerance && (a.hi - b.hi).abs() < tolerance)
                }
                _ => Err(incompatible(BinOp::Approx, left, right)),
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            if Rc::ptr_eq(a, b) {
                return Ok(true);
            }
            if depth >= MAX_NESTING {
                return Ok(false);
            }
            let (a, b) = (a.borrow(), b.borrow());
            if a.len() != b.len() {
                return Ok(false);
            }
            for (x, y) in a.iter().zip(b.iter()) {
                if !approx_equals(x, y, tolerance, depth + 1)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => Err(incompatible(BinOp::Approx, left, right)),
    }
}

fn compare(op: BinOp, left: &Value, right: &Value) -> Result<bool, ScriptError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(match op {
            BinOp::Lt => a < b,
            BinOp::Le => a <= b,
            BinOp::Gt => a > b,
            _ => a >= b,
        }),
        (Value::Str(a), Value::Str(b)) => {
            let ordering = a.cmp(b);
            Ok(match op {
                BinOp::Lt => ordering == Ordering::Less,
                BinOp::Le => ordering != Ordering::Greater,
                BinOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            })
        }
        (Value::Interval(_), _) | (_, Value::Interval(_)) => {
            let (Some(a), Some(b)) = (left.as_interval(), right.as_interval()) else {
                return Err(incompatible(op, left, right));
            };
            // An interval comparison holds only when it holds for every
            // pair of members.
            Ok(match op {
                BinOp::Lt => a.hi < b.lo,
                BinOp::Le => a.hi <= b.lo,
                BinOp::Gt => a.lo > b.hi,
                _ => a.lo >= b.hi,
            })
        }
        _ => Err(incompatible(op, left, right)),
    }
}

fn arithmetic(op: BinOp, left: &Value, right: &Value, options: &Options) -> Result<Value, ScriptError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(arith_f64(op, *a, *b))),
        (Value::Str(_), _) | (_, Value::Str(_)) if op == BinOp::Add => {
            Ok(Value::from(format!("{left}{right}")))
        }
        (Value::Interval(_), Value::Number(_) | Value::Interval(_))
        | (Value::Number(_), Value::Interval(_)) => interval_arithmetic(op, left, right, options),
        (Value::Array(a), Value::Array(b)) => array_array(op, a, b, options),
        (Value::Array(items), Value::Number(_) | Value::Interval(_))
            if matches!(op, BinOp::Mul | BinOp::Div) =>
        {
            map_items(items, |item| arithmetic(op, item, right, options))
        }
        (Value::Number(_) | Value::Interval(_), Value::Array(items)) if op == BinOp::Mul => {
            map_items(items, |item| arithmetic(op, left, item, options))
        }
        _ => Err(incompatible(op, left, right)),
    }
}

fn interval_arithmetic(
    op: BinOp,
    left: &Value,
    right: &Value,
    options: &Options,
) -> Result<Value, ScriptError> {
    let outward = options.outward_rounding;
    let (Some(a), Some(b)) = (left.as_interval(), right.as_interval()) else {
        return Err(incompatible(op, left, right));
    };
    let result = match op {
        BinOp::Add => a.add(b, outward),
        BinOp::Sub => a.sub(b, outward),
        BinOp::Mul => a.mul(b, outward),
        BinOp::Div => a.div(b, outward),
        BinOp::Pow => interval_pow(a, right, outward)
            .ok_or_else(|| incompatible(op, left, right))?,
        _ => return Err(incompatible(op, left, right)),
    };
    Ok(Value::Interval(result))
}

fn interval_pow(base: Interval, exponent: &Value, outward: bool) -> Option<Interval> {
    let exponent = exponent.as_number()?;
    if exponent.fract() == 0.0 && exponent.abs() <= i32::MAX as f64 {
        return Some(base.powi(exponent as i32, outward));
    }
    if base.lo >= 0.0 && exponent > 0.0 {
        return Some(base.map_increasing(|v| v.powf(exponent), outward));
    }
    None
}

fn array_array(op: BinOp, a: &ArrayRef, b: &ArrayRef, options: &Options) -> Result<Value, ScriptError> {
    let (left, right) = (a.borrow(), b.borrow());
    if left.len() != right.len() {
        return Err(type_error(format!(
            "operator '{}' needs arrays of equal length, got {} and {}",
            op.symbol(),
            left.len(),
            right.len()
        )));
    }
    match op {
        BinOp::Add | BinOp::Sub => {
            let items = left
                .iter()
                .zip(right.iter())
                .map(|(x, y)| arithmetic(op, x, y, options))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::array(items))
        }
        // Inner product.
        BinOp::Mul => {
            let mut sum = Value::Number(0.0);
            for (x, y) in left.iter().zip(right.iter()) {
                let product = arithmetic(BinOp::Mul, x, y, options)?;
                sum = arithmetic(BinOp::Add, &sum, &product, options)?;
            }
            Ok(sum)
        }
        _ => Err(type_error(format!(
            "operator '{}' cannot be applied to array and array",
            op.symbol()
        ))),
    }
}

fn map_items(
    items: &ArrayRef,
    f: impl Fn(&Value) -> Result<Value, ScriptError>,
) -> Result<Value, ScriptError> {
    let mapped = items.borrow().iter().map(f).collect::<Result<Vec<_>, _>>()?;
    Ok(Value::array(mapped))
}

fn incompatible(op: BinOp, left: &Value, right: &Value) -> ScriptError {
    type_error(format!(
        "operator '{}' cannot be applied to {} and {}",
        op.symbol(),
        left.kind(),
        right.kind()
    ))
}

fn type_error(message: String) -> ScriptError {
    ScriptError::type_error(message, &SourceSpan::default())
}
