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

//! Generic math catalog.

use super::{Arity, BuiltinDef, Origin, arg_error, number_arg};
use crate::ast::BinOp;
use crate::diagnostics::ScriptError;
use crate::interp::Interpreter;
use crate::runtime::{Value, ops};

fn apply_unary(
    interp: &Interpreter,
    name: &str,
    args: &[Value],
    f: fn(f64) -> f64,
    monotone: bool,
) -> Result<Value, ScriptError> {
    match args.first() {
        Some(Value::Number(x)) => Ok(Value::Number(f(*x))),
        Some(Value::Interval(iv)) if monotone => Ok(Value::Interval(
            iv.map_increasing(f, interp.options().outward_rounding),
        )),
        Some(other) => Err(arg_error(
            name,
            format_args!("cannot be applied to {}", other.kind()),
        )),
        None => Err(arg_error(name, "missing argument 1")),
    }
}

macro_rules! unary_fn {
    ($fn_name:ident, $name:literal, $f:expr) => {
        unary_fn!($fn_name, $name, $f, false);
    };
    ($fn_name:ident, $name:literal, $f:expr, $monotone:expr) => {
        fn $fn_name(interp: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
            apply_unary(interp, $name, args, $f, $monotone)
        }
    };
}

unary_fn!(acos, "acos", f64::acos);
unary_fn!(acosh, "acosh", f64::acosh, true);
unary_fn!(acot, "acot", |x: f64| (1.0 / x).atan());
unary_fn!(asin, "asin", f64::asin, true);
unary_fn!(asinh, "asinh", f64::asinh, true);
unary_fn!(atan, "atan", f64::atan, true);
unary_fn!(atanh, "atanh", f64::atanh, true);
unary_fn!(cbrt, "cbrt", f64::cbrt, true);
unary_fn!(ceil, "ceil", f64::ceil, true);
unary_fn!(cos, "cos", f64::cos);
unary_fn!(cosh, "cosh", f64::cosh);
unary_fn!(cot, "cot", |x: f64| 1.0 / x.tan());
unary_fn!(coth, "coth", |x: f64| 1.0 / x.tanh());
unary_fn!(csc, "csc", |x: f64| 1.0 / x.sin());
unary_fn!(exp, "exp", f64::exp, true);
unary_fn!(floor, "floor", f64::floor, true);
unary_fn!(ln, "ln", f64::ln, true);
unary_fn!(log2, "log2", f64::log2, true);
unary_fn!(log10, "log10", f64::log10, true);
unary_fn!(round, "round", |x: f64| (x + 0.5).floor(), true);
unary_fn!(sec, "sec", |x: f64| 1.0 / x.cos());
unary_fn!(sin, "sin", f64::sin);
unary_fn!(sinh, "sinh", f64::sinh, true);
unary_fn!(sqrt, "sqrt", f64::sqrt, true);
unary_fn!(tan, "tan", f64::tan);
unary_fn!(tanh, "tanh", f64::tanh, true);
unary_fn!(trunc, "trunc", f64::trunc, true);

fn abs(interp: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    if let Some(Value::Interval(iv)) = args.first() {
        let result = if iv.lo >= 0.0 {
            *iv
        } else if iv.hi <= 0.0 {
            iv.neg()
        } else {
            crate::runtime::Interval::new(0.0, iv.hi.max(-iv.lo))
        };
        return Ok(Value::Interval(result));
    }
    apply_unary(interp, "abs", args, f64::abs, false)
}

fn sign(interp: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    apply_unary(
        interp,
        "sign",
        args,
        |x: f64| if x == 0.0 || x.is_nan() { x } else { x.signum() },
        false,
    )
}

/// Natural logarithm, or logarithm to the base given as second argument.
fn log(interp: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    if args.len() == 2 {
        let x = number_arg("log", args, 0)?;
        let base = number_arg("log", args, 1)?;
        return Ok(Value::Number(x.ln() / base.ln()));
    }
    apply_unary(interp, "log", args, f64::ln, true)
}

fn factorial(_: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    let n = number_arg("factorial", args, 0)?;
    if n < 0.0 || n.fract() != 0.0 {
        return Ok(Value::Number(f64::NAN));
    }
    let mut product: f64 = 1.0;
    let mut k = 2.0;
    while k <= n && product.is_finite() {
        product *= k;
        k += 1.0;
    }
    Ok(Value::Number(product))
}

fn atan2(_: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    let y = number_arg("atan2", args, 0)?;
    let x = number_arg("atan2", args, 1)?;
    Ok(Value::Number(y.atan2(x)))
}

fn hypot(_: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    let x = number_arg("hypot", args, 0)?;
    let y = number_arg("hypot", args, 1)?;
    Ok(Value::Number(x.hypot(y)))
}

fn pow(interp: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    ops::binary(BinOp::Pow, &args[0], &args[1], interp.options())
}

fn fold_numbers(
    name: &str,
    args: &[Value],
    init: f64,
    pick: fn(f64, f64) -> f64,
) -> Result<Value, ScriptError> {
    let mut acc = init;
    for index in 0..args.len() {
        let value = number_arg(name, args, index)?;
        if value.is_nan() {
            return Ok(Value::Number(f64::NAN));
        }
        acc = pick(acc, value);
    }
    Ok(Value::Number(acc))
}

fn max(_: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    fold_numbers("max", args, f64::NEG_INFINITY, f64::max)
}

fn min(_: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    fold_numbers("min", args, f64::INFINITY, f64::min)
}

const ONE: Arity = Arity::Exact(1);
const TWO: Arity = Arity::Exact(2);

pub(super) static CATALOG: &[BuiltinDef] = &[
    BuiltinDef::function("abs", Origin::Math, ONE, abs),
    BuiltinDef::function("acos", Origin::Math, ONE, acos),
    BuiltinDef::function("acosh", Origin::Math, ONE, acosh),
    BuiltinDef::function("acot", Origin::Math, ONE, acot),
    BuiltinDef::function("asin", Origin::Math, ONE, asin),
    BuiltinDef::function("asinh", Origin::Math, ONE, asinh),
    BuiltinDef::function("atan", Origin::Math, ONE, atan),
    BuiltinDef::function("atan2", Origin::Math, TWO, atan2),
    BuiltinDef::function("atanh", Origin::Math, ONE, atanh),
    BuiltinDef::function("cbrt", Origin::Math, ONE, cbrt),
    BuiltinDef::function("ceil", Origin::Math, ONE, ceil),
    BuiltinDef::function("cos", Origin::Math, ONE, cos),
    BuiltinDef::function("cosh", Origin::Math, ONE, cosh),
    BuiltinDef::function("cot", Origin::Math, ONE, cot),
    BuiltinDef::function("coth", Origin::Math, ONE, coth),
    BuiltinDef::function("csc", Origin::Math, ONE, csc),
    BuiltinDef::function("exp", Origin::Math, ONE, exp),
    BuiltinDef::function("factorial", Origin::Math, ONE, factorial),
    BuiltinDef::function("floor", Origin::Math, ONE, floor),
    BuiltinDef::function("hypot", Origin::Math, TWO, hypot),
    BuiltinDef::function("ln", Origin::Math, ONE, ln),
    BuiltinDef::function("log", Origin::Math, Arity::Range(1, 2), log),
    BuiltinDef::function("log2", Origin::Math, ONE, log2),
    BuiltinDef::function("log10", Origin::Math, ONE, log10),
    BuiltinDef::function("max", Origin::Math, Arity::AtLeast(0), max),
    BuiltinDef::function("min", Origin::Math, Arity::AtLeast(0), min),
    BuiltinDef::function("pow", Origin::Math, TWO, pow),
    BuiltinDef::function("round", Origin::Math, ONE, round),
    BuiltinDef::function("sec", Origin::Math, ONE, sec),
    BuiltinDef::function("sign", Origin::Math, ONE, sign),
    BuiltinDef::function("sin", Origin::Math, ONE, sin),
    BuiltinDef::function("sinh", Origin::Math, ONE, sinh),
    BuiltinDef::function("sqrt", Origin::Math, ONE, sqrt),
    BuiltinDef::function("tan", Origin::Math, ONE, tan),
    BuiltinDef::function("tanh", Origin::Math, ONE, tanh),
    BuiltinDef::function("trunc", Origin::Math, ONE, trunc),
    BuiltinDef::constant("PI", Origin::Math, std::f64::consts::PI),
    BuiltinDef::constant("EULER", Origin::Math, std::f64::consts::E),
    BuiltinDef::constant("Infinity", Origin::Math, f64::INFINITY),
    BuiltinDef::constant("NaN", Origin::Math, f64::NAN),
];
