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

//! Language-level builtins.

use super::{Arity, BuiltinDef, Origin, arg_error};
use crate::ast::{MapLit, SourceSpan};
use crate::diagnostics::ScriptError;
use crate::expand::{called_functions, derivative, simplify};
use crate::interp::Interpreter;
use crate::runtime::{Body, FunctionKind, Interval, ResolveOptions, Value};
use std::rc::Rc;

/// Runtime derivative of a script function: `D(f)` or `D(f, 'x')`.
///
/// Only reached when the expander could not resolve the target statically.
fn d(interp: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    let Value::Function(function) = &args[0] else {
        return Err(arg_error("D", format_args!("cannot differentiate {}", args[0].kind())));
    };
    let Some(closure) = function.closure() else {
        let name = function.name.clone().unwrap_or_default();
        return Err(ScriptError::derivative(name, &SourceSpan::default()));
    };
    let (params, body, span) = match &closure.body {
        Body::Map(lit) => (lit.params.clone(), lit.body.clone(), lit.span.clone()),
        Body::Function(lit) => match lit.single_return() {
            Some(expr) => (lit.params.clone(), expr.clone(), lit.span.clone()),
            None => return Err(ScriptError::derivative("function body", &lit.span)),
        },
    };
    let var = match args.get(1) {
        Some(Value::Str(name)) => name.to_string(),
        None | Some(Value::Undefined) => match params.first() {
            Some(first) => first.clone(),
            None => return Err(arg_error("D", "function has no parameters")),
        },
        Some(other) => {
            return Err(arg_error("D", format_args!("variable must be a string, got {}", other.kind())));
        }
    };
    // Symbolic rules only hold for the catalog functions themselves.
    let previous = interp.scopes_mut().activate(closure.scope);
    let mut shadowed = None;
    for (name, call_span) in called_functions(&body) {
        let resolved = interp.resolve(&name, ResolveOptions::math_only());
        let is_math = match &resolved {
            Value::Function(f) => {
                matches!(&f.kind, FunctionKind::Builtin(def) if def.is_math_function())
            }
            _ => false,
        };
        if !is_math {
            shadowed = Some((name, call_span));
            break;
        }
    }
    interp.scopes_mut().restore(previous);
    if let Some((name, call_span)) = shadowed {
        return Err(ScriptError::derivative(name, &call_span));
    }
    let derived = simplify(&derivative(&body, &var)?);
    let lit = MapLit {
        params,
        body: derived,
        span,
    };
    Ok(interp.make_closure(Body::Map(Rc::new(lit)), closure.scope, function.is_compiled()))
}

fn if_then(_: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    Ok(if args[0].is_truthy() {
        args[1].clone()
    } else {
        args[2].clone()
    })
}

fn interval(_: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    let lo = super::number_arg("interval", args, 0)?;
    let hi = match args.get(1) {
        Some(_) => super::number_arg("interval", args, 1)?,
        None => lo,
    };
    Ok(Value::Interval(Interval::new(lo, hi)))
}

fn remove(interp: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    let Some(handle) = args[0].as_element() else {
        return Err(arg_error("remove", format_args!("expected an element, got {}", args[0].kind())));
    };
    interp
        .host_mut()
        .remove_object(handle)
        .map_err(|err| ScriptError::runtime(err.to_string(), &SourceSpan::default()))?;
    Ok(Value::Undefined)
}

fn script_log(_: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    let line = args
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    log::info!("{line}");
    Ok(Value::Undefined)
}

pub(super) static CATALOG: &[BuiltinDef] = &[
    BuiltinDef::function("D", Origin::Core, Arity::Range(1, 2), d),
    BuiltinDef::function("IfThen", Origin::Core, Arity::Exact(3), if_then),
    BuiltinDef::function("interval", Origin::Core, Arity::Range(1, 2), interval),
    BuiltinDef::function("remove", Origin::Core, Arity::Exact(1), remove),
    BuiltinDef::function("$log", Origin::Core, Arity::AtLeast(0), script_log),
];
