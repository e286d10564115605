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

//! Geometry helpers over host elements and `[x, y]` arrays.

use super::{Arity, BuiltinDef, Origin, arg_error};
use crate::diagnostics::ScriptError;
use crate::host::ElementKind;
use crate::interp::Interpreter;
use crate::runtime::Value;
use rs_math3d::Vec2d;
use std::f64::consts::PI;

/// Resolves a numeric attribute, invoking function-valued providers.
fn provided_number(interp: &mut Interpreter, value: Value, what: &str) -> Result<f64, ScriptError> {
    match value {
        Value::Number(n) => Ok(n),
        Value::Function(_) => match interp.call(&value, &[])? {
            Value::Number(n) => Ok(n),
            other => Err(arg_error(
                what,
                format_args!("provider returned {}", other.kind()),
            )),
        },
        other => Err(arg_error(what, format_args!("expected a number, got {}", other.kind()))),
    }
}

/// Coordinates of a point element or a two-element array.
fn point_coords(interp: &mut Interpreter, value: &Value) -> Result<Vec2d, ScriptError> {
    match value {
        Value::Element(handle) if interp.host().is_point(*handle) => {
            let x = interp.host().get_attribute(*handle, "x").unwrap_or_default();
            let y = interp.host().get_attribute(*handle, "y").unwrap_or_default();
            let x = provided_number(interp, x, "X")?;
            let y = provided_number(interp, y, "Y")?;
            Ok(Vec2d::new(x, y))
        }
        Value::Array(items) => {
            let items = items.borrow().clone();
            match items.as_slice() {
                [x, y] => {
                    let x = provided_number(interp, x.clone(), "X")?;
                    let y = provided_number(interp, y.clone(), "Y")?;
                    Ok(Vec2d::new(x, y))
                }
                _ => Err(arg_error("point", "arrays must hold two coordinates")),
            }
        }
        other => Err(arg_error("point", format_args!("expected a point, got {}", other.kind()))),
    }
}

fn distance(a: Vec2d, b: Vec2d) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

fn element_of(args: &[Value], index: usize, name: &str) -> Result<crate::host::ElementHandle, ScriptError> {
    args.get(index)
        .and_then(Value::as_element)
        .ok_or_else(|| arg_error(name, format_args!("argument {} must be an element", index + 1)))
}

fn x(interp: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    Ok(Value::Number(point_coords(interp, &args[0])?.x))
}

fn y(interp: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    Ok(Value::Number(point_coords(interp, &args[0])?.y))
}

/// Value of an element: its `value` attribute, or the number itself.
fn v(interp: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    match &args[0] {
        Value::Element(handle) => {
            let value = interp
                .host()
                .get_attribute(*handle, "value")
                .or_else(|| interp.host().get_attribute(*handle, "text"))
                .unwrap_or_default();
            match value {
                Value::Function(_) => interp.call(&value, &[]),
                other => Ok(other),
            }
        }
        other => Ok(other.clone()),
    }
}

fn dist(interp: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    let a = point_coords(interp, &args[0])?;
    let b = point_coords(interp, &args[1])?;
    Ok(Value::Number(distance(a, b)))
}

/// Length of a segment or line between its two defining points.
fn l(interp: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    let handle = element_of(args, 0, "L")?;
    if !interp.host().is_line(handle) {
        return Err(arg_error("L", "expected a segment or line"));
    }
    let parents = interp.host().parents(handle);
    let [a, b] = parents.as_slice() else {
        return Err(arg_error("L", "line without two points"));
    };
    let a = point_coords(interp, a)?;
    let b = point_coords(interp, b)?;
    Ok(Value::Number(distance(a, b)))
}

/// Counterclockwise angle at `B` from `BA` to `BC`, in `[0, 2*PI)`.
fn angle(interp: &mut Interpreter, args: &[Value]) -> Result<f64, ScriptError> {
    let a = point_coords(interp, &args[0])?;
    let b = point_coords(interp, &args[1])?;
    let c = point_coords(interp, &args[2])?;
    let phi = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    Ok(if phi < 0.0 { phi + 2.0 * PI } else { phi })
}

fn rad(interp: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    angle(interp, args).map(Value::Number)
}

fn deg(interp: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    angle(interp, args).map(|phi| Value::Number(phi.to_degrees()))
}

fn circle_radius(interp: &mut Interpreter, handle: crate::host::ElementHandle) -> Result<f64, ScriptError> {
    if let Some(radius) = interp.host().get_attribute(handle, "radius") {
        return provided_number(interp, radius, "radius");
    }
    let parents = interp.host().parents(handle);
    let [center, through] = parents.as_slice() else {
        return Err(arg_error("radius", "circle without center"));
    };
    let center = point_coords(interp, center)?;
    let through = point_coords(interp, through)?;
    Ok(distance(center, through))
}

fn radius(interp: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    let handle = element_of(args, 0, "radius")?;
    if interp.host().element_kind(handle) != Some(ElementKind::Circle) {
        return Err(arg_error("radius", "expected a circle"));
    }
    circle_radius(interp, handle).map(Value::Number)
}

/// Area of a circle or a simple polygon.
fn area(interp: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    let handle = element_of(args, 0, "area")?;
    match interp.host().element_kind(handle) {
        Some(ElementKind::Circle) => {
            let r = circle_radius(interp, handle)?;
            Ok(Value::Number(PI * r * r))
        }
        Some(ElementKind::Polygon) => {
            let parents = interp.host().parents(handle);
            let mut vertices = Vec::new();
            for parent in parents {
                vertices.push(point_coords(interp, &parent)?);
            }
            let mut twice = 0.0;
            for (idx, a) in vertices.iter().enumerate() {
                let b = &vertices[(idx + 1) % vertices.len()];
                twice += a.x * b.y - b.x * a.y;
            }
            Ok(Value::Number(twice.abs() / 2.0))
        }
        _ => Err(arg_error("area", "expected a circle or polygon")),
    }
}

/// Element lookup by id or name.
fn select(interp: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
    let key = args[0].to_string();
    Ok(interp
        .host()
        .select_by_id_or_name(&key)
        .map(Value::Element)
        .unwrap_or_default())
}

pub(super) static CATALOG: &[BuiltinDef] = &[
    BuiltinDef::function("X", Origin::Geometry, Arity::Exact(1), x),
    BuiltinDef::function("Y", Origin::Geometry, Arity::Exact(1), y),
    BuiltinDef::function("V", Origin::Geometry, Arity::Exact(1), v),
    BuiltinDef::function("L", Origin::Geometry, Arity::Exact(1), l),
    BuiltinDef::function("dist", Origin::Geometry, Arity::Exact(2), dist),
    BuiltinDef::function("rad", Origin::Geometry, Arity::Exact(3), rad),
    BuiltinDef::function("deg", Origin::Geometry, Arity::Exact(3), deg),
    BuiltinDef::function("area", Origin::Geometry, Arity::Exact(1), area),
    BuiltinDef::function("radius", Origin::Geometry, Arity::Exact(1), radius),
    BuiltinDef::function("$", Origin::Geometry, Arity::Exact(1), select),
];
