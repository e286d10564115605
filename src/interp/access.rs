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

//! Property access, indexing and assignment.

use super::*;
use crate::ast::{Expr, ExprKind, Target};
use crate::host::{self, ElementKind, Property};
use crate::runtime::format_number;

/// Attribute name an element stores `name` under, or the method it names.
fn element_property(kind: ElementKind, name: &str) -> Result<String, &'static str> {
    match host::property(kind, name) {
        Some(Property::Method(builtin)) => Err(builtin),
        Some(Property::Attribute(attribute)) => Ok(attribute.to_string()),
        None => Ok(name.to_ascii_lowercase()),
    }
}

/// Integral, non-negative array position.
fn array_position(index: f64) -> Option<usize> {
    (index >= 0.0 && index.fract() == 0.0 && index.is_finite()).then_some(index as usize)
}

fn object_key(index: &Value) -> Option<String> {
    match index {
        Value::Str(key) => Some(key.to_string()),
        Value::Number(n) => Some(format_number(*n)),
        _ => None,
    }
}

impl Interpreter {
    /// Reads `object.name`.
    pub(crate) fn get_member(
        &self,
        object: &Value,
        name: &str,
        span: &SourceSpan,
    ) -> Result<Value, ScriptError> {
        match object {
            Value::Element(handle) => {
                let kind = self.element_kind(*handle, span)?;
                let attribute = element_property(kind, name).map_err(|_| {
                    ScriptError::type_error(
                        format!("'{name}' is a method of {}; call it as {name}()", kind.name()),
                        span,
                    )
                })?;
                match self.host.get_attribute(*handle, &attribute) {
                    Some(Value::Function(_)) => Err(ScriptError::type_error(
                        format!("property '{name}' of {} holds a function", kind.name()),
                        span,
                    )),
                    Some(value) => Ok(value),
                    None => Ok(Value::Undefined),
                }
            }
            Value::Object(fields) => Ok(fields.borrow().get(name).cloned().unwrap_or_default()),
            Value::Interval(iv) => Ok(match name {
                "lo" => Value::Number(iv.lo),
                "hi" => Value::Number(iv.hi),
                _ => Value::Undefined,
            }),
            Value::Array(items) if name == "length" => Ok(Value::Number(items.borrow().len() as f64)),
            Value::Str(text) if name == "length" => Ok(Value::Number(text.chars().count() as f64)),
            Value::Undefined | Value::Null => Err(ScriptError::type_error(
                format!("cannot read property '{name}' of {}", object.kind()),
                span,
            )),
            _ => Ok(Value::Undefined),
        }
    }

    /// Reads `object[index]`.
    pub(crate) fn get_index(
        &self,
        object: &Value,
        index: &Value,
        span: &SourceSpan,
    ) -> Result<Value, ScriptError> {
        match (object, index) {
            (Value::Array(items), Value::Number(n)) => Ok(array_position(*n)
                .and_then(|pos| items.borrow().get(pos).cloned())
                .unwrap_or_default()),
            (Value::Str(text), Value::Number(n)) => Ok(array_position(*n)
                .and_then(|pos| text.chars().nth(pos))
                .map(|ch| Value::from(ch.to_string()))
                .unwrap_or_default()),
            (Value::Element(_), Value::Str(name)) => self.get_member(object, name, span),
            (Value::Object(fields), key) => match object_key(key) {
                Some(key) => Ok(fields.borrow().get(&key).cloned().unwrap_or_default()),
                None => Err(ScriptError::type_error(
                    format!("cannot index an object with {}", key.kind()),
                    span,
                )),
            },
            _ => Err(ScriptError::type_error(
                format!("cannot index {} with {}", object.kind(), index.kind()),
                span,
            )),
        }
    }

    pub(super) fn assign(
        &mut self,
        target: &Target,
        value: Value,
        span: &SourceSpan,
    ) -> Result<(), ScriptError> {
        match target {
            Target::Ident(name) => {
                self.bind(name, value, span);
                Ok(())
            }
            Target::Member { object, property } => {
                let base = self.assignment_base(object)?;
                self.set_member(&base, property, value, span)
            }
            Target::Index { object, index } => {
                let base = self.assignment_base(object)?;
                let index = self.eval(index)?;
                self.set_index(&base, &index, value, span)
            }
        }
    }

    /// Evaluates the object of `a.b = v` / `a[i] = v`; a bare name must
    /// resolve.
    fn assignment_base(&mut self, object: &Expr) -> Result<Value, ScriptError> {
        if let ExprKind::Ident(name) = &object.kind {
            return self.resolve_required(name, &object.span);
        }
        self.eval(object)
    }

    /// Binds `name` in the current scope.
    pub(crate) fn bind(&mut self, name: &str, value: Value, span: &SourceSpan) {
        let current = self.scopes.current();
        let fresh = self.scopes.is_local(name) != Some(current);
        if fresh && (self.builtins.has(name) || ElementKind::creator(name).is_some()) {
            self.warn(
                WarningKind::Shadowing,
                format!("'{name}' shadows a builtin"),
                span,
            );
        }
        self.scopes.let_local(name, value);
    }

    pub(crate) fn set_member(
        &mut self,
        object: &Value,
        name: &str,
        value: Value,
        span: &SourceSpan,
    ) -> Result<(), ScriptError> {
        match object {
            Value::Element(handle) => {
                let kind = self.element_kind(*handle, span)?;
                let attribute = element_property(kind, name).map_err(|_| {
                    ScriptError::type_error(
                        format!("cannot assign to method '{name}' of {}", kind.name()),
                        span,
                    )
                })?;
                let value = self.compile_provider(value);
                self.host
                    .set_attribute(*handle, &attribute, value)
                    .map_err(|err| ScriptError::runtime(err.to_string(), span))
            }
            Value::Object(fields) => {
                fields.borrow_mut().insert(name.to_string(), value);
                Ok(())
            }
            _ => Err(ScriptError::type_error(
                format!("cannot set property '{name}' on {}", object.kind()),
                span,
            )),
        }
    }

    pub(crate) fn set_index(
        &mut self,
        object: &Value,
        index: &Value,
        value: Value,
        span: &SourceSpan,
    ) -> Result<(), ScriptError> {
        match (object, index) {
            (Value::Array(items), Value::Number(n)) => {
                let Some(pos) = array_position(*n) else {
                    return Err(ScriptError::type_error(
                        format!("invalid array index {}", format_number(*n)),
                        span,
                    ));
                };
                let mut items = items.borrow_mut();
                if pos >= items.len() {
                    items.resize(pos + 1, Value::Undefined);
                }
                items[pos] = value;
                Ok(())
            }
            (Value::Element(_), Value::Str(name)) => self.set_member(object, name, value, span),
            (Value::Object(fields), key) => match object_key(key) {
                Some(key) => {
                    fields.borrow_mut().insert(key, value);
                    Ok(())
                }
                None => Err(ScriptError::type_error(
                    format!("cannot index an object with {}", key.kind()),
                    span,
                )),
            },
            _ => Err(ScriptError::type_error(
                format!("cannot assign {}[{}]", object.kind(), index.kind()),
                span,
            )),
        }
    }
}
