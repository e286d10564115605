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

//! Call dispatch shared by the tree walker and compiled code.

use super::*;
use crate::ast::{Expr, ExprKind};
use crate::builtins::{BuiltinDef, Entry};
use crate::host::{self, ElementKind, Property};
use crate::runtime::{FunctionKind, ResolveOptions};
use std::collections::BTreeMap;

impl Interpreter {
    /// Calls a function value with positional arguments.
    pub fn call(&mut self, callee: &Value, args: &[Value]) -> Result<Value, ScriptError> {
        self.invoke(callee, args.to_vec(), None, None, &[], &SourceSpan::default())
    }

    pub(super) fn eval_call(
        &mut self,
        callee: &Expr,
        args: &[Expr],
        attrs: Option<&Expr>,
        span: &SourceSpan,
    ) -> Result<Value, ScriptError> {
        if let ExprKind::Member { object, property } = &callee.kind {
            let object = self.eval(object)?;
            let args = self.eval_args(args)?;
            return self.invoke_method(object, property, args, span);
        }
        // Callee first, then arguments left to right.
        let function = match callee.as_ident() {
            Some(name) => self.resolve_required(name, &callee.span)?,
            None => self.eval(callee)?,
        };
        let values = self.eval_args(args)?;
        let attrs = match attrs {
            Some(attrs) => Some(self.eval(attrs)?),
            None => None,
        };
        let spans: Vec<SourceSpan> = args.iter().map(|arg| arg.span.clone()).collect();
        self.invoke(&function, values, attrs, None, &spans, span)
    }

    fn eval_args(&mut self, args: &[Expr]) -> Result<Vec<Value>, ScriptError> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg)?);
        }
        Ok(values)
    }

    /// Resolves a name that must be bound (call position, assignment base).
    pub(crate) fn resolve_required(&self, name: &str, span: &SourceSpan) -> Result<Value, ScriptError> {
        match self.resolve(name, ResolveOptions::default()) {
            Value::Undefined => Err(ScriptError::name(name, span)),
            value => Ok(value),
        }
    }

    /// Dispatches a call on an evaluated callee.
    ///
    /// `attrs` is the trailing `<<...>>` object, `context` the value `$this`
    /// is bound to, and `arg_spans` the argument positions kept as element
    /// provenance.
    pub(crate) fn invoke(
        &mut self,
        callee: &Value,
        args: Vec<Value>,
        attrs: Option<Value>,
        context: Option<Value>,
        arg_spans: &[SourceSpan],
        span: &SourceSpan,
    ) -> Result<Value, ScriptError> {
        let Value::Function(function) = callee else {
            return Err(ScriptError::type_error(
                format!("{} is not a function", callee.kind()),
                span,
            ));
        };
        let result = match &function.kind {
            FunctionKind::Creator(kind) => self.create_element(*kind, args, attrs, arg_spans),
            _ if attrs.is_some() => Err(ScriptError::type_error(
                "attribute objects are only accepted by object creators",
                span,
            )),
            FunctionKind::Builtin(def) => self.call_builtin(*def, &args),
            FunctionKind::Script(closure) => self.call_closure(closure, &args, context),
        };
        result.map_err(|err| err.or_at(span))
    }

    fn call_builtin(&mut self, def: &'static BuiltinDef, args: &[Value]) -> Result<Value, ScriptError> {
        match def.entry {
            Entry::Function { arity, func } => {
                if !arity.accepts(args.len()) {
                    return Err(ScriptError::type_error(
                        format!(
                            "{} expects {arity} arguments, got {}",
                            def.name,
                            args.len()
                        ),
                        &SourceSpan::default(),
                    ));
                }
                log::trace!("builtin {}", def.path());
                func(self, args)
            }
            Entry::Constant(_) => Err(ScriptError::type_error(
                format!("'{}' is a constant", def.name),
                &SourceSpan::default(),
            )),
        }
    }

    /// Runs a script function in a fresh scope below its defining scope.
    ///
    /// The caller's current scope is reinstalled even when the body fails.
    pub(crate) fn call_closure(
        &mut self,
        closure: &Closure,
        args: &[Value],
        context: Option<Value>,
    ) -> Result<Value, ScriptError> {
        let params = closure.params();
        let scope = self.scopes.create(params.to_vec(), closure.scope);
        for (idx, param) in params.iter().enumerate() {
            let value = args.get(idx).cloned().unwrap_or_default();
            self.scopes.define(scope, param, value);
        }
        if let Some(context) = context {
            self.scopes.set_context(scope, context);
        }
        let previous = self.scopes.activate(scope);
        self.call_depth += 1;
        let result = match &closure.backend {
            Backend::Compiled(body) => body.run(self),
            Backend::Interpreted => self.run_body(&closure.body),
        };
        self.call_depth -= 1;
        self.scopes.restore(previous);
        self.scopes.release(scope);
        result
    }

    fn run_body(&mut self, body: &Body) -> Result<Value, ScriptError> {
        match body {
            Body::Map(lit) => self.eval(&lit.body),
            Body::Function(lit) => Ok(match self.exec_block(&lit.body)? {
                Flow::Return(value) => value,
                Flow::Normal(_) => Value::Undefined,
            }),
        }
    }

    /// `obj.m(args)`: element methods go through the per-kind method table,
    /// object methods run with the object as `$this`.
    pub(crate) fn invoke_method(
        &mut self,
        object: Value,
        name: &str,
        args: Vec<Value>,
        span: &SourceSpan,
    ) -> Result<Value, ScriptError> {
        match &object {
            Value::Element(handle) => {
                let kind = self.element_kind(*handle, span)?;
                let Some(Property::Method(builtin)) = host::property(kind, name) else {
                    return Err(ScriptError::type_error(
                        format!("{} has no method '{name}'", kind.name()),
                        span,
                    ));
                };
                let Some(function) = self.builtins.get(builtin) else {
                    return Err(ScriptError::name(builtin, span));
                };
                let mut full = Vec::with_capacity(args.len() + 1);
                full.push(object.clone());
                full.extend(args);
                self.invoke(&function, full, None, None, &[], span)
            }
            Value::Object(fields) => {
                let method = fields.borrow().get(name).cloned();
                match method {
                    Some(function @ Value::Function(_)) => {
                        self.invoke(&function, args, None, Some(object.clone()), &[], span)
                    }
                    _ => Err(ScriptError::type_error(
                        format!("'{name}' is not a method of this object"),
                        span,
                    )),
                }
            }
            other => Err(ScriptError::type_error(
                format!("cannot call method '{name}' on {}", other.kind()),
                span,
            )),
        }
    }

    pub(crate) fn element_kind(
        &self,
        handle: crate::host::ElementHandle,
        span: &SourceSpan,
    ) -> Result<ElementKind, ScriptError> {
        self.host
            .element_kind(handle)
            .ok_or_else(|| ScriptError::runtime(format!("element {handle} does not exist"), span))
    }

    fn create_element(
        &mut self,
        kind: ElementKind,
        args: Vec<Value>,
        attrs: Option<Value>,
        arg_spans: &[SourceSpan],
    ) -> Result<Value, ScriptError> {
        let attributes = match attrs {
            None => BTreeMap::new(),
            Some(Value::Object(fields)) => fields.borrow().clone(),
            Some(other) => {
                return Err(ScriptError::type_error(
                    format!("attributes of {} must be an object, got {}", kind.name(), other.kind()),
                    &SourceSpan::default(),
                ));
            }
        };
        let mut parents = Vec::with_capacity(args.len());
        for arg in args {
            parents.push(self.compile_provider(arg));
        }
        let handle = self
            .host
            .create_object(kind, parents, attributes)
            .map_err(|err| ScriptError::runtime(err.to_string(), &SourceSpan::default()))?;
        log::debug!("created {} {handle}", kind.name());
        self.provenance.insert(handle, arg_spans.to_vec());
        Ok(Value::Element(handle))
    }

    /// Swaps an interpreted script function for a compiled one so the host
    /// can evaluate it cheaply.
    pub(crate) fn compile_provider(&mut self, value: Value) -> Value {
        let source = match &value {
            Value::Function(function) if !function.is_compiled() => function
                .closure()
                .map(|closure| (closure.body.clone(), closure.scope)),
            _ => None,
        };
        match source {
            Some((body, scope)) => self.make_closure(body, scope, true),
            None => value,
        }
    }
}
