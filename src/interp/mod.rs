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

//! Tree-walking evaluator and the public interpreter API.

mod access;
mod calls;
mod expr;
mod stmt;

use crate::ast::{FunctionLit, MapLit, SourceSpan, Stmt};
use crate::builtins::Registry;
use crate::compiler::{BodyMode, Compiler, HostClosure};
use crate::config::Options;
use crate::diagnostics::{ScriptError, Warning, WarningKind};
use crate::expand::{KnownMaps, expand_expression, expand_program};
use crate::host::{Board, ElementHandle, HostRegistry};
use crate::parser::{parse_expression, parse_program};
use crate::runtime::{Backend, Body, Closure, Function, ScopeArena, ScopeId, Value};
use std::collections::HashMap;
use std::rc::Rc;

/// Outcome of executing a statement.
#[derive(Debug, Clone)]
pub(crate) enum Flow {
    Normal(Value),
    Return(Value),
}

impl Flow {
    pub(crate) fn into_value(self) -> Value {
        match self {
            Flow::Normal(value) | Flow::Return(value) => value,
        }
    }
}

/// Script interpreter bound to one host scene.
///
/// ```
/// use geoscript::{Interpreter, Value};
///
/// let mut interp = Interpreter::new();
/// let value = interp.parse("s = map (x) -> x*x; s(3);").unwrap();
/// assert_eq!(value, Value::Number(9.0));
/// ```
pub struct Interpreter {
    pub(crate) options: Options,
    pub(crate) builtins: Rc<Registry>,
    pub(crate) scopes: ScopeArena,
    pub(crate) host: Box<dyn HostRegistry>,
    pub(crate) warnings: Vec<Warning>,
    pub(crate) provenance: HashMap<ElementHandle, Vec<SourceSpan>>,
    /// Number of script function activations in flight.
    pub(crate) call_depth: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates an interpreter driving a fresh in-memory [`Board`].
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        Self::with_host(Box::new(Board::new()), options)
    }

    pub fn with_host(host: Box<dyn HostRegistry>, options: Options) -> Self {
        Self {
            options,
            builtins: Rc::new(Registry::standard()),
            scopes: ScopeArena::new(),
            host,
            warnings: Vec::new(),
            provenance: HashMap::new(),
            call_depth: 0,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn registry(&self) -> &Registry {
        &self.builtins
    }

    pub fn host(&self) -> &dyn HostRegistry {
        self.host.as_ref()
    }

    pub fn host_mut(&mut self) -> &mut dyn HostRegistry {
        self.host.as_mut()
    }

    pub fn scopes(&self) -> &ScopeArena {
        &self.scopes
    }

    pub fn scopes_mut(&mut self) -> &mut ScopeArena {
        &mut self.scopes
    }

    /// Warnings collected so far, oldest first.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Source positions of the arguments that created `handle`.
    pub fn provenance(&self, handle: ElementHandle) -> Option<&[SourceSpan]> {
        self.provenance.get(&handle).map(Vec::as_slice)
    }

    /// Value bound to `name` in the root scope.
    pub fn global(&self, name: &str) -> Option<Value> {
        self.scopes.global(name)
    }

    /// Lexes, parses, expands and executes `source`, returning the value of
    /// the last statement.
    pub fn parse(&mut self, source: &str) -> Result<Value, ScriptError> {
        self.run_source(source)
            .map_err(|err| err.with_source(source))
    }

    fn run_source(&mut self, source: &str) -> Result<Value, ScriptError> {
        let program = parse_program(source)?;
        let program = expand_program(program, &self.known_maps(), &self.options)?;
        log::debug!("executing {} statements", program.statements.len());
        self.execute(&program.statements)
    }

    /// Compiles `source` into a host closure taking `params`.
    ///
    /// The closure returns the value of an explicit `return`, or else the
    /// value of the last statement. Free names resolve against the scope
    /// current at compile time.
    pub fn compile_to_function(
        &mut self,
        source: &str,
        params: &[&str],
    ) -> Result<HostClosure, ScriptError> {
        self.compile_source(source, params)
            .map_err(|err| err.with_source(source))
    }

    fn compile_source(&mut self, source: &str, params: &[&str]) -> Result<HostClosure, ScriptError> {
        let program = parse_program(source)?;
        let program = expand_program(program, &self.known_maps(), &self.options)?;
        let params: Vec<String> = params.iter().map(|param| param.to_string()).collect();
        let compiled = Compiler::new(self.builtins.clone()).compile_program(
            &params,
            &program.statements,
            BodyMode::LastValue,
        );
        let lit = FunctionLit {
            params,
            body: program.statements,
            span: SourceSpan::default(),
        };
        let closure = Closure {
            body: Body::Function(Rc::new(lit)),
            scope: self.scopes.current(),
            backend: Backend::Compiled(Rc::new(compiled)),
        };
        let function = Rc::new(Function::script(closure));
        self.scopes.track(&function);
        Ok(HostClosure::new(function))
    }

    /// Evaluates one expression as the body of a parameterless map.
    pub fn evaluate_snippet(&mut self, source: &str) -> Result<Value, ScriptError> {
        let run = |interp: &mut Self| -> Result<Value, ScriptError> {
            let expr = parse_expression(source)?;
            let expr = expand_expression(&expr, &interp.known_maps(), &interp.options)?;
            let lit = MapLit {
                params: Vec::new(),
                span: expr.span.clone(),
                body: expr,
            };
            let scope = interp.scopes.current();
            let function = interp.make_closure(Body::Map(Rc::new(lit)), scope, false);
            interp.call(&function, &[])
        };
        run(self).map_err(|err| err.with_source(source))
    }

    /// Builds a function value over `body` that resolves free names in
    /// `scope`. Compiled closures run host closures instead of the tree
    /// walker.
    pub fn make_closure(&mut self, body: Body, scope: ScopeId, compiled: bool) -> Value {
        let backend = if compiled {
            Backend::Compiled(Rc::new(Compiler::new(self.builtins.clone()).compile_body(&body)))
        } else {
            Backend::Interpreted
        };
        self.bind_closure(body, scope, backend)
    }

    /// Wraps `body` into a function value that keeps `scope` alive.
    pub(crate) fn bind_closure(&mut self, body: Body, scope: ScopeId, backend: Backend) -> Value {
        let function = Rc::new(Function::script(Closure {
            body,
            scope,
            backend,
        }));
        self.scopes.track(&function);
        Value::Function(function)
    }

    /// Maps visible from the current scope, keyed by binding name.
    ///
    /// Only maps defined on the current chain are inlined by the expander.
    /// Any other closure resolves free names in a scope the call site cannot
    /// see, so its derivative is left to the runtime `D`.
    fn known_maps(&self) -> KnownMaps {
        let mut known = KnownMaps::new();
        for (name, value) in self.scopes.visible_bindings() {
            known.bind(&name);
            let Some(closure) = value.as_function().and_then(|function| function.closure()) else {
                continue;
            };
            if !self.scopes.on_chain(closure.scope) {
                continue;
            }
            let lit = match &closure.body {
                Body::Map(lit) => lit.clone(),
                Body::Function(lit) => match lit.single_return() {
                    Some(body) => Rc::new(MapLit {
                        params: lit.params.clone(),
                        body: body.clone(),
                        span: lit.span.clone(),
                    }),
                    None => continue,
                },
            };
            known.insert(name, lit);
        }
        known
    }

    /// Records a non-fatal diagnostic and logs it.
    pub(crate) fn warn(&mut self, kind: WarningKind, message: String, span: &SourceSpan) {
        let warning = Warning {
            kind,
            message,
            line: span.line,
        };
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Executes statements in the current scope and returns the last value.
    pub fn execute(&mut self, statements: &[Stmt]) -> Result<Value, ScriptError> {
        Ok(self.exec_block(statements)?.into_value())
    }
}
