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

//! Source compiler: expanded AST to host closures.
//!
//! Every node becomes a [`Code`] carrying the emitted source text and a
//! closure computing its value against an [`Interpreter`]. Arithmetic between
//! operands known to be numbers is emitted as native `f64` operations;
//! everything else calls the `ops` helpers the tree walker uses, so both
//! backends agree on semantics.

mod calls;
mod context;
mod expr;
mod stmt;

pub use self::context::Compiler;

use crate::ast::{Expr, ExprKind, MapLit, SourceSpan, Stmt, StmtKind, Target};
use crate::diagnostics::ScriptError;
use crate::interp::{Flow, Interpreter};
use crate::runtime::{Backend, Body, Closure, Function, FunctionKind, ResolveOptions, Value, format_number, ops};
use std::fmt;
use std::rc::Rc;

/// Compiled expression closure.
pub(crate) type Thunk = Rc<dyn Fn(&mut Interpreter) -> Result<Value, ScriptError>>;
/// Compiled statement closure.
pub(crate) type Step = Rc<dyn Fn(&mut Interpreter) -> Result<Flow, ScriptError>>;

pub(crate) fn thunk<F>(run: F) -> Thunk
where
    F: Fn(&mut Interpreter) -> Result<Value, ScriptError> + 'static,
{
    Rc::new(run)
}

pub(crate) fn step<F>(run: F) -> Step
where
    F: Fn(&mut Interpreter) -> Result<Flow, ScriptError> + 'static,
{
    Rc::new(run)
}

/// Output of compiling one expression.
#[derive(Clone)]
pub struct Code {
    /// Emitted source text.
    pub source: String,
    /// Whether the value is statically known to be a number.
    pub scalar: bool,
    pub(crate) run: Thunk,
}

impl Code {
    pub(crate) fn new(source: String, scalar: bool, run: Thunk) -> Self {
        Self {
            source,
            scalar,
            run,
        }
    }

    pub fn run(&self, interp: &mut Interpreter) -> Result<Value, ScriptError> {
        (self.run)(interp)
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Code")
            .field("source", &self.source)
            .field("scalar", &self.scalar)
            .finish()
    }
}

/// Output of compiling one statement.
#[derive(Clone)]
pub(crate) struct CompiledStmt {
    pub(crate) source: String,
    pub(crate) run: Step,
}

/// How a compiled body produces its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    /// `map (...) -> e`: the value of `e`.
    Expression,
    /// Function bodies: the `return` value, else `undefined`.
    Explicit,
    /// Host snippets: the `return` value, else the last statement value.
    LastValue,
}

/// Compiled body of a script function.
pub struct CompiledBody {
    params: Vec<String>,
    mode: BodyMode,
    source: String,
    run: Thunk,
}

impl CompiledBody {
    /// Runs the body in the interpreter's current scope.
    pub fn run(&self, interp: &mut Interpreter) -> Result<Value, ScriptError> {
        (self.run)(interp)
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn mode(&self) -> BodyMode {
        self.mode
    }

    /// Emitted source listing.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for CompiledBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledBody")
            .field("params", &self.params)
            .field("mode", &self.mode)
            .field("source", &self.source)
            .finish()
    }
}

/// Compiled script function handed to the host.
#[derive(Debug, Clone)]
pub struct HostClosure {
    function: Rc<Function>,
}

impl HostClosure {
    pub(crate) fn new(function: Rc<Function>) -> Self {
        Self { function }
    }

    /// Calls the closure with positional arguments.
    pub fn invoke(&self, interp: &mut Interpreter, args: &[Value]) -> Result<Value, ScriptError> {
        interp.call(&self.to_value(), args)
    }

    /// Emitted source listing of the body.
    pub fn source(&self) -> &str {
        match &self.function.kind {
            FunctionKind::Script(Closure {
                backend: Backend::Compiled(body),
                ..
            }) => body.source(),
            _ => "",
        }
    }

    /// The closure as a script value.
    pub fn to_value(&self) -> Value {
        Value::Function(self.function.clone())
    }
}

/// Indents every line of `text` by one level.
fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {line}\n"))
        .collect()
}

/// Runs steps in order, stopping at the first `return`.
fn sequence(steps: Vec<Step>) -> Step {
    step(move |interp| {
        let mut last = Value::Undefined;
        for run in &steps {
            match run(interp)? {
                Flow::Normal(value) => last = value,
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal(last))
    })
}

/// Numeric payload of a value the compiler proved scalar.
fn number(value: Value) -> f64 {
    value.as_number().unwrap_or(f64::NAN)
}
