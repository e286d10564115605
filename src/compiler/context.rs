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

//! Compiler state and body entry points.

use super::*;
use crate::builtins::Registry;

/// Compiles function bodies into host closures.
///
/// Holds the builtin registry (for namespaced names in listings) and the
/// parameter frames of the bodies being compiled.
pub struct Compiler {
    pub(super) registry: Rc<Registry>,
    pub(super) frames: Vec<Vec<String>>,
}

impl Compiler {
    pub fn new(registry: Rc<Registry>) -> Self {
        Self {
            registry,
            frames: Vec::new(),
        }
    }

    /// Compiles the body of a script function or map.
    pub fn compile_body(&mut self, body: &Body) -> CompiledBody {
        match body {
            Body::Map(lit) => self.compile_map(lit),
            Body::Function(lit) => self.compile_program(&lit.params, &lit.body, BodyMode::Explicit),
        }
    }

    fn compile_map(&mut self, lit: &MapLit) -> CompiledBody {
        self.frames.push(lit.params.clone());
        let code = self.compile_expr(&lit.body);
        self.frames.pop();
        log::trace!("compiled map ({})", lit.params.join(", "));
        CompiledBody {
            params: lit.params.clone(),
            mode: BodyMode::Expression,
            source: format!("map ({}) -> {}", lit.params.join(", "), code.source),
            run: code.run,
        }
    }

    /// Compiles a statement list taking `params`.
    pub fn compile_program(
        &mut self,
        params: &[String],
        statements: &[Stmt],
        mode: BodyMode,
    ) -> CompiledBody {
        self.frames.push(params.to_vec());
        let compiled: Vec<CompiledStmt> = statements
            .iter()
            .map(|stmt| self.compile_stmt(stmt))
            .collect();
        self.frames.pop();

        let listing: String = compiled.iter().map(|stmt| indent(&stmt.source)).collect();
        let block = sequence(compiled.into_iter().map(|stmt| stmt.run).collect());
        let run: Thunk = match mode {
            BodyMode::Explicit => thunk(move |interp| {
                Ok(match block(interp)? {
                    Flow::Return(value) => value,
                    Flow::Normal(_) => Value::Undefined,
                })
            }),
            BodyMode::Expression | BodyMode::LastValue => {
                thunk(move |interp| Ok(block(interp)?.into_value()))
            }
        };
        CompiledBody {
            params: params.to_vec(),
            mode,
            source: format!("fn ({}) {{\n{listing}}}", params.join(", ")),
            run,
        }
    }

    /// Returns whether `name` is a parameter of a body being compiled.
    pub(super) fn is_param(&self, name: &str) -> bool {
        self.frames
            .iter()
            .rev()
            .any(|frame| frame.iter().any(|param| param == name))
    }

    /// Emitted reference to an identifier.
    pub(super) fn name_source(&self, name: &str) -> String {
        if self.is_param(name) {
            return name.to_string();
        }
        match self.registry.entry(name) {
            Some(def) => def.path(),
            None => format!("resolve({name:?})"),
        }
    }
}
