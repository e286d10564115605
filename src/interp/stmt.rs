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

//! Statement execution.

use super::*;
use crate::ast::{Expr, StmtKind};

impl Interpreter {
    /// Runs statements in order, stopping at the first `return`.
    pub(crate) fn exec_block(&mut self, statements: &[Stmt]) -> Result<Flow, ScriptError> {
        let mut last = Value::Undefined;
        for stmt in statements {
            match self.exec(stmt)? {
                Flow::Normal(value) => last = value,
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }
        Ok(Flow::Normal(last))
    }

    fn exec(&mut self, stmt: &Stmt) -> Result<Flow, ScriptError> {
        match &stmt.kind {
            StmtKind::Empty => Ok(Flow::Normal(Value::Undefined)),
            StmtKind::Expr(expr) => Ok(Flow::Normal(self.eval(expr)?)),
            StmtKind::Assign { target, value } => {
                let value = self.eval(value)?;
                self.assign(target, value.clone(), &stmt.span)?;
                Ok(Flow::Normal(value))
            }
            StmtKind::Block(body) => self.exec_block(body),
            StmtKind::If {
                cond,
                then,
                otherwise,
            } => {
                if self.eval(cond)?.is_truthy() {
                    self.exec(then)
                } else if let Some(otherwise) = otherwise {
                    self.exec(otherwise)
                } else {
                    Ok(Flow::Normal(Value::Undefined))
                }
            }
            StmtKind::While { cond, body } => {
                let mut last = Value::Undefined;
                while self.eval(cond)?.is_truthy() {
                    match self.exec(body)? {
                        Flow::Normal(value) => last = value,
                        flow => return Ok(flow),
                    }
                }
                Ok(Flow::Normal(last))
            }
            StmtKind::DoWhile { body, cond } => {
                let mut last;
                loop {
                    match self.exec(body)? {
                        Flow::Normal(value) => last = value,
                        flow => return Ok(flow),
                    }
                    if !self.eval(cond)?.is_truthy() {
                        break;
                    }
                }
                Ok(Flow::Normal(last))
            }
            StmtKind::For {
                init,
                cond,
                step,
                body,
            } => {
                if let Some(init) = init {
                    self.exec(init)?;
                }
                let mut last = Value::Undefined;
                loop {
                    if let Some(cond) = cond {
                        if !self.eval(cond)?.is_truthy() {
                            break;
                        }
                    }
                    match self.exec(body)? {
                        Flow::Normal(value) => last = value,
                        flow => return Ok(flow),
                    }
                    if let Some(step) = step {
                        self.exec(step)?;
                    }
                }
                Ok(Flow::Normal(last))
            }
            StmtKind::Return(value) => {
                self.check_return(&stmt.span)?;
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Undefined,
                };
                Ok(Flow::Return(value))
            }
            StmtKind::Use(name) => {
                self.exec_use(name, &stmt.span);
                Ok(Flow::Normal(Value::Undefined))
            }
            StmtKind::Delete(expr) => {
                let value = self.eval(expr)?;
                self.exec_delete(expr, value, &stmt.span)?;
                Ok(Flow::Normal(Value::Undefined))
            }
        }
    }

    pub(crate) fn check_return(&self, span: &SourceSpan) -> Result<(), ScriptError> {
        if self.call_depth == 0 {
            return Err(ScriptError::runtime(
                "'return' outside of a function body",
                span,
            ));
        }
        Ok(())
    }

    /// `use name;` only warns: the interpreter drives a single host context.
    pub(crate) fn exec_use(&mut self, name: &str, span: &SourceSpan) {
        if self.options.warn_deprecated {
            self.warn(
                WarningKind::Deprecation,
                format!("'use {name}' is deprecated and has no effect"),
                span,
            );
        }
    }

    /// `delete e;` warns, then removes the element `e` evaluates to.
    pub(crate) fn exec_delete(
        &mut self,
        expr: &Expr,
        value: Value,
        span: &SourceSpan,
    ) -> Result<(), ScriptError> {
        if self.options.warn_deprecated {
            self.warn(
                WarningKind::Deprecation,
                "'delete' is deprecated; use remove(element)".to_string(),
                span,
            );
        }
        let Value::Element(handle) = value else {
            return Err(ScriptError::type_error(
                format!("cannot delete {} '{expr}'", value.kind()),
                &expr.span,
            ));
        };
        self.host
            .remove_object(handle)
            .map_err(|err| ScriptError::runtime(err.to_string(), span))?;
        self.provenance.remove(&handle);
        Ok(())
    }
}
