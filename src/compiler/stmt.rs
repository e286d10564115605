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

//! Statement compilation.

use super::*;

fn empty() -> Step {
    step(|_| Ok(Flow::Normal(Value::Undefined)))
}

impl Compiler {
    pub(super) fn compile_stmt(&mut self, stmt: &Stmt) -> CompiledStmt {
        let span = stmt.span.clone();
        match &stmt.kind {
            StmtKind::Empty => CompiledStmt {
                source: ";".to_string(),
                run: empty(),
            },
            StmtKind::Expr(expr) => {
                let code = self.compile_expr(expr);
                let run = code.run;
                CompiledStmt {
                    source: format!("{};", code.source),
                    run: step(move |interp| Ok(Flow::Normal(run(interp)?))),
                }
            }
            StmtKind::Assign { target, value } => self.compile_assign(target, value, span),
            StmtKind::Block(body) => self.compile_block(body),
            StmtKind::If {
                cond,
                then,
                otherwise,
            } => {
                let cond = self.compile_expr(cond);
                let then = self.compile_stmt(then);
                let otherwise = otherwise.as_deref().map(|stmt| self.compile_stmt(stmt));
                let mut source = format!("if truthy({}) {{\n{}}}", cond.source, indent(&then.source));
                if let Some(otherwise) = &otherwise {
                    source.push_str(&format!(" else {{\n{}}}", indent(&otherwise.source)));
                }
                let (cond, then) = (cond.run, then.run);
                let otherwise = otherwise.map(|stmt| stmt.run);
                CompiledStmt {
                    source,
                    run: step(move |interp| {
                        if cond(interp)?.is_truthy() {
                            then(interp)
                        } else if let Some(otherwise) = &otherwise {
                            otherwise(interp)
                        } else {
                            Ok(Flow::Normal(Value::Undefined))
                        }
                    }),
                }
            }
            StmtKind::While { cond, body } => {
                let cond = self.compile_expr(cond);
                let body = self.compile_stmt(body);
                let source = format!("while truthy({}) {{\n{}}}", cond.source, indent(&body.source));
                let (cond, body) = (cond.run, body.run);
                CompiledStmt {
                    source,
                    run: step(move |interp| {
                        let mut last = Value::Undefined;
                        while cond(interp)?.is_truthy() {
                            match body(interp)? {
                                Flow::Normal(value) => last = value,
                                flow => return Ok(flow),
                            }
                        }
                        Ok(Flow::Normal(last))
                    }),
                }
            }
            StmtKind::DoWhile { body, cond } => {
                let body = self.compile_stmt(body);
                let cond = self.compile_expr(cond);
                let source = format!(
                    "loop {{\n{}    if !truthy({}) {{ break; }}\n}}",
                    indent(&body.source),
                    cond.source
                );
                let (cond, body) = (cond.run, body.run);
                CompiledStmt {
                    source,
                    run: step(move |interp| {
                        let mut last;
                        loop {
                            match body(interp)? {
                                Flow::Normal(value) => last = value,
                                flow => return Ok(flow),
                            }
                            if !cond(interp)?.is_truthy() {
                                break;
                            }
                        }
                        Ok(Flow::Normal(last))
                    }),
                }
            }
            StmtKind::For {
                init,
                cond,
                step: advance,
                body,
            } => {
                let init = init.as_deref().map(|stmt| self.compile_stmt(stmt));
                let cond = cond.as_ref().map(|expr| self.compile_expr(expr));
                let advance = advance.as_deref().map(|stmt| self.compile_stmt(stmt));
                let body = self.compile_stmt(body);
                let source = format!(
                    "for ({} {}; {}) {{\n{}}}",
                    init.as_ref().map_or(";", |stmt| stmt.source.as_str()),
                    cond.as_ref().map_or("true", |code| code.source.as_str()),
                    advance
                        .as_ref()
                        .map_or("", |stmt| stmt.source.trim_end_matches(';')),
                    indent(&body.source)
                );
                let init = init.map(|stmt| stmt.run);
                let cond = cond.map(|code| code.run);
                let advance = advance.map(|stmt| stmt.run);
                let body = body.run;
                CompiledStmt {
                    source,
                    run: step(move |interp| {
                        if let Some(init) = &init {
                            init(interp)?;
                        }
                        let mut last = Value::Undefined;
                        loop {
                            if let Some(cond) = &cond {
                                if !cond(interp)?.is_truthy() {
                                    break;
                                }
                            }
                            match body(interp)? {
                                Flow::Normal(value) => last = value,
                                flow => return Ok(flow),
                            }
                            if let Some(advance) = &advance {
                                advance(interp)?;
                            }
                        }
                        Ok(Flow::Normal(last))
                    }),
                }
            }
            StmtKind::Return(value) => {
                let value = value.as_ref().map(|expr| self.compile_expr(expr));
                let source = match &value {
                    Some(code) => format!("return {};", code.source),
                    None => "return;".to_string(),
                };
                let value = value.map(|code| code.run);
                CompiledStmt {
                    source,
                    run: step(move |interp| {
                        interp.check_return(&span)?;
                        let value = match &value {
                            Some(run) => run(interp)?,
                            None => Value::Undefined,
                        };
                        Ok(Flow::Return(value))
                    }),
                }
            }
            StmtKind::Use(name) => {
                let name = name.clone();
                CompiledStmt {
                    source: format!("use({name:?});"),
                    run: step(move |interp| {
                        interp.exec_use(&name, &span);
                        Ok(Flow::Normal(Value::Undefined))
                    }),
                }
            }
            StmtKind::Delete(expr) => {
                let code = self.compile_expr(expr);
                let source = format!("delete({});", code.source);
                let (run, expr) = (code.run, expr.clone());
                CompiledStmt {
                    source,
                    run: step(move |interp| {
                        let value = run(interp)?;
                        interp.exec_delete(&expr, value, &span)?;
                        Ok(Flow::Normal(Value::Undefined))
                    }),
                }
            }
        }
    }

    fn compile_block(&mut self, body: &[Stmt]) -> CompiledStmt {
        let compiled: Vec<CompiledStmt> = body.iter().map(|stmt| self.compile_stmt(stmt)).collect();
        let listing: String = compiled.iter().map(|stmt| indent(&stmt.source)).collect();
        CompiledStmt {
            source: format!("{{\n{listing}}}"),
            run: sequence(compiled.into_iter().map(|stmt| stmt.run).collect()),
        }
    }

    fn compile_assign(&mut self, target: &Target, value: &Expr, span: SourceSpan) -> CompiledStmt {
        let value = self.compile_expr(value);
        match target {
            Target::Ident(name) => {
                let source = format!("let {name} = {};", value.source);
                let (name, value) = (name.clone(), value.run);
                CompiledStmt {
                    source,
                    run: step(move |interp| {
                        let value = value(interp)?;
                        interp.bind(&name, value.clone(), &span);
                        Ok(Flow::Normal(value))
                    }),
                }
            }
            Target::Member { object, property } => {
                let (base_source, base) = self.compile_base(object);
                let source = format!("set({base_source}, {property:?}, {});", value.source);
                let (property, value) = (property.clone(), value.run);
                CompiledStmt {
                    source,
                    run: step(move |interp| {
                        let value = value(interp)?;
                        let object = base(interp)?;
                        interp.set_member(&object, &property, value.clone(), &span)?;
                        Ok(Flow::Normal(value))
                    }),
                }
            }
            Target::Index { object, index } => {
                let (base_source, base) = self.compile_base(object);
                let index = self.compile_expr(index);
                let source = format!(
                    "set_index({base_source}, {}, {});",
                    index.source, value.source
                );
                let (index, value) = (index.run, value.run);
                CompiledStmt {
                    source,
                    run: step(move |interp| {
                        let value = value(interp)?;
                        let object = base(interp)?;
                        let index = index(interp)?;
                        interp.set_index(&object, &index, value.clone(), &span)?;
                        Ok(Flow::Normal(value))
                    }),
                }
            }
        }
    }

    /// Object of a member/index assignment; a bare name must be bound.
    fn compile_base(&mut self, object: &Expr) -> (String, Thunk) {
        match object.as_ident() {
            Some(name) => {
                let source = self.name_source(name);
                let (name, span) = (name.to_string(), object.span.clone());
                (
                    source,
                    thunk(move |interp| interp.resolve_required(&name, &span)),
                )
            }
            None => {
                let code = self.compile_expr(object);
                (code.source, code.run)
            }
        }
    }
}
