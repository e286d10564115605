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

//! Call-site compilation.

use super::expr::{join_sources, run_all, runs_of};
use super::*;

impl Compiler {
    pub(super) fn compile_call(
        &mut self,
        callee: &Expr,
        args: &[Expr],
        attrs: Option<&Expr>,
        span: &SourceSpan,
    ) -> Code {
        let arg_codes: Vec<Code> = args.iter().map(|arg| self.compile_expr(arg)).collect();
        let arg_source = join_sources(&arg_codes);
        let arg_runs = runs_of(arg_codes);
        let span = span.clone();

        // Method call: `object.name(args)`.
        if let ExprKind::Member { object, property } = &callee.kind {
            let object = self.compile_expr(object);
            let source = format!("method({}, {property:?}, [{arg_source}])", object.source);
            let (object, name) = (object.run, property.clone());
            return Code::new(
                source,
                false,
                thunk(move |interp| {
                    let object = object(interp)?;
                    let args = run_all(&arg_runs, interp)?;
                    interp.invoke_method(object, &name, args, &span)
                }),
            );
        }

        let attrs = attrs.map(|attrs| self.compile_expr(attrs));
        let attrs_source = attrs
            .as_ref()
            .map(|code| format!(" with {}", code.source))
            .unwrap_or_default();
        let attrs = attrs.map(|code| code.run);
        let arg_spans: Vec<SourceSpan> = args.iter().map(|arg| arg.span.clone()).collect();

        // Named callee: resolved on every call so later rebinding is seen.
        if let Some(name) = callee.as_ident() {
            let source = if !self.is_param(name) && self.registry.has(name) {
                format!("{}({arg_source}){attrs_source}", self.name_source(name))
            } else {
                format!("call({}, [{arg_source}]){attrs_source}", self.name_source(name))
            };
            let (name, callee_span) = (name.to_string(), callee.span.clone());
            return Code::new(
                source,
                false,
                thunk(move |interp| {
                    let function = interp.resolve_required(&name, &callee_span)?;
                    let args = run_all(&arg_runs, interp)?;
                    let attrs = match &attrs {
                        Some(run) => Some(run(interp)?),
                        None => None,
                    };
                    interp.invoke(&function, args, attrs, None, &arg_spans, &span)
                }),
            );
        }

        let callee = self.compile_expr(callee);
        let source = format!("call({}, [{arg_source}]){attrs_source}", callee.source);
        let callee = callee.run;
        Code::new(
            source,
            false,
            thunk(move |interp| {
                let function = callee(interp)?;
                let args = run_all(&arg_runs, interp)?;
                let attrs = match &attrs {
                    Some(run) => Some(run(interp)?),
                    None => None,
                };
                interp.invoke(&function, args, attrs, None, &arg_spans, &span)
            }),
        )
    }
}
