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

//! Embedded scripting language for interactive geometry.
//!
//! This crate provides:
//! - A lexer and table-driven parser with line/column diagnostics.
//! - A symbolic expander (`D(...)` derivatives, algebraic simplification).
//! - A tree-walking evaluator and a source compiler producing host closures,
//!   sharing one set of operator helpers.
//! - Scoped name resolution over script bindings, builtins, object creators
//!   and a live scene graph ([`HostRegistry`]).
//! - Interval arithmetic with outward rounding.
//!
//! # Pipeline
//!
//! 1. Tokenize and parse the script into an AST with source spans.
//! 2. Expand derivatives and simplify (pure AST rewrites).
//! 3. Walk the AST, or compile function bodies into host closures.
//!
//! ```
//! use geoscript::{Interpreter, Value};
//!
//! let mut interp = Interpreter::new();
//! let slope = interp.parse("f = map (x) -> x^3; df = D(f); df(2);").unwrap();
//! assert_eq!(slope, Value::Number(12.0));
//! ```

mod ast;
mod builtins;
mod compiler;
mod config;
mod diagnostics;
mod expand;
mod host;
mod interp;
mod parser;
mod runtime;

pub use ast::{
    BinOp, Expr, ExprKind, FunctionLit, LogicOp, MapLit, Program, SourceSpan, Stmt, StmtKind,
    Target, UnaryOp,
};
pub use builtins::{Arity, BuiltinDef, BuiltinInfo, BuiltinKind, Origin, Registry};
pub use compiler::{BodyMode, Code, CompiledBody, Compiler, HostClosure};
pub use config::{DEFAULT_APPROX_TOLERANCE, Options};
pub use diagnostics::{Location, ScriptError, Warning, WarningKind};
pub use expand::{KnownMaps, expand_expression, expand_program, structural_hash};
pub use host::{Board, ElementHandle, ElementKind, HostError, HostRegistry, Property};
pub use interp::Interpreter;
pub use parser::lexer::{Keyword, Lexer, Punct, Token, TokenKind};
pub use runtime::{
    Backend, Body, Closure, Function, FunctionKind, Interval, Kind, ResolveOptions, ScopeArena,
    ScopeId, Value,
};

/// Splits `source` into tokens, ending with an end-of-input token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ScriptError> {
    parser::lexer::tokenize(source).map_err(|err| err.with_source(source))
}

/// Parses a whole script into a spanned AST [`Program`].
///
/// # Errors
///
/// Returns [`ScriptError::Lexical`] or [`ScriptError::Syntax`] with source
/// line/column and caret highlight.
pub fn parse_program(source: &str) -> Result<Program, ScriptError> {
    parser::parse_program(source).map_err(|err| err.with_source(source))
}

/// Parses a single expression.
pub fn parse_expression(source: &str) -> Result<Expr, ScriptError> {
    parser::parse_expression(source).map_err(|err| err.with_source(source))
}

/// Simplifies an expression to its algebraic fixed point.
pub fn simplify(expr: &Expr) -> Expr {
    expand::simplify(expr)
}

/// Differentiates `expr` with respect to `var`; the result is simplified.
pub fn derivative(expr: &Expr, var: &str) -> Result<Expr, ScriptError> {
    Ok(expand::simplify(&expand::derivative(expr, var)?))
}

/// Span-insensitive structural equality of two expressions.
pub fn same_structure(a: &Expr, b: &Expr) -> bool {
    expand::same_structure(a, b)
}

#[cfg(test)]
mod tests;
