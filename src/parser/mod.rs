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

//! Script parser.
//!
//! Parsing runs in two stages. The [`lexer`] turns source text into tokens
//! with `nom`; then a token cursor drives:
//! - a table-driven shift/reduce loop for expressions (operator table in
//!   [`table`]), and
//! - recursive descent for statements.
//!
//! Syntax errors carry the acceptable tokens at the failure point and the
//! position of the offending token.

mod expr;
pub mod lexer;
mod statements;
mod table;
mod utils;

use crate::ast::{Expr, Program, Span};
use crate::diagnostics::ScriptError;
use nom::{IResult, error::VerboseError};

use self::lexer::tokenize;
use self::utils::TokenStream;

type PResult<'a, O> = IResult<Span<'a>, O, VerboseError<Span<'a>>>;

/// Parses a whole script.
///
/// The source is tokenized completely first, so lexical errors are reported
/// before any syntax error.
pub fn parse_program(source: &str) -> Result<Program, ScriptError> {
    let mut tokens = TokenStream::new(tokenize(source)?);
    let mut statements = Vec::new();
    while !tokens.peek().is_eof() {
        statements.push(statements::statement(&mut tokens)?);
    }
    Ok(Program { statements })
}

/// Parses a single expression spanning the whole source.
pub fn parse_expression(source: &str) -> Result<Expr, ScriptError> {
    let mut tokens = TokenStream::new(tokenize(source)?);
    let expr = expr::expression(&mut tokens)?;
    if !tokens.peek().is_eof() {
        return Err(tokens.error_after_operand(&["end of input"]));
    }
    Ok(expr)
}
