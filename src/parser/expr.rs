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

//! Expression parser.
//!
//! Operands (primaries with their postfix chains) are parsed directly;
//! operators go through a shift/reduce loop over an operand stack and an
//! operator stack, guided by the table in [`super::table`].

use crate::ast::{Expr, ExprKind, FunctionLit, MapLit, SourceSpan, UnaryOp};
use crate::diagnostics::ScriptError;
use std::rc::Rc;

use super::lexer::{Keyword, Punct, TokenKind};
use super::statements::block_body;
use super::table::{self, InfixRule, PREFIX_PREC, Reduction};
use super::utils::TokenStream;

/// Entry on the operator stack.
enum Pending {
    Prefix(UnaryOp, SourceSpan),
    Infix(&'static InfixRule),
    /// Shifted `?` with its already parsed then-branch.
    Conditional(Expr),
}

impl Pending {
    fn prec(&self) -> u8 {
        match self {
            Pending::Prefix(..) => PREFIX_PREC,
            Pending::Infix(rule) => rule.prec,
            Pending::Conditional(_) => 0,
        }
    }
}

const OPERAND_START: &[&str] = &[
    "number",
    "string",
    "identifier",
    "(",
    "[",
    "<<",
    "function",
    "map",
    "true",
    "false",
    "null",
    "-",
    "+",
    "!",
];

/// Parses one expression.
pub(super) fn expression(tokens: &mut TokenStream) -> Result<Expr, ScriptError> {
    let mut operands: Vec<Expr> = Vec::new();
    let mut operators: Vec<Pending> = Vec::new();
    loop {
        // Operand position: shift prefix operators, then one operand.
        while let Some(op) = table::prefix(tokens.peek()) {
            let token = tokens.advance();
            operators.push(Pending::Prefix(op, token.span));
        }
        operands.push(postfix(tokens)?);

        // Operator position.
        let Some(rule) = table::infix(tokens.peek()) else {
            break;
        };
        while operators
            .last()
            .is_some_and(|top| table::reduces_before(top.prec(), rule))
        {
            reduce(&mut operands, &mut operators)?;
        }
        tokens.advance();
        if rule.reduction == Reduction::Conditional {
            let then = expression(tokens)?;
            tokens.expect_punct(Punct::Colon)?;
            operators.push(Pending::Conditional(then));
        } else {
            operators.push(Pending::Infix(rule));
        }
    }
    while !operators.is_empty() {
        reduce(&mut operands, &mut operators)?;
    }
    match (operands.pop(), operands.is_empty()) {
        (Some(expr), true) => Ok(expr),
        _ => Err(tokens.error(OPERAND_START)),
    }
}

/// Pops one operator and the operands it needs, pushing the new node.
fn reduce(operands: &mut Vec<Expr>, operators: &mut Vec<Pending>) -> Result<(), ScriptError> {
    let missing = || ScriptError::syntax(vec!["operand".to_string()], "operator", &SourceSpan::default());
    let op = operators.pop().ok_or_else(missing)?;
    let right = operands.pop().ok_or_else(missing)?;
    let node = match op {
        Pending::Prefix(op, span) => {
            let span = span.merge(&right.span);
            Expr::unary(op, right, span)
        }
        Pending::Infix(rule) => {
            let left = operands.pop().ok_or_else(missing)?;
            match rule.reduction {
                Reduction::Binary(op) => Expr::binary(op, left, right),
                Reduction::Logical(op) => {
                    let span = left.span.merge(&right.span);
                    Expr::new(
                        ExprKind::Logical {
                            op,
                            left: Box::new(left),
                            right: Box::new(right),
                        },
                        span,
                    )
                }
                Reduction::Conditional => return Err(missing()),
            }
        }
        Pending::Conditional(then) => {
            let cond = operands.pop().ok_or_else(missing)?;
            let span = cond.span.merge(&right.span);
            Expr::new(
                ExprKind::Conditional {
                    cond: Box::new(cond),
                    then: Box::new(then),
                    otherwise: Box::new(right),
                },
                span,
            )
        }
    };
    operands.push(node);
    Ok(())
}

/// Parses a primary followed by `.name`, `[index]` and call suffixes.
fn postfix(tokens: &mut TokenStream) -> Result<Expr, ScriptError> {
    let mut expr = primary(tokens)?;
    loop {
        if tokens.eat_punct(Punct::Dot) {
            let (property, property_span) = tokens.expect_ident()?;
            let span = expr.span.merge(&property_span);
            expr = Expr::new(
                ExprKind::Member {
                    object: Box::new(expr),
                    property,
                },
                span,
            );
        } else if tokens.eat_punct(Punct::LBracket) {
            let index = expression(tokens)?;
            let close = tokens.expect_punct(Punct::RBracket)?;
            let span = expr.span.merge(&close.span);
            expr = Expr::new(
                ExprKind::Index {
                    object: Box::new(expr),
                    index: Box::new(index),
                },
                span,
            );
        } else if tokens.eat_punct(Punct::LParen) {
            let args = list(tokens, Punct::RParen)?;
            let mut span = expr.span.clone();
            if let Some(close) = tokens.previous() {
                span = span.merge(&close.span);
            }
            // Creator calls may carry a trailing attribute object.
            let attrs = if tokens.check_punct(Punct::ObjectOpen) {
                let attrs = primary(tokens)?;
                span = span.merge(&attrs.span);
                Some(Box::new(attrs))
            } else {
                None
            };
            expr = Expr::new(
                ExprKind::Call {
                    callee: Box::new(expr),
                    args,
                    attrs,
                },
                span,
            );
        } else {
            return Ok(expr);
        }
    }
}

/// Comma-separated expressions up to and including `close`.
fn list(tokens: &mut TokenStream, close: Punct) -> Result<Vec<Expr>, ScriptError> {
    let mut items = Vec::new();
    if tokens.eat_punct(close) {
        return Ok(items);
    }
    loop {
        items.push(expression(tokens)?);
        if tokens.eat_punct(Punct::Comma) {
            continue;
        }
        if tokens.eat_punct(close) {
            return Ok(items);
        }
        return Err(tokens.error_after_operand(&[",", close.symbol()]));
    }
}

/// `(a, b, ...)` parameter names.
pub(super) fn params(tokens: &mut TokenStream) -> Result<Vec<String>, ScriptError> {
    tokens.expect_punct(Punct::LParen)?;
    let mut names = Vec::new();
    if tokens.eat_punct(Punct::RParen) {
        return Ok(names);
    }
    loop {
        let (name, _) = tokens.expect_ident()?;
        names.push(name);
        if tokens.eat_punct(Punct::Comma) {
            continue;
        }
        tokens.expect_punct(Punct::RParen)?;
        return Ok(names);
    }
}

/// `<< key: value, ... >>` with identifier or string keys.
fn object_literal(tokens: &mut TokenStream, start: SourceSpan) -> Result<Expr, ScriptError> {
    let mut fields = Vec::new();
    if !tokens.check_punct(Punct::ObjectClose) {
        loop {
            let key = match &tokens.peek().kind {
                TokenKind::Ident(name) | TokenKind::Str(name) => name.clone(),
                _ => return Err(tokens.error(&["identifier", "string"])),
            };
            tokens.advance();
            tokens.expect_punct(Punct::Colon)?;
            fields.push((key, expression(tokens)?));
            if !tokens.eat_punct(Punct::Comma) {
                break;
            }
        }
    }
    if !tokens.check_punct(Punct::ObjectClose) {
        return Err(tokens.error_after_operand(&[",", ">>"]));
    }
    let close = tokens.advance();
    Ok(Expr::new(ExprKind::Object(fields), start.merge(&close.span)))
}

fn primary(tokens: &mut TokenStream) -> Result<Expr, ScriptError> {
    let token = tokens.peek().clone();
    let span = token.span.clone();
    let kind = match token.kind {
        TokenKind::Number(value) => ExprKind::Number(value),
        TokenKind::Str(text) => ExprKind::Str(text),
        TokenKind::Ident(name) => ExprKind::Ident(name),
        TokenKind::Keyword(Keyword::True) => ExprKind::Bool(true),
        TokenKind::Keyword(Keyword::False) => ExprKind::Bool(false),
        TokenKind::Keyword(Keyword::Null) => ExprKind::Null,
        TokenKind::Punct(Punct::LParen) => {
            tokens.advance();
            let inner = expression(tokens)?;
            if !tokens.eat_punct(Punct::RParen) {
                return Err(tokens.error_after_operand(&[")"]));
            }
            return Ok(inner);
        }
        TokenKind::Punct(Punct::LBracket) => {
            tokens.advance();
            let items = list(tokens, Punct::RBracket)?;
            let end = tokens.previous().map(|t| t.span.clone()).unwrap_or_default();
            return Ok(Expr::new(ExprKind::Array(items), span.merge(&end)));
        }
        TokenKind::Punct(Punct::ObjectOpen) => {
            tokens.advance();
            return object_literal(tokens, span);
        }
        TokenKind::Keyword(Keyword::Function) => {
            tokens.advance();
            let params = params(tokens)?;
            let body = block_body(tokens)?;
            let lit = FunctionLit {
                params,
                body,
                span: span.clone(),
            };
            return Ok(Expr::new(ExprKind::Function(Rc::new(lit)), span));
        }
        TokenKind::Keyword(Keyword::Map) => {
            tokens.advance();
            let params = params(tokens)?;
            tokens.expect_punct(Punct::Arrow)?;
            let body = expression(tokens)?;
            let lit = MapLit {
                params,
                body,
                span: span.clone(),
            };
            return Ok(Expr::new(ExprKind::Map(Rc::new(lit)), span));
        }
        _ => return Err(tokens.error(OPERAND_START)),
    };
    tokens.advance();
    Ok(Expr::new(kind, span))
}
