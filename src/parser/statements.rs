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

//! Statement parser.

use crate::ast::{Expr, ExprKind, FunctionLit, SourceSpan, Stmt, StmtKind, Target};
use crate::diagnostics::ScriptError;
use std::rc::Rc;

use super::expr::{expression, params};
use super::lexer::{Keyword, Punct, TokenKind};
use super::utils::TokenStream;

/// Parses one statement.
pub(super) fn statement(tokens: &mut TokenStream) -> Result<Stmt, ScriptError> {
    let start = tokens.peek().span.clone();
    let kind = tokens.peek().kind.clone();
    match kind {
        TokenKind::Punct(Punct::Semicolon) => {
            tokens.advance();
            Ok(Stmt::new(StmtKind::Empty, start))
        }
        TokenKind::Punct(Punct::LBrace) => {
            let body = block_body(tokens)?;
            Ok(Stmt::new(StmtKind::Block(body), start))
        }
        TokenKind::Keyword(Keyword::If) => if_stmt(tokens, start),
        TokenKind::Keyword(Keyword::While) => {
            tokens.advance();
            let cond = condition(tokens)?;
            let body = Box::new(statement(tokens)?);
            Ok(Stmt::new(StmtKind::While { cond, body }, start))
        }
        TokenKind::Keyword(Keyword::Do) => {
            tokens.advance();
            let body = Box::new(statement(tokens)?);
            tokens.expect_keyword(Keyword::While)?;
            let cond = condition(tokens)?;
            terminator(tokens)?;
            Ok(Stmt::new(StmtKind::DoWhile { body, cond }, start))
        }
        TokenKind::Keyword(Keyword::For) => for_stmt(tokens, start),
        TokenKind::Keyword(Keyword::Return) => {
            tokens.advance();
            let value = if at_statement_end(tokens) {
                None
            } else {
                Some(expression(tokens)?)
            };
            terminator(tokens)?;
            Ok(Stmt::new(StmtKind::Return(value), start))
        }
        TokenKind::Keyword(Keyword::Use) => {
            tokens.advance();
            let parenthesized = tokens.eat_punct(Punct::LParen);
            let (name, _) = tokens.expect_ident()?;
            if parenthesized {
                tokens.expect_punct(Punct::RParen)?;
            }
            terminator(tokens)?;
            Ok(Stmt::new(StmtKind::Use(name), start))
        }
        TokenKind::Keyword(Keyword::Delete) => {
            tokens.advance();
            let target = expression(tokens)?;
            terminator(tokens)?;
            Ok(Stmt::new(StmtKind::Delete(target), start))
        }
        TokenKind::Keyword(Keyword::Function)
            if matches!(tokens.peek_at(1).kind, TokenKind::Ident(_)) =>
        {
            function_declaration(tokens, start)
        }
        _ => {
            let stmt = simple_statement(tokens)?;
            terminator(tokens)?;
            Ok(stmt)
        }
    }
}

/// `{ statements }`, returning the statements.
pub(super) fn block_body(tokens: &mut TokenStream) -> Result<Vec<Stmt>, ScriptError> {
    tokens.expect_punct(Punct::LBrace)?;
    let mut body = Vec::new();
    while !tokens.check_punct(Punct::RBrace) {
        if tokens.peek().is_eof() {
            return Err(tokens.error(&["}"]));
        }
        body.push(statement(tokens)?);
    }
    tokens.advance();
    Ok(body)
}

/// Assignment or expression statement without its terminator.
fn simple_statement(tokens: &mut TokenStream) -> Result<Stmt, ScriptError> {
    let start = tokens.peek().span.clone();
    let expr = expression(tokens)?;
    if !tokens.check_punct(Punct::Assign) {
        return Ok(Stmt::new(StmtKind::Expr(expr), start));
    }
    let target = match expr.kind {
        ExprKind::Ident(name) => Target::Ident(name),
        ExprKind::Member { object, property } => Target::Member {
            object: *object,
            property,
        },
        ExprKind::Index { object, index } => Target::Index {
            object: *object,
            index: *index,
        },
        _ => {
            return Err(ScriptError::syntax(
                vec!["identifier".into(), "member access".into(), "index access".into()],
                "'='",
                &expr.span,
            ));
        }
    };
    tokens.advance();
    let value = expression(tokens)?;
    Ok(Stmt::new(StmtKind::Assign { target, value }, start))
}

/// `function name(params) { body }`, sugar for `name = function(...) {...}`.
fn function_declaration(tokens: &mut TokenStream, start: SourceSpan) -> Result<Stmt, ScriptError> {
    tokens.expect_keyword(Keyword::Function)?;
    let (name, _) = tokens.expect_ident()?;
    let params = params(tokens)?;
    let body = block_body(tokens)?;
    let lit = FunctionLit {
        params,
        body,
        span: start.clone(),
    };
    let value = Expr::new(ExprKind::Function(Rc::new(lit)), start.clone());
    Ok(Stmt::new(
        StmtKind::Assign {
            target: Target::Ident(name),
            value,
        },
        start,
    ))
}

fn if_stmt(tokens: &mut TokenStream, start: SourceSpan) -> Result<Stmt, ScriptError> {
    tokens.expect_keyword(Keyword::If)?;
    let cond = condition(tokens)?;
    let then = Box::new(statement(tokens)?);
    let otherwise = if tokens.eat_keyword(Keyword::Else) {
        Some(Box::new(statement(tokens)?))
    } else {
        None
    };
    Ok(Stmt::new(
        StmtKind::If {
            cond,
            then,
            otherwise,
        },
        start,
    ))
}

fn for_stmt(tokens: &mut TokenStream, start: SourceSpan) -> Result<Stmt, ScriptError> {
    tokens.expect_keyword(Keyword::For)?;
    tokens.expect_punct(Punct::LParen)?;
    let init = if tokens.check_punct(Punct::Semicolon) {
        None
    } else {
        Some(Box::new(simple_statement(tokens)?))
    };
    expect_after_operand(tokens, Punct::Semicolon)?;
    let cond = if tokens.check_punct(Punct::Semicolon) {
        None
    } else {
        Some(expression(tokens)?)
    };
    expect_after_operand(tokens, Punct::Semicolon)?;
    let step = if tokens.check_punct(Punct::RParen) {
        None
    } else {
        Some(Box::new(simple_statement(tokens)?))
    };
    expect_after_operand(tokens, Punct::RParen)?;
    let body = Box::new(statement(tokens)?);
    Ok(Stmt::new(
        StmtKind::For {
            init,
            cond,
            step,
            body,
        },
        start,
    ))
}

/// `( expr )` of `if`/`while`/`do`.
fn condition(tokens: &mut TokenStream) -> Result<Expr, ScriptError> {
    tokens.expect_punct(Punct::LParen)?;
    let cond = expression(tokens)?;
    expect_after_operand(tokens, Punct::RParen)?;
    Ok(cond)
}

fn expect_after_operand(tokens: &mut TokenStream, punct: Punct) -> Result<(), ScriptError> {
    if tokens.eat_punct(punct) {
        Ok(())
    } else {
        Err(tokens.error_after_operand(&[punct.symbol()]))
    }
}

fn at_statement_end(tokens: &TokenStream) -> bool {
    let next = tokens.peek();
    next.is_punct(Punct::Semicolon) || next.is_punct(Punct::RBrace) || next.is_eof()
}

/// Consumes `;`, which may be left out before `}`, at end of input, or
/// after a statement ending in a closing brace.
fn terminator(tokens: &mut TokenStream) -> Result<(), ScriptError> {
    if tokens.eat_punct(Punct::Semicolon) || at_statement_end(tokens) {
        return Ok(());
    }
    if tokens.previous().is_some_and(|t| t.is_punct(Punct::RBrace)) {
        return Ok(());
    }
    Err(tokens.error_after_operand(&[";"]))
}
