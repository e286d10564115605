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

//! Token cursor shared by the expression and statement parsers.

use crate::ast::SourceSpan;
use crate::diagnostics::ScriptError;

use super::lexer::{Keyword, Punct, Token, TokenKind};
use super::table;

/// Cursor over a fully lexed token list that always ends with `Eof`.
pub(super) struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenStream {
    pub(super) fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub(super) fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    /// Token `offset` positions ahead, clamped to the final `Eof`.
    pub(super) fn peek_at(&self, offset: usize) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.pos + offset).min(last)]
    }

    /// Most recently consumed token.
    pub(super) fn previous(&self) -> Option<&Token> {
        self.pos.checked_sub(1).map(|idx| &self.tokens[idx])
    }

    /// Consumes the current token (never moves past `Eof`).
    pub(super) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !token.is_eof() {
            self.pos += 1;
        }
        token
    }

    pub(super) fn check_punct(&self, punct: Punct) -> bool {
        self.peek().is_punct(punct)
    }

    pub(super) fn eat_punct(&mut self, punct: Punct) -> bool {
        let matched = self.check_punct(punct);
        if matched {
            self.pos += 1;
        }
        matched
    }

    pub(super) fn expect_punct(&mut self, punct: Punct) -> Result<Token, ScriptError> {
        if self.check_punct(punct) {
            Ok(self.advance())
        } else {
            Err(self.error(&[punct.symbol()]))
        }
    }

    pub(super) fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        let matched = self.peek().is_keyword(keyword);
        if matched {
            self.pos += 1;
        }
        matched
    }

    pub(super) fn expect_keyword(&mut self, keyword: Keyword) -> Result<Token, ScriptError> {
        if self.peek().is_keyword(keyword) {
            Ok(self.advance())
        } else {
            Err(self.error(&[keyword.as_str()]))
        }
    }

    pub(super) fn expect_ident(&mut self) -> Result<(String, SourceSpan), ScriptError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                let token = self.advance();
                Ok((name, token.span))
            }
            _ => Err(self.error(&["identifier"])),
        }
    }

    /// Syntax error at the current token.
    pub(super) fn error(&self, expected: &[&str]) -> ScriptError {
        let found = self.peek();
        ScriptError::syntax(
            expected.iter().map(|s| s.to_string()).collect(),
            found.to_string(),
            &found.span,
        )
    }

    /// Syntax error right after a complete operand, where any binary or
    /// postfix operator would also have been accepted.
    pub(super) fn error_after_operand(&self, expected: &[&'static str]) -> ScriptError {
        let mut all: Vec<&'static str> = expected.to_vec();
        all.extend(table::operator_symbols());
        all.extend([".", "[", "("]);
        self.error(&all)
    }
}
