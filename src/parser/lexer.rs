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

//! `nom` tokenizer.
//!
//! Tokens are produced one at a time by [`Lexer::next_token`]. Whitespace,
//! `//` line comments and `/* */` block comments are skipped between tokens.
//! Two-character operators are tried before one-character ones so `<=`
//! never lexes as `<` followed by `=`.

use crate::ast::{SourceSpan, Span};
use crate::diagnostics::ScriptError;
use nom::Parser;
use nom::{
    InputTake,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{anychar, char, digit0, digit1, multispace1, not_line_ending, one_of},
    combinator::{map, map_opt, map_res, opt, recognize, value},
    error::{ErrorKind, ParseError, VerboseError},
    multi::many0,
    sequence::{pair, tuple},
};
use std::fmt;

use super::PResult;

/// Reserved words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    If,
    Else,
    While,
    Do,
    For,
    Function,
    Map,
    Return,
    Use,
    Delete,
    True,
    False,
    Null,
}

impl Keyword {
    const ALL: [Keyword; 13] = [
        Keyword::If,
        Keyword::Else,
        Keyword::While,
        Keyword::Do,
        Keyword::For,
        Keyword::Function,
        Keyword::Map,
        Keyword::Return,
        Keyword::Use,
        Keyword::Delete,
        Keyword::True,
        Keyword::False,
        Keyword::Null,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::Do => "do",
            Keyword::For => "for",
            Keyword::Function => "function",
            Keyword::Map => "map",
            Keyword::Return => "return",
            Keyword::Use => "use",
            Keyword::Delete => "delete",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
        }
    }

    fn from_word(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kw| kw.as_str() == word)
    }
}

/// Operators and punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punct {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Assign,
    Eq,
    Ne,
    Approx,
    Lt,
    Le,
    Gt,
    Ge,
    Bang,
    AndAnd,
    OrOr,
    Arrow,
    /// `<<`, opens an object literal.
    ObjectOpen,
    /// `>>`, closes an object literal.
    ObjectClose,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Dot,
    Colon,
    Question,
}

impl Punct {
    pub fn symbol(self) -> &'static str {
        match self {
            Punct::Plus => "+",
            Punct::Minus => "-",
            Punct::Star => "*",
            Punct::Slash => "/",
            Punct::Percent => "%",
            Punct::Caret => "^",
            Punct::Assign => "=",
            Punct::Eq => "==",
            Punct::Ne => "!=",
            Punct::Approx => "~=",
            Punct::Lt => "<",
            Punct::Le => "<=",
            Punct::Gt => ">",
            Punct::Ge => ">=",
            Punct::Bang => "!",
            Punct::AndAnd => "&&",
            Punct::OrOr => "||",
            Punct::Arrow => "->",
            Punct::ObjectOpen => "<<",
            Punct::ObjectClose => ">>",
            Punct::LParen => "(",
            Punct::RParen => ")",
            Punct::LBracket => "[",
            Punct::RBracket => "]",
            Punct::LBrace => "{",
            Punct::RBrace => "}",
            Punct::Comma => ",",
            Punct::Semicolon => ";",
            Punct::Dot => ".",
            Punct::Colon => ":",
            Punct::Question => "?",
        }
    }

    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '+' => Punct::Plus,
            '-' => Punct::Minus,
            '*' => Punct::Star,
            '/' => Punct::Slash,
            '%' => Punct::Percent,
            '^' => Punct::Caret,
            '=' => Punct::Assign,
            '<' => Punct::Lt,
            '>' => Punct::Gt,
            '!' => Punct::Bang,
            '(' => Punct::LParen,
            ')' => Punct::RParen,
            '[' => Punct::LBracket,
            ']' => Punct::RBracket,
            '{' => Punct::LBrace,
            '}' => Punct::RBrace,
            ',' => Punct::Comma,
            ';' => Punct::Semicolon,
            '.' => Punct::Dot,
            ':' => Punct::Colon,
            '?' => Punct::Question,
            _ => return None,
        })
    }
}

/// Token classes.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    /// String literal with escapes resolved.
    Str(String),
    Ident(String),
    Keyword(Keyword),
    Punct(Punct),
    Eof,
}

/// One lexeme with its position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source text of the lexeme.
    pub text: String,
    pub span: SourceSpan,
}

impl Token {
    pub fn is_punct(&self, punct: Punct) -> bool {
        self.kind == TokenKind::Punct(punct)
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("end of input"),
            _ => write!(f, "'{}'", self.text),
        }
    }
}

/// Skips whitespace and comments.
fn trivia(input: Span<'_>) -> PResult<'_, ()> {
    value(
        (),
        many0(alt((
            value((), multispace1),
            value((), pair(tag("//"), not_line_ending)),
            block_comment,
        ))),
    )
    .parse(input)
}

fn block_comment(input: Span<'_>) -> PResult<'_, ()> {
    if !input.fragment().starts_with("/*") {
        return Err(nom::Err::Error(VerboseError::from_error_kind(
            input,
            ErrorKind::Tag,
        )));
    }
    match input.fragment()[2..].find("*/") {
        Some(end) => Ok((input.take_split(end + 4).0, ())),
        // Unterminated comments abort lexing instead of backtracking.
        None => Err(nom::Err::Failure(VerboseError::from_error_kind(
            input,
            ErrorKind::TakeUntil,
        ))),
    }
}

/// `12`, `1.5`, `.5`, `2.`, each with an optional exponent.
///
/// Signs are never part of the literal; `-` is always an operator.
fn number(input: Span<'_>) -> PResult<'_, f64> {
    map_res(
        recognize(tuple((
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                recognize(pair(char('.'), digit1)),
            )),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |text: Span<'_>| text.fragment().parse::<f64>(),
    )
    .parse(input)
}

/// Quoted string; escape sequences are resolved in the returned value.
fn string_literal(input: Span<'_>) -> PResult<'_, String> {
    let quote = match input.fragment().chars().next() {
        Some(c @ ('"' | '\'')) => c,
        _ => {
            return Err(nom::Err::Error(VerboseError::from_error_kind(
                input,
                ErrorKind::Char,
            )));
        }
    };
    let body = &input.fragment()[1..];
    let mut value = String::new();
    let mut chars = body.char_indices();
    while let Some((idx, c)) = chars.next() {
        match c {
            c if c == quote => return Ok((input.take_split(idx + 2).0, value)),
            '\\' => match chars.next() {
                Some((_, escaped)) => value.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '0' => '\0',
                    other => other,
                }),
                None => break,
            },
            '\n' => break,
            c => value.push(c),
        }
    }
    Err(nom::Err::Failure(VerboseError::from_error_kind(
        input,
        ErrorKind::Char,
    )))
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_ascii_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c == '$' || c.is_ascii_alphanumeric()
}

/// Identifier or keyword.
fn word(input: Span<'_>) -> PResult<'_, TokenKind> {
    map(
        recognize(pair(
            take_while1(is_ident_start),
            take_while(is_ident_continue),
        )),
        |text: Span<'_>| match Keyword::from_word(text.fragment()) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Ident(text.fragment().to_string()),
        },
    )
    .parse(input)
}

fn punct(input: Span<'_>) -> PResult<'_, Punct> {
    alt((
        value(Punct::ObjectOpen, tag("<<")),
        value(Punct::ObjectClose, tag(">>")),
        value(Punct::Le, tag("<=")),
        value(Punct::Ge, tag(">=")),
        value(Punct::Eq, tag("==")),
        value(Punct::Ne, tag("!=")),
        value(Punct::Approx, tag("~=")),
        value(Punct::AndAnd, tag("&&")),
        value(Punct::OrOr, tag("||")),
        value(Punct::Arrow, tag("->")),
        map_opt(anychar, Punct::from_char),
    ))
    .parse(input)
}

fn token_kind(input: Span<'_>) -> PResult<'_, TokenKind> {
    alt((
        map(number, TokenKind::Number),
        map(string_literal, TokenKind::Str),
        word,
        map(punct, TokenKind::Punct),
    ))
    .parse(input)
}

/// Incremental tokenizer over one source text.
pub struct Lexer<'a> {
    source: &'a str,
    rest: Span<'a>,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            rest: Span::new(source),
            finished: false,
        }
    }

    /// Returns the next token, [`TokenKind::Eof`] once input is exhausted.
    pub fn next_token(&mut self) -> Result<Token, ScriptError> {
        let (rest, ()) = trivia(self.rest).map_err(|err| lexical_error(err, self.rest))?;
        self.rest = rest;
        if rest.fragment().is_empty() {
            self.finished = true;
            return Ok(Token {
                kind: TokenKind::Eof,
                text: String::new(),
                span: SourceSpan::from_bounds(rest, rest),
            });
        }
        let (after, kind) = token_kind(rest).map_err(|err| lexical_error(err, rest))?;
        let span = SourceSpan::from_bounds(rest, after);
        self.rest = after;
        Ok(Token {
            kind,
            text: self.source[span.start..span.end].to_string(),
            span,
        })
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, ScriptError>;

    /// Yields tokens up to and including [`TokenKind::Eof`].
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.is_err() {
            self.finished = true;
        }
        Some(token)
    }
}

fn lexical_error(err: nom::Err<VerboseError<Span<'_>>>, at: Span<'_>) -> ScriptError {
    // Failures (unterminated strings/comments) point at the construct start
    // and quote the rest of its line; plain mismatches quote one character.
    let (at, fragment) = match &err {
        nom::Err::Failure(e) => {
            let at = e.errors.first().map(|(span, _)| *span).unwrap_or(at);
            let fragment: String = at
                .fragment()
                .chars()
                .take_while(|c| *c != '\n')
                .take(16)
                .collect();
            (at, fragment)
        }
        _ => (at, at.fragment().chars().take(1).collect()),
    };
    let mut span = SourceSpan::from_bounds(at, at);
    span.end = span.start + fragment.len();
    ScriptError::lexical(fragment, &span)
}

/// Tokenizes a whole source text, ending with a [`TokenKind::Eof`] token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ScriptError> {
    Lexer::new(source).collect()
}
