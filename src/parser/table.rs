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

//! Operator table driving the expression shift/reduce loop.
//!
//! Precedence, low to high:
//!
//! | prec | operators          | assoc |
//! |------|--------------------|-------|
//! | 0    | `? :`              | right |
//! | 1    | `\|\|`             | left  |
//! | 2    | `&&`               | left  |
//! | 3    | `== != ~=`         | left  |
//! | 4    | `< <= > >=`        | left  |
//! | 5    | `+ -`              | left  |
//! | 6    | `* / %`            | left  |
//! | 7    | prefix `- + !`     | right |
//! | 8    | `^`                | right |
//!
//! Postfix `.`, `[]` and calls bind tighter than everything and are parsed
//! with the operand.

use crate::ast::{BinOp, LogicOp, UnaryOp};

use super::lexer::{Punct, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Assoc {
    Left,
    Right,
}

/// Node synthesized when an infix operator is reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Reduction {
    Binary(BinOp),
    Logical(LogicOp),
    /// `cond ? then : otherwise`; the then-branch is parsed on shift.
    Conditional,
}

#[derive(Debug)]
pub(super) struct InfixRule {
    pub(super) punct: Punct,
    pub(super) prec: u8,
    pub(super) assoc: Assoc,
    pub(super) reduction: Reduction,
}

/// Precedence of prefix operators.
pub(super) const PREFIX_PREC: u8 = 7;

const fn rule(punct: Punct, prec: u8, assoc: Assoc, reduction: Reduction) -> InfixRule {
    InfixRule {
        punct,
        prec,
        assoc,
        reduction,
    }
}

static INFIX: &[InfixRule] = &[
    rule(Punct::Question, 0, Assoc::Right, Reduction::Conditional),
    rule(Punct::OrOr, 1, Assoc::Left, Reduction::Logical(LogicOp::Or)),
    rule(Punct::AndAnd, 2, Assoc::Left, Reduction::Logical(LogicOp::And)),
    rule(Punct::Eq, 3, Assoc::Left, Reduction::Binary(BinOp::Eq)),
    rule(Punct::Ne, 3, Assoc::Left, Reduction::Binary(BinOp::Ne)),
    rule(Punct::Approx, 3, Assoc::Left, Reduction::Binary(BinOp::Approx)),
    rule(Punct::Lt, 4, Assoc::Left, Reduction::Binary(BinOp::Lt)),
    rule(Punct::Le, 4, Assoc::Left, Reduction::Binary(BinOp::Le)),
    rule(Punct::Gt, 4, Assoc::Left, Reduction::Binary(BinOp::Gt)),
    rule(Punct::Ge, 4, Assoc::Left, Reduction::Binary(BinOp::Ge)),
    rule(Punct::Plus, 5, Assoc::Left, Reduction::Binary(BinOp::Add)),
    rule(Punct::Minus, 5, Assoc::Left, Reduction::Binary(BinOp::Sub)),
    rule(Punct::Star, 6, Assoc::Left, Reduction::Binary(BinOp::Mul)),
    rule(Punct::Slash, 6, Assoc::Left, Reduction::Binary(BinOp::Div)),
    rule(Punct::Percent, 6, Assoc::Left, Reduction::Binary(BinOp::Mod)),
    rule(Punct::Caret, 8, Assoc::Right, Reduction::Binary(BinOp::Pow)),
];

static PREFIX: &[(Punct, UnaryOp)] = &[
    (Punct::Minus, UnaryOp::Neg),
    (Punct::Plus, UnaryOp::Plus),
    (Punct::Bang, UnaryOp::Not),
];

fn punct_of(token: &Token) -> Option<Punct> {
    match token.kind {
        TokenKind::Punct(punct) => Some(punct),
        _ => None,
    }
}

/// Infix rule for the token in operator position.
pub(super) fn infix(token: &Token) -> Option<&'static InfixRule> {
    let punct = punct_of(token)?;
    INFIX.iter().find(|rule| rule.punct == punct)
}

/// Prefix operator for the token in operand position.
pub(super) fn prefix(token: &Token) -> Option<UnaryOp> {
    let punct = punct_of(token)?;
    PREFIX
        .iter()
        .find(|(candidate, _)| *candidate == punct)
        .map(|(_, op)| *op)
}

/// Symbols of every infix operator, in table order.
pub(super) fn operator_symbols() -> impl Iterator<Item = &'static str> {
    INFIX.iter().map(|rule| rule.punct.symbol())
}

/// Returns whether an operator already on the stack with precedence `top`
/// must be reduced before shifting `incoming`.
pub(super) fn reduces_before(top: u8, incoming: &InfixRule) -> bool {
    top > incoming.prec || (top == incoming.prec && incoming.assoc == Assoc::Left)
}
