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

//! AST definitions for scripts with precise source spans.
//!
//! The parser creates this AST first. The expander rewrites it (derivatives,
//! simplification), then the interpreter walks it or the compiler turns it
//! into host closures.

use nom_locate::LocatedSpan;
use std::fmt;
use std::rc::Rc;

/// Lexer input span type carrying byte offsets and line/column info.
pub type Span<'a> = LocatedSpan<&'a str>;

/// Source range and anchor position for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SourceSpan {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// 1-based line number (`0` when unknown).
    pub line: usize,
    /// 1-based UTF-8 column (`0` when unknown).
    pub column: usize,
}

impl SourceSpan {
    /// Creates a source span from lexer start/end positions.
    pub fn from_bounds(start: Span<'_>, end: Span<'_>) -> Self {
        Self {
            start: start.location_offset(),
            end: end.location_offset(),
            line: start.location_line() as usize,
            column: start.get_utf8_column(),
        }
    }

    /// Returns span length in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns whether this span carries a real position.
    pub fn is_known(&self) -> bool {
        self.line > 0
    }

    /// Returns a span that starts at `self` and ends at `other`.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            start: self.start,
            end: other.end.max(self.end),
            line: self.line,
            column: self.column,
        }
    }
}

/// Binary operators shared by the evaluator and the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Ne,
    /// Approximate equality (`~=`) within the configured tolerance.
    Approx,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinOp {
    /// Source-level operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Pow => "^",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Approx => "~=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
        }
    }

    /// Helper name emitted by the compiler for polymorphic dispatch.
    pub fn helper(self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::Div => "div",
            BinOp::Mod => "rem",
            BinOp::Pow => "pow",
            BinOp::Eq => "eq",
            BinOp::Ne => "ne",
            BinOp::Approx => "approx",
            BinOp::Lt => "lt",
            BinOp::Le => "le",
            BinOp::Gt => "gt",
            BinOp::Ge => "ge",
        }
    }

    /// Returns whether the operator produces a number from numbers.
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod | BinOp::Pow
        )
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
        }
    }
}

/// Short-circuit logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicOp {
    And,
    Or,
}

impl LogicOp {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicOp::And => "&&",
            LogicOp::Or => "||",
        }
    }
}

/// `function (params) { body }` literal.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLit {
    /// Declared parameter names.
    pub params: Vec<String>,
    /// Body statements.
    pub body: Vec<Stmt>,
    /// Source location of the `function` keyword.
    pub span: SourceSpan,
}

impl FunctionLit {
    /// Returns the expression of a body consisting of one `return e;`.
    pub fn single_return(&self) -> Option<&Expr> {
        match self.body.as_slice() {
            [
                Stmt {
                    kind: StmtKind::Return(Some(expr)),
                    ..
                },
            ] => Some(expr),
            _ => None,
        }
    }
}

/// `map (params) -> expr` literal.
#[derive(Debug, Clone, PartialEq)]
pub struct MapLit {
    /// Declared parameter names.
    pub params: Vec<String>,
    /// Mapped expression.
    pub body: Expr,
    /// Source location of the `map` keyword.
    pub span: SourceSpan,
}

/// Expression node variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
    /// Identifier reference.
    Ident(String),
    /// Array literal (`[a, b, ...]`).
    Array(Vec<Expr>),
    /// Object literal (`<< key: value, ... >>`).
    Object(Vec<(String, Expr)>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `cond ? then : otherwise`.
    Conditional {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// Property access (`object.property`).
    Member {
        object: Box<Expr>,
        property: String,
    },
    /// Element access (`object[index]`).
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    /// Function or creator call with optional trailing attribute object.
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        attrs: Option<Box<Expr>>,
    },
    Function(Rc<FunctionLit>),
    Map(Rc<MapLit>),
}

/// Spanned expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// Expression payload.
    pub kind: ExprKind,
    /// Source location for diagnostics.
    pub span: SourceSpan,
}

impl Expr {
    pub fn new(kind: ExprKind, span: SourceSpan) -> Self {
        Self { kind, span }
    }

    pub fn number(value: f64, span: SourceSpan) -> Self {
        Self::new(ExprKind::Number(value), span)
    }

    pub fn ident(name: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(ExprKind::Ident(name.into()), span)
    }

    pub fn unary(op: UnaryOp, operand: Expr, span: SourceSpan) -> Self {
        Self::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    /// Builds a binary node anchored at the left operand.
    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        let span = left.span.merge(&right.span);
        Self::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    /// Builds a call to a named function.
    pub fn call(name: &str, args: Vec<Expr>, span: SourceSpan) -> Self {
        Self::new(
            ExprKind::Call {
                callee: Box::new(Expr::ident(name, span.clone())),
                args,
                attrs: None,
            },
            span,
        )
    }

    /// Returns the literal number when this node is one.
    pub fn as_number(&self) -> Option<f64> {
        match self.kind {
            ExprKind::Number(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the identifier name when this node is one.
    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Ident(name) => Some(name),
            _ => None,
        }
    }
}

/// Left-hand side of an assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Plain local rebind (`name = ...`).
    Ident(String),
    /// Property assignment (`object.property = ...`).
    Member { object: Expr, property: String },
    /// Element assignment (`object[index] = ...`).
    Index { object: Expr, index: Expr },
}

/// Statement variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Bare `;`.
    Empty,
    Expr(Expr),
    Assign {
        target: Target,
        value: Expr,
    },
    Block(Vec<Stmt>),
    If {
        cond: Expr,
        then: Box<Stmt>,
        otherwise: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        cond: Expr,
    },
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        step: Option<Box<Stmt>>,
        body: Box<Stmt>,
    },
    Return(Option<Expr>),
    /// Deprecated `use name;`.
    Use(String),
    /// Deprecated `delete expr;`.
    Delete(Expr),
}

/// Spanned statement node.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    /// Statement payload.
    pub kind: StmtKind,
    /// Source location for diagnostics.
    pub span: SourceSpan,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: SourceSpan) -> Self {
        Self { kind, span }
    }
}

/// Full parsed script.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    /// Top-level statements in source order.
    pub statements: Vec<Stmt>,
}

/// Renders expressions back to script syntax (fully parenthesized).
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(v) => write!(f, "{}", crate::runtime::format_number(*v)),
            ExprKind::Str(s) => write!(f, "{s:?}"),
            ExprKind::Bool(b) => write!(f, "{b}"),
            ExprKind::Null => write!(f, "null"),
            ExprKind::Ident(name) => write!(f, "{name}"),
            ExprKind::Array(items) => {
                write!(f, "[")?;
                write_list(f, items)?;
                write!(f, "]")
            }
            ExprKind::Object(fields) => {
                write!(f, "<<")?;
                for (idx, (key, value)) in fields.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, ">>")
            }
            ExprKind::Unary { op, operand } => write!(f, "{}({operand})", op.symbol()),
            ExprKind::Binary { op, left, right } => {
                write!(f, "({left} {} {right})", op.symbol())
            }
            ExprKind::Logical { op, left, right } => {
                write!(f, "({left} {} {right})", op.symbol())
            }
            ExprKind::Conditional {
                cond,
                then,
                otherwise,
            } => write!(f, "({cond} ? {then} : {otherwise})"),
            ExprKind::Member { object, property } => write!(f, "{object}.{property}"),
            ExprKind::Index { object, index } => write!(f, "{object}[{index}]"),
            ExprKind::Call {
                callee,
                args,
                attrs,
            } => {
                write!(f, "{callee}(")?;
                write_list(f, args)?;
                write!(f, ")")?;
                if let Some(attrs) = attrs {
                    write!(f, " {attrs}")?;
                }
                Ok(())
            }
            ExprKind::Function(lit) => {
                write!(f, "function ({}) {{ ... }}", lit.params.join(", "))
            }
            ExprKind::Map(lit) => write!(f, "map ({}) -> {}", lit.params.join(", "), lit.body),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
