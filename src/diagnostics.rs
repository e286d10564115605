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

//! Script diagnostics with source snippets and caret pointers.

use crate::ast::SourceSpan;
use std::fmt;
use thiserror::Error;

/// Source position attached to every error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// 1-based line number (`0` when unavailable).
    pub line: usize,
    /// 1-based column number (`0` when unavailable).
    pub column: usize,
    /// Source line snippet where the error occurred.
    pub snippet: String,
    /// Caret pointer aligned to `snippet`.
    pub pointer: String,
    span: SourceSpan,
}

impl Location {
    /// Creates a location without snippet text.
    pub fn at(span: &SourceSpan) -> Self {
        Self {
            line: span.line,
            column: span.column,
            snippet: String::new(),
            pointer: String::new(),
            span: span.clone(),
        }
    }

    /// Creates a source-mapped location from a [`SourceSpan`].
    pub fn from_source(source: &str, span: &SourceSpan) -> Self {
        let mut location = Self::at(span);
        location.fill_snippet(source);
        location
    }

    /// Returns whether this location points at real source.
    pub fn is_known(&self) -> bool {
        self.line > 0
    }

    fn fill_snippet(&mut self, source: &str) {
        if self.line == 0 || !self.snippet.is_empty() {
            return;
        }
        // Pull the exact source line where the lexer/parser/runtime reported the span.
        let snippet = source
            .lines()
            .nth(self.line.saturating_sub(1))
            .unwrap_or("")
            .to_string();
        // Compute a safe caret range even when spans extend past line boundaries.
        let line_len = snippet.chars().count();
        let pointer_column = self.column.saturating_sub(1).min(line_len);
        let requested_len = self.span.len().max(1);
        let max_len = line_len.saturating_sub(pointer_column).max(1);
        let pointer_len = requested_len.min(max_len);
        self.pointer = format!("{}{}", " ".repeat(pointer_column), "^".repeat(pointer_len));
        self.snippet = snippet;
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 || self.column == 0 {
            return Ok(());
        }
        write!(f, "\n --> line {}, column {}", self.line, self.column)?;
        if !self.snippet.is_empty() {
            write!(
                f,
                "\n  |\n{:>3} | {}\n  | {}",
                self.line, self.snippet, self.pointer
            )?;
        }
        Ok(())
    }
}

/// Errors surfaced by lexing, parsing, expansion and evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScriptError {
    /// No token pattern matches the input.
    #[error("Lexical error: unexpected input '{fragment}'{location}")]
    Lexical { fragment: String, location: Location },
    /// The parser cannot continue on the current token.
    #[error("Syntax error: expected {}, found {found}{location}", .expected.join(" or "))]
    Syntax {
        expected: Vec<String>,
        found: String,
        location: Location,
    },
    /// The derivative of a function or construct is not defined.
    #[error("Derivative of '{name}' is not defined{location}")]
    Derivative { name: String, location: Location },
    /// An identifier that must resolve does not.
    #[error("Name error: '{name}' is not defined{location}")]
    Name { name: String, location: Location },
    /// Operator or access applied to incompatible values.
    #[error("Type error: {message}{location}")]
    Type { message: String, location: Location },
    /// Any other evaluation failure (control flow, host failures).
    #[error("Runtime error: {message}{location}")]
    Runtime { message: String, location: Location },
}

impl ScriptError {
    pub fn lexical(fragment: impl Into<String>, span: &SourceSpan) -> Self {
        ScriptError::Lexical {
            fragment: fragment.into(),
            location: Location::at(span),
        }
    }

    pub fn syntax(
        expected: Vec<String>,
        found: impl Into<String>,
        span: &SourceSpan,
    ) -> Self {
        ScriptError::Syntax {
            expected,
            found: found.into(),
            location: Location::at(span),
        }
    }

    pub fn name(name: impl Into<String>, span: &SourceSpan) -> Self {
        ScriptError::Name {
            name: name.into(),
            location: Location::at(span),
        }
    }

    pub fn type_error(message: impl Into<String>, span: &SourceSpan) -> Self {
        ScriptError::Type {
            message: message.into(),
            location: Location::at(span),
        }
    }

    pub fn runtime(message: impl Into<String>, span: &SourceSpan) -> Self {
        ScriptError::Runtime {
            message: message.into(),
            location: Location::at(span),
        }
    }

    pub fn derivative(name: impl Into<String>, span: &SourceSpan) -> Self {
        ScriptError::Derivative {
            name: name.into(),
            location: Location::at(span),
        }
    }

    /// Location attached to the error.
    pub fn location(&self) -> &Location {
        match self {
            ScriptError::Lexical { location, .. }
            | ScriptError::Syntax { location, .. }
            | ScriptError::Derivative { location, .. }
            | ScriptError::Name { location, .. }
            | ScriptError::Type { location, .. }
            | ScriptError::Runtime { location, .. } => location,
        }
    }

    fn location_mut(&mut self) -> &mut Location {
        match self {
            ScriptError::Lexical { location, .. }
            | ScriptError::Syntax { location, .. }
            | ScriptError::Derivative { location, .. }
            | ScriptError::Name { location, .. }
            | ScriptError::Type { location, .. }
            | ScriptError::Runtime { location, .. } => location,
        }
    }

    /// 1-based line of the offending construct (`0` when unknown).
    pub fn line(&self) -> usize {
        self.location().line
    }

    /// 1-based column of the offending construct (`0` when unknown).
    pub fn column(&self) -> usize {
        self.location().column
    }

    /// Tokens acceptable at a syntax error (empty for other kinds).
    pub fn expected_tokens(&self) -> &[String] {
        match self {
            ScriptError::Syntax { expected, .. } => expected,
            _ => &[],
        }
    }

    /// Anchors an error raised without position at `span`.
    pub fn or_at(mut self, span: &SourceSpan) -> Self {
        if !self.location().is_known() {
            *self.location_mut() = Location::at(span);
        }
        self
    }

    /// Fills the snippet/caret of the location from the script source.
    pub fn with_source(mut self, source: &str) -> Self {
        self.location_mut().fill_snippet(source);
        self
    }
}

/// Category of a non-fatal diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Use of a legacy keyword (`use`, `delete`).
    Deprecation,
    /// A user binding hides a builtin name.
    Shadowing,
}

/// Non-fatal diagnostic collected by the interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
    /// 1-based line (`0` when unavailable).
    pub line: usize,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} (line {})", self.message, self.line)
        }
    }
}
