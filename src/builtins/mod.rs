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

//! Builtin function and constant catalogs.
//!
//! The [`Registry`] merges the `math`, `geometry` and `core` catalogs once
//! per interpreter. Every entry carries its [`Origin`], which is also the
//! namespace the compiler prints in its listings.

mod geometry;
mod math;
mod script;

use crate::diagnostics::ScriptError;
use crate::interp::Interpreter;
use crate::runtime::{Function, Value};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Native implementation of a builtin function.
pub type BuiltinFn = fn(&mut Interpreter, &[Value]) -> Result<Value, ScriptError>;

/// Catalog a builtin belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Math,
    Geometry,
    Core,
}

impl Origin {
    /// Namespace used in compiled listings (`math::sin`).
    pub fn namespace(self) -> &'static str {
        match self {
            Origin::Math => "math",
            Origin::Geometry => "geometry",
            Origin::Core => "core",
        }
    }
}

/// Accepted argument counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arity {
    Exact(usize),
    Range(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::Range(lo, hi) => (lo..=hi).contains(&count),
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::Range(lo, hi) => write!(f, "{lo} to {hi}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Whether a builtin is called or read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinKind {
    Function,
    Constant,
}

/// Payload of a builtin.
#[derive(Clone, Copy)]
pub enum Entry {
    Function { arity: Arity, func: BuiltinFn },
    Constant(f64),
}

/// One catalog entry.
pub struct BuiltinDef {
    pub name: &'static str,
    pub origin: Origin,
    pub entry: Entry,
}

impl fmt::Debug for BuiltinDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinDef")
            .field("name", &self.name)
            .field("origin", &self.origin)
            .finish()
    }
}

impl BuiltinDef {
    pub(crate) const fn function(
        name: &'static str,
        origin: Origin,
        arity: Arity,
        func: BuiltinFn,
    ) -> Self {
        Self {
            name,
            origin,
            entry: Entry::Function { arity, func },
        }
    }

    pub(crate) const fn constant(name: &'static str, origin: Origin, value: f64) -> Self {
        Self {
            name,
            origin,
            entry: Entry::Constant(value),
        }
    }

    pub fn kind(&self) -> BuiltinKind {
        match self.entry {
            Entry::Function { .. } => BuiltinKind::Function,
            Entry::Constant(_) => BuiltinKind::Constant,
        }
    }

    pub fn arity(&self) -> Option<Arity> {
        match self.entry {
            Entry::Function { arity, .. } => Some(arity),
            Entry::Constant(_) => None,
        }
    }

    /// Script value of the entry.
    pub fn value(&'static self) -> Value {
        match self.entry {
            Entry::Function { .. } => Value::function(Function::builtin(self)),
            Entry::Constant(value) => Value::Number(value),
        }
    }

    /// Returns whether this is a function of the math catalog.
    pub fn is_math_function(&self) -> bool {
        self.origin == Origin::Math && matches!(self.entry, Entry::Function { .. })
    }

    /// Qualified name used in compiled listings.
    pub fn path(&self) -> String {
        format!("{}::{}", self.origin.namespace(), self.name)
    }
}

/// Introspection record returned by [`Registry::list_all`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuiltinInfo {
    pub name: String,
    pub kind: BuiltinKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arity: Option<Arity>,
    pub origin: Origin,
}

/// Immutable merged catalog.
#[derive(Debug)]
pub struct Registry {
    entries: HashMap<&'static str, &'static BuiltinDef>,
}

impl Registry {
    /// Builds the registry from the math, geometry and core catalogs.
    ///
    /// Later catalogs never override earlier ones.
    pub fn standard() -> Self {
        let mut entries = HashMap::new();
        for def in math::CATALOG
            .iter()
            .chain(geometry::CATALOG)
            .chain(script::CATALOG)
        {
            entries.entry(def.name).or_insert(def);
        }
        Self { entries }
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn entry(&self, name: &str) -> Option<&'static BuiltinDef> {
        self.entries.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.entry(name).map(BuiltinDef::value)
    }

    /// Every entry, sorted by name.
    pub fn list_all(&self) -> Vec<BuiltinInfo> {
        let mut infos: Vec<BuiltinInfo> = self
            .entries
            .values()
            .map(|def| BuiltinInfo {
                name: def.name.to_string(),
                kind: def.kind(),
                arity: def.arity(),
                origin: def.origin,
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }
}

pub(crate) fn arg_error(name: &str, message: impl fmt::Display) -> ScriptError {
    ScriptError::type_error(
        format!("{name}: {message}"),
        &crate::ast::SourceSpan::default(),
    )
}

/// Reads argument `index` as a number.
pub(crate) fn number_arg(name: &str, args: &[Value], index: usize) -> Result<f64, ScriptError> {
    match args.get(index) {
        Some(Value::Number(n)) => Ok(*n),
        Some(other) => Err(arg_error(
            name,
            format_args!("argument {} must be a number, got {}", index + 1, other.kind()),
        )),
        None => Err(arg_error(name, format_args!("missing argument {}", index + 1))),
    }
}
