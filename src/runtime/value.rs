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

//! Dynamically typed script values.

use crate::ast::{FunctionLit, MapLit, SourceSpan};
use crate::builtins::BuiltinDef;
use crate::compiler::CompiledBody;
use crate::host::{ElementHandle, ElementKind};
use crate::runtime::format_number;
use crate::runtime::interval::Interval;
use crate::runtime::scope::ScopeId;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Discriminant of a [`Value`], used by operator dispatch and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Undefined,
    Null,
    Number,
    Boolean,
    String,
    Array,
    Object,
    Interval,
    Function,
    Element,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Undefined => "undefined",
            Kind::Null => "null",
            Kind::Number => "number",
            Kind::Boolean => "boolean",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
            Kind::Interval => "interval",
            Kind::Function => "function",
            Kind::Element => "element",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shared, mutable array storage.
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;
/// Shared, mutable object storage.
pub type ObjectRef = Rc<RefCell<BTreeMap<String, Value>>>;

/// A script value.
///
/// Arrays and objects have reference semantics: cloning a value shares the
/// underlying storage, the way scripts expect.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Number(f64),
    Bool(bool),
    Str(Rc<str>),
    Array(ArrayRef),
    Object(ObjectRef),
    Interval(Interval),
    Function(Rc<Function>),
    Element(ElementHandle),
}

impl Value {
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn object(fields: BTreeMap<String, Value>) -> Self {
        Value::Object(Rc::new(RefCell::new(fields)))
    }

    pub fn function(function: Function) -> Self {
        Value::Function(Rc::new(function))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Undefined => Kind::Undefined,
            Value::Null => Kind::Null,
            Value::Number(_) => Kind::Number,
            Value::Bool(_) => Kind::Boolean,
            Value::Str(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
            Value::Interval(_) => Kind::Interval,
            Value::Function(_) => Kind::Function,
            Value::Element(_) => Kind::Element,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Script truthiness: `undefined`, `null`, `false`, `0`, `NaN` and the
    /// empty string are false; everything else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty(),
            Value::Interval(iv) => !(iv.lo == 0.0 && iv.hi == 0.0),
            Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Element(_) => true,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Rc<Function>> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<ElementHandle> {
        match self {
            Value::Element(handle) => Some(*handle),
            _ => None,
        }
    }

    /// Numbers promote to degenerate intervals.
    pub fn as_interval(&self) -> Option<Interval> {
        match self {
            Value::Number(n) => Some(Interval::point(*n)),
            Value::Interval(iv) => Some(*iv),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(Rc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(Rc::from(value))
    }
}

impl From<Interval> for Value {
    fn from(value: Interval) -> Self {
        Value::Interval(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

/// Nesting depth past which structural comparison gives up. Arrays and
/// objects may contain themselves.
pub(crate) const MAX_NESTING: usize = 64;

impl Value {
    fn equals(&self, other: &Self, depth: usize) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                if depth >= MAX_NESTING {
                    return false;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y, depth + 1))
            }
            (Value::Object(a), Value::Object(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                if depth >= MAX_NESTING {
                    return false;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((ka, va), (kb, vb))| ka == kb && va.equals(vb, depth + 1))
            }
            (Value::Interval(a), Value::Interval(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Element(a), Value::Element(b)) => a == b,
            _ => false,
        }
    }

    /// Writes the value, printing a container already being written as
    /// `[...]` or `<<...>>`.
    fn write(&self, f: &mut fmt::Formatter<'_>, open: &mut Vec<usize>) -> fmt::Result {
        match self {
            Value::Array(items) => {
                let key = Rc::as_ptr(items) as *const () as usize;
                if open.contains(&key) {
                    return f.write_str("[...]");
                }
                open.push(key);
                f.write_str("[")?;
                for (idx, item) in items.borrow().iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    item.write(f, open)?;
                }
                open.pop();
                f.write_str("]")
            }
            Value::Object(fields) => {
                let key = Rc::as_ptr(fields) as *const () as usize;
                if open.contains(&key) {
                    return f.write_str("<<...>>");
                }
                open.push(key);
                f.write_str("<<")?;
                for (idx, (name, value)) in fields.borrow().iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: ")?;
                    value.write(f, open)?;
                }
                open.pop();
                f.write_str(">>")
            }
            other => write!(f, "{other}"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, 0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
            Value::Array(_) | Value::Object(_) => self.write(f, &mut Vec::new()),
            Value::Interval(iv) => write!(
                f,
                "[{}, {}]",
                format_number(iv.lo),
                format_number(iv.hi)
            ),
            Value::Function(function) => write!(f, "{function}"),
            Value::Element(handle) => write!(f, "element#{}", handle.0),
        }
    }
}

/// A callable value.
#[derive(Debug)]
pub struct Function {
    /// Name given by a `function name(...)` declaration or the builtin name.
    pub name: Option<String>,
    pub kind: FunctionKind,
}

/// What a [`Function`] runs when called.
#[derive(Debug)]
pub enum FunctionKind {
    /// Entry of the builtin registry.
    Builtin(&'static BuiltinDef),
    /// Object creator (`point`, `circle`, ...).
    Creator(ElementKind),
    /// Script-defined function or map.
    Script(Closure),
}

impl Function {
    pub fn builtin(def: &'static BuiltinDef) -> Self {
        Self {
            name: Some(def.name.to_string()),
            kind: FunctionKind::Builtin(def),
        }
    }

    pub fn creator(kind: ElementKind) -> Self {
        Self {
            name: Some(kind.name().to_string()),
            kind: FunctionKind::Creator(kind),
        }
    }

    pub fn script(closure: Closure) -> Self {
        Self {
            name: None,
            kind: FunctionKind::Script(closure),
        }
    }

    /// Returns the closure of a script function.
    pub fn closure(&self) -> Option<&Closure> {
        match &self.kind {
            FunctionKind::Script(closure) => Some(closure),
            _ => None,
        }
    }

    /// Returns whether calls run compiled host closures.
    pub fn is_compiled(&self) -> bool {
        matches!(
            &self.kind,
            FunctionKind::Script(Closure {
                backend: Backend::Compiled(_),
                ..
            })
        )
    }

    /// Returns whether this is a `map (...) -> e` value.
    pub fn is_map(&self) -> bool {
        self.closure().is_some_and(|closure| closure.body.is_map())
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FunctionKind::Builtin(def) => write!(f, "function {}() {{ [builtin] }}", def.name),
            FunctionKind::Creator(kind) => write!(f, "function {}() {{ [creator] }}", kind.name()),
            FunctionKind::Script(closure) => match &closure.body {
                Body::Map(lit) => write!(f, "map ({}) -> {}", lit.params.join(", "), lit.body),
                Body::Function(lit) => {
                    let name = self.name.as_deref().unwrap_or("");
                    write!(f, "function {name}({}) {{ ... }}", lit.params.join(", "))
                }
            },
        }
    }
}

/// Script function together with the scope it was defined in.
#[derive(Debug, Clone)]
pub struct Closure {
    pub body: Body,
    /// Scope the body resolves free names against.
    pub scope: ScopeId,
    pub backend: Backend,
}

impl Closure {
    pub fn params(&self) -> &[String] {
        self.body.params()
    }
}

/// Shared AST of a script function.
#[derive(Debug, Clone)]
pub enum Body {
    Function(Rc<FunctionLit>),
    Map(Rc<MapLit>),
}

impl Body {
    pub fn params(&self) -> &[String] {
        match self {
            Body::Function(lit) => &lit.params,
            Body::Map(lit) => &lit.params,
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Body::Map(_))
    }

    pub fn span(&self) -> &SourceSpan {
        match self {
            Body::Function(lit) => &lit.span,
            Body::Map(lit) => &lit.span,
        }
    }
}

/// How a closure body executes.
#[derive(Debug, Clone)]
pub enum Backend {
    /// Walked by the tree evaluator.
    Interpreted,
    /// Runs the compiled host closure.
    Compiled(Rc<CompiledBody>),
}
