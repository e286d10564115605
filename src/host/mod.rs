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

//! Boundary to the live scene graph the scripts drive.
//!
//! The interpreter only talks to a [`HostRegistry`]. [`Board`] is the
//! in-memory implementation used by embedders without their own scene graph
//! and by the test suite.

mod board;

pub use board::Board;

use crate::runtime::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Opaque reference to a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(pub u32);

impl ElementHandle {
    /// Handle of the board itself (`$board`).
    pub const BOARD: ElementHandle = ElementHandle(0);
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Element types the scripts can create or inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Board,
    Point,
    Line,
    Segment,
    Circle,
    Polygon,
    Text,
    FunctionGraph,
    Group,
}

impl ElementKind {
    /// Kinds reachable through creator identifiers.
    pub const CREATORS: [ElementKind; 8] = [
        ElementKind::Point,
        ElementKind::Line,
        ElementKind::Segment,
        ElementKind::Circle,
        ElementKind::Polygon,
        ElementKind::Text,
        ElementKind::FunctionGraph,
        ElementKind::Group,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Board => "board",
            ElementKind::Point => "point",
            ElementKind::Line => "line",
            ElementKind::Segment => "segment",
            ElementKind::Circle => "circle",
            ElementKind::Polygon => "polygon",
            ElementKind::Text => "text",
            ElementKind::FunctionGraph => "functiongraph",
            ElementKind::Group => "group",
        }
    }

    /// Creator kind named `name`.
    pub fn creator(name: &str) -> Option<Self> {
        Self::CREATORS.into_iter().find(|kind| kind.name() == name)
    }
}

/// Where a script-visible property of an element lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    /// Stored attribute under the given (lowercase) name.
    Attribute(&'static str),
    /// Method dispatching to the named geometry builtin with the element
    /// prepended to the arguments.
    Method(&'static str),
}

/// Per-kind property remapping table.
///
/// Method names match exactly; attribute aliases match case-insensitively.
pub fn property(kind: ElementKind, name: &str) -> Option<Property> {
    let method = match (kind, name) {
        (ElementKind::Point, "X") => Some("X"),
        (ElementKind::Point, "Y") => Some("Y"),
        (ElementKind::Point, "Dist") => Some("dist"),
        (ElementKind::Circle, "Radius") => Some("radius"),
        (ElementKind::Circle | ElementKind::Polygon, "Area") => Some("area"),
        (ElementKind::Line | ElementKind::Segment, "L") => Some("L"),
        _ => None,
    };
    if let Some(builtin) = method {
        return Some(Property::Method(builtin));
    }
    match name.to_ascii_lowercase().as_str() {
        "color" => Some(Property::Attribute("strokecolor")),
        "fill" => Some(Property::Attribute("fillcolor")),
        "opacity" => Some(Property::Attribute("strokeopacity")),
        "size" if kind == ElementKind::Point => Some(Property::Attribute("size")),
        _ => None,
    }
}

/// Failures reported by a host registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("unknown element {0}")]
    UnknownElement(ElementHandle),
    #[error("invalid parents for {kind}: {message}")]
    InvalidParents { kind: &'static str, message: String },
    #[error("attribute '{0}' is read-only")]
    ReadOnly(String),
}

/// Live scene graph consumed by the interpreter.
pub trait HostRegistry {
    /// Looks an element up by exact id, then by name, then by group id.
    fn select_by_id_or_name(&self, key: &str) -> Option<ElementHandle>;

    /// Raw attribute value (`None` when absent).
    fn get_attribute(&self, handle: ElementHandle, name: &str) -> Option<Value>;

    /// Stores an attribute and propagates the update to dependents.
    fn set_attribute(
        &mut self,
        handle: ElementHandle,
        name: &str,
        value: Value,
    ) -> Result<(), HostError>;

    fn create_object(
        &mut self,
        kind: ElementKind,
        parents: Vec<Value>,
        attrs: BTreeMap<String, Value>,
    ) -> Result<ElementHandle, HostError>;

    fn remove_object(&mut self, handle: ElementHandle) -> Result<(), HostError>;

    fn element_kind(&self, handle: ElementHandle) -> Option<ElementKind>;

    /// Parent values the element was created from.
    fn parents(&self, handle: ElementHandle) -> Vec<Value>;

    fn is_point(&self, handle: ElementHandle) -> bool {
        self.element_kind(handle) == Some(ElementKind::Point)
    }

    fn is_group(&self, handle: ElementHandle) -> bool {
        self.element_kind(handle) == Some(ElementKind::Group)
    }

    fn is_line(&self, handle: ElementHandle) -> bool {
        matches!(
            self.element_kind(handle),
            Some(ElementKind::Line | ElementKind::Segment)
        )
    }

    /// Handle `$board` resolves to.
    fn context_handle(&self) -> ElementHandle {
        ElementHandle::BOARD
    }
}
