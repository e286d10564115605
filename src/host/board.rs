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

//! In-memory scene graph.

use super::{ElementHandle, ElementKind, HostError, HostRegistry};
use crate::runtime::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Debug, Clone)]
struct Element {
    kind: ElementKind,
    id: String,
    name: Option<String>,
    parents: Vec<Value>,
    attributes: BTreeMap<String, Value>,
}

#[derive(Debug, Default)]
struct BoardState {
    elements: BTreeMap<ElementHandle, Element>,
    next_handle: u32,
    updates: Vec<ElementHandle>,
}

/// Shared in-memory board.
///
/// Cloning a `Board` yields another view of the same elements, so a caller
/// can hand one clone to an interpreter and inspect the other.
#[derive(Debug, Clone)]
pub struct Board {
    state: Rc<RefCell<BoardState>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        let mut state = BoardState {
            next_handle: 1,
            ..BoardState::default()
        };
        state.elements.insert(
            ElementHandle::BOARD,
            Element {
                kind: ElementKind::Board,
                id: "board".to_string(),
                name: None,
                parents: Vec::new(),
                attributes: BTreeMap::new(),
            },
        );
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Number of elements, the board itself excluded.
    pub fn len(&self) -> usize {
        self.state.borrow().elements.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements redrawn since the last [`Board::take_updates`], in order.
    pub fn take_updates(&self) -> Vec<ElementHandle> {
        std::mem::take(&mut self.state.borrow_mut().updates)
    }

    pub fn id_of(&self, handle: ElementHandle) -> Option<String> {
        self.state
            .borrow()
            .elements
            .get(&handle)
            .map(|element| element.id.clone())
    }

    pub fn name_of(&self, handle: ElementHandle) -> Option<String> {
        self.state
            .borrow()
            .elements
            .get(&handle)
            .and_then(|element| element.name.clone())
    }

    /// Records `handle` and, transitively, every element built on it.
    fn propagate(state: &mut BoardState, handle: ElementHandle) {
        let mut queue = vec![handle];
        let mut seen = Vec::new();
        while let Some(current) = queue.pop() {
            if seen.contains(&current) {
                continue;
            }
            seen.push(current);
            state.updates.push(current);
            for (dependent, element) in &state.elements {
                let depends = element
                    .parents
                    .iter()
                    .any(|parent| parent.as_element() == Some(current));
                if depends {
                    queue.push(*dependent);
                }
            }
        }
    }
}

fn is_pointlike(value: &Value) -> bool {
    match value {
        Value::Element(_) => true,
        Value::Array(items) => items.borrow().len() == 2,
        _ => false,
    }
}

fn is_coordinate(value: &Value) -> bool {
    matches!(value, Value::Number(_) | Value::Function(_))
}

fn invalid(kind: ElementKind, message: impl Into<String>) -> HostError {
    HostError::InvalidParents {
        kind: kind.name(),
        message: message.into(),
    }
}

/// Checks parents and derives the initial attributes of a new element.
fn initial_attributes(
    kind: ElementKind,
    parents: &[Value],
) -> Result<BTreeMap<String, Value>, HostError> {
    let mut attributes = BTreeMap::new();
    match kind {
        ElementKind::Point => {
            let coords: Vec<Value> = match parents {
                [Value::Array(items)] => items.borrow().clone(),
                _ => parents.to_vec(),
            };
            let [x, y] = coords.as_slice() else {
                return Err(invalid(kind, "expected two coordinates"));
            };
            if !is_coordinate(x) || !is_coordinate(y) {
                return Err(invalid(kind, "coordinates must be numbers or functions"));
            }
            attributes.insert("x".to_string(), x.clone());
            attributes.insert("y".to_string(), y.clone());
        }
        ElementKind::Line | ElementKind::Segment => {
            if parents.len() != 2 || !parents.iter().all(is_pointlike) {
                return Err(invalid(kind, "expected two points"));
            }
        }
        ElementKind::Circle => {
            let [center, radius] = parents else {
                return Err(invalid(kind, "expected center and radius"));
            };
            if !is_pointlike(center) {
                return Err(invalid(kind, "center must be a point"));
            }
            if is_coordinate(radius) {
                attributes.insert("radius".to_string(), radius.clone());
            } else if !is_pointlike(radius) {
                return Err(invalid(kind, "radius must be a number, function or point"));
            }
        }
        ElementKind::Polygon => {
            if parents.len() < 3 || !parents.iter().all(is_pointlike) {
                return Err(invalid(kind, "expected at least three points"));
            }
        }
        ElementKind::Text => {
            let [x, y, text] = parents else {
                return Err(invalid(kind, "expected x, y and text"));
            };
            attributes.insert("x".to_string(), x.clone());
            attributes.insert("y".to_string(), y.clone());
            attributes.insert("text".to_string(), text.clone());
        }
        ElementKind::FunctionGraph => {
            let Some(Value::Function(f)) = parents.first() else {
                return Err(invalid(kind, "expected a function"));
            };
            attributes.insert("f".to_string(), Value::Function(f.clone()));
            if let [_, a, b] = parents {
                attributes.insert("a".to_string(), a.clone());
                attributes.insert("b".to_string(), b.clone());
            }
        }
        ElementKind::Group => {
            if !parents.iter().all(|parent| matches!(parent, Value::Element(_))) {
                return Err(invalid(kind, "groups hold elements only"));
            }
        }
        ElementKind::Board => return Err(invalid(kind, "the board cannot be created")),
    }
    Ok(attributes)
}

impl HostRegistry for Board {
    fn select_by_id_or_name(&self, key: &str) -> Option<ElementHandle> {
        let state = self.state.borrow();
        let elements = || {
            state
                .elements
                .iter()
                .filter(|(handle, _)| **handle != ElementHandle::BOARD)
        };
        elements()
            .find(|(_, element)| element.kind != ElementKind::Group && element.id == key)
            .or_else(|| {
                elements().find(|(_, element)| {
                    element.kind != ElementKind::Group && element.name.as_deref() == Some(key)
                })
            })
            .or_else(|| {
                elements().find(|(_, element)| {
                    element.kind == ElementKind::Group
                        && (element.id == key || element.name.as_deref() == Some(key))
                })
            })
            .map(|(handle, _)| *handle)
    }

    fn get_attribute(&self, handle: ElementHandle, name: &str) -> Option<Value> {
        let state = self.state.borrow();
        let element = state.elements.get(&handle)?;
        match name.to_ascii_lowercase().as_str() {
            "id" => Some(Value::from(element.id.as_str())),
            "name" => element.name.as_deref().map(Value::from),
            "elementclass" | "type" => Some(Value::from(element.kind.name())),
            other => element.attributes.get(other).cloned(),
        }
    }

    fn set_attribute(
        &mut self,
        handle: ElementHandle,
        name: &str,
        value: Value,
    ) -> Result<(), HostError> {
        let mut state = self.state.borrow_mut();
        let element = state
            .elements
            .get_mut(&handle)
            .ok_or(HostError::UnknownElement(handle))?;
        match name.to_ascii_lowercase().as_str() {
            "id" | "elementclass" | "type" => return Err(HostError::ReadOnly(name.to_string())),
            "name" => element.name = Some(value.to_string()),
            other => {
                element.attributes.insert(other.to_string(), value);
            }
        }
        Self::propagate(&mut *state, handle);
        Ok(())
    }

    fn create_object(
        &mut self,
        kind: ElementKind,
        parents: Vec<Value>,
        attrs: BTreeMap<String, Value>,
    ) -> Result<ElementHandle, HostError> {
        let mut attributes = initial_attributes(kind, &parents)?;
        let mut state = self.state.borrow_mut();
        for parent in &parents {
            if let Some(handle) = parent.as_element() {
                if !state.elements.contains_key(&handle) {
                    return Err(HostError::UnknownElement(handle));
                }
            }
        }
        let handle = ElementHandle(state.next_handle);
        state.next_handle += 1;
        let mut id = format!("el{}", handle.0);
        let mut name = None;
        for (key, value) in attrs {
            match key.to_ascii_lowercase().as_str() {
                "id" => id = value.to_string(),
                "name" => name = Some(value.to_string()),
                other => {
                    attributes.insert(other.to_string(), value);
                }
            }
        }
        log::debug!("created {} {id}", kind.name());
        state.elements.insert(
            handle,
            Element {
                kind,
                id,
                name,
                parents,
                attributes,
            },
        );
        state.updates.push(handle);
        Ok(handle)
    }

    fn remove_object(&mut self, handle: ElementHandle) -> Result<(), HostError> {
        if handle == ElementHandle::BOARD {
            return Err(HostError::ReadOnly("board".to_string()));
        }
        let mut state = self.state.borrow_mut();
        state
            .elements
            .remove(&handle)
            .map(|_| ())
            .ok_or(HostError::UnknownElement(handle))
    }

    fn element_kind(&self, handle: ElementHandle) -> Option<ElementKind> {
        self.state
            .borrow()
            .elements
            .get(&handle)
            .map(|element| element.kind)
    }

    fn parents(&self, handle: ElementHandle) -> Vec<Value> {
        self.state
            .borrow()
            .elements
            .get(&handle)
            .map(|element| element.parents.clone())
            .unwrap_or_default()
    }
}
