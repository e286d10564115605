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

//! Arena of lexical scopes.
//!
//! Closures store a [`ScopeId`] instead of a reference, so a scope stays
//! addressable for as long as any closure captured it. Call scopes nobody
//! captured are released on return and their slots reused. Captured scopes
//! are reclaimed by [`ScopeArena::collect`] once no reachable closure refers
//! to them.

use crate::runtime::value::{Function, Value};
use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};

/// Index of a scope inside a [`ScopeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(usize);

impl ScopeId {
    /// The root scope, alive for the interpreter's lifetime.
    pub const ROOT: ScopeId = ScopeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// One environment frame.
#[derive(Debug)]
pub struct Scope {
    pub id: ScopeId,
    /// Parameter names bound when the scope was created.
    pub params: Vec<String>,
    pub locals: HashMap<String, Value>,
    pub parent: Option<ScopeId>,
    /// Value `$this` refers to inside a method call.
    pub context: Option<Value>,
    captured: bool,
    /// Cleared once the call that created the scope has returned.
    open: bool,
}

/// Owner of every scope of one interpreter.
#[derive(Debug)]
pub struct ScopeArena {
    slots: Vec<Option<Scope>>,
    free: Vec<usize>,
    current: ScopeId,
    /// Closures over non-root scopes, for [`ScopeArena::collect`].
    closures: Vec<Weak<Function>>,
}

impl Default for ScopeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeArena {
    pub fn new() -> Self {
        let root = Scope {
            id: ScopeId::ROOT,
            params: Vec::new(),
            locals: HashMap::new(),
            parent: None,
            context: None,
            captured: true,
            open: true,
        };
        Self {
            slots: vec![Some(root)],
            free: Vec::new(),
            current: ScopeId::ROOT,
            closures: Vec::new(),
        }
    }

    pub fn current(&self) -> ScopeId {
        self.current
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: ScopeId) -> Option<&mut Scope> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Number of live scopes, root included.
    pub fn live(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Allocates a scope below `parent` without activating it.
    pub fn create(&mut self, params: Vec<String>, parent: ScopeId) -> ScopeId {
        let index = self.free.pop().unwrap_or(self.slots.len());
        let id = ScopeId(index);
        let scope = Scope {
            id,
            params,
            locals: HashMap::new(),
            parent: Some(parent),
            context: None,
            captured: false,
            open: true,
        };
        if index == self.slots.len() {
            self.slots.push(Some(scope));
        } else {
            self.slots[index] = Some(scope);
        }
        log::trace!("scope {index} created under {}", parent.0);
        id
    }

    /// Creates a child of the current scope and makes it current.
    pub fn push_scope(&mut self, params: Vec<String>) -> ScopeId {
        let id = self.create(params, self.current);
        self.current = id;
        id
    }

    /// Leaves the current scope, returning to its parent.
    pub fn pop_scope(&mut self) -> ScopeId {
        let parent = self
            .get(self.current)
            .and_then(|scope| scope.parent)
            .unwrap_or(ScopeId::ROOT);
        let left = self.current;
        self.current = parent;
        self.release(left);
        parent
    }

    /// Makes `id` current and returns the previously current scope.
    pub fn activate(&mut self, id: ScopeId) -> ScopeId {
        std::mem::replace(&mut self.current, id)
    }

    /// Reinstalls a scope returned by [`ScopeArena::activate`].
    pub fn restore(&mut self, previous: ScopeId) {
        self.current = previous;
    }

    pub fn set_context(&mut self, id: ScopeId, context: Value) {
        if let Some(scope) = self.get_mut(id) {
            scope.context = Some(context);
        }
    }

    /// Binds `name` in the current scope.
    pub fn let_local(&mut self, name: &str, value: Value) {
        let current = self.current;
        self.define(current, name, value);
    }

    /// Binds `name` in the given scope.
    pub fn define(&mut self, id: ScopeId, name: &str, value: Value) {
        if let Some(scope) = self.get_mut(id) {
            scope.locals.insert(name.to_string(), value);
        }
    }

    fn chain(&self) -> impl Iterator<Item = &Scope> {
        let mut cursor = Some(self.current);
        std::iter::from_fn(move || {
            let scope = self.get(cursor?)?;
            cursor = scope.parent;
            Some(scope)
        })
    }

    /// Returns whether `id` is the current scope or one of its ancestors.
    pub fn on_chain(&self, id: ScopeId) -> bool {
        self.chain().any(|scope| scope.id == id)
    }

    /// Nearest scope on the chain binding `name`.
    pub fn is_local(&self, name: &str) -> Option<ScopeId> {
        self.chain()
            .find(|scope| scope.locals.contains_key(name))
            .map(|scope| scope.id)
    }

    /// Nearest scope on the chain declaring `name` as a parameter.
    pub fn is_parameter(&self, name: &str) -> Option<ScopeId> {
        self.chain()
            .find(|scope| scope.params.iter().any(|param| param == name))
            .map(|scope| scope.id)
    }

    /// Value of the nearest binding of `name`.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.chain().find_map(|scope| scope.locals.get(name).cloned())
    }

    /// Value of `name` bound directly in the root scope.
    pub fn global(&self, name: &str) -> Option<Value> {
        self.get(ScopeId::ROOT)
            .and_then(|scope| scope.locals.get(name).cloned())
    }

    /// Every binding visible from the current scope, inner bindings hiding
    /// outer ones.
    pub fn visible_bindings(&self) -> Vec<(String, Value)> {
        let mut seen = HashSet::new();
        let mut bindings = Vec::new();
        for scope in self.chain() {
            for (name, value) in &scope.locals {
                if seen.insert(name.as_str()) {
                    bindings.push((name.clone(), value.clone()));
                }
            }
        }
        bindings
    }

    /// Context of the nearest scope that has one.
    pub fn bound_context(&self) -> Option<Value> {
        self.chain().find_map(|scope| scope.context.clone())
    }

    /// Marks `id` and its ancestors as referenced by a closure.
    pub fn capture(&mut self, id: ScopeId) {
        let mut cursor = Some(id);
        while let Some(next) = cursor {
            let Some(scope) = self.get_mut(next) else {
                break;
            };
            if scope.captured {
                break;
            }
            scope.captured = true;
            cursor = scope.parent;
        }
    }

    /// Captures the defining scope of a script function and remembers the
    /// function so [`ScopeArena::collect`] can tell whether it is still held.
    pub fn track(&mut self, function: &Rc<Function>) {
        let Some(closure) = function.closure() else {
            return;
        };
        self.capture(closure.scope);
        if closure.scope != ScopeId::ROOT {
            self.closures.push(Rc::downgrade(function));
        }
    }

    /// Closes a scope. Uncaptured scopes are freed at once; captured ones
    /// trigger a collection.
    pub fn release(&mut self, id: ScopeId) {
        if id == ScopeId::ROOT || id == self.current {
            return;
        }
        let Some(scope) = self.get_mut(id) else {
            return;
        };
        scope.open = false;
        if scope.captured {
            self.collect();
        } else {
            self.free_slot(id.0);
        }
    }

    fn free_slot(&mut self, index: usize) {
        self.slots[index] = None;
        self.free.push(index);
        log::trace!("scope {index} released");
    }

    /// Frees every closed scope that no reachable closure refers to.
    ///
    /// Values held outside the arena are found by comparing each shared
    /// allocation's strong count with the references the arena itself
    /// holds. Anything with a surplus is treated as held by the host.
    pub fn collect(&mut self) {
        self.closures.retain(|weak| weak.strong_count() > 0);

        let mut heap = HeapGraph::default();
        for scope in self.slots.iter().flatten() {
            for value in scope.locals.values().chain(scope.context.iter()) {
                heap.visit(value);
            }
        }

        let mut scopes: Vec<ScopeId> = self
            .slots
            .iter()
            .flatten()
            .filter(|scope| scope.open)
            .map(|scope| scope.id)
            .collect();
        for weak in &self.closures {
            let Some(function) = weak.upgrade() else {
                continue;
            };
            if !heap.nodes.contains_key(&address(&function)) {
                if let Some(closure) = function.closure() {
                    scopes.push(closure.scope);
                }
            }
        }
        let mut nodes: Vec<usize> = heap
            .nodes
            .iter()
            .filter(|(_, node)| node.pinned || node.strong > node.internal)
            .map(|(key, _)| *key)
            .collect();

        let mut marked = HashSet::new();
        let mut reached = HashSet::new();
        loop {
            if let Some(key) = nodes.pop() {
                if reached.insert(key) {
                    if let Some(node) = heap.nodes.get(&key) {
                        nodes.extend(node.children.iter().copied());
                        scopes.extend(node.scope);
                    }
                }
            } else if let Some(id) = scopes.pop() {
                if !marked.insert(id) {
                    continue;
                }
                let Some(scope) = self.get(id) else {
                    continue;
                };
                scopes.extend(scope.parent);
                for value in scope.locals.values().chain(scope.context.iter()) {
                    nodes.extend(HeapGraph::key(value));
                }
            } else {
                break;
            }
        }

        let dead: Vec<usize> = self
            .slots
            .iter()
            .flatten()
            .filter(|scope| !scope.open && !marked.contains(&scope.id))
            .map(|scope| scope.id.0)
            .collect();
        for index in dead {
            self.free_slot(index);
        }
    }
}

fn address<T: ?Sized>(rc: &Rc<T>) -> usize {
    Rc::as_ptr(rc) as *const () as usize
}

/// Shared allocation seen while walking the values the arena holds.
#[derive(Debug, Default)]
struct HeapNode {
    strong: usize,
    /// References found inside the arena.
    internal: usize,
    /// Contents could not be borrowed, so the node is kept.
    pinned: bool,
    children: Vec<usize>,
    scope: Option<ScopeId>,
}

#[derive(Debug, Default)]
struct HeapGraph {
    nodes: HashMap<usize, HeapNode>,
}

impl HeapGraph {
    fn key(value: &Value) -> Option<usize> {
        match value {
            Value::Array(items) => Some(address(items)),
            Value::Object(fields) => Some(address(fields)),
            Value::Function(function) => Some(address(function)),
            _ => None,
        }
    }

    fn visit(&mut self, value: &Value) -> Option<usize> {
        let (key, strong) = match value {
            Value::Array(items) => (address(items), Rc::strong_count(items)),
            Value::Object(fields) => (address(fields), Rc::strong_count(fields)),
            Value::Function(function) => (address(function), Rc::strong_count(function)),
            _ => return None,
        };
        if let Some(node) = self.nodes.get_mut(&key) {
            node.internal += 1;
            return Some(key);
        }
        self.nodes.insert(
            key,
            HeapNode {
                strong,
                internal: 1,
                ..HeapNode::default()
            },
        );

        let mut children = Vec::new();
        let mut pinned = false;
        let mut scope = None;
        match value {
            Value::Array(items) => match items.try_borrow() {
                Ok(items) => {
                    for item in items.iter() {
                        children.extend(self.visit(item));
                    }
                }
                Err(_) => pinned = true,
            },
            Value::Object(fields) => match fields.try_borrow() {
                Ok(fields) => {
                    for field in fields.values() {
                        children.extend(self.visit(field));
                    }
                }
                Err(_) => pinned = true,
            },
            Value::Function(function) => scope = function.closure().map(|closure| closure.scope),
            _ => {}
        }
        if let Some(node) = self.nodes.get_mut(&key) {
            node.children = children;
            node.pinned = pinned;
            node.scope = scope;
        }
        Some(key)
    }
}
