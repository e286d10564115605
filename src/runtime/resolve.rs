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

//! Identifier resolution.

use crate::builtins::Origin;
use crate::host::ElementKind;
use crate::interp::Interpreter;
use crate::runtime::{Function, Value};

/// Restrictions applied while resolving a name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Skip core/geometry builtins and creators.
    pub math_only: bool,
    /// Never fall back to host element lookup.
    pub local_only: bool,
}

impl ResolveOptions {
    pub fn math_only() -> Self {
        Self {
            math_only: true,
            local_only: true,
        }
    }

    pub fn local_only() -> Self {
        Self {
            math_only: false,
            local_only: true,
        }
    }
}

impl Interpreter {
    /// Resolves `name` to a value.
    ///
    /// Lookup order: scope chain, `$board`/`$this`, core and geometry
    /// builtins, math builtins, creators, then host elements by id, name
    /// and group. Unresolved names yield [`Value::Undefined`].
    pub fn resolve(&self, name: &str, options: ResolveOptions) -> Value {
        if let Some(value) = self.scopes.lookup(name) {
            return value;
        }
        match name {
            "$board" => return Value::Element(self.host.context_handle()),
            "$this" => return self.scopes.bound_context().unwrap_or_default(),
            _ => {}
        }
        if let Some(def) = self.builtins.entry(name) {
            if def.origin == Origin::Math || !options.math_only {
                return def.value();
            }
        }
        if options.math_only {
            return Value::Undefined;
        }
        if let Some(kind) = ElementKind::creator(name) {
            return Value::function(Function::creator(kind));
        }
        if !options.local_only && self.options.resolve_host_objects {
            if let Some(handle) = self.host.select_by_id_or_name(name) {
                return Value::Element(handle);
            }
        }
        log::trace!("'{name}' is unresolved");
        Value::Undefined
    }
}
