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

//! Interpreter configuration.

use serde::{Deserialize, Serialize};

/// Default tolerance of the `~=` operator.
pub const DEFAULT_APPROX_TOLERANCE: f64 = 1e-6;

/// Tunables shared by the expander, evaluator and compiler.
///
/// Missing fields fall back to [`Options::default`] when deserialized, so a
/// host can ship a partial JSON/TOML configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Absolute tolerance used by `~=`.
    pub approx_tolerance: f64,
    /// Run algebraic simplification over whole scripts (derivatives are
    /// always simplified).
    pub simplify: bool,
    /// Expand `D(...)` calls before evaluation.
    pub expand_derivatives: bool,
    /// Widen interval results by one ulp in each direction.
    pub outward_rounding: bool,
    /// Record/log a warning for deprecated keywords.
    pub warn_deprecated: bool,
    /// Let unresolved identifiers fall back to host element lookup.
    pub resolve_host_objects: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            approx_tolerance: DEFAULT_APPROX_TOLERANCE,
            simplify: true,
            expand_derivatives: true,
            outward_rounding: true,
            warn_deprecated: true,
            resolve_host_objects: true,
        }
    }
}

impl Options {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_approx_tolerance(mut self, tolerance: f64) -> Self {
        self.approx_tolerance = tolerance;
        self
    }

    pub fn with_simplify(mut self, simplify: bool) -> Self {
        self.simplify = simplify;
        self
    }

    pub fn with_derivative_expansion(mut self, expand: bool) -> Self {
        self.expand_derivatives = expand;
        self
    }

    pub fn with_outward_rounding(mut self, outward: bool) -> Self {
        self.outward_rounding = outward;
        self
    }

    pub fn with_deprecation_warnings(mut self, warn: bool) -> Self {
        self.warn_deprecated = warn;
        self
    }

    pub fn with_host_resolution(mut self, resolve: bool) -> Self {
        self.resolve_host_objects = resolve;
        self
    }
}
