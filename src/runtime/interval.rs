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

//! Closed numeric intervals for range-safe arithmetic.
//!
//! Results are optionally widened by one representable step on each side so
//! rounding can never shrink an enclosure.

/// Closed interval `[lo, hi]` with `lo <= hi`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
}

impl Interval {
    /// Creates an interval, swapping bounds given in reverse order.
    pub fn new(lo: f64, hi: f64) -> Self {
        if lo <= hi {
            Self { lo, hi }
        } else {
            Self { lo: hi, hi: lo }
        }
    }

    /// Degenerate interval `[v, v]`.
    pub fn point(v: f64) -> Self {
        Self { lo: v, hi: v }
    }

    /// The whole real line.
    pub fn entire() -> Self {
        Self {
            lo: f64::NEG_INFINITY,
            hi: f64::INFINITY,
        }
    }

    pub fn contains(&self, v: f64) -> bool {
        self.lo <= v && v <= self.hi
    }

    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    pub fn add(self, other: Self, outward: bool) -> Self {
        widen(self.lo + other.lo, self.hi + other.hi, outward)
    }

    pub fn sub(self, other: Self, outward: bool) -> Self {
        widen(self.lo - other.hi, self.hi - other.lo, outward)
    }

    pub fn mul(self, other: Self, outward: bool) -> Self {
        let products = [
            self.lo * other.lo,
            self.lo * other.hi,
            self.hi * other.lo,
            self.hi * other.hi,
        ];
        let (lo, hi) = min_max(&products);
        widen(lo, hi, outward)
    }

    pub fn div(self, other: Self, outward: bool) -> Self {
        // Division by an interval straddling zero is unbounded.
        if other.contains(0.0) {
            return Self::entire();
        }
        self.mul(
            Self::new(1.0 / other.hi, 1.0 / other.lo),
            outward,
        )
    }

    pub fn neg(self) -> Self {
        Self {
            lo: -self.hi,
            hi: -self.lo,
        }
    }

    /// Integer power with exact sign handling for even exponents.
    pub fn powi(self, n: i32, outward: bool) -> Self {
        if n == 0 {
            return Self::point(1.0);
        }
        if n < 0 {
            return Self::point(1.0).div(self.powi(-n, outward), outward);
        }
        let a = self.lo.powi(n);
        let b = self.hi.powi(n);
        if n % 2 == 1 {
            return widen(a, b, outward);
        }
        if self.contains(0.0) {
            widen(0.0, a.max(b), outward)
        } else {
            widen(a.min(b), a.max(b), outward)
        }
    }

    /// Applies a monotonically increasing function to both bounds.
    pub fn map_increasing(self, f: impl Fn(f64) -> f64, outward: bool) -> Self {
        widen(f(self.lo), f(self.hi), outward)
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        })
}

fn widen(lo: f64, hi: f64, outward: bool) -> Interval {
    if outward {
        Interval::new(next_down(lo), next_up(hi))
    } else {
        Interval::new(lo, hi)
    }
}

/// Smallest representable value greater than `x`.
pub fn next_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// Largest representable value smaller than `x`.
pub fn next_down(x: f64) -> f64 {
    -next_up(-x)
}
