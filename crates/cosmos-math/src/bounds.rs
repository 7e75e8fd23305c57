//! Running minimum/maximum tracker.

use serde::{Deserialize, Serialize};

/// Tracks the smallest and largest value seen since the last [`clear`](Self::clear).
///
/// A fresh tracker is empty: `min = +∞`, `max = -∞`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    min: f64,
    max: f64,
}

impl MinMax {
    /// Create an empty tracker.
    pub const fn new() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Fold a value into the bounds. NaN is ignored.
    pub fn add(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Reset to the empty state.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// `true` if no value has been added since construction or the last clear.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Smallest value seen (`+∞` when empty).
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest value seen (`-∞` when empty).
    pub fn max(&self) -> f64 {
        self.max
    }

    /// `max - min`, or `0.0` when empty.
    pub fn range(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max - self.min
        }
    }

    /// Merge another tracker into this one.
    pub fn merge(&mut self, other: &MinMax) {
        if !other.is_empty() {
            self.add(other.min);
            self.add(other.max);
        }
    }
}

impl Default for MinMax {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<f64> for MinMax {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut bounds = MinMax::new();
        for value in iter {
            bounds.add(value);
        }
        bounds
    }
}
