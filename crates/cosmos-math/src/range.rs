//! Closed scalar interval with interpolation.

use serde::{Deserialize, Serialize};

/// A `[min, max]` interval, e.g. the volume or pitch span driven by an engine throttle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Interpolate: `t = 0` gives `min`, `t = 1` gives `max`. `t` is not clamped.
    pub fn lerp(&self, t: f64) -> f64 {
        t * (self.max - self.min) + self.min
    }

    /// Interpolate with `t` clamped to `[0, 1]` first.
    pub fn lerp_clamped(&self, t: f64) -> f64 {
        self.lerp(t.clamp(0.0, 1.0))
    }

    /// `true` if `value` lies within the interval (inclusive).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}
