//! Distance and remapping helpers over `glam::DVec3`.

use glam::DVec3;

/// Squared Euclidean distance between two points.
///
/// Prefer this over [`distance`] for comparisons against a squared
/// threshold; it avoids the square root.
#[inline]
pub fn distance_squared(a: DVec3, b: DVec3) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    dx * dx + dy * dy + dz * dz
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: DVec3, b: DVec3) -> f64 {
    distance_squared(a, b).sqrt()
}

/// Linearly remap `t` from `[old_min, old_max]` to `[new_min, new_max]`.
///
/// Values outside the source range are extrapolated. A degenerate source
/// range (`old_min == old_max`) maps everything to `new_min`.
#[inline]
pub fn remap(t: f64, old_min: f64, old_max: f64, new_min: f64, new_max: f64) -> f64 {
    let span = old_max - old_min;
    if span == 0.0 {
        return new_min;
    }
    (t - old_min) / span * (new_max - new_min) + new_min
}

/// Like [`remap`], but `t` is first clamped into the source range so the
/// result never leaves `[new_min, new_max]`.
#[inline]
pub fn remap_clamped(t: f64, old_min: f64, old_max: f64, new_min: f64, new_max: f64) -> f64 {
    let (lo, hi) = if old_min <= old_max {
        (old_min, old_max)
    } else {
        (old_max, old_min)
    };
    remap(t.clamp(lo, hi), old_min, old_max, new_min, new_max)
}

/// Clamp a value to `[0, 1]`.
#[inline]
pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
