//! Layered coherent-noise filters sampled on the unit sphere.
//!
//! Both filters are pure functions of `(point, settings)`: the Perlin basis
//! is seeded once at construction and never mutated afterwards.

use cosmos_math::clamp01;
use glam::DVec3;
use noise::{NoiseFn, Perlin};

use crate::noise_settings::NoiseSettings;

/// A scalar field over 3D space.
pub trait NoiseFilter: Send + Sync {
    /// Evaluate the field at `point` (normally on the unit sphere).
    fn evaluate(&self, point: DVec3) -> f64;

    /// Settings the filter was built from.
    fn settings(&self) -> &NoiseSettings;
}

fn sample(noise: &Perlin, point: DVec3, frequency: f64, center: DVec3) -> f64 {
    let p = point * frequency + center;
    noise.get([p.x, p.y, p.z])
}

/// Smooth fractal noise: octaves of `(noise + 1) / 2`.
pub struct SimpleNoiseFilter {
    noise: Perlin,
    settings: NoiseSettings,
}

impl SimpleNoiseFilter {
    pub fn new(settings: NoiseSettings) -> Self {
        Self {
            noise: Perlin::new(settings.seed),
            settings,
        }
    }
}

impl NoiseFilter for SimpleNoiseFilter {
    fn evaluate(&self, point: DVec3) -> f64 {
        let s = &self.settings;
        let mut value = 0.0;
        let mut frequency = s.base_roughness;
        let mut amplitude = 1.0;

        for _ in 0..s.octaves {
            let n = sample(&self.noise, point, frequency, s.center);
            value += (n + 1.0) * 0.5 * amplitude;
            frequency *= s.roughness;
            amplitude *= s.persistence;
        }

        (value - s.min) * s.strength
    }

    fn settings(&self) -> &NoiseSettings {
        &self.settings
    }
}

/// Ridged noise. Each octave is weighted by the previous one, so detail
/// piles up on peaks while valleys stay flat.
pub struct RigidNoiseFilter {
    noise: Perlin,
    settings: NoiseSettings,
}

impl RigidNoiseFilter {
    pub fn new(settings: NoiseSettings) -> Self {
        Self {
            noise: Perlin::new(settings.seed),
            settings,
        }
    }
}

impl NoiseFilter for RigidNoiseFilter {
    fn evaluate(&self, point: DVec3) -> f64 {
        let s = &self.settings;
        let mut value = 0.0;
        let mut frequency = s.base_roughness;
        let mut amplitude = 1.0;
        let mut weight = 1.0;

        for _ in 0..s.octaves {
            let mut t = 1.0 - sample(&self.noise, point, frequency, s.center).abs();
            t = t * t * weight;
            weight = clamp01(t * s.weight);

            value += (t + 1.0) * 0.5 * amplitude;
            frequency *= s.roughness;
            amplitude *= s.persistence;
        }

        (value - s.min) * s.strength
    }

    fn settings(&self) -> &NoiseSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_settings::FilterKind;

    const EPSILON: f64 = 1e-12;
    // Perlin output may overshoot [-1, 1] slightly.
    const SLACK: f64 = 0.25;

    fn sphere_points(n: usize) -> Vec<DVec3> {
        // Fibonacci lattice.
        let golden = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
        (0..n)
            .map(|i| {
                let y = 1.0 - 2.0 * (i as f64 + 0.5) / n as f64;
                let r = (1.0 - y * y).sqrt();
                let theta = golden * i as f64;
                DVec3::new(r * theta.cos(), y, r * theta.sin())
            })
            .collect()
    }

    fn settings(kind: FilterKind) -> NoiseSettings {
        NoiseSettings {
            kind,
            strength: 1.0,
            min: 0.0,
            octaves: 4,
            roughness: 2.0,
            base_roughness: 1.3,
            persistence: 0.5,
            weight: 0.8,
            seed: 42,
            ..Default::default()
        }
    }

    #[test]
    fn test_determinism_same_settings_same_point() {
        for kind in [FilterKind::Simple, FilterKind::Rigid] {
            let a = settings(kind).build_filter();
            let b = settings(kind).build_filter();
            for p in sphere_points(64) {
                let (va, vb) = (a.evaluate(p), b.evaluate(p));
                assert_eq!(va.to_bits(), vb.to_bits(), "{kind:?} differs at {p}: {va} vs {vb}");
                assert_eq!(va.to_bits(), a.evaluate(p).to_bits());
            }
        }
    }

    #[test]
    fn test_different_seeds_produce_different_fields() {
        let a = settings(FilterKind::Simple).build_filter();
        let b = NoiseSettings {
            seed: 7,
            ..settings(FilterKind::Simple)
        }
        .build_filter();
        let diff: f64 = sphere_points(64)
            .into_iter()
            .map(|p| (a.evaluate(p) - b.evaluate(p)).abs())
            .sum();
        assert!(diff > EPSILON, "seeds 42 and 7 produced identical fields");
    }

    #[test]
    fn test_simple_range() {
        let s = settings(FilterKind::Simple);
        let max = s.amplitude_sum();
        let filter = s.build_filter();
        for p in sphere_points(256) {
            let v = filter.evaluate(p);
            assert!(v >= -SLACK && v <= max + SLACK, "simple value {v} outside [0, {max}]");
        }
    }

    #[test]
    fn test_rigid_range() {
        // Each ridged octave contributes (t + 1) / 2 with t in [0, 1].
        let s = settings(FilterKind::Rigid);
        let max = s.amplitude_sum();
        let filter = s.build_filter();
        for p in sphere_points(256) {
            let v = filter.evaluate(p);
            assert!(
                v >= 0.5 * max - SLACK && v <= max + SLACK,
                "rigid value {v} outside [{}, {max}]",
                0.5 * max
            );
        }
    }

    #[test]
    fn test_zero_strength_is_flat() {
        for kind in [FilterKind::Simple, FilterKind::Rigid] {
            let filter = NoiseSettings {
                strength: 0.0,
                ..settings(kind)
            }
            .build_filter();
            for p in sphere_points(16) {
                assert_eq!(filter.evaluate(p), 0.0);
            }
        }
    }

    #[test]
    fn test_min_shifts_output() {
        let base = settings(FilterKind::Simple);
        let shifted = NoiseSettings {
            min: 0.5,
            strength: 2.0,
            ..base.clone()
        };
        let (a, b) = (
            NoiseSettings { strength: 2.0, ..base }.build_filter(),
            shifted.build_filter(),
        );
        for p in sphere_points(16) {
            assert!((a.evaluate(p) - b.evaluate(p) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_settings_accessor() {
        let s = settings(FilterKind::Rigid);
        let filter = s.build_filter();
        assert_eq!(filter.settings(), &s);
    }
}
