//! Parameters for one noise layer.

use cosmos_config::{NoiseKind, NoiseLayerConfig};
use glam::DVec3;

use crate::noise_filter::{NoiseFilter, RigidNoiseFilter, SimpleNoiseFilter};

/// Which filter a [`NoiseSettings`] instantiates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FilterKind {
    #[default]
    Simple,
    Rigid,
}

impl From<NoiseKind> for FilterKind {
    fn from(kind: NoiseKind) -> Self {
        match kind {
            NoiseKind::Simple => FilterKind::Simple,
            NoiseKind::Rigid => FilterKind::Rigid,
        }
    }
}

/// Immutable inputs of a noise filter.
///
/// Octave `i` samples at frequency `base_roughness * roughness^i` with
/// amplitude `persistence^i`. The accumulated value is shifted by `min` and
/// scaled by `strength`.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseSettings {
    pub kind: FilterKind,
    pub strength: f64,
    /// Lacunarity.
    pub roughness: f64,
    pub center: DVec3,
    pub min: f64,
    /// Octave count, `1..=8`.
    pub octaves: u32,
    pub base_roughness: f64,
    pub persistence: f64,
    /// Ridge weight factor, rigid filters only.
    pub weight: f64,
    pub seed: u32,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self::from_config(&NoiseLayerConfig::default())
    }
}

impl NoiseSettings {
    /// Copy the noise parameters out of a (validated) layer config.
    pub fn from_config(config: &NoiseLayerConfig) -> Self {
        Self {
            kind: config.kind.into(),
            strength: config.strength,
            roughness: config.roughness,
            center: DVec3::from_array(config.center),
            min: config.min,
            octaves: config.octaves,
            base_roughness: config.base_roughness,
            persistence: config.persistence,
            weight: config.weight,
            seed: config.seed,
        }
    }

    /// Instantiate the filter for these settings.
    pub fn build_filter(&self) -> Box<dyn NoiseFilter> {
        match self.kind {
            FilterKind::Simple => Box::new(SimpleNoiseFilter::new(self.clone())),
            FilterKind::Rigid => Box::new(RigidNoiseFilter::new(self.clone())),
        }
    }

    /// Sum of all octave amplitudes, the upper bound of the raw accumulator.
    pub fn amplitude_sum(&self) -> f64 {
        let mut sum = 0.0;
        let mut amplitude = 1.0;
        for _ in 0..self.octaves {
            sum += amplitude;
            amplitude *= self.persistence;
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_copies_fields() {
        let config = NoiseLayerConfig {
            kind: NoiseKind::Rigid,
            strength: 0.3,
            center: [1.0, 2.0, 3.0],
            octaves: 4,
            seed: 9,
            ..Default::default()
        };
        let settings = NoiseSettings::from_config(&config);
        assert_eq!(settings.kind, FilterKind::Rigid);
        assert_eq!(settings.strength, 0.3);
        assert_eq!(settings.center, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(settings.octaves, 4);
        assert_eq!(settings.seed, 9);
    }

    #[test]
    fn test_amplitude_sum_geometric() {
        let settings = NoiseSettings {
            octaves: 3,
            persistence: 0.5,
            ..Default::default()
        };
        assert!((settings.amplitude_sum() - 1.75).abs() < 1e-12);
    }
}
