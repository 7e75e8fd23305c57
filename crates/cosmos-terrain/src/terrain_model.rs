//! Layered elevation model for a spherical planet.
//!
//! Layer 0 is evaluated first and its value becomes the mask for later
//! layers with `use_as_mask` set. Filters are instantiated lazily: editing a
//! layer marks the cache dirty and the next evaluation rebuilds it.

use cosmos_config::{ConfigError, PlanetConfig};
use glam::DVec3;

use crate::noise_filter::NoiseFilter;
use crate::noise_settings::NoiseSettings;

/// `radius * (1 + unscaled)`.
///
/// Monotonically increasing in `unscaled` for any positive radius.
#[inline]
pub fn calculate_scaled_elevation(unscaled: f64, radius: f64) -> f64 {
    radius * (1.0 + unscaled)
}

/// One entry of the terrain stack.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseLayer {
    /// Disabled layers keep their settings but contribute nothing.
    pub enabled: bool,
    /// Multiply this layer by the mask from layer 0.
    pub use_as_mask: bool,
    pub settings: NoiseSettings,
}

impl NoiseLayer {
    pub fn new(settings: NoiseSettings) -> Self {
        Self {
            enabled: true,
            use_as_mask: false,
            settings,
        }
    }
}

/// Ordered noise layers plus the planet radius.
pub struct TerrainModel {
    radius: f64,
    layers: Vec<NoiseLayer>,
    filters: Vec<Box<dyn NoiseFilter>>,
    dirty: bool,
}

impl std::fmt::Debug for TerrainModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerrainModel")
            .field("radius", &self.radius)
            .field("layers", &self.layers)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl TerrainModel {
    /// Create a model. The radius must be finite and positive.
    pub fn new(radius: f64, layers: Vec<NoiseLayer>) -> Result<Self, ConfigError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigError::invalid("planet.radius", "must be finite and > 0"));
        }
        Ok(Self {
            radius,
            layers,
            filters: Vec::new(),
            dirty: true,
        })
    }

    /// Build from a planet config section, validating it first.
    pub fn from_config(config: &PlanetConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let layers = config
            .layers
            .iter()
            .map(|layer| NoiseLayer {
                enabled: layer.enabled,
                use_as_mask: layer.use_as_mask,
                settings: NoiseSettings::from_config(layer),
            })
            .collect();
        Self::new(config.radius, layers)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn layers(&self) -> &[NoiseLayer] {
        &self.layers
    }

    /// `true` when the next evaluation will rebuild the filters.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mutable access to a layer. Marks the filter cache dirty.
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut NoiseLayer> {
        let layer = self.layers.get_mut(index)?;
        self.dirty = true;
        Some(layer)
    }

    /// Append a layer. Marks the filter cache dirty.
    pub fn push_layer(&mut self, layer: NoiseLayer) {
        self.layers.push(layer);
        self.dirty = true;
    }

    /// Replace the whole stack. Marks the filter cache dirty.
    pub fn set_layers(&mut self, layers: Vec<NoiseLayer>) {
        self.layers = layers;
        self.dirty = true;
    }

    pub fn set_radius(&mut self, radius: f64) -> Result<(), ConfigError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigError::invalid("planet.radius", "must be finite and > 0"));
        }
        self.radius = radius;
        Ok(())
    }

    /// Force the next evaluation to rebuild every filter.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Rebuild filters if any layer changed since the last build.
    pub fn refresh_filters(&mut self) {
        if !self.dirty {
            return;
        }
        self.filters = self
            .layers
            .iter()
            .map(|layer| layer.settings.build_filter())
            .collect();
        self.dirty = false;
        tracing::debug!(layers = self.filters.len(), "rebuilt terrain noise filters");
    }

    /// Refresh the filter cache and borrow an evaluator for bulk sampling.
    pub fn sampler(&mut self) -> ElevationSampler<'_> {
        self.refresh_filters();
        ElevationSampler {
            radius: self.radius,
            layers: &self.layers,
            filters: &self.filters,
        }
    }

    /// Unscaled elevation at a unit-sphere point.
    pub fn calculate_unscaled_elevation(&mut self, point: DVec3) -> f64 {
        self.sampler().unscaled(point)
    }

    /// `radius * (1 + unscaled)` using this model's radius.
    pub fn calculate_scaled_elevation(&self, unscaled: f64) -> f64 {
        calculate_scaled_elevation(unscaled, self.radius)
    }
}

/// Read-only view over a [`TerrainModel`] with an up-to-date filter cache.
pub struct ElevationSampler<'a> {
    radius: f64,
    layers: &'a [NoiseLayer],
    filters: &'a [Box<dyn NoiseFilter>],
}

impl ElevationSampler<'_> {
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Layer 0 value if it is enabled, `0.0` when hidden or absent.
    pub fn mask(&self, point: DVec3) -> f64 {
        match (self.layers.first(), self.filters.first()) {
            (Some(layer), Some(filter)) if layer.enabled => filter.evaluate(point),
            _ => 0.0,
        }
    }

    /// Unscaled elevation at a unit-sphere point.
    pub fn unscaled(&self, point: DVec3) -> f64 {
        let mask = self.mask(point);
        let mut elevation = mask;

        for (layer, filter) in self.layers.iter().zip(self.filters).skip(1) {
            if !layer.enabled {
                continue;
            }
            let factor = if layer.use_as_mask { mask } else { 1.0 };
            elevation += filter.evaluate(point) * factor;
        }

        elevation
    }

    /// Scaled elevation (distance from the planet center).
    pub fn scaled(&self, unscaled: f64) -> f64 {
        calculate_scaled_elevation(unscaled, self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_settings::FilterKind;

    const EPSILON: f64 = 1e-12;

    fn layer(seed: u32, kind: FilterKind, strength: f64) -> NoiseLayer {
        NoiseLayer::new(NoiseSettings {
            kind,
            strength,
            seed,
            octaves: 3,
            ..Default::default()
        })
    }

    fn points() -> Vec<DVec3> {
        vec![
            DVec3::X,
            DVec3::NEG_Y,
            DVec3::new(0.3, 0.4, 0.866).normalize(),
            DVec3::new(-0.7, 0.1, -0.2).normalize(),
        ]
    }

    #[test]
    fn test_no_layers_is_zero() {
        let mut model = TerrainModel::new(10.0, Vec::new()).unwrap();
        for p in points() {
            assert_eq!(model.calculate_unscaled_elevation(p), 0.0);
        }
    }

    #[test]
    fn test_invalid_radius_rejected() {
        assert!(TerrainModel::new(0.0, Vec::new()).is_err());
        assert!(TerrainModel::new(-3.0, Vec::new()).is_err());
        assert!(TerrainModel::new(f64::NAN, Vec::new()).is_err());
    }

    #[test]
    fn test_single_layer_equals_filter() {
        let l = layer(3, FilterKind::Simple, 0.5);
        let filter = l.settings.build_filter();
        let mut model = TerrainModel::new(1.0, vec![l]).unwrap();
        for p in points() {
            assert_eq!(model.calculate_unscaled_elevation(p), filter.evaluate(p));
        }
    }

    #[test]
    fn test_unmasked_layers_sum() {
        let a = layer(1, FilterKind::Simple, 0.2);
        let b = layer(2, FilterKind::Rigid, 0.7);
        let (fa, fb) = (a.settings.build_filter(), b.settings.build_filter());
        let mut model = TerrainModel::new(1.0, vec![a, b]).unwrap();
        for p in points() {
            let expected = fa.evaluate(p) + fb.evaluate(p);
            assert!((model.calculate_unscaled_elevation(p) - expected).abs() < EPSILON);
        }
    }

    #[test]
    fn test_masked_layer_multiplied_by_first() {
        let a = layer(1, FilterKind::Simple, 0.2);
        let mut b = layer(2, FilterKind::Rigid, 0.7);
        b.use_as_mask = true;
        let (fa, fb) = (a.settings.build_filter(), b.settings.build_filter());
        let mut model = TerrainModel::new(1.0, vec![a, b]).unwrap();
        for p in points() {
            let mask = fa.evaluate(p);
            let expected = mask + fb.evaluate(p) * mask;
            assert!((model.calculate_unscaled_elevation(p) - expected).abs() < EPSILON);
        }
    }

    #[test]
    fn test_hidden_first_layer_zeroes_mask() {
        let mut a = layer(1, FilterKind::Simple, 0.2);
        a.enabled = false;
        let mut masked = layer(2, FilterKind::Rigid, 0.7);
        masked.use_as_mask = true;
        let free = layer(3, FilterKind::Simple, 0.1);
        let f_free = free.settings.build_filter();
        let mut model = TerrainModel::new(1.0, vec![a, masked, free]).unwrap();
        for p in points() {
            assert!((model.calculate_unscaled_elevation(p) - f_free.evaluate(p)).abs() < EPSILON);
        }
    }

    #[test]
    fn test_disabled_layer_contributes_nothing() {
        let a = layer(1, FilterKind::Simple, 0.2);
        let mut b = layer(2, FilterKind::Simple, 5.0);
        b.enabled = false;
        let fa = a.settings.build_filter();
        let mut model = TerrainModel::new(1.0, vec![a, b]).unwrap();
        for p in points() {
            assert_eq!(model.calculate_unscaled_elevation(p), fa.evaluate(p));
        }
    }

    #[test]
    fn test_editing_layer_invalidates_cache() {
        let mut model = TerrainModel::new(1.0, vec![layer(1, FilterKind::Simple, 0.2)]).unwrap();
        let p = points()[2];
        let before = model.calculate_unscaled_elevation(p);
        assert!(!model.is_dirty());

        model.layer_mut(0).unwrap().settings.strength = 0.4;
        assert!(model.is_dirty());
        let after = model.calculate_unscaled_elevation(p);
        assert!((after - 2.0 * before).abs() < 1e-9, "{after} vs 2 * {before}");
    }

    #[test]
    fn test_layer_mut_out_of_range_keeps_cache() {
        let mut model = TerrainModel::new(1.0, vec![layer(1, FilterKind::Simple, 0.2)]).unwrap();
        model.refresh_filters();
        assert!(model.layer_mut(5).is_none());
        assert!(!model.is_dirty());
    }

    #[test]
    fn test_scaled_elevation_round_trip_is_deterministic() {
        let mut model = TerrainModel::new(
            6_371_000.0,
            vec![layer(1, FilterKind::Simple, 0.02), layer(5, FilterKind::Rigid, 0.01)],
        )
        .unwrap();
        for p in points() {
            let first = model.calculate_unscaled_elevation(p);
            let a = model.calculate_scaled_elevation(first);
            let second = model.calculate_unscaled_elevation(p);
            let b = model.calculate_scaled_elevation(second);
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_scaled_elevation_monotonic() {
        let r = 42.0;
        let mut prev = f64::NEG_INFINITY;
        for i in -10..=10 {
            let s = calculate_scaled_elevation(i as f64 * 0.1, r);
            assert!(s > prev);
            prev = s;
        }
        assert_eq!(calculate_scaled_elevation(0.0, r), r);
    }

    #[test]
    fn test_from_config_default() {
        let config = PlanetConfig::default();
        let model = TerrainModel::from_config(&config).unwrap();
        assert_eq!(model.layers().len(), config.layers.len());
        assert!(model.layers()[1].use_as_mask);
        assert_eq!(model.radius(), config.radius);
    }

    #[test]
    fn test_from_config_rejects_bad_octaves() {
        let mut config = PlanetConfig::default();
        config.layers[0].octaves = 0;
        assert!(TerrainModel::from_config(&config).is_err());
    }
}
