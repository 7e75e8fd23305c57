//! Distance-based detail-level selection.

use cosmos_config::{ConfigError, PlanetConfig};
use cosmos_math::remap;
use glam::DVec3;

/// Maps camera distance to an integer detail level.
///
/// Distance is clamped to `[0, radius * lod_multiplier]` and remapped
/// linearly onto `[min_detail, max_detail]`, so the result never leaves
/// that range. `min_detail` is the finest level.
#[derive(Clone, Debug, PartialEq)]
pub struct LodSelector {
    radius: f64,
    lod_multiplier: f64,
    min_detail: u32,
    max_detail: u32,
}

impl LodSelector {
    pub fn new(
        radius: f64,
        lod_multiplier: f64,
        min_detail: u32,
        max_detail: u32,
    ) -> Result<Self, ConfigError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigError::invalid("planet.radius", "must be finite and > 0"));
        }
        if !(lod_multiplier.is_finite() && lod_multiplier > 0.0) {
            return Err(ConfigError::invalid(
                "planet.lod_multiplier",
                "must be finite and > 0",
            ));
        }
        if min_detail > max_detail {
            return Err(ConfigError::invalid(
                "planet.max_detail",
                "must be >= min_detail",
            ));
        }
        Ok(Self {
            radius,
            lod_multiplier,
            min_detail,
            max_detail,
        })
    }

    pub fn from_config(config: &PlanetConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.radius,
            config.lod_multiplier,
            config.min_detail,
            config.max_detail,
        )
    }

    /// Distance at and beyond which `max_detail` is selected.
    pub fn cutoff_distance(&self) -> f64 {
        self.radius * self.lod_multiplier
    }

    pub fn min_detail(&self) -> u32 {
        self.min_detail
    }

    pub fn max_detail(&self) -> u32 {
        self.max_detail
    }

    /// All detail levels, finest first.
    pub fn levels(&self) -> std::ops::RangeInclusive<u32> {
        self.min_detail..=self.max_detail
    }

    /// Detail level for a camera at `distance` from the planet center.
    ///
    /// The remapped value is rounded to the nearest level. NaN selects
    /// `max_detail`.
    pub fn select(&self, distance: f64) -> u32 {
        let cutoff = self.cutoff_distance();
        if distance.is_nan() {
            return self.max_detail;
        }
        let d = distance.clamp(0.0, cutoff);
        let level = remap(d, 0.0, cutoff, self.min_detail as f64, self.max_detail as f64).round();
        (level as u32).clamp(self.min_detail, self.max_detail)
    }

    /// Detail level for a camera at `camera_pos` looking at a planet at `planet_center`.
    pub fn select_for_camera(&self, camera_pos: DVec3, planet_center: DVec3) -> u32 {
        self.select(camera_pos.distance(planet_center))
    }
}
