//! Fluid density around a planet.

use cosmos_math::{WATER_DENSITY_KG_M3, remap_clamped};

/// Radial density profile attached to an emitter.
///
/// Below `ocean_radius` the body is submerged. Between `surface_radius` and
/// `outer_radius` air density falls linearly from `sea_level_density` to 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtmosphereProfile {
    pub surface_radius: f64,
    pub ocean_radius: f64,
    pub outer_radius: f64,
    /// kg/m³ at `surface_radius`.
    pub sea_level_density: f64,
}

impl AtmosphereProfile {
    /// Profile for a planet of base `radius` whose lowest terrain sits at
    /// `lowest_surface` meters from the center. `ocean_height` and
    /// `atmosphere_fraction` are fractions of `radius`.
    pub fn for_planet(
        radius: f64,
        lowest_surface: f64,
        ocean_height: f64,
        atmosphere_fraction: f64,
        sea_level_density: f64,
    ) -> Self {
        let ocean_radius = radius * (1.0 + ocean_height);
        Self {
            surface_radius: ocean_radius.max(lowest_surface),
            ocean_radius,
            outer_radius: radius * (1.0 + atmosphere_fraction),
            sea_level_density,
        }
    }

    /// Density in kg/m³ at `distance` from the planet center.
    pub fn density_at(&self, distance: f64) -> f64 {
        if distance > self.outer_radius {
            0.0
        } else if distance < self.ocean_radius {
            WATER_DENSITY_KG_M3
        } else {
            remap_clamped(
                distance,
                self.surface_radius,
                self.outer_radius,
                self.sea_level_density,
                0.0,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> AtmosphereProfile {
        AtmosphereProfile {
            surface_radius: 1_000.0,
            ocean_radius: 990.0,
            outer_radius: 1_100.0,
            sea_level_density: 1.2,
        }
    }

    #[test]
    fn test_space_is_empty() {
        assert_eq!(profile().density_at(1_100.1), 0.0);
        assert_eq!(profile().density_at(1e9), 0.0);
    }

    #[test]
    fn test_underwater_is_water() {
        assert_eq!(profile().density_at(900.0), 997.0);
    }

    #[test]
    fn test_linear_falloff() {
        let p = profile();
        assert!((p.density_at(1_000.0) - 1.2).abs() < 1e-12);
        assert!((p.density_at(1_050.0) - 0.6).abs() < 1e-12);
        assert!(p.density_at(1_100.0).abs() < 1e-12);
        // Between ocean and land the air is at sea-level density.
        assert!((p.density_at(995.0) - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_for_planet() {
        let p = AtmosphereProfile::for_planet(1_000.0, 980.0, 0.0, 0.05, 1.225);
        assert_eq!(p.ocean_radius, 1_000.0);
        assert_eq!(p.surface_radius, 1_000.0);
        assert!((p.outer_radius - 1_050.0).abs() < 1e-9);

        let dry = AtmosphereProfile::for_planet(1_000.0, 1_010.0, -0.5, 0.05, 1.0);
        assert_eq!(dry.surface_radius, 1_010.0);
        assert_eq!(dry.density_at(1_005.0), 1.0);
    }
}
