//! Range checks for every configuration section.

use crate::config::{
    BodyConfig, Config, NoiseLayerConfig, PlanetConfig, PreviewConfig, SimulationConfig,
};
use crate::error::ConfigError;

fn ensure(ok: bool, field: impl FnOnce() -> String, reason: &str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::invalid(field(), reason))
    }
}

fn positive(value: f64, field: &str) -> Result<(), ConfigError> {
    ensure(value.is_finite() && value > 0.0, || field.to_string(), "must be finite and > 0")
}

fn non_negative(value: f64, field: &str) -> Result<(), ConfigError> {
    ensure(value.is_finite() && value >= 0.0, || field.to_string(), "must be finite and >= 0")
}

impl Config {
    /// Check every section against its documented ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        self.preview.validate()?;
        self.planet.validate()?;
        for (i, body) in self.bodies.iter().enumerate() {
            body.validate(i)?;
            ensure(
                self.bodies[..i].iter().all(|b| b.name != body.name),
                || format!("bodies[{i}].name"),
                "must be unique",
            )?;
        }
        if let Some(ref reference) = self.preview.reference {
            ensure(
                self.body(reference).is_some(),
                || "preview.reference".to_string(),
                "must name a configured body",
            )?;
        }
        Ok(())
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive(self.fixed_dt, "simulation.fixed_dt")?;
        non_negative(self.time_scale, "simulation.time_scale")?;
        non_negative(self.low_mass_warning, "simulation.low_mass_warning")
    }
}

impl PreviewConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.steps >= 1, || "preview.steps".to_string(), "must be >= 1")?;
        positive(self.time_step, "preview.time_step")?;
        non_negative(self.update_interval, "preview.update_interval")?;
        non_negative(self.closure_radius, "preview.closure_radius")
    }
}

impl NoiseLayerConfig {
    pub fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let field = |name: &str| format!("planet.layers[{index}].{name}");
        ensure(
            (1..=8).contains(&self.octaves),
            || field("octaves"),
            "must be in 1..=8",
        )?;
        ensure(
            (0.0..=1.0).contains(&self.persistence),
            || field("persistence"),
            "must be in [0, 1]",
        )?;
        non_negative(self.strength, &field("strength"))?;
        non_negative(self.roughness, &field("roughness"))?;
        non_negative(self.base_roughness, &field("base_roughness"))?;
        non_negative(self.weight, &field("weight"))?;
        ensure(
            self.min.is_finite() && self.center.iter().all(|c| c.is_finite()),
            || field("center"),
            "must be finite",
        )
    }
}

impl PlanetConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive(self.radius, "planet.radius")?;
        ensure(
            self.min_detail <= self.max_detail,
            || "planet.max_detail".to_string(),
            "must be >= min_detail",
        )?;
        ensure(
            self.max_detail - self.min_detail <= self.max_recursion,
            || "planet.max_detail".to_string(),
            "detail span must not exceed max_recursion",
        )?;
        ensure(
            self.max_recursion <= 8,
            || "planet.max_recursion".to_string(),
            "must be <= 8",
        )?;
        positive(self.lod_multiplier, "planet.lod_multiplier")?;
        ensure(
            self.chunk_count >= 1,
            || "planet.chunk_count".to_string(),
            "must be >= 1",
        )?;
        ensure(
            (2..=1024).contains(&self.resolution),
            || "planet.resolution".to_string(),
            "must be in 2..=1024",
        )?;
        ensure(
            (0.0..=1.0).contains(&self.atmosphere_fraction),
            || "planet.atmosphere_fraction".to_string(),
            "must be in [0, 1]",
        )?;
        non_negative(self.atmosphere_density, "planet.atmosphere_density")?;
        for (i, layer) in self.layers.iter().enumerate() {
            layer.validate(i)?;
        }
        Ok(())
    }
}

impl BodyConfig {
    pub fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let field = |name: &str| format!("bodies[{index}].{name}");
        ensure(!self.name.is_empty(), || field("name"), "must not be empty")?;
        non_negative(self.mass, &field("mass"))?;
        ensure(
            self.position.iter().chain(&self.velocity).all(|c| c.is_finite()),
            || field("position"),
            "position and velocity must be finite",
        )?;
        if let Some(radius) = self.radius {
            positive(radius, &field("radius"))?;
        }
        if let Some(lifetime) = self.lifetime {
            positive(lifetime, &field("lifetime"))?;
        }
        if let Some(ref det) = self.detonation {
            positive(det.radius, &field("detonation.radius"))?;
            non_negative(det.push, &field("detonation.push"))?;
        }
        Ok(())
    }
}
