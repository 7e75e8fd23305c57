//! Procedural terrain elevation for spherical planets.
//!
//! A [`TerrainModel`] owns an ordered stack of noise layers. Each layer is a
//! [`NoiseSettings`] that instantiates a [`NoiseFilter`] (simple fBm or rigid
//! ridged noise) evaluated on unit-sphere points. The first layer doubles as
//! a mask for later layers that opt in.

pub mod noise_filter;
pub mod noise_settings;
pub mod terrain_model;

pub use noise_filter::{NoiseFilter, RigidNoiseFilter, SimpleNoiseFilter};
pub use noise_settings::{FilterKind, NoiseSettings};
pub use terrain_model::{ElevationSampler, NoiseLayer, TerrainModel, calculate_scaled_elevation};
