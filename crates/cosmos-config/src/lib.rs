//! Configuration system for the Cosmos sandbox.
//!
//! Provides runtime-configurable settings that persist to disk as RON files.
//! Every section validates its documented ranges before the simulation or
//! planet generator accepts it. Supports CLI overrides via clap and hot-reload
//! detection.

mod cli;
mod config;
mod error;
mod validate;

pub use cli::CliArgs;
pub use config::{
    BodyConfig, Config, DebugConfig, DetonationConfig, NoiseKind, NoiseLayerConfig, PlanetConfig,
    PreviewConfig, SimulationConfig, default_config_dir,
};
pub use error::ConfigError;
