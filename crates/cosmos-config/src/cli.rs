//! Command-line argument parsing for the Cosmos sandbox.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Cosmos sandbox command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "cosmos", about = "N-body gravity sandbox with procedural planets")]
pub struct CliArgs {
    /// Number of fixed ticks to simulate.
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Simulation time multiplier.
    #[arg(long)]
    pub time_scale: Option<f64>,

    /// Maximum orbit preview steps.
    #[arg(long)]
    pub preview_steps: Option<u32>,

    /// Seconds per orbit preview step.
    #[arg(long)]
    pub preview_time_step: Option<f64>,

    /// Body whose frame preview trails are drawn in.
    #[arg(long)]
    pub reference: Option<String>,

    /// Terrain noise seed applied to every layer.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ticks) = args.ticks {
            self.simulation.ticks = ticks;
        }
        if let Some(scale) = args.time_scale {
            self.simulation.time_scale = scale;
        }
        if let Some(steps) = args.preview_steps {
            self.preview.steps = steps;
        }
        if let Some(dt) = args.preview_time_step {
            self.preview.time_step = dt;
        }
        if let Some(ref name) = args.reference {
            self.preview.reference = Some(name.clone());
        }
        if let Some(seed) = args.seed {
            for (i, layer) in self.planet.layers.iter_mut().enumerate() {
                layer.seed = seed.wrapping_add(i as u32);
            }
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            preview_steps: Some(2_000),
            reference: Some("terra".to_string()),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.preview.steps, 2_000);
        assert_eq!(config.preview.reference.as_deref(), Some("terra"));
        // Non-overridden fields retain defaults
        assert_eq!(config.preview.time_step, 1.0);
        assert_eq!(config.simulation.ticks, 600);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_seed_offsets_each_layer() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(40),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.planet.layers[0].seed, 40);
        assert_eq!(config.planet.layers[1].seed, 41);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::try_parse_from(["cosmos", "--ticks", "10", "--seed", "7"]).unwrap();
        assert_eq!(args.ticks, Some(10));
        assert_eq!(args.seed, Some(7));
        assert!(args.config.is_none());
    }
}
