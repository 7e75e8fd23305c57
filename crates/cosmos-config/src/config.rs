//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level sandbox configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Live simulation settings.
    pub simulation: SimulationConfig,
    /// Orbit preview (shadow simulation) settings.
    pub preview: PreviewConfig,
    /// Procedural planet surface settings.
    pub planet: PlanetConfig,
    /// Bodies spawned into the gravity registry at startup.
    pub bodies: Vec<BodyConfig>,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Live (authoritative) simulation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed physics timestep in seconds.
    pub fixed_dt: f64,
    /// Multiplier applied to `fixed_dt` before integrating.
    pub time_scale: f64,
    /// Number of fixed ticks the headless runner executes.
    pub ticks: u64,
    /// Emitters lighter than this (kg) log a warning when spawned.
    pub low_mass_warning: f64,
}

/// Shadow-simulation settings for predicted orbit trails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreviewConfig {
    /// Run the preview pass at all.
    pub enabled: bool,
    /// Maximum integration steps per preview.
    pub steps: u32,
    /// Simulated seconds per preview step.
    pub time_step: f64,
    /// Simulated seconds between preview refreshes.
    pub update_interval: f64,
    /// A trail that returns within this distance (m) of its start is closed.
    pub closure_radius: f64,
    /// Samples that must be recorded before closure is tested.
    pub min_closure_steps: u32,
    /// Name of the body whose frame trails are drawn in. `None` = world origin.
    pub reference: Option<String>,
    /// Compute previews on a background worker thread.
    pub background: bool,
}

/// Coherent-noise variant used by a terrain layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum NoiseKind {
    /// Smooth fractal noise.
    #[default]
    Simple,
    /// Ridged noise with sharp peaks and flat valleys.
    Rigid,
}

/// One layer of the terrain noise stack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseLayerConfig {
    /// Disabled layers keep their settings but contribute nothing.
    pub enabled: bool,
    /// Multiply this layer by the first layer's value.
    pub use_as_mask: bool,
    /// Noise variant.
    pub kind: NoiseKind,
    /// Output multiplier, `>= 0`.
    pub strength: f64,
    /// Frequency multiplier between octaves (lacunarity), `>= 0`.
    pub roughness: f64,
    /// Offset added to the sample point before evaluating noise.
    pub center: [f64; 3],
    /// Subtracted from the accumulated value before scaling by `strength`.
    pub min: f64,
    /// Octave count, `1..=8`.
    pub octaves: u32,
    /// Frequency of the first octave.
    pub base_roughness: f64,
    /// Amplitude multiplier between octaves, `[0, 1]`.
    pub persistence: f64,
    /// Ridge weight factor (rigid layers only), `>= 0`.
    pub weight: f64,
    /// Seed of the coherent-noise basis.
    pub seed: u32,
}

/// Procedural planet surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    /// Name of the body this surface belongs to.
    pub body: String,
    /// Base radius in meters, `> 0`.
    pub radius: f64,
    /// Subdivision count of the finest icosphere LOD.
    pub max_recursion: u32,
    /// Finest detail level.
    pub min_detail: u32,
    /// Coarsest detail level, `>= min_detail`.
    pub max_detail: u32,
    /// Camera distances past `radius * lod_multiplier` select `max_detail`.
    pub lod_multiplier: f64,
    /// Chunks per cube-face edge for the chunked surface, `>= 1`.
    pub chunk_count: u32,
    /// Vertices per chunk edge, `>= 2`.
    pub resolution: u32,
    /// Atmosphere thickness as a fraction of the radius, `[0, 1]`.
    pub atmosphere_fraction: f64,
    /// Air density at sea level in kg/m³, `>= 0`.
    pub atmosphere_density: f64,
    /// Ocean surface as unscaled elevation.
    pub ocean_height: f64,
    /// Ordered terrain noise stack.
    pub layers: Vec<NoiseLayerConfig>,
}

/// Delayed detonation of a timed body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetonationConfig {
    /// Blast radius in meters, `> 0`.
    pub radius: f64,
    /// Impulse magnitude at the blast center, `>= 0`.
    pub push: f64,
}

/// A body spawned into the gravity registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    /// Unique name used by references (preview frame, planet surface).
    pub name: String,
    /// Initial position in meters.
    pub position: [f64; 3],
    /// Initial velocity in m/s.
    pub velocity: [f64; 3],
    /// Mass in kilograms, finite and `>= 0`.
    pub mass: f64,
    /// Exerts gravity on other bodies.
    pub emits_gravity: bool,
    /// Is accelerated by other bodies.
    pub responds_to_gravity: bool,
    /// Collision radius in meters, `> 0` when present.
    pub radius: Option<f64>,
    /// Driven by player input.
    pub player_controlled: bool,
    /// Carries weapons.
    pub has_weapons: bool,
    /// Seconds until the body expires, `> 0` when present.
    pub lifetime: Option<f64>,
    /// Explode when the lifetime runs out instead of silently despawning.
    pub detonation: Option<DetonationConfig>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log a per-body summary every N ticks (0 = never).
    pub report_every: u64,
}

// --- Default implementations ---

impl Default for Config {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            preview: PreviewConfig::default(),
            planet: PlanetConfig::default(),
            bodies: default_bodies(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            time_scale: 1.0,
            ticks: 600,
            low_mass_warning: 5.0,
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            steps: 100,
            time_step: 1.0,
            update_interval: 1.0,
            closure_radius: 5.0,
            min_closure_steps: 10,
            reference: None,
            background: false,
        }
    }
}

impl Default for NoiseLayerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            use_as_mask: false,
            kind: NoiseKind::Simple,
            strength: 1.0,
            roughness: 2.0,
            center: [0.0; 3],
            min: 0.0,
            octaves: 1,
            base_roughness: 1.0,
            persistence: 0.5,
            weight: 0.8,
            seed: 0,
        }
    }
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            body: "terra".to_string(),
            radius: 6_371_000.0,
            max_recursion: 5,
            min_detail: 0,
            max_detail: 3,
            lod_multiplier: 10.0,
            chunk_count: 4,
            resolution: 16,
            atmosphere_fraction: 0.05,
            atmosphere_density: 1.225,
            ocean_height: 0.0,
            layers: vec![
                NoiseLayerConfig {
                    strength: 0.02,
                    roughness: 2.2,
                    min: 0.9,
                    octaves: 4,
                    base_roughness: 1.1,
                    ..Default::default()
                },
                NoiseLayerConfig {
                    use_as_mask: true,
                    kind: NoiseKind::Rigid,
                    strength: 0.6,
                    roughness: 2.5,
                    center: [0.3, -1.2, 2.0],
                    min: 0.5,
                    octaves: 5,
                    base_roughness: 1.6,
                    persistence: 0.45,
                    weight: 0.8,
                    seed: 1,
                    ..Default::default()
                },
            ],
        }
    }
}

impl Default for DetonationConfig {
    fn default() -> Self {
        Self {
            radius: 50.0,
            push: 100.0,
        }
    }
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: [0.0; 3],
            velocity: [0.0; 3],
            mass: 1.0,
            emits_gravity: false,
            responds_to_gravity: true,
            radius: None,
            player_controlled: false,
            has_weapons: false,
            lifetime: None,
            detonation: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            report_every: 0,
        }
    }
}

/// Earth, the Moon, and a probe in low orbit.
fn default_bodies() -> Vec<BodyConfig> {
    vec![
        BodyConfig {
            name: "terra".to_string(),
            mass: 5.972e24,
            emits_gravity: true,
            responds_to_gravity: true,
            radius: Some(6_371_000.0),
            ..Default::default()
        },
        BodyConfig {
            name: "luna".to_string(),
            position: [384_400_000.0, 0.0, 0.0],
            velocity: [0.0, 0.0, 1_022.0],
            mass: 7.342e22,
            emits_gravity: true,
            responds_to_gravity: true,
            radius: Some(1_737_400.0),
            ..Default::default()
        },
        BodyConfig {
            name: "probe".to_string(),
            position: [7_000_000.0, 0.0, 0.0],
            velocity: [0.0, 0.0, 7_546.0],
            mass: 1_000.0,
            player_controlled: true,
            ..Default::default()
        },
    ]
}

/// Platform config directory for the sandbox (`<config_dir>/cosmos`).
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("cosmos"))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    ///
    /// The loaded config is validated; out-of-range values are rejected rather
    /// than clamped.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Look up a body by name.
    pub fn body(&self, name: &str) -> Option<&BodyConfig> {
        self.bodies.iter().find(|b| b.name == name)
    }
}
