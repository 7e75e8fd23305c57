//! Gravitating bodies and their capabilities.

use std::fmt;

use cosmos_config::BodyConfig;
use glam::DVec3;

use crate::atmosphere::AtmosphereProfile;
use crate::error::SimError;

/// Generational handle into a [`GravityField`](crate::GravityField).
///
/// A despawned body's slot may be reused, but the generation changes, so a
/// stale id never resolves to the new occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl BodyId {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// What a body takes part in. Behavior modules (player input, weapons, AI)
/// select bodies by these flags instead of by type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    pub emits_gravity: bool,
    pub responds_to_gravity: bool,
    pub player_controlled: bool,
    pub has_weapons: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            emits_gravity: false,
            responds_to_gravity: true,
            player_controlled: false,
            has_weapons: false,
        }
    }
}

impl Capabilities {
    /// Emits gravity and responds to it (planets, moons).
    pub const fn massive() -> Self {
        Self {
            emits_gravity: true,
            responds_to_gravity: true,
            player_controlled: false,
            has_weapons: false,
        }
    }

    /// Emits gravity but is never moved by it (a pinned star).
    pub const fn anchor() -> Self {
        Self {
            emits_gravity: true,
            responds_to_gravity: false,
            player_controlled: false,
            has_weapons: false,
        }
    }
}

/// A simulated body.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub name: String,
    pub position: DVec3,
    pub velocity: DVec3,
    /// Kilograms.
    pub mass: f64,
    pub capabilities: Capabilities,
    /// Collision radius. Previewed bodies that pass inside it are marked collided.
    pub radius: Option<f64>,
    pub atmosphere: Option<AtmosphereProfile>,
}

impl Body {
    /// A gravity responder with default capabilities.
    pub fn new(name: impl Into<String>, position: DVec3, velocity: DVec3, mass: f64) -> Self {
        Self {
            name: name.into(),
            position,
            velocity,
            mass,
            capabilities: Capabilities::default(),
            radius: None,
            atmosphere: None,
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_atmosphere(mut self, atmosphere: AtmosphereProfile) -> Self {
        self.atmosphere = Some(atmosphere);
        self
    }

    pub fn emits_gravity(&self) -> bool {
        self.capabilities.emits_gravity
    }

    pub fn responds_to_gravity(&self) -> bool {
        self.capabilities.responds_to_gravity
    }

    /// Reject non-finite state, negative mass and non-positive radius.
    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |reason: &str| SimError::InvalidBody {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if !(self.mass.is_finite() && self.mass >= 0.0) {
            return Err(invalid("mass must be finite and >= 0"));
        }
        if !(self.position.is_finite() && self.velocity.is_finite()) {
            return Err(invalid("position and velocity must be finite"));
        }
        if let Some(r) = self.radius
            && !(r.is_finite() && r > 0.0)
        {
            return Err(invalid("radius must be finite and > 0"));
        }
        Ok(())
    }

    /// Build from a config entry. Timers and detonations are handled by the
    /// scenario builder.
    pub fn from_config(config: &BodyConfig) -> Result<Self, SimError> {
        let body = Self {
            name: config.name.clone(),
            position: DVec3::from_array(config.position),
            velocity: DVec3::from_array(config.velocity),
            mass: config.mass,
            capabilities: Capabilities {
                emits_gravity: config.emits_gravity,
                responds_to_gravity: config.responds_to_gravity,
                player_controlled: config.player_controlled,
                has_weapons: config.has_weapons,
            },
            radius: config.radius,
            atmosphere: None,
        };
        body.validate()?;
        Ok(body)
    }
}
