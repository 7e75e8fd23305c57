//! Building the initial simulation state from config.

use bevy_ecs::prelude::*;
use cosmos_config::Config;

use crate::atmosphere::AtmosphereProfile;
use crate::body::{Body, BodyId};
use crate::error::SimError;
use crate::expiry::{ExpiryAction, ExpiryTimers};
use crate::field::GravityField;
use crate::shadow::OrbitPreview;
use crate::systems::{
    BackgroundPreview, ExpiredBodies, OrbitTrails, PendingBodyEvents, PreviewSchedule, SimClock,
    SpawnedBodies,
};
use crate::worker::PreviewWorker;

/// Registry plus timers, before they are handed to an ECS world.
pub struct Scenario {
    pub field: GravityField,
    pub timers: ExpiryTimers,
}

impl Scenario {
    /// Spawn every configured body, in config order.
    pub fn build(config: &Config) -> Result<Self, SimError> {
        let mut field =
            GravityField::new().with_low_mass_warning(config.simulation.low_mass_warning);
        let mut timers = ExpiryTimers::new();

        for body_config in &config.bodies {
            let id = field.spawn(Body::from_config(body_config)?)?;
            if let Some(lifetime) = body_config.lifetime {
                let action = match &body_config.detonation {
                    Some(d) => ExpiryAction::Detonate {
                        radius: d.radius,
                        push: d.push,
                    },
                    None => ExpiryAction::Despawn,
                };
                timers.insert(id, lifetime, action);
            }
        }

        tracing::info!(
            bodies = field.len(),
            emitters = field.emitters().count(),
            timed = timers.len(),
            "scenario built"
        );
        Ok(Self { field, timers })
    }

    /// Give the named body an atmosphere.
    pub fn attach_atmosphere(
        &mut self,
        name: &str,
        profile: AtmosphereProfile,
    ) -> Result<BodyId, SimError> {
        let id = self
            .field
            .find_by_name(name)
            .ok_or_else(|| SimError::InvalidBody {
                name: name.to_string(),
                reason: "no body with this name is registered".to_string(),
            })?;
        if let Some(body) = self.field.get_mut(id) {
            body.atmosphere = Some(profile);
        }
        Ok(id)
    }

    /// Move everything into a fresh world with the simulation resources.
    ///
    /// With `preview.background` set, previews run on a worker thread.
    pub fn into_world(self, config: &Config) -> Result<World, SimError> {
        let mut world = World::new();
        let preview = OrbitPreview::from_config(&config.preview, &self.field);

        world.insert_resource(SimClock::from_config(&config.simulation));
        world.insert_resource(PreviewSchedule::new(
            preview,
            config.preview.update_interval,
            config.preview.enabled,
        ));
        world.insert_resource(OrbitTrails::default());
        world.insert_resource(PendingBodyEvents::default());
        world.insert_resource(SpawnedBodies::default());
        world.insert_resource(ExpiredBodies::default());
        world.insert_resource(self.timers);
        world.insert_resource(self.field);
        if config.preview.enabled && config.preview.background {
            world.insert_resource(BackgroundPreview(PreviewWorker::spawn()?));
        }
        Ok(world)
    }
}
