//! Body registry and the Newtonian pairwise law.

use bevy_ecs::prelude::*;
use cosmos_math::GRAVITATIONAL_CONSTANT;
use glam::DVec3;

use crate::body::{Body, BodyId};
use crate::error::SimError;

/// Pairs closer than this (squared, m²) are skipped instead of dividing by ~0.
pub const MIN_DISTANCE_SQUARED: f64 = 1e-12;

/// Emitters lighter than this (kg) log a warning on spawn.
pub const DEFAULT_LOW_MASS_WARNING: f64 = 5.0;

/// Acceleration at `point` caused by one emitter: `(magnitude, direction)`,
/// direction pointing from `point` toward the emitter.
///
/// `None` when the two coincide.
pub fn pairwise_acceleration(
    emitter_position: DVec3,
    emitter_mass: f64,
    point: DVec3,
) -> Option<(f64, DVec3)> {
    let offset = emitter_position - point;
    let distance_squared = offset.length_squared();
    if distance_squared < MIN_DISTANCE_SQUARED {
        return None;
    }
    let magnitude = GRAVITATIONAL_CONSTANT * emitter_mass / distance_squared;
    Some((magnitude, offset / distance_squared.sqrt()))
}

/// Net pull on `point` from `emitters`, skipping the one keyed `this`.
///
/// Also returns the emitter with the largest nonzero magnitude. Ties keep the
/// first one encountered, so the result depends on emitter order.
pub(crate) fn sum_pull<K: Copy + PartialEq>(
    point: DVec3,
    this: Option<K>,
    emitters: impl IntoIterator<Item = (K, DVec3, f64)>,
) -> (DVec3, Option<K>) {
    let mut total = DVec3::ZERO;
    let mut strongest: Option<(K, f64)> = None;
    for (key, position, mass) in emitters {
        if this == Some(key) {
            continue;
        }
        let Some((magnitude, direction)) = pairwise_acceleration(position, mass, point) else {
            continue;
        };
        total += direction * magnitude;
        if magnitude > 0.0 && strongest.is_none_or(|(_, best)| magnitude > best) {
            strongest = Some((key, magnitude));
        }
    }
    (total, strongest.map(|(key, _)| key))
}

/// Net acceleration on one body for the current positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NetAcceleration {
    pub id: BodyId,
    pub acceleration: DVec3,
    /// Emitter with the greatest pull on this body, if any.
    pub strongest: Option<BodyId>,
}

/// Spawn and despawn notifications from the gameplay layer.
#[derive(Clone, Debug)]
pub enum BodyEvent {
    Spawn(Body),
    Despawn(BodyId),
}

struct Slot {
    generation: u32,
    body: Option<Body>,
}

/// Registry of every simulated body.
///
/// Bodies live in a generational arena. Iteration follows insertion order,
/// which also decides strongest-emitter ties.
#[derive(Resource)]
pub struct GravityField {
    slots: Vec<Slot>,
    free: Vec<u32>,
    order: Vec<BodyId>,
    low_mass_warning: f64,
}

impl Default for GravityField {
    fn default() -> Self {
        Self::new()
    }
}

impl GravityField {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            order: Vec::new(),
            low_mass_warning: DEFAULT_LOW_MASS_WARNING,
        }
    }

    pub fn with_low_mass_warning(mut self, threshold: f64) -> Self {
        self.low_mass_warning = threshold;
        self
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Register a body. Emitters below the low-mass threshold are accepted
    /// with a warning.
    pub fn spawn(&mut self, body: Body) -> Result<BodyId, SimError> {
        body.validate()?;
        if body.emits_gravity() && body.mass < self.low_mass_warning {
            tracing::warn!(
                name = %body.name,
                mass = body.mass,
                threshold = self.low_mass_warning,
                "gravity emitter has very low mass"
            );
        }

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.body = Some(body);
                BodyId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    body: Some(body),
                });
                BodyId {
                    index,
                    generation: 0,
                }
            }
        };
        self.order.push(id);
        tracing::debug!(%id, name = self.get(id).map_or("", |b| b.name.as_str()), "body spawned");
        Ok(id)
    }

    /// Remove a body and return it. Its id never resolves again.
    pub fn despawn(&mut self, id: BodyId) -> Result<Body, SimError> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .ok_or(SimError::UnknownBody(id))?;
        let body = slot.body.take().ok_or(SimError::UnknownBody(id))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.order.retain(|other| *other != id);
        tracing::debug!(%id, name = %body.name, "body despawned");
        Ok(body)
    }

    /// Apply one registry event. Returns the new id for spawns.
    pub fn apply_event(&mut self, event: BodyEvent) -> Result<Option<BodyId>, SimError> {
        match event {
            BodyEvent::Spawn(body) => self.spawn(body).map(Some),
            BodyEvent::Despawn(id) => self.despawn(id).map(|_| None),
        }
    }

    /// Apply events in order. Failing events are logged and skipped; the ids
    /// of spawned bodies are returned.
    pub fn apply_events(&mut self, events: impl IntoIterator<Item = BodyEvent>) -> Vec<BodyId> {
        let mut spawned = Vec::new();
        for event in events {
            match self.apply_event(event) {
                Ok(Some(id)) => spawned.push(id),
                Ok(None) => {}
                Err(err) => tracing::warn!(%err, "body event skipped"),
            }
        }
        spawned
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.body.as_ref())
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.body.as_mut())
    }

    /// First body registered under `name`.
    pub fn find_by_name(&self, name: &str) -> Option<BodyId> {
        self.all().find(|(_, body)| body.name == name).map(|(id, _)| id)
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> &[BodyId] {
        &self.order
    }

    /// Every body, in insertion order.
    pub fn all(&self) -> impl Iterator<Item = (BodyId, &Body)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.get(id).map(|body| (id, body)))
    }

    /// Bodies that emit gravity, in insertion order.
    pub fn emitters(&self) -> impl Iterator<Item = (BodyId, &Body)> + '_ {
        self.all().filter(|(_, body)| body.emits_gravity())
    }

    fn emitter_states(&self) -> impl Iterator<Item = (BodyId, DVec3, f64)> + '_ {
        self.emitters()
            .map(|(id, body)| (id, body.position, body.mass))
    }

    /// Acceleration at `point` from a single emitter.
    pub fn acceleration_from(
        &self,
        emitter: BodyId,
        point: DVec3,
    ) -> Result<Option<(f64, DVec3)>, SimError> {
        let body = self.get(emitter).ok_or(SimError::UnknownBody(emitter))?;
        if !body.emits_gravity() {
            return Ok(None);
        }
        Ok(pairwise_acceleration(body.position, body.mass, point))
    }

    /// Summed acceleration at `point`, optionally leaving one body out.
    pub fn acceleration_at(&self, point: DVec3, exclude: Option<BodyId>) -> DVec3 {
        sum_pull(point, exclude, self.emitter_states()).0
    }

    /// Net acceleration and strongest emitter for every body, from the
    /// current positions.
    pub fn net_accelerations(&self) -> Vec<NetAcceleration> {
        self.all()
            .map(|(id, body)| {
                let (acceleration, strongest) =
                    sum_pull(body.position, Some(id), self.emitter_states());
                NetAcceleration {
                    id,
                    acceleration,
                    strongest,
                }
            })
            .collect()
    }

    /// Emitter with the greatest pull on `id`.
    pub fn strongest_emitter(&self, id: BodyId) -> Option<BodyId> {
        let body = self.get(id)?;
        sum_pull(body.position, Some(id), self.emitter_states()).1
    }

    /// Unit vector pointing away from the strongest emitter.
    pub fn local_up(&self, id: BodyId) -> Option<DVec3> {
        let body = self.get(id)?;
        let emitter = self.get(self.strongest_emitter(id)?)?;
        (body.position - emitter.position).try_normalize()
    }

    /// Fluid density around `id`, from the strongest emitter's atmosphere.
    /// Bodies without one nearby are in vacuum.
    pub fn density_at(&self, id: BodyId) -> f64 {
        let Some(body) = self.get(id) else {
            return 0.0;
        };
        self.strongest_emitter(id)
            .and_then(|emitter| self.get(emitter))
            .and_then(|emitter| {
                emitter
                    .atmosphere
                    .map(|profile| profile.density_at(body.position.distance(emitter.position)))
            })
            .unwrap_or(0.0)
    }
}
