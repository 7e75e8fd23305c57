//! Timed despawns.
//!
//! Short-lived bodies (projectiles, debris) carry a lifetime. Every tick the
//! timers count down; an expired body either detonates and then despawns,
//! or just despawns.

use bevy_ecs::prelude::*;

use crate::body::BodyId;
use crate::explosion::{Explosion, ExplosionHit};
use crate::field::GravityField;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ExpiryAction {
    Despawn,
    /// Explode at the body's position with this radius and push.
    Detonate { radius: f64, push: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Timer {
    body: BodyId,
    remaining: f64,
    action: ExpiryAction,
}

/// What happened to one expired body.
#[derive(Clone, Debug, PartialEq)]
pub struct Expired {
    pub id: BodyId,
    pub action: ExpiryAction,
    /// Bodies caught in the detonation, empty for plain despawns.
    pub hits: Vec<ExplosionHit>,
}

/// Countdown timers over active timed bodies.
#[derive(Resource, Debug, Default)]
pub struct ExpiryTimers {
    timers: Vec<Timer>,
}

impl ExpiryTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Start (or restart) the timer for `body`.
    pub fn insert(&mut self, body: BodyId, lifetime: f64, action: ExpiryAction) {
        self.cancel(body);
        self.timers.push(Timer {
            body,
            remaining: lifetime,
            action,
        });
    }

    /// Drop the timer for `body`. Returns whether one existed.
    pub fn cancel(&mut self, body: BodyId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.body != body);
        self.timers.len() != before
    }

    pub fn remaining(&self, body: BodyId) -> Option<f64> {
        self.timers
            .iter()
            .find(|timer| timer.body == body)
            .map(|timer| timer.remaining)
    }

    /// Count down by `dt` and remove the timers that reached zero.
    pub fn tick(&mut self, dt: f64) -> Vec<(BodyId, ExpiryAction)> {
        let mut expired = Vec::new();
        self.timers.retain_mut(|timer| {
            timer.remaining -= dt;
            if timer.remaining <= 0.0 {
                expired.push((timer.body, timer.action));
                false
            } else {
                true
            }
        });
        expired
    }

    /// Count down and carry out every expiry against `field`.
    ///
    /// Bodies already despawned by someone else are skipped.
    pub fn tick_and_apply(&mut self, field: &mut GravityField, dt: f64) -> Vec<Expired> {
        let mut outcomes = Vec::new();
        for (id, action) in self.tick(dt) {
            let Some(position) = field.get(id).map(|body| body.position) else {
                tracing::debug!(%id, "expired body already gone");
                continue;
            };
            let hits = match action {
                ExpiryAction::Despawn => Vec::new(),
                ExpiryAction::Detonate { radius, push } => Explosion {
                    origin: position,
                    radius,
                    push,
                }
                .apply(field, Some(id)),
            };
            if let Err(err) = field.despawn(id) {
                tracing::warn!(%err, "failed to despawn expired body");
                continue;
            }
            outcomes.push(Expired { id, action, hits });
        }
        outcomes
    }
}
