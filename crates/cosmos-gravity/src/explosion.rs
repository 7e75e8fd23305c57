//! Radial explosion impulses.

use cosmos_config::DetonationConfig;
use glam::DVec3;

use crate::body::BodyId;
use crate::field::GravityField;

/// A blast at `origin`. Bodies closer than `radius` are pushed away.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Explosion {
    pub origin: DVec3,
    pub radius: f64,
    /// Impulse (N·s) delivered at the center, falling linearly to 0 at `radius`.
    pub push: f64,
}

/// One body caught in an explosion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExplosionHit {
    pub id: BodyId,
    pub delta_v: DVec3,
    /// `1 - d²/r²`, in `(0, 1]`. Damage itself belongs to the gameplay layer.
    pub damage_factor: f64,
}

impl Explosion {
    pub fn from_config(origin: DVec3, config: &DetonationConfig) -> Self {
        Self {
            origin,
            radius: config.radius,
            push: config.push,
        }
    }

    /// Push every body within range except `source`.
    ///
    /// A body sitting exactly on the origin takes damage but no push, and
    /// massless bodies are never pushed.
    pub fn apply(&self, field: &mut GravityField, source: Option<BodyId>) -> Vec<ExplosionHit> {
        let radius_squared = self.radius * self.radius;
        let ids: Vec<BodyId> = field.ids().to_vec();
        let mut hits = Vec::new();

        for id in ids {
            if source == Some(id) {
                continue;
            }
            let Some(body) = field.get_mut(id) else {
                continue;
            };
            let offset = body.position - self.origin;
            let distance_squared = offset.length_squared();
            let damage_factor = 1.0 - distance_squared / radius_squared;
            if !(damage_factor > 0.0) {
                continue;
            }

            let falloff = 1.0 - distance_squared.sqrt() / self.radius;
            let delta_v = match offset.try_normalize() {
                Some(direction) if body.mass > 0.0 => direction * (self.push * falloff / body.mass),
                _ => DVec3::ZERO,
            };
            body.velocity += delta_v;
            hits.push(ExplosionHit {
                id,
                delta_v,
                damage_factor,
            });
        }

        tracing::debug!(
            origin = ?self.origin,
            radius = self.radius,
            hits = hits.len(),
            "explosion applied"
        );
        hits
    }
}
