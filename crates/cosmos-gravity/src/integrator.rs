//! Live semi-implicit Euler integration.
//!
//! All accelerations are computed from the positions at the start of the
//! step. Velocities are updated first, then positions move with the new
//! velocity.

use crate::field::GravityField;

/// Advance every body in `field` by `dt` seconds.
///
/// Bodies that do not respond to gravity keep their velocity but still
/// move along it.
pub fn step(field: &mut GravityField, dt: f64) {
    let accelerations = field.net_accelerations();
    for net in accelerations {
        let Some(body) = field.get_mut(net.id) else {
            continue;
        };
        if body.responds_to_gravity() {
            body.velocity += net.acceleration * dt;
        }
        body.position += body.velocity * dt;
    }
}

/// Run `steps` consecutive [`step`]s.
pub fn advance(field: &mut GravityField, dt: f64, steps: u32) {
    for _ in 0..steps {
        step(field, dt);
    }
}
