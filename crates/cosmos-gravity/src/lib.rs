//! N-body Newtonian gravity: the body registry, live integration, detached
//! orbit previews, explosions and timed expiry, plus the `bevy_ecs` systems
//! that run them every fixed tick.

mod atmosphere;
mod body;
mod error;
mod explosion;
mod expiry;
mod field;
pub mod integrator;
mod scenario;
mod shadow;
mod systems;
mod worker;

pub use atmosphere::AtmosphereProfile;
pub use body::{Body, BodyId, Capabilities};
pub use error::SimError;
pub use explosion::{Explosion, ExplosionHit};
pub use expiry::{Expired, ExpiryAction, ExpiryTimers};
pub use field::{
    BodyEvent, DEFAULT_LOW_MASS_WARNING, GravityField, MIN_DISTANCE_SQUARED, NetAcceleration,
    pairwise_acceleration,
};
pub use scenario::Scenario;
pub use shadow::{
    OrbitPreview, OrbitSample, PreviewResult, Snapshot, SnapshotBody, Trail, TrailStatus,
};
pub use systems::{
    BackgroundPreview, ExpiredBodies, OrbitTrails, PendingBodyEvents, PreviewSchedule, SimClock,
    Simulation, SpawnedBodies, body_event_system, build_schedule, expiry_system,
    live_gravity_system, orbit_preview_system, try_live_tick,
};
pub use worker::{PreviewRequest, PreviewResponse, PreviewWorker};
