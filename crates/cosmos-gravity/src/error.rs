//! Simulation error types.

use crate::body::BodyId;

/// Errors surfaced by the gravity simulation.
///
/// Numeric degeneracies (coincident bodies) and step exhaustion are not
/// errors; they are handled locally or reported as a trail status.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The ECS world has no [`GravityField`](crate::GravityField) resource.
    #[error("gravity registry resource is missing from the world")]
    MissingRegistry,

    /// A body id that was never spawned or has been despawned.
    #[error("unknown body {0}")]
    UnknownBody(BodyId),

    /// A body definition violates its documented ranges.
    #[error("invalid body `{name}`: {reason}")]
    InvalidBody { name: String, reason: String },

    #[error("failed to spawn orbit preview worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    #[error("orbit preview worker disconnected")]
    WorkerDisconnected,
}
