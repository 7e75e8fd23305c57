//! Detached orbit prediction.
//!
//! A preview copies body state out of the registry into a [`Snapshot`] and
//! integrates that copy. Nothing here holds a reference into live data, so a
//! snapshot can be shipped to another thread.
//!
//! Each body's trail moves through
//! `Idle -> Integrating -> (Closed | Collided | StepLimitReached)`.
//! A finished trail stops recording. Finished responders also stop moving,
//! but finished emitters keep moving so they go on pulling the others
//! along their true paths.

use std::time::Instant;

use cosmos_config::PreviewConfig;
use glam::DVec3;
use rustc_hash::FxHashMap;

use crate::body::BodyId;
use crate::field::{GravityField, pairwise_acceleration};

/// Copied state of one body.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotBody {
    pub id: BodyId,
    pub position: DVec3,
    pub velocity: DVec3,
    pub mass: f64,
    pub emits_gravity: bool,
    pub responds_to_gravity: bool,
    pub radius: Option<f64>,
}

/// Registry state captured at one instant, in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub bodies: Vec<SnapshotBody>,
}

impl Snapshot {
    pub fn capture(field: &GravityField) -> Self {
        let bodies = field
            .all()
            .map(|(id, body)| SnapshotBody {
                id,
                position: body.position,
                velocity: body.velocity,
                mass: body.mass,
                emits_gravity: body.emits_gravity(),
                responds_to_gravity: body.responds_to_gravity(),
                radius: body.radius,
            })
            .collect();
        Self { bodies }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

/// One recorded state along a predicted trail.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitSample {
    pub position: DVec3,
    pub velocity: DVec3,
}

/// Where a body's trail ended up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrailStatus {
    /// Not yet simulated.
    #[default]
    Idle,
    Integrating,
    /// Returned near its first sample at `step`.
    Closed { step: u32 },
    /// Fell inside the emitter `with` at `step`.
    Collided { step: u32, with: BodyId },
    /// Ran out of steps. The trail is incomplete, not failed.
    StepLimitReached,
}

impl TrailStatus {
    pub fn is_finished(self) -> bool {
        matches!(
            self,
            Self::Closed { .. } | Self::Collided { .. } | Self::StepLimitReached
        )
    }
}

/// Predicted path of one body.
#[derive(Clone, Debug, PartialEq)]
pub struct Trail {
    pub id: BodyId,
    /// Sample 0 is the starting state; one sample follows per step.
    pub samples: Vec<OrbitSample>,
    pub status: TrailStatus,
}

/// Output of one preview run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PreviewResult {
    /// One trail per snapshot body, in snapshot order.
    pub trails: Vec<Trail>,
    /// Steps actually integrated.
    pub steps_run: u32,
    /// Reference body the trails are expressed relative to, if it resolved.
    pub reference: Option<BodyId>,
}

impl PreviewResult {
    pub fn trail(&self, id: BodyId) -> Option<&Trail> {
        self.trails.iter().find(|trail| trail.id == id)
    }
}

/// Orbit preview settings.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitPreview {
    pub steps: u32,
    /// Seconds per step.
    pub time_step: f64,
    /// A trail within this distance of its first sample is closed.
    pub closure_radius: f64,
    /// Closure is only tested from this sample index on.
    pub min_closure_steps: u32,
    /// Trails are drawn relative to this body's motion. `None` uses the origin.
    pub reference: Option<BodyId>,
}

impl Default for OrbitPreview {
    fn default() -> Self {
        Self {
            steps: 100,
            time_step: 1.0,
            closure_radius: 5.0,
            min_closure_steps: 10,
            reference: None,
        }
    }
}

impl OrbitPreview {
    /// Settings from config, resolving the reference body by name.
    ///
    /// An unknown reference name falls back to the world origin.
    pub fn from_config(config: &PreviewConfig, field: &GravityField) -> Self {
        let reference = config.reference.as_deref().and_then(|name| {
            let id = field.find_by_name(name);
            if id.is_none() {
                tracing::warn!(name, "preview reference body not found, using world origin");
            }
            id
        });
        Self {
            steps: config.steps,
            time_step: config.time_step,
            closure_radius: config.closure_radius,
            min_closure_steps: config.min_closure_steps,
            reference,
        }
    }

    /// Capture the registry and preview it. The registry is not modified.
    pub fn simulate(&self, field: &GravityField) -> PreviewResult {
        self.run(&Snapshot::capture(field))
    }

    /// Integrate a copy of `snapshot` for up to `steps` steps.
    pub fn run(&self, snapshot: &Snapshot) -> PreviewResult {
        let started = Instant::now();
        let dt = self.time_step;
        let mut bodies = snapshot.bodies.clone();
        let count = bodies.len();

        let index: FxHashMap<BodyId, usize> =
            bodies.iter().enumerate().map(|(i, b)| (b.id, i)).collect();
        let reference = self.reference.and_then(|id| {
            let found = index.get(&id).copied();
            if found.is_none() {
                tracing::warn!(%id, "preview reference body missing, using world origin");
            }
            found
        });
        let reference_start = reference.map(|r| bodies[r].position);

        let mut trails: Vec<Trail> = bodies
            .iter()
            .map(|body| {
                let mut samples = Vec::with_capacity(self.steps as usize + 1);
                samples.push(OrbitSample {
                    position: body.position,
                    velocity: body.velocity,
                });
                Trail {
                    id: body.id,
                    samples,
                    status: TrailStatus::Integrating,
                }
            })
            .collect();

        let closure_squared = self.closure_radius * self.closure_radius;
        let mut accelerations = vec![DVec3::ZERO; count];
        let mut steps_run = 0;

        for step in 1..=self.steps {
            if !trails.iter().any(|t| t.status == TrailStatus::Integrating) {
                break;
            }
            steps_run = step;

            for i in 0..count {
                accelerations[i] = DVec3::ZERO;
                let active = trails[i].status == TrailStatus::Integrating;
                if !active && !bodies[i].emits_gravity {
                    continue;
                }
                let point = bodies[i].position;
                for (j, emitter) in bodies.iter().enumerate() {
                    if j == i || !emitter.emits_gravity {
                        continue;
                    }
                    if let Some(radius) = emitter.radius
                        && trails[i].status == TrailStatus::Integrating
                        && point.distance_squared(emitter.position) < radius * radius
                    {
                        trails[i].status = TrailStatus::Collided {
                            step,
                            with: emitter.id,
                        };
                        continue;
                    }
                    if let Some((magnitude, direction)) =
                        pairwise_acceleration(emitter.position, emitter.mass, point)
                    {
                        accelerations[i] += direction * magnitude;
                    }
                }
            }

            for (i, body) in bodies.iter_mut().enumerate() {
                let active = trails[i].status == TrailStatus::Integrating;
                if !active && !body.emits_gravity {
                    continue;
                }
                if body.responds_to_gravity {
                    body.velocity += accelerations[i] * dt;
                }
                body.position += body.velocity * dt;
            }

            let frame_offset = match (reference, reference_start) {
                (Some(r), Some(start)) => bodies[r].position - start,
                _ => DVec3::ZERO,
            };

            for (i, trail) in trails.iter_mut().enumerate() {
                if trail.status != TrailStatus::Integrating {
                    continue;
                }
                let body = &bodies[i];
                let position = if reference == Some(i) {
                    body.position
                } else {
                    body.position - frame_offset
                };
                trail.samples.push(OrbitSample {
                    position,
                    velocity: body.velocity,
                });
                if step >= self.min_closure_steps
                    && position.distance_squared(trail.samples[0].position) < closure_squared
                {
                    trail.status = TrailStatus::Closed { step };
                }
            }
        }

        for trail in &mut trails {
            if trail.status == TrailStatus::Integrating {
                trail.status = TrailStatus::StepLimitReached;
            }
        }

        tracing::debug!(
            bodies = count,
            steps_run,
            closed = trails
                .iter()
                .filter(|t| matches!(t.status, TrailStatus::Closed { .. }))
                .count(),
            collided = trails
                .iter()
                .filter(|t| matches!(t.status, TrailStatus::Collided { .. }))
                .count(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
            "orbit preview finished"
        );

        PreviewResult {
            trails,
            steps_run,
            reference: reference.map(|r| bodies[r].id),
        }
    }
}
