//! ECS resources and systems driving the simulation each fixed tick.

use bevy_ecs::prelude::*;
use cosmos_config::SimulationConfig;

use crate::body::BodyId;
use crate::error::SimError;
use crate::expiry::{Expired, ExpiryTimers};
use crate::field::{BodyEvent, GravityField};
use crate::integrator;
use crate::shadow::{OrbitPreview, PreviewResult, Snapshot};
use crate::worker::PreviewWorker;

/// Fixed-step simulation clock.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct SimClock {
    /// Real seconds per tick.
    pub fixed_dt: f64,
    pub time_scale: f64,
    /// Simulated seconds since start.
    pub elapsed: f64,
    pub ticks: u64,
}

impl Default for SimClock {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            time_scale: 1.0,
            elapsed: 0.0,
            ticks: 0,
        }
    }
}

impl SimClock {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            fixed_dt: config.fixed_dt,
            time_scale: config.time_scale,
            ..Default::default()
        }
    }

    /// Simulated seconds per tick.
    pub fn dt(&self) -> f64 {
        self.fixed_dt * self.time_scale
    }

    fn advance(&mut self) {
        self.elapsed += self.dt();
        self.ticks += 1;
    }
}

/// When, and with which settings, previews refresh.
#[derive(Resource, Clone, Debug)]
pub struct PreviewSchedule {
    pub preview: OrbitPreview,
    pub enabled: bool,
    /// Simulated seconds between refreshes.
    pub update_interval: f64,
    since_last: f64,
}

impl PreviewSchedule {
    /// The first eligible tick refreshes immediately.
    pub fn new(preview: OrbitPreview, update_interval: f64, enabled: bool) -> Self {
        Self {
            preview,
            enabled,
            update_interval,
            since_last: update_interval,
        }
    }

    fn due(&mut self, dt: f64) -> bool {
        if !self.enabled {
            return false;
        }
        self.since_last += dt;
        if self.since_last < self.update_interval {
            return false;
        }
        self.since_last = 0.0;
        true
    }
}

/// Most recent predicted trails, for the renderer.
#[derive(Resource, Debug, Default)]
pub struct OrbitTrails {
    pub latest: Option<PreviewResult>,
    /// Number of previews received so far.
    pub refreshes: u64,
    /// Tick at which `latest` arrived.
    pub updated_tick: u64,
}

impl OrbitTrails {
    fn store(&mut self, result: PreviewResult, tick: u64) {
        self.latest = Some(result);
        self.refreshes += 1;
        self.updated_tick = tick;
    }
}

/// Preview worker, present when previews run off the main thread.
#[derive(Resource)]
pub struct BackgroundPreview(pub PreviewWorker);

/// Spawn/despawn notifications queued by the gameplay layer.
#[derive(Resource, Debug, Default)]
pub struct PendingBodyEvents(pub Vec<BodyEvent>);

/// Ids of bodies spawned from [`PendingBodyEvents`] during the last tick, in
/// event order.
#[derive(Resource, Debug, Default)]
pub struct SpawnedBodies(pub Vec<BodyId>);

/// Bodies that expired during the last tick.
#[derive(Resource, Debug, Default)]
pub struct ExpiredBodies(pub Vec<Expired>);

pub fn body_event_system(
    mut field: ResMut<GravityField>,
    mut pending: ResMut<PendingBodyEvents>,
    mut spawned: ResMut<SpawnedBodies>,
) {
    spawned.0 = field.apply_events(pending.0.drain(..));
}

pub fn live_gravity_system(clock: Res<SimClock>, mut field: ResMut<GravityField>) {
    integrator::step(&mut field, clock.dt());
}

pub fn expiry_system(
    clock: Res<SimClock>,
    mut timers: ResMut<ExpiryTimers>,
    mut field: ResMut<GravityField>,
    mut expired: ResMut<ExpiredBodies>,
) {
    expired.0 = timers.tick_and_apply(&mut field, clock.dt());
}

/// Refresh trails on schedule, synchronously or through the worker.
pub fn orbit_preview_system(
    clock: Res<SimClock>,
    field: Res<GravityField>,
    mut schedule: ResMut<PreviewSchedule>,
    mut trails: ResMut<OrbitTrails>,
    worker: Option<ResMut<BackgroundPreview>>,
) {
    let due = schedule.due(clock.dt());
    match worker {
        Some(mut worker) => {
            if let Some(response) = worker.0.latest() {
                trails.store(response.result, clock.ticks);
            }
            if due
                && let Err(err) = worker
                    .0
                    .submit(schedule.preview.clone(), Snapshot::capture(&field))
            {
                tracing::error!(%err, "orbit preview submission failed");
            }
        }
        None if due => {
            let result = schedule.preview.simulate(&field);
            trails.store(result, clock.ticks);
        }
        None => {}
    }
}

fn advance_clock_system(mut clock: ResMut<SimClock>) {
    clock.advance();
}

/// The per-tick schedule: events, live gravity, expiry, preview, clock.
pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            body_event_system,
            live_gravity_system,
            expiry_system,
            orbit_preview_system,
            advance_clock_system,
        )
            .chain(),
    );
    schedule
}

/// Drives [`build_schedule`] against a world.
pub struct Simulation {
    schedule: Schedule,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    pub fn new() -> Self {
        Self {
            schedule: build_schedule(),
        }
    }

    /// Run one full tick. Fails without touching the world if any required
    /// resource is missing.
    pub fn tick(&mut self, world: &mut World) -> Result<(), SimError> {
        if !world.contains_resource::<GravityField>() {
            return Err(SimError::MissingRegistry);
        }
        world.init_resource::<SimClock>();
        world.init_resource::<ExpiryTimers>();
        world.init_resource::<OrbitTrails>();
        world.init_resource::<PendingBodyEvents>();
        world.init_resource::<SpawnedBodies>();
        world.init_resource::<ExpiredBodies>();
        if !world.contains_resource::<PreviewSchedule>() {
            world.insert_resource(PreviewSchedule::new(OrbitPreview::default(), 1.0, false));
        }
        self.schedule.run(world);
        Ok(())
    }
}

/// One live step (gravity then expiry) without previews.
pub fn try_live_tick(world: &mut World) -> Result<(), SimError> {
    if !world.contains_resource::<GravityField>() {
        return Err(SimError::MissingRegistry);
    }
    let dt = world
        .get_resource::<SimClock>()
        .map_or_else(|| SimClock::default().dt(), SimClock::dt);

    world.resource_scope(|world, mut field: Mut<GravityField>| {
        integrator::step(&mut field, dt);
        let expired = world
            .get_resource_mut::<ExpiryTimers>()
            .map(|mut timers| timers.tick_and_apply(&mut field, dt));
        if let Some(expired) = expired
            && let Some(mut log) = world.get_resource_mut::<ExpiredBodies>()
        {
            log.0 = expired;
        }
    });
    if let Some(mut clock) = world.get_resource_mut::<SimClock>() {
        clock.advance();
    }
    Ok(())
}
