//! Headless sandbox: builds the world from config and runs it for a number
//! of fixed ticks.

use std::time::Instant;

use bevy_ecs::world::World;
use cosmos_config::{Config, ConfigError};
use cosmos_gravity::{
    AtmosphereProfile, BodyId, ExpiredBodies, GravityField, OrbitTrails, Scenario, SimError,
    Simulation, TrailStatus,
};
use cosmos_math::MinMax;
use cosmos_planet::{ChunkedPlanet, PlanetError, PlanetSurface};
use glam::DVec3;

use crate::game_loop::{GameLoop, MAX_FRAME_TIME};
use crate::platform::PlatformError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Planet(#[from] PlanetError),
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// End state of one body.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyReport {
    pub name: String,
    pub position: DVec3,
    pub velocity: DVec3,
    /// Height above the planet's base radius, if the planet body exists.
    pub altitude: Option<f64>,
    /// Fluid density around the body (kg/m³).
    pub density: f64,
}

/// What a run produced.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub ticks: u64,
    pub sim_time: f64,
    pub bodies: Vec<BodyReport>,
    pub trails: Vec<(String, TrailStatus)>,
    pub preview_refreshes: u64,
    pub expired: usize,
    pub elevation: MinMax,
    pub surface_radius: (f64, f64),
    pub lod_level: u32,
    pub lod_switches: u32,
    pub visible_chunks: usize,
    pub total_chunks: usize,
}

/// The running sandbox.
pub struct Sandbox {
    config: Config,
    world: World,
    simulation: Simulation,
    game_loop: GameLoop,
    surface: PlanetSurface,
    chunks: ChunkedPlanet,
    planet_body: Option<BodyId>,
    camera_body: Option<BodyId>,
    lod_switches: u32,
    expired: usize,
}

impl Sandbox {
    /// Generate the planet and build the simulation world.
    pub fn new(config: Config) -> Result<Self, AppError> {
        config.validate()?;

        let surface = PlanetSurface::from_config(&config.planet)?;
        let chunks = ChunkedPlanet::from_config(&config.planet)?;

        let mut scenario = Scenario::build(&config)?;
        let (lowest, _) = surface.surface_radius_range();
        let profile = AtmosphereProfile::for_planet(
            config.planet.radius,
            lowest,
            config.planet.ocean_height,
            config.planet.atmosphere_fraction,
            config.planet.atmosphere_density,
        );
        let planet_body = match scenario.attach_atmosphere(&config.planet.body, profile) {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::warn!(%err, "planet surface has no body, atmosphere skipped");
                None
            }
        };
        let camera_body = config
            .bodies
            .iter()
            .find(|b| b.player_controlled)
            .and_then(|b| scenario.field.find_by_name(&b.name));

        let world = scenario.into_world(&config)?;
        Ok(Self {
            game_loop: GameLoop::new(config.simulation.fixed_dt),
            config,
            world,
            simulation: Simulation::new(),
            surface,
            chunks,
            planet_body,
            camera_body,
            lod_switches: 0,
            expired: 0,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn surface(&self) -> &PlanetSurface {
        &self.surface
    }

    /// Camera riding on the player body, looking at the planet.
    fn camera(&self) -> Option<(DVec3, DVec3)> {
        let field = self.world.get_resource::<GravityField>()?;
        let camera = field.get(self.camera_body?)?.position;
        let center = self
            .planet_body
            .and_then(|id| field.get(id))
            .map_or(DVec3::ZERO, |b| b.position);
        Some((camera, center))
    }

    /// Run `ticks` more fixed ticks.
    pub fn run(&mut self, ticks: u64) -> Result<(), AppError> {
        let started = Instant::now();
        let target = self.game_loop.update_count() + ticks;
        let frame_time = self.game_loop.fixed_dt().min(MAX_FRAME_TIME);
        let report_every = self.config.debug.report_every;

        while self.game_loop.update_count() < target {
            let Self {
                game_loop,
                world,
                simulation,
                expired,
                ..
            } = self;
            game_loop.advance(frame_time, |_, _| {
                simulation.tick(world)?;
                *expired += world.resource::<ExpiredBodies>().0.len();
                Ok::<(), AppError>(())
            })?;

            if let Some((camera, center)) = self.camera()
                && self.surface.update_lod(camera, center)
            {
                self.lod_switches += 1;
            }

            let tick = self.game_loop.update_count();
            if report_every > 0 && tick % report_every == 0 {
                self.log_bodies(tick);
            }
        }

        tracing::info!(
            ticks,
            elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
            "simulation run finished"
        );
        Ok(())
    }

    fn log_bodies(&self, tick: u64) {
        let field = self.world.resource::<GravityField>();
        for (_, body) in field.all() {
            tracing::info!(
                tick,
                name = %body.name,
                position = ?body.position,
                speed = body.velocity.length(),
                "body state"
            );
        }
    }

    pub fn summary(&self) -> RunSummary {
        let field = self.world.resource::<GravityField>();
        let planet = self.planet_body.and_then(|id| field.get(id));
        let bodies = field
            .all()
            .map(|(id, body)| BodyReport {
                name: body.name.clone(),
                position: body.position,
                velocity: body.velocity,
                altitude: planet
                    .filter(|_| Some(id) != self.planet_body)
                    .map(|p| body.position.distance(p.position) - self.surface.radius()),
                density: field.density_at(id),
            })
            .collect();

        let trails_resource = self.world.resource::<OrbitTrails>();
        let trails = trails_resource
            .latest
            .as_ref()
            .map(|result| {
                result
                    .trails
                    .iter()
                    .map(|trail| {
                        let name = field
                            .get(trail.id)
                            .map_or_else(|| trail.id.to_string(), |b| b.name.clone());
                        (name, trail.status)
                    })
                    .collect()
            })
            .unwrap_or_default();

        let visible_chunks = self.camera().map_or(0, |(camera, center)| {
            self.chunks
                .visible_chunks(camera, (center - camera).normalize_or_zero(), center)
                .len()
        });

        RunSummary {
            ticks: self.game_loop.update_count(),
            sim_time: self.game_loop.total_sim_time() * self.config.simulation.time_scale,
            bodies,
            trails,
            preview_refreshes: trails_resource.refreshes,
            expired: self.expired,
            elevation: self.surface.elevation_bounds(),
            surface_radius: self.surface.surface_radius_range(),
            lod_level: self.surface.current_level(),
            lod_switches: self.lod_switches,
            visible_chunks,
            total_chunks: self.chunks.len(),
        }
    }
}

/// Build a sandbox, run the configured number of ticks, and log the summary.
pub fn run(config: Config) -> Result<RunSummary, AppError> {
    let ticks = config.simulation.ticks;
    let mut sandbox = Sandbox::new(config)?;
    sandbox.run(ticks)?;
    let summary = sandbox.summary();
    log_summary(&summary);
    Ok(summary)
}

pub fn log_summary(summary: &RunSummary) {
    tracing::info!(
        ticks = summary.ticks,
        sim_time = summary.sim_time,
        previews = summary.preview_refreshes,
        expired = summary.expired,
        "run summary"
    );
    tracing::info!(
        min_elevation = summary.elevation.min(),
        max_elevation = summary.elevation.max(),
        lowest_radius = summary.surface_radius.0,
        highest_radius = summary.surface_radius.1,
        lod_level = summary.lod_level,
        lod_switches = summary.lod_switches,
        visible_chunks = summary.visible_chunks,
        total_chunks = summary.total_chunks,
        "planet surface"
    );
    for body in &summary.bodies {
        tracing::info!(
            name = %body.name,
            position = ?body.position,
            speed = body.velocity.length(),
            altitude = ?body.altitude,
            density = body.density,
            "final body state"
        );
    }
    for (name, status) in &summary.trails {
        tracing::info!(name = %name, status = ?status, "orbit trail");
    }
}
