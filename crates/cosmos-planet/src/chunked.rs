//! Cube-face chunked planet surface.
//!
//! Chunks regenerate independently, so editing terrain near one region only
//! costs that region. Visibility combines an orientation test against the
//! camera with horizon culling.

use std::time::Instant;

use cosmos_config::PlanetConfig;
use cosmos_lod::{HorizonCuller, OrientationCuller};
use cosmos_math::MinMax;
use cosmos_mesh::{ChunkGrid, Mesh, chunk_layout};
use cosmos_terrain::TerrainModel;
use glam::DVec3;

use crate::displace::displace;
use crate::error::PlanetError;

/// One displaced tile of the surface, in planet-local coordinates.
#[derive(Clone, Debug)]
pub struct SurfaceChunk {
    pub grid: ChunkGrid,
    pub mesh: Mesh,
    /// Unscaled elevation bounds of this chunk alone.
    pub bounds: MinMax,
    /// Radial direction through the middle of the chunk.
    pub normal: DVec3,
    /// Center of the chunk's bounding sphere.
    pub center: DVec3,
    /// Radius of the chunk's bounding sphere.
    pub bounding_radius: f64,
}

impl SurfaceChunk {
    fn build(grid: ChunkGrid, terrain: &mut TerrainModel) -> Self {
        let mut bounds = MinMax::new();
        let mesh = displace(&grid.generate_unit(), &terrain.sampler(), &mut bounds);

        let normal = grid.center_direction().as_dvec3();
        let center = mesh
            .bounds()
            .map_or(DVec3::ZERO, |aabb| aabb.center().as_dvec3());
        let bounding_radius = mesh
            .positions
            .iter()
            .map(|p| p.as_dvec3().distance(center))
            .fold(0.0, f64::max);

        Self {
            grid,
            mesh,
            bounds,
            normal,
            center,
            bounding_radius,
        }
    }
}

/// All `6 × chunks²` surface chunks of one planet.
pub struct ChunkedPlanet {
    terrain: TerrainModel,
    chunks: Vec<SurfaceChunk>,
    bounds: MinMax,
}

impl ChunkedPlanet {
    /// Lay out and generate every chunk.
    pub fn new(terrain: TerrainModel, chunks: u32, resolution: u32) -> Result<Self, PlanetError> {
        let grids = chunk_layout(chunks, resolution)?;
        let mut planet = Self {
            terrain,
            chunks: Vec::with_capacity(grids.len()),
            bounds: MinMax::new(),
        };
        planet.chunks = grids
            .into_iter()
            .map(|grid| SurfaceChunk::build(grid, &mut planet.terrain))
            .collect();
        planet.recompute_bounds();
        Ok(planet)
    }

    pub fn from_config(config: &PlanetConfig) -> Result<Self, PlanetError> {
        let terrain = TerrainModel::from_config(config)?;
        Self::new(terrain, config.chunk_count, config.resolution)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunks(&self) -> &[SurfaceChunk] {
        &self.chunks
    }

    pub fn chunk(&self, index: usize) -> Option<&SurfaceChunk> {
        self.chunks.get(index)
    }

    pub fn terrain(&self) -> &TerrainModel {
        &self.terrain
    }

    pub fn terrain_mut(&mut self) -> &mut TerrainModel {
        &mut self.terrain
    }

    /// Elevation bounds over all chunks.
    pub fn elevation_bounds(&self) -> MinMax {
        self.bounds
    }

    fn recompute_bounds(&mut self) {
        self.bounds.clear();
        for chunk in &self.chunks {
            self.bounds.merge(&chunk.bounds);
        }
    }

    /// Regenerate every chunk.
    pub fn regenerate_all(&mut self) {
        let started = Instant::now();
        let terrain = &mut self.terrain;
        for chunk in &mut self.chunks {
            *chunk = SurfaceChunk::build(chunk.grid, terrain);
        }
        self.recompute_bounds();
        tracing::info!(
            chunks = self.chunks.len(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
            "chunked surface regenerated"
        );
    }

    /// Regenerate one chunk, leaving the others untouched.
    pub fn regenerate_chunk(&mut self, index: usize) -> Result<(), PlanetError> {
        let count = self.chunks.len();
        let chunk = self
            .chunks
            .get_mut(index)
            .ok_or(PlanetError::ChunkOutOfRange { index, count })?;
        *chunk = SurfaceChunk::build(chunk.grid, &mut self.terrain);
        self.recompute_bounds();
        tracing::debug!(index, "chunk regenerated");
        Ok(())
    }

    /// Indices of chunks that may be visible from the camera.
    ///
    /// `planet_center` places the planet-local chunks in world space.
    pub fn visible_chunks(
        &self,
        camera_pos: DVec3,
        camera_forward: DVec3,
        planet_center: DVec3,
    ) -> Vec<usize> {
        let orientation = OrientationCuller::new(camera_pos, camera_forward);
        // Lowest surface radius, so valleys never hide what is behind them.
        let occluder = if self.bounds.is_empty() {
            self.terrain.radius()
        } else {
            self.terrain.calculate_scaled_elevation(self.bounds.min())
        };
        let horizon = HorizonCuller::new(camera_pos, planet_center, occluder);

        self.chunks
            .iter()
            .enumerate()
            .filter(|(_, chunk)| {
                let center = planet_center + chunk.center;
                let half_angle = chunk.grid.angular_size() as f64 * 0.5;
                orientation.is_visible(center, chunk.normal, half_angle, chunk.bounding_radius)
                    && horizon.is_above_horizon(center, chunk.bounding_radius)
            })
            .map(|(i, _)| i)
            .collect()
    }
}
