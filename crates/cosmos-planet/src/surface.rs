//! Whole-planet surface with a precomputed mesh per detail level.

use std::time::Instant;

use cosmos_config::PlanetConfig;
use cosmos_lod::LodSelector;
use cosmos_math::MinMax;
use cosmos_mesh::{Mesh, icosphere};
use cosmos_terrain::TerrainModel;
use glam::DVec3;

use crate::displace::displace;
use crate::error::PlanetError;

/// A pending regeneration. Requests made within one frame are merged by OR-ing flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegenerationRequest {
    /// Rebuild noise filters from the current layer settings.
    pub recalculate_noise: bool,
    /// Rebuild the base icospheres as well as the displacement.
    pub recalculate_all: bool,
}

impl RegenerationRequest {
    fn merge(&mut self, other: RegenerationRequest) {
        self.recalculate_noise |= other.recalculate_noise;
        self.recalculate_all |= other.recalculate_all;
    }
}

/// Terrain-displaced icosphere with distance-based LOD.
///
/// Detail level `min_detail` uses `max_recursion` subdivisions; each coarser
/// level drops one.
pub struct PlanetSurface {
    terrain: TerrainModel,
    selector: LodSelector,
    max_recursion: u32,
    base_meshes: Vec<Mesh>,
    lod_meshes: Vec<Mesh>,
    bounds: MinMax,
    current_level: u32,
    pending: Option<RegenerationRequest>,
    generation: u64,
}

impl PlanetSurface {
    pub fn new(
        terrain: TerrainModel,
        selector: LodSelector,
        max_recursion: u32,
    ) -> Result<Self, PlanetError> {
        let span = selector.max_detail() - selector.min_detail();
        if span > max_recursion {
            return Err(cosmos_config::ConfigError::invalid(
                "planet.max_detail",
                "detail span must not exceed max_recursion",
            )
            .into());
        }
        if max_recursion > icosphere::MAX_RECURSION {
            return Err(cosmos_mesh::MeshError::RecursionTooDeep {
                level: max_recursion,
                max: icosphere::MAX_RECURSION,
            }
            .into());
        }
        let current_level = selector.max_detail();
        Ok(Self {
            terrain,
            selector,
            max_recursion,
            base_meshes: Vec::new(),
            lod_meshes: Vec::new(),
            bounds: MinMax::new(),
            current_level,
            pending: None,
            generation: 0,
        })
    }

    /// Build from config and generate every detail level.
    pub fn from_config(config: &PlanetConfig) -> Result<Self, PlanetError> {
        let terrain = TerrainModel::from_config(config)?;
        let selector = LodSelector::from_config(config)?;
        let mut surface = Self::new(terrain, selector, config.max_recursion)?;
        surface.regenerate(true, true)?;
        Ok(surface)
    }

    /// Subdivision count of the mesh used at `level`.
    pub fn recursion_for_level(&self, level: u32) -> u32 {
        let level = level.clamp(self.selector.min_detail(), self.selector.max_detail());
        self.max_recursion - (level - self.selector.min_detail())
    }

    /// Regenerate all detail levels now.
    ///
    /// Elevation bounds are reset first. `recalculate_noise` rebuilds the
    /// noise filters; `recalculate_all` also rebuilds the base icospheres.
    pub fn regenerate(
        &mut self,
        recalculate_noise: bool,
        recalculate_all: bool,
    ) -> Result<(), PlanetError> {
        let started = Instant::now();
        self.bounds.clear();
        if recalculate_noise {
            self.terrain.mark_dirty();
        }

        let levels = self.selector.levels();
        if recalculate_all || self.base_meshes.len() != levels.clone().count() {
            self.base_meshes = levels
                .clone()
                .map(|level| icosphere::generate(self.recursion_for_level(level), 1.0))
                .collect::<Result<_, _>>()?;
        }

        let sampler = self.terrain.sampler();
        let bounds = &mut self.bounds;
        self.lod_meshes = self
            .base_meshes
            .iter()
            .map(|base| displace(base, &sampler, bounds))
            .collect();

        self.generation += 1;
        self.pending = None;
        tracing::info!(
            levels = self.lod_meshes.len(),
            finest_vertices = self.lod_meshes.first().map_or(0, Mesh::vertex_count),
            min_elevation = self.bounds.min(),
            max_elevation = self.bounds.max(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
            "planet surface regenerated"
        );
        Ok(())
    }

    /// Queue a regeneration. Repeated requests before [`flush`](Self::flush)
    /// collapse into one.
    pub fn request_regeneration(&mut self, recalculate_noise: bool, recalculate_all: bool) {
        let request = RegenerationRequest {
            recalculate_noise,
            recalculate_all,
        };
        self.pending.get_or_insert_with(Default::default).merge(request);
    }

    pub fn pending_regeneration(&self) -> Option<RegenerationRequest> {
        self.pending
    }

    /// Run the queued regeneration, if any. Returns whether one ran.
    pub fn flush(&mut self) -> Result<bool, PlanetError> {
        match self.pending {
            Some(request) => {
                self.regenerate(request.recalculate_noise, request.recalculate_all)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Edit the terrain. Pair with [`request_regeneration`](Self::request_regeneration).
    pub fn terrain_mut(&mut self) -> &mut TerrainModel {
        &mut self.terrain
    }

    pub fn terrain(&self) -> &TerrainModel {
        &self.terrain
    }

    pub fn selector(&self) -> &LodSelector {
        &self.selector
    }

    pub fn radius(&self) -> f64 {
        self.terrain.radius()
    }

    /// Number of completed regenerations.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Unscaled elevation bounds of the last regeneration.
    pub fn elevation_bounds(&self) -> MinMax {
        self.bounds
    }

    /// `(lowest, highest)` distance of the surface from the planet center.
    pub fn surface_radius_range(&self) -> (f64, f64) {
        if self.bounds.is_empty() {
            let r = self.radius();
            return (r, r);
        }
        (
            self.terrain.calculate_scaled_elevation(self.bounds.min()),
            self.terrain.calculate_scaled_elevation(self.bounds.max()),
        )
    }

    /// Precomputed mesh for a detail level, `None` before the first regeneration.
    pub fn mesh(&self, level: u32) -> Option<&Mesh> {
        let index = level.checked_sub(self.selector.min_detail())?;
        self.lod_meshes.get(index as usize)
    }

    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    pub fn current_mesh(&self) -> Option<&Mesh> {
        self.mesh(self.current_level)
    }

    /// Select the detail level for a camera. Returns `true` if it changed.
    pub fn update_lod(&mut self, camera_pos: DVec3, planet_center: DVec3) -> bool {
        let level = self.selector.select_for_camera(camera_pos, planet_center);
        if level == self.current_level {
            return false;
        }
        tracing::debug!(from = self.current_level, to = level, "planet LOD switch");
        self.current_level = level;
        true
    }
}
