//! Subdivided icosahedron.
//!
//! Level `n` has `20 * 4^n` triangles and `10 * 4^n + 2` vertices. Shared
//! edge midpoints are deduplicated through a cache keyed by the ordered
//! index pair, so the vertex count is exact.

use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::error::MeshError;
use crate::mesh::Mesh;

/// Deepest supported subdivision (≈10.5M triangles).
pub const MAX_RECURSION: u32 = 10;

/// `20 * 4^level`.
pub const fn triangle_count(level: u32) -> usize {
    20 * 4usize.pow(level)
}

/// `10 * 4^level + 2`.
pub const fn vertex_count(level: u32) -> usize {
    10 * 4usize.pow(level) + 2
}

const BASE_INDICES: [u32; 60] = [
    0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, //
    1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6, 7, 1, 8, //
    3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, //
    4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9, 8, 1,
];

fn base_positions() -> Vec<Vec3> {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
    .into_iter()
    .map(Vec3::normalize)
    .collect()
}

struct MidpointCache {
    map: FxHashMap<(u32, u32), u32>,
}

impl MidpointCache {
    fn with_capacity(capacity: usize) -> Self {
        let mut map = FxHashMap::default();
        map.reserve(capacity);
        Self { map }
    }

    /// Index of the normalized midpoint of edge `a-b`, inserting it once.
    fn midpoint(&mut self, a: u32, b: u32, positions: &mut Vec<Vec3>) -> u32 {
        let key = (a.min(b), a.max(b));
        *self.map.entry(key).or_insert_with(|| {
            let mid = (positions[a as usize] + positions[b as usize]).normalize();
            positions.push(mid);
            (positions.len() - 1) as u32
        })
    }
}

/// Split every triangle `(v1, v2, v3)` into four using edge midpoints
/// `a = v1v2`, `b = v2v3`, `c = v3v1`.
fn subdivide(positions: &mut Vec<Vec3>, indices: &[u32]) -> Vec<u32> {
    let mut cache = MidpointCache::with_capacity(indices.len() / 2);
    let mut next = Vec::with_capacity(indices.len() * 4);

    for tri in indices.chunks_exact(3) {
        let (v1, v2, v3) = (tri[0], tri[1], tri[2]);
        let a = cache.midpoint(v1, v2, positions);
        let b = cache.midpoint(v2, v3, positions);
        let c = cache.midpoint(v3, v1, positions);

        next.extend_from_slice(&[v1, a, c]);
        next.extend_from_slice(&[v2, b, a]);
        next.extend_from_slice(&[v3, c, b]);
        next.extend_from_slice(&[a, b, c]);
    }

    next
}

/// Unit-sphere icosphere at `level`, normals set to the radial direction.
fn unit(level: u32) -> Mesh {
    let mut positions = base_positions();
    positions.reserve(vertex_count(level) - positions.len());
    let mut indices = BASE_INDICES.to_vec();

    for _ in 0..level {
        indices = subdivide(&mut positions, &indices);
    }

    let normals = positions.clone();
    Mesh {
        positions,
        indices,
        normals,
        uvs: Vec::new(),
    }
}

/// Generate an icosphere with `recursion` subdivision passes and every
/// vertex at distance `radius` from the origin.
pub fn generate(recursion: u32, radius: f32) -> Result<Mesh, MeshError> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(MeshError::InvalidRadius(radius as f64));
    }
    if recursion > MAX_RECURSION {
        return Err(MeshError::RecursionTooDeep {
            level: recursion,
            max: MAX_RECURSION,
        });
    }

    let mut mesh = unit(recursion);
    if radius != 1.0 {
        for p in &mut mesh.positions {
            *p *= radius;
        }
    }
    Ok(mesh)
}
