//! Cube-face chunk grids.
//!
//! Each cube face is split into `chunks × chunks` tiles. A tile covers the
//! face-parameter rectangle `[min, max]` and is sampled with
//! `resolution × resolution` vertices projected onto the unit sphere.

use glam::{Vec2, Vec3};

use crate::cube_face::CubeFace;
use crate::error::MeshError;
use crate::mesh::Mesh;

/// Largest vertices-per-edge a chunk accepts. Keeps every index in `u32`.
pub const MAX_CHUNK_RESOLUTION: u32 = 1024;

/// One tile of a cube face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkGrid {
    pub face: CubeFace,
    /// Lower corner in face parameters, `[0, 1]²`.
    pub min: Vec2,
    /// Upper corner in face parameters, `[0, 1]²`.
    pub max: Vec2,
    /// Vertices per edge, in `2..=MAX_CHUNK_RESOLUTION`.
    pub resolution: u32,
}

impl ChunkGrid {
    pub fn new(face: CubeFace, min: Vec2, max: Vec2, resolution: u32) -> Result<Self, MeshError> {
        if !(2..=MAX_CHUNK_RESOLUTION).contains(&resolution) {
            return Err(MeshError::InvalidResolution(resolution));
        }
        Ok(Self {
            face,
            min,
            max,
            resolution,
        })
    }

    pub fn vertex_count(&self) -> usize {
        (self.resolution as usize).pow(2)
    }

    pub fn triangle_count(&self) -> usize {
        (self.resolution as usize - 1).pow(2) * 2
    }

    /// Unit-sphere point at grid coordinate `(x, y)`.
    pub fn sphere_point(&self, x: u32, y: u32) -> Vec3 {
        let percent = Vec2::new(x as f32, y as f32) / (self.resolution - 1) as f32;
        let adjusted = percent * (self.max - self.min) + self.min;
        self.face.cube_point(adjusted.x, adjusted.y).normalize()
    }

    /// Direction from the sphere center through the middle of this chunk.
    pub fn center_direction(&self) -> Vec3 {
        let center = self.min.lerp(self.max, 0.5);
        self.face.cube_point(center.x, center.y).normalize()
    }

    /// Vertex positions, row-major (`i = x + y * resolution`).
    pub fn unit_sphere_points(&self) -> Vec<Vec3> {
        let mut points = Vec::with_capacity(self.vertex_count());
        for y in 0..self.resolution {
            for x in 0..self.resolution {
                points.push(self.sphere_point(x, y));
            }
        }
        points
    }

    /// Two triangles per grid cell, wound outward.
    pub fn indices(&self) -> Vec<u32> {
        let res = self.resolution;
        let mut indices = Vec::with_capacity(self.triangle_count() * 3);
        for y in 0..res - 1 {
            for x in 0..res - 1 {
                let i = x + y * res;
                indices.extend_from_slice(&[i, i + res + 1, i + res]);
                indices.extend_from_slice(&[i, i + 1, i + res + 1]);
            }
        }
        indices
    }

    /// Unit-sphere mesh of this chunk with radial normals.
    pub fn generate_unit(&self) -> Mesh {
        let positions = self.unit_sphere_points();
        let normals = positions.clone();
        Mesh {
            positions,
            indices: self.indices(),
            normals,
            uvs: Vec::new(),
        }
    }

    /// Angle (radians) across the chunk as seen from the sphere center.
    pub fn angular_size(&self) -> f32 {
        let a = self.face.cube_point(self.min.x, self.min.y).normalize();
        let b = self.face.cube_point(self.max.x, self.max.y).normalize();
        a.dot(b).clamp(-1.0, 1.0).acos()
    }
}

/// All `6 × chunks²` tiles, face by face, row-major within each face.
pub fn chunk_layout(chunks: u32, resolution: u32) -> Result<Vec<ChunkGrid>, MeshError> {
    if chunks == 0 {
        return Err(MeshError::InvalidChunkCount(chunks));
    }
    let step = 1.0 / chunks as f32;
    let mut grids = Vec::with_capacity(6 * (chunks as usize).pow(2));
    for face in CubeFace::ALL {
        for cy in 0..chunks {
            for cx in 0..chunks {
                let min = Vec2::new(cx as f32, cy as f32) * step;
                let max = Vec2::new((cx + 1) as f32, (cy + 1) as f32) * step;
                grids.push(ChunkGrid::new(face, min, max, resolution)?);
            }
        }
    }
    Ok(grids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_face(face: CubeFace, resolution: u32) -> ChunkGrid {
        ChunkGrid::new(face, Vec2::ZERO, Vec2::ONE, resolution).unwrap()
    }

    #[test]
    fn test_grid_counts() {
        let grid = full_face(CubeFace::PosY, 5);
        let mesh = grid.generate_unit();
        assert_eq!(mesh.vertex_count(), 25);
        assert_eq!(mesh.triangle_count(), 32);
        mesh.validate().unwrap();
    }

    #[test]
    fn test_points_on_unit_sphere() {
        for face in CubeFace::ALL {
            for p in full_face(face, 6).unit_sphere_points() {
                assert!((p.length() - 1.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_triangles_wound_outward() {
        for face in CubeFace::ALL {
            let mesh = full_face(face, 4).generate_unit();
            for [a, b, c] in mesh.triangles() {
                let (pa, pb, pc) = (
                    mesh.positions[a as usize],
                    mesh.positions[b as usize],
                    mesh.positions[c as usize],
                );
                let n = (pb - pa).cross(pc - pa);
                assert!(n.dot(pa + pb + pc) > 0.0, "{face:?} triangle faces inward");
            }
        }
    }

    #[test]
    fn test_layout_covers_all_faces() {
        let grids = chunk_layout(3, 4).unwrap();
        assert_eq!(grids.len(), 54);
        for face in CubeFace::ALL {
            assert_eq!(grids.iter().filter(|g| g.face == face).count(), 9);
        }
    }

    #[test]
    fn test_adjacent_chunks_share_edge_vertices() {
        let grids = chunk_layout(2, 5).unwrap();
        let (left, right) = (grids[0], grids[1]);
        for y in 0..5 {
            let a = left.sphere_point(4, y);
            let b = right.sphere_point(0, y);
            assert!((a - b).length() < 1e-6, "seam mismatch at row {y}");
        }
    }

    #[test]
    fn test_chunk_points_match_full_face() {
        // Chunk (1, 1) of a 2×2 split is the upper-right quarter of the face.
        let grids = chunk_layout(2, 3).unwrap();
        let full = full_face(CubeFace::PosX, 5);
        let quarter = grids[3];
        assert_eq!(quarter.face, CubeFace::PosX);
        assert!((quarter.sphere_point(0, 0) - full.sphere_point(2, 2)).length() < 1e-6);
        assert!((quarter.sphere_point(2, 2) - full.sphere_point(4, 4)).length() < 1e-6);
    }

    #[test]
    fn test_center_direction_of_full_face_is_normal() {
        for face in CubeFace::ALL {
            assert!((full_face(face, 2).center_direction() - face.normal()).length() < 1e-6);
        }
    }

    #[test]
    fn test_angular_size_shrinks_with_more_chunks() {
        let coarse = chunk_layout(1, 2).unwrap()[0].angular_size();
        let fine = chunk_layout(4, 2).unwrap()[0].angular_size();
        assert!(fine < coarse);
    }

    #[test]
    fn test_invalid_parameters() {
        assert_eq!(chunk_layout(0, 4), Err(MeshError::InvalidChunkCount(0)));
        assert_eq!(chunk_layout(2, 1), Err(MeshError::InvalidResolution(1)));
    }

    #[test]
    fn test_resolution_capped() {
        let face = CubeFace::PosX;
        assert!(ChunkGrid::new(face, Vec2::ZERO, Vec2::ONE, MAX_CHUNK_RESOLUTION).is_ok());
        assert_eq!(
            ChunkGrid::new(face, Vec2::ZERO, Vec2::ONE, 65_536),
            Err(MeshError::InvalidResolution(65_536))
        );
        assert_eq!(
            chunk_layout(1, MAX_CHUNK_RESOLUTION + 1),
            Err(MeshError::InvalidResolution(MAX_CHUNK_RESOLUTION + 1))
        );
    }
}
