//! Indexed triangle mesh with per-vertex normals and UVs.

use glam::Vec3;

use crate::error::MeshError;
use crate::vertex::SurfaceVertex;

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }
}

/// Indexed triangle list.
///
/// Triangles are wound so that `(b - a) × (c - a)` points out of the sphere.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    /// Three indices per triangle.
    pub indices: Vec<u32>,
    /// Empty, or one per position.
    pub normals: Vec<Vec3>,
    /// Empty, or one per position.
    pub uvs: Vec<[f32; 2]>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Check the index buffer and attribute lengths.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::NotTriangles(self.indices.len()));
        }
        let vertex_count = self.positions.len();
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }
        for (attribute, len) in [("normals", self.normals.len()), ("uvs", self.uvs.len())] {
            if len != 0 && len != vertex_count {
                return Err(MeshError::AttributeLength {
                    attribute,
                    len,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Smooth normals: area-weighted sum of adjacent face normals.
    ///
    /// Vertices with no usable adjacent face fall back to their radial
    /// direction.
    pub fn recalculate_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for [a, b, c] in self.triangles() {
            let (pa, pb, pc) = (
                self.positions[a as usize],
                self.positions[b as usize],
                self.positions[c as usize],
            );
            // Unnormalized cross product is twice the triangle area.
            let face = (pb - pa).cross(pc - pa);
            normals[a as usize] += face;
            normals[b as usize] += face;
            normals[c as usize] += face;
        }
        for (normal, position) in normals.iter_mut().zip(&self.positions) {
            *normal = normal
                .try_normalize()
                .or_else(|| position.try_normalize())
                .unwrap_or(Vec3::Y);
        }
        self.normals = normals;
    }

    /// Bounding box of all positions, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Aabb> {
        let first = *self.positions.first()?;
        let (min, max) = self
            .positions
            .iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        Some(Aabb { min, max })
    }

    /// Interleave into renderer vertices. Missing attributes are zeroed.
    pub fn to_vertices(&self) -> Vec<SurfaceVertex> {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, p)| SurfaceVertex {
                position: p.to_array(),
                normal: self.normals.get(i).map_or([0.0; 3], |n| n.to_array()),
                uv: self.uvs.get(i).copied().unwrap_or([0.0; 2]),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        Mesh {
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, -1.0),
                Vec3::new(0.0, 0.0, -1.0),
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
            ..Default::default()
        }
    }

    #[test]
    fn test_flat_quad_normals_point_up() {
        let mut mesh = quad();
        mesh.recalculate_normals();
        for n in &mesh.normals {
            assert!((*n - Vec3::Y).length() < 1e-6, "normal {n}");
        }
    }

    #[test]
    fn test_validate_ok() {
        assert_eq!(quad().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_index() {
        let mut mesh = quad();
        mesh.indices[4] = 9;
        assert_eq!(
            mesh.validate(),
            Err(MeshError::IndexOutOfRange {
                index: 9,
                vertex_count: 4
            })
        );
    }

    #[test]
    fn test_validate_rejects_partial_triangle() {
        let mut mesh = quad();
        mesh.indices.push(0);
        assert_eq!(mesh.validate(), Err(MeshError::NotTriangles(7)));
    }

    #[test]
    fn test_validate_rejects_short_uvs() {
        let mut mesh = quad();
        mesh.uvs = vec![[0.0, 0.0]];
        assert!(matches!(
            mesh.validate(),
            Err(MeshError::AttributeLength { attribute: "uvs", .. })
        ));
    }

    #[test]
    fn test_bounds() {
        let bounds = quad().bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(bounds.center(), Vec3::new(0.5, 0.0, -0.5));
        assert!(Mesh::default().bounds().is_none());
    }

    #[test]
    fn test_isolated_vertex_normal_falls_back_to_radial() {
        let mut mesh = quad();
        mesh.positions.push(Vec3::new(0.0, 0.0, 2.0));
        mesh.recalculate_normals();
        assert_eq!(mesh.normals[4], Vec3::Z);
    }

    #[test]
    fn test_to_vertices_fills_missing_attributes() {
        let verts = quad().to_vertices();
        assert_eq!(verts.len(), 4);
        assert_eq!(verts[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(verts[1].normal, [0.0; 3]);
    }
}
