//! Elevation displacement of unit-sphere meshes.

use cosmos_math::MinMax;
use cosmos_mesh::Mesh;
use cosmos_terrain::{ElevationSampler, TerrainModel};

/// Displace every vertex of `base` along its radial direction.
///
/// Each vertex moves to `normalize(v) * radius * (1 + elevation)`. Unscaled
/// elevations are folded into `bounds` (which is not cleared). Normals are
/// recomputed from the displaced surface and UVs encode
/// `(angle(radial, normal) / 90°, unscaled elevation)`.
pub fn displace(base: &Mesh, sampler: &ElevationSampler<'_>, bounds: &mut MinMax) -> Mesh {
    let mut radial = Vec::with_capacity(base.vertex_count());
    let mut elevations = Vec::with_capacity(base.vertex_count());
    let mut positions = Vec::with_capacity(base.vertex_count());

    for p in &base.positions {
        let dir = p.normalize_or_zero();
        let unscaled = sampler.unscaled(dir.as_dvec3());
        let scaled = sampler.scaled(unscaled);

        positions.push(dir * scaled as f32);
        radial.push(dir);
        elevations.push(unscaled);
        bounds.add(unscaled);
    }

    let mut mesh = Mesh {
        positions,
        indices: base.indices.clone(),
        normals: Vec::new(),
        uvs: Vec::new(),
    };
    mesh.recalculate_normals();

    mesh.uvs = radial
        .iter()
        .zip(&mesh.normals)
        .zip(&elevations)
        .map(|((dir, normal), &elevation)| {
            let slope = dir.dot(*normal).clamp(-1.0, 1.0).acos().to_degrees() / 90.0;
            [slope, elevation as f32]
        })
        .collect();

    mesh
}

/// Displace `base` by `terrain`, returning the mesh and its elevation bounds.
pub fn generate_mesh(terrain: &mut TerrainModel, base: &Mesh) -> (Mesh, MinMax) {
    let mut bounds = MinMax::new();
    let mesh = displace(base, &terrain.sampler(), &mut bounds);
    (mesh, bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmos_mesh::icosphere;
    use cosmos_terrain::{FilterKind, NoiseLayer, NoiseSettings};

    fn terrain(radius: f64, strength: f64) -> TerrainModel {
        TerrainModel::new(
            radius,
            vec![NoiseLayer::new(NoiseSettings {
                kind: FilterKind::Simple,
                strength,
                octaves: 3,
                min: 0.8,
                seed: 11,
                ..Default::default()
            })],
        )
        .unwrap()
    }

    #[test]
    fn test_flat_terrain_keeps_sphere() {
        let mut t = TerrainModel::new(5.0, Vec::new()).unwrap();
        let base = icosphere::generate(2, 1.0).unwrap();
        let (mesh, bounds) = generate_mesh(&mut t, &base);
        for p in &mesh.positions {
            assert!((p.length() - 5.0).abs() < 1e-4);
        }
        assert_eq!(bounds.min(), 0.0);
        assert_eq!(bounds.max(), 0.0);
        for uv in &mesh.uvs {
            assert!(uv[0].abs() < 0.05, "flat sphere slope {}", uv[0]);
            assert_eq!(uv[1], 0.0);
        }
    }

    #[test]
    fn test_vertices_at_scaled_elevation() {
        let mut t = terrain(100.0, 0.1);
        let base = icosphere::generate(2, 1.0).unwrap();
        let (mesh, bounds) = generate_mesh(&mut t, &base);

        let sampler = t.sampler();
        for (p, b) in mesh.positions.iter().zip(&base.positions) {
            let expected = sampler.scaled(sampler.unscaled(b.normalize().as_dvec3()));
            assert!((p.length() as f64 - expected).abs() < 1e-3);
        }
        assert!(!bounds.is_empty());
        assert!(bounds.max() >= bounds.min());
    }

    #[test]
    fn test_bounds_match_uv_elevations() {
        let mut t = terrain(10.0, 0.2);
        let base = icosphere::generate(2, 1.0).unwrap();
        let (mesh, bounds) = generate_mesh(&mut t, &base);
        let from_uvs: MinMax = mesh.uvs.iter().map(|uv| uv[1] as f64).collect();
        assert!((from_uvs.min() - bounds.min()).abs() < 1e-6);
        assert!((from_uvs.max() - bounds.max()).abs() < 1e-6);
    }

    #[test]
    fn test_topology_preserved() {
        let mut t = terrain(10.0, 0.2);
        let base = icosphere::generate(1, 1.0).unwrap();
        let (mesh, _) = generate_mesh(&mut t, &base);
        assert_eq!(mesh.indices, base.indices);
        assert_eq!(mesh.normals.len(), mesh.vertex_count());
        mesh.validate().unwrap();
    }

    #[test]
    fn test_deterministic() {
        let base = icosphere::generate(2, 1.0).unwrap();
        let (a, _) = generate_mesh(&mut terrain(10.0, 0.2), &base);
        let (b, _) = generate_mesh(&mut terrain(10.0, 0.2), &base);
        assert_eq!(a, b);
    }
}
