//! The six faces of the unit cube used by the chunked surface.

use glam::Vec3;

/// A cube face, named by its outward axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum CubeFace {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

impl CubeFace {
    /// All six faces in canonical order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosX,
        CubeFace::NegX,
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];

    #[must_use]
    pub fn opposite(self) -> CubeFace {
        match self {
            CubeFace::PosX => CubeFace::NegX,
            CubeFace::NegX => CubeFace::PosX,
            CubeFace::PosY => CubeFace::NegY,
            CubeFace::NegY => CubeFace::PosY,
            CubeFace::PosZ => CubeFace::NegZ,
            CubeFace::NegZ => CubeFace::PosZ,
        }
    }

    /// Outward unit normal ("local up").
    #[must_use]
    pub fn normal(self) -> Vec3 {
        match self {
            CubeFace::PosX => Vec3::X,
            CubeFace::NegX => Vec3::NEG_X,
            CubeFace::PosY => Vec3::Y,
            CubeFace::NegY => Vec3::NEG_Y,
            CubeFace::PosZ => Vec3::Z,
            CubeFace::NegZ => Vec3::NEG_Z,
        }
    }

    /// First in-plane axis: the normal's components rotated, `(n.y, n.z, n.x)`.
    #[must_use]
    pub fn axis_a(self) -> Vec3 {
        let n = self.normal();
        Vec3::new(n.y, n.z, n.x)
    }

    /// Second in-plane axis, `normal × axis_a`.
    #[must_use]
    pub fn axis_b(self) -> Vec3 {
        self.normal().cross(self.axis_a())
    }

    /// Point on the cube face for face parameters `(s, t)` in `[0, 1]²`.
    #[must_use]
    pub fn cube_point(self, s: f32, t: f32) -> Vec3 {
        self.normal() + (s - 0.5) * 2.0 * self.axis_a() + (t - 0.5) * 2.0 * self.axis_b()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normals_are_unit_length() {
        for face in CubeFace::ALL {
            assert!((face.normal().length() - 1.0).abs() < 1e-6, "{face:?}");
        }
    }

    #[test]
    fn test_opposite_face_normals_are_antiparallel() {
        for face in CubeFace::ALL {
            assert!((face.normal() + face.opposite().normal()).length() < 1e-6);
            assert_eq!(face.opposite().opposite(), face);
        }
    }

    #[test]
    fn test_axes_are_orthonormal() {
        for face in CubeFace::ALL {
            let (n, a, b) = (face.normal(), face.axis_a(), face.axis_b());
            assert!(n.dot(a).abs() < 1e-6, "{face:?}: normal·a");
            assert!(n.dot(b).abs() < 1e-6, "{face:?}: normal·b");
            assert!(a.dot(b).abs() < 1e-6, "{face:?}: a·b");
            assert!((b.length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_axis_a_cross_axis_b_equals_normal() {
        for face in CubeFace::ALL {
            let cross = face.axis_a().cross(face.axis_b());
            assert!(
                (cross - face.normal()).length() < 1e-6,
                "a x b != normal for {face:?}: got {cross:?}"
            );
        }
    }

    #[test]
    fn test_cube_point_corners_and_center() {
        for face in CubeFace::ALL {
            assert_eq!(face.cube_point(0.5, 0.5), face.normal());
            let corner = face.cube_point(0.0, 1.0);
            assert!((corner.abs() - Vec3::ONE).length() < 1e-6, "{face:?}: {corner}");
        }
    }
}
