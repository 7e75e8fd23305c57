//! Chunk orientation test against the camera view.

use glam::DVec3;

/// Rejects surface chunks that face away from the camera or sit behind it.
#[derive(Clone, Debug)]
pub struct OrientationCuller {
    camera_pos: DVec3,
    forward: DVec3,
}

impl OrientationCuller {
    /// `forward` need not be normalized. A zero vector disables the
    /// behind-camera test.
    pub fn new(camera_pos: DVec3, forward: DVec3) -> Self {
        Self {
            camera_pos,
            forward: forward.normalize_or_zero(),
        }
    }

    /// `true` if some part of a curved patch with outward `normal` at
    /// `center` can face the camera.
    ///
    /// `half_angle` is the patch's angular half-size; normals across the
    /// patch deviate from `normal` by at most that much.
    pub fn is_facing(&self, center: DVec3, normal: DVec3, half_angle: f64) -> bool {
        let Some(to_camera) = (self.camera_pos - center).try_normalize() else {
            return true;
        };
        normal.dot(to_camera) >= -half_angle.sin()
    }

    /// `true` unless the bounding sphere lies entirely behind the camera plane.
    pub fn is_in_front(&self, center: DVec3, radius: f64) -> bool {
        self.forward.dot(center - self.camera_pos) >= -radius
    }

    /// Both tests.
    pub fn is_visible(&self, center: DVec3, normal: DVec3, half_angle: f64, radius: f64) -> bool {
        self.is_in_front(center, radius) && self.is_facing(center, normal, half_angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_facing_camera() {
        let culler = OrientationCuller::new(DVec3::new(0.0, 10.0, 0.0), DVec3::NEG_Y);
        assert!(culler.is_facing(DVec3::Y, DVec3::Y, 0.1));
    }

    #[test]
    fn test_patch_facing_away() {
        let culler = OrientationCuller::new(DVec3::new(0.0, 10.0, 0.0), DVec3::NEG_Y);
        assert!(!culler.is_facing(DVec3::NEG_Y, DVec3::NEG_Y, 0.1));
    }

    #[test]
    fn test_grazing_patch_kept_by_half_angle() {
        let culler = OrientationCuller::new(DVec3::new(10.0, 0.0, 0.0), DVec3::NEG_X);
        // Normal slightly past perpendicular to the view line.
        let normal = DVec3::new(-0.05, 1.0, 0.0).normalize();
        assert!(!culler.is_facing(DVec3::ZERO, normal, 0.0));
        assert!(culler.is_facing(DVec3::ZERO, normal, 0.2));
    }

    #[test]
    fn test_behind_camera_rejected() {
        let culler = OrientationCuller::new(DVec3::ZERO, DVec3::Z);
        assert!(culler.is_in_front(DVec3::new(0.0, 0.0, 5.0), 1.0));
        assert!(!culler.is_in_front(DVec3::new(0.0, 0.0, -5.0), 1.0));
        assert!(culler.is_in_front(DVec3::new(0.0, 0.0, -5.0), 6.0));
    }

    #[test]
    fn test_zero_forward_keeps_everything_in_front() {
        let culler = OrientationCuller::new(DVec3::ZERO, DVec3::ZERO);
        assert!(culler.is_in_front(DVec3::new(0.0, 0.0, -5.0), 0.0));
    }

    #[test]
    fn test_is_visible_combines_both() {
        let culler = OrientationCuller::new(DVec3::new(0.0, 10.0, 0.0), DVec3::NEG_Y);
        assert!(culler.is_visible(DVec3::Y, DVec3::Y, 0.1, 0.5));
        assert!(!culler.is_visible(DVec3::new(0.0, 20.0, 0.0), DVec3::Y, 0.1, 0.5));
    }
}
