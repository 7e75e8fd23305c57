//! Horizon culling for spherical planets.
//!
//! A surface patch is hidden when it lies entirely beyond the horizon as
//! seen from the camera. Patches are tested by bounding sphere.

use glam::DVec3;

/// Horizon test state for one camera/planet pair.
#[derive(Clone, Debug)]
pub struct HorizonCuller {
    planet_center: DVec3,
    radius: f64,
    /// Unit vector from the planet center toward the camera.
    camera_dir: DVec3,
    camera_distance: f64,
    /// `r / d`, the cosine of the visible cap's half-angle.
    cos_horizon: f64,
}

impl HorizonCuller {
    pub fn new(camera_pos: DVec3, planet_center: DVec3, radius: f64) -> Self {
        let offset = camera_pos - planet_center;
        let camera_distance = offset.length();
        let camera_dir = offset.try_normalize().unwrap_or(DVec3::Y);
        let cos_horizon = if camera_distance > radius {
            radius / camera_distance
        } else {
            0.0
        };
        Self {
            planet_center,
            radius,
            camera_dir,
            camera_distance,
            cos_horizon,
        }
    }

    /// `false` only when the bounding sphere is certainly below the horizon.
    ///
    /// A point at angle `α` from the sub-camera point is visible while
    /// `cos α >= r / d`; the bounding radius widens that cap by its angular
    /// size. Cameras inside the planet see everything.
    pub fn is_above_horizon(&self, chunk_center: DVec3, chunk_radius: f64) -> bool {
        if self.camera_distance <= self.radius {
            return true;
        }
        let to_chunk = chunk_center - self.planet_center;
        let chunk_dist = to_chunk.length();
        if chunk_dist <= chunk_radius || chunk_dist < 1e-10 {
            return true;
        }

        let cos_angle = to_chunk.dot(self.camera_dir) / chunk_dist;

        let sin_margin = chunk_radius / chunk_dist;
        let cos_margin = (1.0 - sin_margin * sin_margin).max(0.0).sqrt();
        let sin_horizon = (1.0 - self.cos_horizon * self.cos_horizon).max(0.0).sqrt();
        // cos(horizon + margin)
        let cos_threshold = self.cos_horizon * cos_margin - sin_horizon * sin_margin;

        cos_angle >= cos_threshold
    }

    /// Straight-line distance from the camera to the horizon.
    pub fn horizon_distance(&self) -> f64 {
        if self.camera_distance <= self.radius {
            return 0.0;
        }
        (self.camera_distance * self.camera_distance - self.radius * self.radius).sqrt()
    }

    pub fn camera_altitude(&self) -> f64 {
        (self.camera_distance - self.radius).max(0.0)
    }
}
