//! Small f64 vector helpers, running bounds, and physical constants shared by the Cosmos crates.

mod bounds;
mod range;
mod units;
mod vector;

pub use bounds::MinMax;
pub use range::Range;
pub use units::{
    EARTH_MASS_KG, EARTH_RADIUS_M, GRAVITATIONAL_CONSTANT, WATER_DENSITY_KG_M3,
    circular_orbit_speed,
};
pub use vector::{clamp01, distance, distance_squared, remap, remap_clamped};
