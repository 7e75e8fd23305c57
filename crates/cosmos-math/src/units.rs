/// Newtonian gravitational constant in m³·kg⁻¹·s⁻² (CODATA 2018).
pub const GRAVITATIONAL_CONSTANT: f64 = 6.674_30e-11;

/// Mass of the Earth in kilograms.
pub const EARTH_MASS_KG: f64 = 5.972e24;

/// Mean radius of the Earth in meters.
pub const EARTH_RADIUS_M: f64 = 6.371e6;

/// Density of liquid water in kg/m³.
pub const WATER_DENSITY_KG_M3: f64 = 997.0;

/// Speed of a circular orbit of radius `radius` around a point mass `central_mass`.
///
/// `v = sqrt(G * M / r)`. Returns `0.0` for a non-positive radius.
pub fn circular_orbit_speed(central_mass: f64, radius: f64) -> f64 {
    if radius <= 0.0 {
        return 0.0;
    }
    (GRAVITATIONAL_CONSTANT * central_mass / radius).sqrt()
}
