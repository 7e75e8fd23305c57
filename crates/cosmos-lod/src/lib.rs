//! Level-of-detail selection and chunk visibility for spherical planets.

mod horizon_culling;
mod orientation;
mod selector;

pub use horizon_culling::HorizonCuller;
pub use orientation::OrientationCuller;
pub use selector::LodSelector;
