//! Planet surfaces: terrain-displaced sphere meshes with LOD and chunk culling.
//!
//! [`PlanetSurface`] keeps one icosphere mesh per detail level and swaps
//! between them by camera distance. [`ChunkedPlanet`] tiles the cube faces so
//! single chunks can be regenerated and culled independently.

mod chunked;
mod displace;
mod error;
mod surface;

pub use chunked::{ChunkedPlanet, SurfaceChunk};
pub use displace::{displace, generate_mesh};
pub use error::PlanetError;
pub use surface::{PlanetSurface, RegenerationRequest};
