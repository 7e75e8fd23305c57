//! Sphere mesh topology for procedural planets.
//!
//! Two base shapes are provided: a subdivided icosahedron ([`icosphere`])
//! and a cube-face chunk grid ([`ChunkGrid`]) that supports partial
//! regeneration and per-chunk culling. Both produce unit-sphere [`Mesh`]es
//! that the planet layer displaces by terrain elevation.

mod chunk;
mod cube_face;
mod error;
pub mod icosphere;
mod mesh;
mod vertex;

pub use chunk::{ChunkGrid, MAX_CHUNK_RESOLUTION, chunk_layout};
pub use cube_face::CubeFace;
pub use error::MeshError;
pub use mesh::{Aabb, Mesh};
pub use vertex::SurfaceVertex;
