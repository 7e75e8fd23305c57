use cosmos_config::ConfigError;
use cosmos_mesh::MeshError;

/// Errors raised while building or regenerating a planet surface.
#[derive(Debug, thiserror::Error)]
pub enum PlanetError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error("chunk {index} out of range ({count} chunks)")]
    ChunkOutOfRange { index: usize, count: usize },
}
