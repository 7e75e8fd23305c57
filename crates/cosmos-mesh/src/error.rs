/// Errors produced while building or validating meshes.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MeshError {
    #[error("radius must be finite and > 0, got {0}")]
    InvalidRadius(f64),

    #[error("recursion level {level} exceeds the maximum of {max}")]
    RecursionTooDeep { level: u32, max: u32 },

    #[error("chunk resolution must be in 2..=1024, got {0}")]
    InvalidResolution(u32),

    #[error("chunk count must be >= 1, got {0}")]
    InvalidChunkCount(u32),

    #[error("index buffer length {0} is not a multiple of 3")]
    NotTriangles(usize),

    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("attribute `{attribute}` has {len} entries, expected {vertex_count}")]
    AttributeLength {
        attribute: &'static str,
        len: usize,
        vertex_count: usize,
    },
}
