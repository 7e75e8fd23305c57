//! Interleaved vertex format handed to the renderer.

/// Position, normal and the `(slope, elevation)` UV pair of one surface vertex.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SurfaceVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// `u` = slope ratio (angle to the radial direction / 90°), `v` = unscaled elevation.
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(SurfaceVertex, [u8; 32]);
