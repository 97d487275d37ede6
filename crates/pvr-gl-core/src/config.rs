//! Construction-time limits and constants for a [`crate::Context`].

/// Default capacity of the output and clip arenas, in vertex records.
pub const DEFAULT_MAX_VERTICES: usize = 8192;

/// Default near-plane W. Vertices with `w >= near_w` are inside.
pub const DEFAULT_NEAR_W: f32 = 0.1;

/// Default half-extent of an immediate-mode point, in object units.
pub const DEFAULT_POINT_SIZE: f32 = 0.02;

/// Context configuration.
#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Capacity of the output arena and the clip arena, in vertex records.
    pub max_vertices: usize,
    /// Clip-space W of the near plane.
    pub near_w: f32,
    /// Half-extent of the quad emitted for each immediate-mode point.
    pub point_size: f32,
    /// Framebuffer width in pixels (viewport and scissor tiles).
    pub screen_width: u32,
    /// Framebuffer height in pixels.
    pub screen_height: u32,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_vertices: DEFAULT_MAX_VERTICES,
            near_w: DEFAULT_NEAR_W,
            point_size: DEFAULT_POINT_SIZE,
            screen_width: 640,
            screen_height: 480,
        }
    }
}
