//! Vertex processing stages between attribute resolution and submission.

pub mod buffer;
pub mod clip;
pub mod flags;
pub mod transform;

pub use buffer::{ClipBuffer, Segment, StreamCommand, VertexBuffer};
pub use clip::{clip_primitives, clip_triangle, ClipSource, ClipVertex};
pub use flags::assign_flags;
