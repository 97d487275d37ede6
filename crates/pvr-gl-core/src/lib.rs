//! Fixed-function vertex pipeline for a tile-based rasterizer.
//!
//! A single [`Context`] owns the pipeline state, the vertex arenas and the
//! collaborators (matrix stack, lighting, texture lookup). Vertices enter
//! through immediate mode (`begin`/`vertex3f`/`end`) or client arrays
//! (`draw_arrays`/`draw_elements`), are transformed, lit, optionally clipped
//! against the near plane, flagged for the tile accelerator and collected in
//! the output stream until [`Context::flush`].

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod arrays;
pub mod config;
pub mod context;
pub mod error;
pub mod gpu;
pub mod immediate;
pub mod math;
pub mod multitex;
pub mod pipeline;
pub mod render;
pub mod state;

pub use arrays::{ArrayData, AttribMask, ClientArrays, Indices};
pub use config::ContextConfig;
pub use context::Context;
pub use error::GlError;
pub use gpu::vertex::{TexCoord, Vertex, VertexFlag};
pub use state::{
    BlendFactor, Capability, CullFace, DepthFunc, FrontFace, HintMode, HintTarget, Primitive,
    ShadeModel, TextureId,
};
