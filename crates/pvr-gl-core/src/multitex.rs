//! Second-texture overlay pass.
//!
//! The accelerator samples one texture per polygon, so geometry drawn with
//! two texture units is drawn twice: once normally, and once more at flush
//! time with the second texture modulating what is already in the tile.

use alloc::vec::Vec;

use crate::gpu::header::PolyHeader;
use crate::gpu::vertex::{TexCoord, Vertex};
use crate::state::TextureId;

/// Finished vertices of one draw, re-textured with the second unit.
#[derive(Clone, Debug)]
pub struct OverlayBatch {
    pub texture: TextureId,
    pub header: PolyHeader,
    pub vertices: Vec<Vertex>,
}

#[derive(Debug, Default)]
pub struct MultiTexPass {
    batches: Vec<OverlayBatch>,
}

impl MultiTexPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a copy of `vertices` with their coordinates replaced by `uvs`
    /// (index-aligned, already in the same flag order).
    pub fn push(&mut self, texture: TextureId, header: PolyHeader, vertices: &[Vertex], uvs: &[TexCoord]) {
        let vertices = vertices
            .iter()
            .zip(uvs)
            .map(|(v, uv)| {
                let mut v = *v;
                v.set_tex_coord(*uv);
                v
            })
            .collect();
        self.batches.push(OverlayBatch {
            texture,
            header,
            vertices,
        });
    }

    pub fn batches(&self) -> &[OverlayBatch] {
        &self.batches
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn clear(&mut self) {
        self.batches.clear();
    }
}
