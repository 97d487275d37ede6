//! Texture lookup used when compiling textured polygon headers.

use alloc::vec::Vec;

use crate::gpu::registers::{TexEnv, TexFilter, TexFormat, UvClamp};
use crate::state::TextureId;

/// Everything a polygon header needs to know about a texture object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureInfo {
    /// Texture memory address in bytes (8-byte aligned).
    pub address: u32,
    pub width: u16,
    pub height: u16,
    pub format: TexFormat,
    pub filter: TexFilter,
    pub uv_clamp: UvClamp,
    pub mipmap: bool,
    pub twiddled: bool,
    /// Applied only when blending is enabled; otherwise the header uses
    /// `TexEnv::Replace`.
    pub env: TexEnv,
}

impl TextureInfo {
    /// A bilinear-filtered, twiddled, modulated texture.
    pub fn new(address: u32, width: u16, height: u16, format: TexFormat) -> Self {
        Self {
            address,
            width,
            height,
            format,
            filter: TexFilter::Bilinear,
            uv_clamp: UvClamp::None,
            mipmap: false,
            twiddled: true,
            env: TexEnv::Modulate,
        }
    }
}

/// Resolves texture names to descriptors.
pub trait TextureSource {
    fn texture(&self, id: TextureId) -> Option<TextureInfo>;
}

/// A flat table of texture descriptors.
#[derive(Clone, Debug, Default)]
pub struct TextureTable {
    entries: Vec<(TextureId, TextureInfo)>,
}

impl TextureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the descriptor for `id`. Name 0 is reserved.
    pub fn insert(&mut self, id: TextureId, info: TextureInfo) {
        if id == 0 {
            return;
        }
        match self.entries.iter_mut().find(|(k, _)| *k == id) {
            Some(entry) => entry.1 = info,
            None => self.entries.push((id, info)),
        }
    }

    pub fn remove(&mut self, id: TextureId) -> Option<TextureInfo> {
        let pos = self.entries.iter().position(|(k, _)| *k == id)?;
        Some(self.entries.swap_remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TextureSource for TextureTable {
    fn texture(&self, id: TextureId) -> Option<TextureInfo> {
        self.entries.iter().find(|(k, _)| *k == id).map(|(_, info)| *info)
    }
}
