//! Vertex attribute resolver: gathers colours and texture coordinates
//! into output records in fetch order.

use glam::Mat4;

use super::pointers::{AttribPointer, ColorArray};
use crate::gpu::vertex::{TexCoord, Vertex};
use crate::render::transform::transform_tex_coord;

/// Order in which source vertices are visited.
#[derive(Clone, Copy, Debug)]
pub enum Fetch<'i> {
    /// Contiguous range starting at `first`.
    Range { first: usize },
    U8(&'i [u8]),
    U16(&'i [u16]),
}

impl Fetch<'_> {
    /// Source array index of output vertex `i`.
    #[inline]
    pub fn source(&self, i: usize) -> usize {
        match *self {
            Fetch::Range { first } => first + i,
            Fetch::U8(ix) => ix.get(i).map_or(0, |&x| x as usize),
            Fetch::U16(ix) => ix.get(i).map_or(0, |&x| x as usize),
        }
    }

    /// Largest source index visited by the first `count` vertices.
    pub fn max_source(&self, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        match *self {
            Fetch::Range { first } => Some(first + count - 1),
            Fetch::U8(ix) => ix.iter().take(count).map(|&x| x as usize).max(),
            Fetch::U16(ix) => ix.iter().take(count).map(|&x| x as usize).max(),
        }
    }
}

/// Fill `argb` of each record from the colour array, or broadcast `constant`.
pub fn resolve_colors(colors: Option<&ColorArray<'_>>, fetch: Fetch<'_>, constant: u32, dst: &mut [Vertex]) {
    match colors {
        Some(colors) => {
            for (i, v) in dst.iter_mut().enumerate() {
                v.argb = colors.argb(fetch.source(i));
            }
        }
        None => {
            for v in dst.iter_mut() {
                v.argb = constant;
            }
        }
    }
}

/// Fill `u`/`v` of each record, through `matrix` when given.
pub fn resolve_tex_coords(
    tex_coords: &AttribPointer<'_>,
    fetch: Fetch<'_>,
    matrix: Option<&Mat4>,
    dst: &mut [Vertex],
) {
    for (i, v) in dst.iter_mut().enumerate() {
        let uv = tex_coords.vec2(fetch.source(i));
        let uv = TexCoord::new(uv.x, uv.y);
        v.set_tex_coord(match matrix {
            Some(m) => transform_tex_coord(m, uv),
            None => uv,
        });
    }
}

/// Gather second-unit coordinates into their own run.
pub fn resolve_multi_tex_coords(tex_coords: &AttribPointer<'_>, fetch: Fetch<'_>, dst: &mut [TexCoord]) {
    for (i, uv) in dst.iter_mut().enumerate() {
        let src = tex_coords.vec2(fetch.source(i));
        *uv = TexCoord::new(src.x, src.y);
    }
}
