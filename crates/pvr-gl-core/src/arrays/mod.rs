//! Client-array drawing: `draw_arrays` and `draw_elements`.
//!
//! Pointers are bound on a [`ClientArrays`] session borrowed from the
//! context, so the arrays only need to outlive the session. Every binding is
//! consumed by the next successful draw.

pub mod pointers;
pub mod resolve;

use glam::Mat4;

pub use pointers::{ArrayData, AttribMask, AttribPointer, AttribPointers, ColorArray, ColorFormat};
pub use resolve::Fetch;

use crate::context::Context;
use crate::error::GlError;
use crate::gpu::header::compile_overlay_header;
use crate::gpu::vertex::Vertex;
use crate::pipeline::clip::{clip_primitives, ClipSource};
use crate::pipeline::flags::{assign_flags, swap_quad_tex_coords};
use crate::pipeline::transform::{light_arrays, transform_to_clip, transform_to_screen};
use crate::render::{Lighting, MatrixStack, TextureSource};
use crate::state::{Capability, Primitive};
use resolve::{resolve_colors, resolve_multi_tex_coords, resolve_tex_coords};

/// Index array of an indexed draw.
#[derive(Clone, Copy, Debug)]
pub enum Indices<'i> {
    U8(&'i [u8]),
    U16(&'i [u16]),
    /// Not supported by the accelerator path; rejected with `InvalidEnum`.
    U32(&'i [u32]),
}

impl<'i> Indices<'i> {
    pub fn len(&self) -> usize {
        match self {
            Indices::U8(ix) => ix.len(),
            Indices::U16(ix) => ix.len(),
            Indices::U32(ix) => ix.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn fetch(&self) -> Result<Fetch<'i>, GlError> {
        match *self {
            Indices::U8(ix) => Ok(Fetch::U8(ix)),
            Indices::U16(ix) => Ok(Fetch::U16(ix)),
            Indices::U32(_) => Err(GlError::InvalidEnum),
        }
    }
}

/// Client arrays bound against a context for the next draw.
pub struct ClientArrays<'gl, 'a, M, L, T> {
    ctx: &'gl mut Context<M, L, T>,
    pointers: AttribPointers<'a>,
}

impl<'gl, 'a, M, L, T> ClientArrays<'gl, 'a, M, L, T>
where
    M: MatrixStack,
    L: Lighting,
    T: TextureSource,
{
    pub(crate) fn new(ctx: &'gl mut Context<M, L, T>) -> Self {
        Self {
            ctx,
            pointers: AttribPointers::default(),
        }
    }

    /// Bind positions: 2 or 3 floats per vertex, `stride` in bytes.
    pub fn vertex_pointer(&mut self, size: i32, stride: i32, data: impl Into<ArrayData<'a>>) {
        let result = self.pointers.set_vertex(size, stride, data.into());
        self.ctx.errors.record(result, "vertex_pointer");
    }

    pub fn normal_pointer(&mut self, stride: i32, data: impl Into<ArrayData<'a>>) {
        let result = self.pointers.set_normal(stride, data.into());
        self.ctx.errors.record(result, "normal_pointer");
    }

    pub fn color_pointer(&mut self, size: i32, stride: i32, data: impl Into<ArrayData<'a>>) {
        let result = self.pointers.set_color(size, stride, data.into());
        self.ctx.errors.record(result, "color_pointer");
    }

    /// Bind texture coordinates to the client-active texture unit.
    pub fn tex_coord_pointer(&mut self, size: i32, stride: i32, data: impl Into<ArrayData<'a>>) {
        let unit = self.ctx.state.client_active_texture();
        let result = self.pointers.set_tex_coord(unit, size, stride, data.into());
        self.ctx.errors.record(result, "tex_coord_pointer");
    }

    pub fn client_active_texture(&mut self, unit: usize) {
        self.ctx.client_active_texture(unit);
    }

    pub fn bound(&self) -> AttribMask {
        self.pointers.enabled()
    }

    pub fn context(&mut self) -> &mut Context<M, L, T> {
        &mut *self.ctx
    }

    /// Draw `count` vertices starting at `first`.
    pub fn draw_arrays(&mut self, mode: Primitive, first: i32, count: i32) {
        let checked = self
            .check_draw(mode, first, count)
            .map(|count| (count, Fetch::Range { first: first as usize }))
            .and_then(|(count, fetch)| self.check_range(fetch, count).map(|()| (count, fetch)));
        if let Some((count, fetch)) = self.ctx.errors.record(checked, "draw_arrays") {
            self.ctx.draw_client_arrays(&self.pointers, mode, fetch, count);
            self.pointers.clear();
        }
    }

    /// Draw `count` vertices fetched through `indices`.
    pub fn draw_elements(&mut self, mode: Primitive, count: i32, indices: Indices<'_>) {
        let checked = self
            .check_draw(mode, 0, count)
            .and_then(|count| {
                let fetch = indices.fetch()?;
                if count > indices.len() {
                    return Err(GlError::InvalidValue);
                }
                Ok((count, fetch))
            })
            .and_then(|(count, fetch)| self.check_range(fetch, count).map(|()| (count, fetch)));
        if let Some((count, fetch)) = self.ctx.errors.record(checked, "draw_elements") {
            self.ctx.draw_client_arrays(&self.pointers, mode, fetch, count);
            self.pointers.clear();
        }
    }

    /// Checks shared by both entry points, in reporting order.
    fn check_draw(&self, mode: Primitive, first: i32, count: i32) -> Result<usize, GlError> {
        if mode == Primitive::Points {
            return Err(GlError::InvalidEnum);
        }
        if first < 0 {
            return Err(GlError::InvalidValue);
        }
        let count = usize::try_from(count).map_err(|_| GlError::InvalidValue)?;
        if !self.pointers.is_bound(AttribMask::POSITION) {
            return Err(GlError::InvalidOperation);
        }
        if count > self.ctx.config.max_vertices || count > self.ctx.output.remaining() {
            return Err(GlError::OutOfMemory);
        }
        Ok(count)
    }

    /// Every fetched vertex must lie inside every bound array.
    fn check_range(&self, fetch: Fetch<'_>, count: usize) -> Result<(), GlError> {
        match fetch.max_source(count) {
            Some(max) if max >= self.pointers.addressable_vertices() => Err(GlError::InvalidValue),
            _ => Ok(()),
        }
    }
}


/// Clear `dst` and fill colours and unit-0 texture coordinates.
fn resolve_attributes(
    pointers: &AttribPointers<'_>,
    fetch: Fetch<'_>,
    constant: u32,
    textured: bool,
    tex_matrix: Option<&Mat4>,
    dst: &mut [Vertex],
) {
    dst.fill(Vertex::default());
    resolve_colors(pointers.color().as_ref(), fetch, constant, dst);
    if textured {
        if let Some(tex_coords) = pointers.tex_coord(0) {
            resolve_tex_coords(&tex_coords, fetch, tex_matrix, dst);
        }
    }
}

impl<M: MatrixStack, L: Lighting, T: TextureSource> Context<M, L, T> {
    /// Run a validated draw through the pipeline into the output stream.
    pub(crate) fn draw_client_arrays(
        &mut self,
        pointers: &AttribPointers<'_>,
        mode: Primitive,
        fetch: Fetch<'_>,
        count: usize,
    ) {
        let count = mode.whole_primitives(count);
        let Some(positions) = pointers.position() else {
            return;
        };
        if count == 0 {
            log::trace!("{mode:?} draw has no whole primitives");
            return;
        }

        let textured = self.state.is_enabled(Capability::TEXTURE_2D);
        let header = self.draw_header(pointers.is_bound(AttribMask::TEXCOORD0));
        self.output.push_header(header);

        let screen_space = positions.size() == 2;
        let render = self.matrices.render_matrix();
        let tex_matrix = self
            .state
            .is_enabled(Capability::TEXTURE_MATRIX)
            .then(|| self.matrices.texture_matrix());
        let normals = pointers
            .normal()
            .filter(|_| !screen_space && self.state.is_enabled(Capability::LIGHTING));
        let multi = pointers.tex_coord(1).filter(|_| !screen_space && textured);
        let clip = !screen_space && self.state.is_enabled(Capability::NEAR_Z_CLIP);
        let constant = self.state.current_color();

        let produced = if clip {
            let Some((vertices, w, uv1)) = self.clip.prepare(count) else {
                return;
            };
            resolve_attributes(pointers, fetch, constant, textured, tex_matrix.as_ref(), vertices);
            if let Some(normals) = &normals {
                light_arrays(
                    &positions,
                    normals,
                    fetch,
                    &self.matrices,
                    &mut self.lighting,
                    &mut self.scratch,
                    vertices,
                );
            }
            transform_to_clip(&positions, fetch, &render, vertices, w);
            if let Some(tex_coords) = &multi {
                resolve_multi_tex_coords(tex_coords, fetch, uv1);
            }

            let src = ClipSource {
                vertices,
                w,
                uv1: if multi.is_some() { Some(&*uv1) } else { None },
            };
            let out = self.output.cursor_mut();
            let room = out.len();
            let out_uv1 = if multi.is_some() {
                Some(&mut self.multi_uv[..room])
            } else {
                None
            };
            let written = clip_primitives(mode, &src, self.config.near_w, out, out_uv1);
            assign_flags(Primitive::Triangles, &mut out[..written]);
            self.clip.reset();
            written
        } else {
            let out = &mut self.output.cursor_mut()[..count];
            resolve_attributes(pointers, fetch, constant, textured, tex_matrix.as_ref(), out);
            if let Some(normals) = &normals {
                light_arrays(
                    &positions,
                    normals,
                    fetch,
                    &self.matrices,
                    &mut self.lighting,
                    &mut self.scratch,
                    out,
                );
            }
            transform_to_screen(&positions, fetch, &render, out);
            assign_flags(mode, out);
            if let Some(tex_coords) = &multi {
                let uvs = &mut self.multi_uv[..count];
                resolve_multi_tex_coords(tex_coords, fetch, uvs);
                if mode == Primitive::Quads {
                    swap_quad_tex_coords(uvs);
                }
            }
            count
        };

        if multi.is_some() {
            self.queue_overlay(produced);
        }
        self.output.advance(produced);
        log::trace!("{mode:?} draw: {count} in, {produced} out");
    }

    /// Copy the draw just written at the cursor into the overlay pass.
    fn queue_overlay(&mut self, produced: usize) {
        let texture = self.state.bound_texture(1);
        let Some(info) = self.textures.texture(texture) else {
            log::debug!("second texture unit unbound, overlay skipped");
            return;
        };
        let header = compile_overlay_header(&self.state, &info);
        let vertices = self.output.staged(produced);
        self.multitex.push(texture, header, vertices, &self.multi_uv[..produced]);
    }
}
