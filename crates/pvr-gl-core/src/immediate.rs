//! Immediate mode: `begin`, per-vertex calls, `end`.
//!
//! The submit path is chosen once at `begin` from the primitive, clipping
//! and lighting state, so per-vertex calls do no state lookups.

use glam::{Mat4, Vec3};

use crate::context::Context;
use crate::error::GlError;
use crate::gpu::vertex::{TexCoord, Vertex, VertexFlag};
use crate::math::color::{pack_argb, pack_argb_f32};
use crate::pipeline::clip::{clip_primitives, ClipSource};
use crate::pipeline::flags::assign_flags;
use crate::render::transform::{clip_point, project_point, transform_normal};
use crate::render::{Lighting, MatrixStack, TextureSource};
use crate::state::{Capability, Primitive};

/// Depth written by [`Context::screen_vertex2f`].
pub const SCREEN_VERTEX_Z: f32 = 10.0;

/// Per-vertex submit path of an immediate batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexSubmit {
    /// Each vertex becomes a small screen-aligned quad.
    Points,
    LitClipped,
    Lit,
    Clipped,
    /// Straight to screen space.
    Transformed,
}

impl VertexSubmit {
    pub fn select(mode: Primitive, clip: bool, lit: bool) -> Self {
        match (mode, clip, lit) {
            (Primitive::Points, _, _) => VertexSubmit::Points,
            (_, true, true) => VertexSubmit::LitClipped,
            (_, false, true) => VertexSubmit::Lit,
            (_, true, false) => VertexSubmit::Clipped,
            (_, false, false) => VertexSubmit::Transformed,
        }
    }

    fn clipped(self) -> bool {
        matches!(self, VertexSubmit::Clipped | VertexSubmit::LitClipped)
    }

    fn lit(self) -> bool {
        matches!(self, VertexSubmit::Lit | VertexSubmit::LitClipped)
    }
}

/// Draw context of the batch between `begin` and `end`.
#[derive(Clone, Copy, Debug)]
pub struct ImmediateBatch {
    pub mode: Primitive,
    pub submit: VertexSubmit,
    /// Vertices accepted so far.
    pub count: usize,
    render: Mat4,
    model_view: Mat4,
    rotation: Mat4,
}

impl<M: MatrixStack, L: Lighting, T: TextureSource> Context<M, L, T> {
    /// Open a batch of `mode` primitives.
    pub fn begin(&mut self, mode: Primitive) {
        if self.batch.is_some() {
            self.errors.raise(GlError::InvalidOperation, "begin");
            return;
        }
        let submit = VertexSubmit::select(
            mode,
            self.state.is_enabled(Capability::NEAR_Z_CLIP),
            self.state.is_enabled(Capability::LIGHTING),
        );
        let header = self.draw_header(true);
        self.output.push_header(header);
        self.clip.reset();
        self.scratch.clear();
        self.batch = Some(ImmediateBatch {
            mode,
            submit,
            count: 0,
            render: self.matrices.render_matrix(),
            model_view: self.matrices.model_view(),
            rotation: self.matrices.model_rotation(),
        });
    }

    /// Close the batch: light, clip and flag what was submitted.
    pub fn end(&mut self) {
        let Some(batch) = self.batch.take() else {
            self.errors.raise(GlError::InvalidOperation, "end");
            return;
        };

        match batch.submit {
            VertexSubmit::Points => {}
            VertexSubmit::Transformed | VertexSubmit::Lit => {
                let whole = batch.mode.whole_primitives(batch.count);
                self.output.rewind(batch.count - whole);
                let tail = self.output.tail_mut(whole);
                if batch.submit.lit() {
                    self.scratch.apply(&mut self.lighting, tail);
                }
                assign_flags(batch.mode, tail);
            }
            VertexSubmit::Clipped | VertexSubmit::LitClipped => {
                if batch.submit.lit() {
                    self.scratch.apply(&mut self.lighting, self.clip.vertices_mut());
                }
                let (vertices, w, _) = self.clip.parts();
                let src = ClipSource {
                    vertices,
                    w,
                    uv1: None,
                };
                let out = self.output.cursor_mut();
                let written = clip_primitives(batch.mode, &src, self.config.near_w, out, None);
                assign_flags(Primitive::Triangles, &mut out[..written]);
                self.output.advance(written);
                self.clip.reset();
            }
        }
        log::debug!(
            "{:?} batch via {:?}: {} vertices",
            batch.mode,
            batch.submit,
            batch.count
        );
    }

    pub fn vertex3f(&mut self, x: f32, y: f32, z: f32) {
        let Some(batch) = self.batch else {
            self.errors.raise(GlError::InvalidOperation, "vertex3f");
            return;
        };
        let p = Vec3::new(x, y, z);
        let accepted = match batch.submit {
            VertexSubmit::Points => self.submit_point(&batch.render, p),
            submit if submit.clipped() => {
                let c = clip_point(&batch.render, p);
                let vertex = self.current_vertex(c.x, c.y, c.z);
                self.clip.push(vertex, c.w, TexCoord::default())
            }
            _ => {
                let s = project_point(&batch.render, p);
                let vertex = self.current_vertex(s.x, s.y, s.z);
                self.output.push(vertex)
            }
        };
        if !accepted {
            self.errors.raise(GlError::OutOfMemory, "vertex3f");
            return;
        }
        if batch.submit.lit() {
            self.scratch.push(
                batch.model_view.transform_point3(p),
                transform_normal(self.state.current_normal, &batch.rotation),
            );
        }
        if let Some(batch) = self.batch.as_mut() {
            batch.count += 1;
        }
    }

    pub fn vertex3fv(&mut self, v: &[f32; 3]) {
        self.vertex3f(v[0], v[1], v[2]);
    }

    /// Vertex in the z = 0 plane.
    pub fn vertex2f(&mut self, x: f32, y: f32) {
        self.vertex3f(x, y, 0.0);
    }

    pub fn vertex2fv(&mut self, v: &[f32; 2]) {
        self.vertex3f(v[0], v[1], 0.0);
    }

    /// Vertex already in screen space: no transform, fixed depth
    /// [`SCREEN_VERTEX_Z`], current colour and texture coordinate.
    ///
    /// A lit batch still replaces its colour with the lit result.
    pub fn screen_vertex2f(&mut self, x: f32, y: f32) {
        let Some(batch) = self.batch else {
            self.errors.raise(GlError::InvalidOperation, "screen_vertex2f");
            return;
        };
        if batch.submit == VertexSubmit::Points {
            self.errors.raise(GlError::InvalidOperation, "screen_vertex2f");
            return;
        }
        let vertex = self.current_vertex(x, y, SCREEN_VERTEX_Z);
        let accepted = if batch.submit.clipped() {
            self.clip.push(vertex, 1.0, TexCoord::default())
        } else {
            self.output.push(vertex)
        };
        if !accepted {
            self.errors.raise(GlError::OutOfMemory, "screen_vertex2f");
            return;
        }
        if batch.submit.lit() {
            self.scratch.push(
                Vec3::ZERO,
                transform_normal(self.state.current_normal, &batch.rotation),
            );
        }
        if let Some(batch) = self.batch.as_mut() {
            batch.count += 1;
        }
    }

    pub fn screen_vertex2fv(&mut self, v: &[f32; 2]) {
        self.screen_vertex2f(v[0], v[1]);
    }

    /// Set the current colour from packed ARGB.
    pub fn color1ui(&mut self, argb: u32) {
        self.state.current_color = argb;
    }

    pub fn color4ub(&mut self, r: u8, g: u8, b: u8, a: u8) {
        self.state.current_color = pack_argb(a, r, g, b);
    }

    pub fn color3f(&mut self, r: f32, g: f32, b: f32) {
        self.state.current_color = pack_argb_f32(1.0, r, g, b);
    }

    pub fn color3fv(&mut self, rgb: &[f32; 3]) {
        self.color3f(rgb[0], rgb[1], rgb[2]);
    }

    pub fn color4f(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.state.current_color = pack_argb_f32(a, r, g, b);
    }

    pub fn color4fv(&mut self, rgba: &[f32; 4]) {
        self.color4f(rgba[0], rgba[1], rgba[2], rgba[3]);
    }

    pub fn tex_coord2f(&mut self, u: f32, v: f32) {
        self.state.current_tex_coord = TexCoord::new(u, v);
    }

    pub fn tex_coord2fv(&mut self, uv: &[f32; 2]) {
        self.tex_coord2f(uv[0], uv[1]);
    }

    pub fn normal3f(&mut self, x: f32, y: f32, z: f32) {
        self.state.current_normal = Vec3::new(x, y, z);
    }

    pub fn normal3fv(&mut self, n: &[f32; 3]) {
        self.normal3f(n[0], n[1], n[2]);
    }

    /// Draw an axis-aligned rectangle in the z = 0 plane with the current
    /// colour.
    pub fn rectf(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        if self.batch.is_some() {
            self.errors.raise(GlError::InvalidOperation, "rectf");
            return;
        }
        if self.output.remaining() < 4 {
            self.errors.raise(GlError::OutOfMemory, "rectf");
            return;
        }
        let header = self.draw_header(false);
        self.output.push_header(header);

        let render = self.matrices.render_matrix();
        let a = project_point(&render, Vec3::new(x1, y1, 0.0));
        let b = project_point(&render, Vec3::new(x2, y2, 0.0));
        let color = self.state.current_color;
        let corners = [(a.x, a.y, a.z), (a.x, b.y, b.z), (b.x, a.y, a.z), (b.x, b.y, b.z)];
        for (i, &(x, y, z)) in corners.iter().enumerate() {
            let mut v = Vertex::from_color_position(color, x, y, z);
            if i == corners.len() - 1 {
                v.flags = VertexFlag::EndOfPrimitive;
            }
            self.output.push(v);
        }
    }

    pub fn rectfv(&mut self, v1: &[f32; 2], v2: &[f32; 2]) {
        self.rectf(v1[0], v1[1], v2[0], v2[1]);
    }

    pub fn recti(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.rectf(x1 as f32, y1 as f32, x2 as f32, y2 as f32);
    }

    pub fn rectiv(&mut self, v1: &[i32; 2], v2: &[i32; 2]) {
        self.recti(v1[0], v1[1], v2[0], v2[1]);
    }

    fn current_vertex(&self, x: f32, y: f32, z: f32) -> Vertex {
        let mut v = Vertex::from_color_position(self.state.current_color, x, y, z);
        v.set_tex_coord(self.state.current_tex_coord);
        v
    }

    /// Emit the four corners of a point quad in strip order.
    fn submit_point(&mut self, render: &Mat4, p: Vec3) -> bool {
        if self.output.remaining() < 4 {
            return false;
        }
        let s = self.config.point_size;
        let offsets = [(-s, -s), (s, -s), (-s, s), (s, s)];
        for (dx, dy) in offsets {
            let corner = project_point(render, p + Vec3::new(dx, dy, 0.0));
            let vertex = self.current_vertex(corner.x, corner.y, corner.z);
            self.output.push(vertex);
        }
        assign_flags(Primitive::Points, self.output.tail_mut(4));
        true
    }
}
