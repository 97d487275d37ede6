//! Transform & lighting stage.

use alloc::vec::Vec;
use glam::{Mat4, Vec3};

use crate::arrays::pointers::AttribPointer;
use crate::arrays::resolve::Fetch;
use crate::gpu::vertex::Vertex;
use crate::render::lighting::Lighting;
use crate::render::transform::{clip_point, project_point, transform_normal, MatrixStack};

/// Positions through `render` with divide, straight into output records.
pub fn transform_to_screen(positions: &AttribPointer<'_>, fetch: Fetch<'_>, render: &Mat4, dst: &mut [Vertex]) {
    for (i, v) in dst.iter_mut().enumerate() {
        let p = project_point(render, positions.vec3(fetch.source(i)));
        v.set_position(p.x, p.y, p.z);
    }
}

/// Positions through `render` without divide; W goes to the parallel array.
pub fn transform_to_clip(
    positions: &AttribPointer<'_>,
    fetch: Fetch<'_>,
    render: &Mat4,
    dst: &mut [Vertex],
    w: &mut [f32],
) {
    for (i, (v, w)) in dst.iter_mut().zip(w.iter_mut()).enumerate() {
        let c = clip_point(render, positions.vec3(fetch.source(i)));
        v.set_position(c.x, c.y, c.z);
        *w = c.w;
    }
}

/// Eye-space inputs for one lighting batch.
#[derive(Debug, Default)]
pub struct LightScratch {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    colors: Vec<u32>,
}

impl LightScratch {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            normals: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Queue one eye-space position and normal.
    pub fn push(&mut self, position: Vec3, normal: Vec3) {
        self.positions.push(position);
        self.normals.push(normal);
    }

    /// Light the queued vertices and overwrite the colour of `dst`
    /// (index-aligned with the queue).
    pub fn apply<L: Lighting + ?Sized>(&mut self, lighting: &mut L, dst: &mut [Vertex]) {
        self.colors.clear();
        self.colors.resize(self.positions.len(), 0);
        lighting.compute_vertex_lighting(&self.positions, &self.normals, &mut self.colors);
        for (v, &argb) in dst.iter_mut().zip(&self.colors) {
            v.argb = argb;
        }
    }
}

/// Light an array batch: normals by the model rotation, positions by the
/// model-view, result replaces the colour of `dst`.
pub fn light_arrays<M, L>(
    positions: &AttribPointer<'_>,
    normals: &AttribPointer<'_>,
    fetch: Fetch<'_>,
    matrices: &M,
    lighting: &mut L,
    scratch: &mut LightScratch,
    dst: &mut [Vertex],
) where
    M: MatrixStack + ?Sized,
    L: Lighting + ?Sized,
{
    let model_view = matrices.model_view();
    let rotation = matrices.model_rotation();
    scratch.clear();
    for i in 0..dst.len() {
        let src = fetch.source(i);
        scratch.push(
            model_view.transform_point3(positions.vec3(src)),
            transform_normal(normals.vec3(src), &rotation),
        );
    }
    scratch.apply(lighting, dst);
}
