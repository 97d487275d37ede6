//! Matrix stack collaborator and the point transforms built on it.

use glam::{Mat3, Mat4, Vec3, Vec4};

use crate::gpu::vertex::TexCoord;

/// Matrix-stack collaborator.
pub trait MatrixStack {
    /// Object space to screen space before the divide
    /// (viewport * projection * model-view).
    fn render_matrix(&self) -> Mat4;
    /// Object space to eye space.
    fn model_view(&self) -> Mat4;
    /// Model-view without translation, applied to normals.
    fn model_rotation(&self) -> Mat4;
    /// Applied to `(u, v, 0, 1)` when the texture matrix is enabled.
    fn texture_matrix(&self) -> Mat4;
}

/// Reciprocal of `w`, treating a degenerate `w` as 1.
#[inline]
pub fn inverse_w(w: f32) -> f32 {
    if w.abs() > 1e-6 {
        1.0 / w
    } else {
        1.0
    }
}

/// Transform a point with perspective divide.
#[inline]
pub fn project_point(m: &Mat4, p: Vec3) -> Vec3 {
    let clip = clip_point(m, p);
    clip.truncate() * inverse_w(clip.w)
}

/// Transform a point without divide, keeping W.
#[inline]
pub fn clip_point(m: &Mat4, p: Vec3) -> Vec4 {
    *m * p.extend(1.0)
}

/// Rotate a normal into eye space and renormalize.
#[inline]
pub fn transform_normal(normal: Vec3, rotation: &Mat4) -> Vec3 {
    rotation.transform_vector3(normal).normalize_or_zero()
}

/// Run `(u, v, 0, 1)` through the texture matrix.
#[inline]
pub fn transform_tex_coord(m: &Mat4, uv: TexCoord) -> TexCoord {
    let t = *m * Vec4::new(uv.u, uv.v, 0.0, 1.0);
    TexCoord::new(t.x, t.y)
}

/// Maps normalized device coordinates to pixels (y down), leaving z and w.
pub fn viewport_matrix(width: u32, height: u32) -> Mat4 {
    let hw = width as f32 * 0.5;
    let hh = height as f32 * 0.5;
    Mat4::from_cols(
        Vec4::new(hw, 0.0, 0.0, 0.0),
        Vec4::new(0.0, -hh, 0.0, 0.0),
        Vec4::Z,
        Vec4::new(hw, hh, 0.0, 1.0),
    )
}

/// A plain set of matrices implementing [`MatrixStack`].
#[derive(Clone, Debug)]
pub struct Matrices {
    pub viewport: Mat4,
    pub projection: Mat4,
    pub model_view: Mat4,
    pub texture: Mat4,
}

impl Matrices {
    /// Identity projection and model-view for a `width` x `height` screen.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: viewport_matrix(width, height),
            projection: Mat4::IDENTITY,
            model_view: Mat4::IDENTITY,
            texture: Mat4::IDENTITY,
        }
    }

    /// Right-handed perspective with a GL depth range.
    pub fn set_perspective(&mut self, fov_y: f32, aspect: f32, near: f32, far: f32) {
        self.projection = Mat4::perspective_rh_gl(fov_y, aspect, near, far);
    }

    pub fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.model_view = Mat4::look_at_rh(eye, target, up);
    }
}

impl MatrixStack for Matrices {
    fn render_matrix(&self) -> Mat4 {
        self.viewport * self.projection * self.model_view
    }

    fn model_view(&self) -> Mat4 {
        self.model_view
    }

    fn model_rotation(&self) -> Mat4 {
        Mat4::from_mat3(Mat3::from_mat4(self.model_view))
    }

    fn texture_matrix(&self) -> Mat4 {
        self.texture
    }
}
