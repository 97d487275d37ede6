//! Near-plane clipper.
//!
//! Works on clip-space vertices (before the divide) against the plane
//! `w = near`. A vertex with `w >= near` is inside. Every primitive is
//! reduced to triangles, each triangle is clipped to a polygon of at most
//! four vertices and fan-triangulated, and only then divided by W.

use heapless::Vec as BoundedVec;

use crate::gpu::vertex::{TexCoord, Vertex};
use crate::math::color::lerp_argb;
use crate::render::transform::inverse_w;
use crate::state::Primitive;

/// A clip-space vertex with its W and second-unit texture coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClipVertex {
    pub vertex: Vertex,
    pub w: f32,
    pub uv1: TexCoord,
}

/// Result of clipping one triangle against one plane: 0, 3 or 4 vertices.
pub type ClipPolygon = BoundedVec<ClipVertex, 4>;

/// Index-aligned clip-space input of [`clip_primitives`].
#[derive(Clone, Copy, Debug)]
pub struct ClipSource<'s> {
    pub vertices: &'s [Vertex],
    pub w: &'s [f32],
    pub uv1: Option<&'s [TexCoord]>,
}

impl ClipSource<'_> {
    fn len(&self) -> usize {
        self.vertices.len().min(self.w.len())
    }

    fn get(&self, i: usize) -> ClipVertex {
        ClipVertex {
            vertex: self.vertices[i],
            w: self.w[i],
            uv1: self.uv1.and_then(|uv| uv.get(i).copied()).unwrap_or_default(),
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Vertex on edge `a`-`b` where it crosses `w = near`.
fn intersect(a: &ClipVertex, b: &ClipVertex, near: f32) -> ClipVertex {
    let t = (near - a.w) / (b.w - a.w);
    let (va, vb) = (&a.vertex, &b.vertex);
    ClipVertex {
        vertex: Vertex {
            flags: va.flags,
            x: lerp(va.x, vb.x, t),
            y: lerp(va.y, vb.y, t),
            z: lerp(va.z, vb.z, t),
            u: lerp(va.u, vb.u, t),
            v: lerp(va.v, vb.v, t),
            argb: lerp_argb(va.argb, vb.argb, t),
            oargb: lerp_argb(va.oargb, vb.oargb, t),
        },
        w: near,
        uv1: TexCoord::new(lerp(a.uv1.u, b.uv1.u, t), lerp(a.uv1.v, b.uv1.v, t)),
    }
}

/// Clip one triangle against `w = near`, keeping winding order.
pub fn clip_triangle(tri: &[ClipVertex; 3], near: f32) -> ClipPolygon {
    let mut poly = ClipPolygon::new();
    let inside = [tri[0].w >= near, tri[1].w >= near, tri[2].w >= near];

    for i in 0..3 {
        let j = (i + 1) % 3;
        // One plane adds at most one vertex to a triangle, so pushes never fail.
        if inside[i] {
            let _ = poly.push(tri[i]);
        }
        if inside[i] != inside[j] {
            let _ = poly.push(intersect(&tri[i], &tri[j], near));
        }
    }
    poly
}

/// Divide position by W.
pub fn perspective_divide(cv: &ClipVertex) -> Vertex {
    let inv_w = inverse_w(cv.w);
    let mut v = cv.vertex;
    v.set_position(v.x * inv_w, v.y * inv_w, v.z * inv_w);
    v
}

struct TriangleSink<'o> {
    out: &'o mut [Vertex],
    out_uv1: Option<&'o mut [TexCoord]>,
    written: usize,
    dropped: usize,
}

impl TriangleSink<'_> {
    fn triangle(&mut self, src: &ClipSource<'_>, near: f32, idx: [usize; 3]) {
        let poly = clip_triangle(&idx.map(|i| src.get(i)), near);
        self.emit(&poly);
    }

    fn emit(&mut self, poly: &ClipPolygon) {
        for k in 1..poly.len().saturating_sub(1) {
            let tri = [&poly[0], &poly[k], &poly[k + 1]];
            if self.written + 3 > self.out.len() {
                self.dropped += 1;
                continue;
            }
            for cv in tri {
                self.out[self.written] = perspective_divide(cv);
                if let Some(uv1) = self.out_uv1.as_deref_mut() {
                    if let Some(slot) = uv1.get_mut(self.written) {
                        *slot = cv.uv1;
                    }
                }
                self.written += 1;
            }
        }
    }
}

/// Clip every primitive of `mode` in `src` and write divided triangles to
/// `out` (and their second-unit coordinates to `out_uv1`).
///
/// Returns the number of vertices written, always a multiple of three.
/// Triangles that do not fit in `out` are dropped.
pub fn clip_primitives(
    mode: Primitive,
    src: &ClipSource<'_>,
    near: f32,
    out: &mut [Vertex],
    out_uv1: Option<&mut [TexCoord]>,
) -> usize {
    let n = src.len();
    let mut sink = TriangleSink {
        out,
        out_uv1,
        written: 0,
        dropped: 0,
    };

    match mode {
        Primitive::Triangles => {
            for base in (0..n - n % 3).step_by(3) {
                sink.triangle(src, near, [base, base + 1, base + 2]);
            }
        }
        Primitive::Quads => {
            for base in (0..n - n % 4).step_by(4) {
                sink.triangle(src, near, [base, base + 1, base + 2]);
                sink.triangle(src, near, [base, base + 2, base + 3]);
            }
        }
        Primitive::TriangleStrip => {
            for i in 0..n.saturating_sub(2) {
                if i % 2 == 0 {
                    sink.triangle(src, near, [i, i + 1, i + 2]);
                } else {
                    sink.triangle(src, near, [i + 1, i, i + 2]);
                }
            }
        }
        Primitive::Points => {}
    }

    if sink.dropped > 0 {
        log::warn!("clip output full, dropped {} triangles", sink.dropped);
    }
    sink.written
}
