//! Near-plane clipper tests.
//!
//! Uses a render matrix that copies z into w, so the z of each input
//! position is its distance from the near plane.

use glam::{Mat4, Vec4};

use pvr_gl_core::pipeline::clip::{clip_primitives, clip_triangle, ClipSource, ClipVertex};
use pvr_gl_core::pipeline::flags::assign_flags;
use pvr_gl_core::render::{DirectionalLighting, MatrixStack, TextureTable};
use pvr_gl_core::{Capability, Context, ContextConfig, Primitive, TexCoord, Vertex, VertexFlag};

const NEAR: f32 = 0.1;

/// Render matrix with w = z and no viewport.
struct DepthAsW;

impl MatrixStack for DepthAsW {
    fn render_matrix(&self) -> Mat4 {
        Mat4::from_cols(Vec4::X, Vec4::Y, Vec4::new(0.0, 0.0, 1.0, 1.0), Vec4::ZERO)
    }

    fn model_view(&self) -> Mat4 {
        Mat4::IDENTITY
    }

    fn model_rotation(&self) -> Mat4 {
        Mat4::IDENTITY
    }

    fn texture_matrix(&self) -> Mat4 {
        Mat4::IDENTITY
    }
}

fn context(max_vertices: usize) -> Context<DepthAsW, DirectionalLighting, TextureTable> {
    let config = ContextConfig {
        max_vertices,
        near_w: NEAR,
        ..ContextConfig::default()
    };
    Context::with_collaborators(config, DepthAsW, DirectionalLighting::default(), TextureTable::new())
}

fn cv(x: f32, w: f32, argb: u32) -> ClipVertex {
    ClipVertex {
        vertex: Vertex::from_color_position(argb, x, 0.0, w),
        w,
        uv1: TexCoord::new(x, w),
    }
}

fn draw(ctx: &mut Context<DepthAsW, DirectionalLighting, TextureTable>, mode: Primitive, positions: &[f32]) {
    let mut arrays = ctx.client_arrays();
    arrays.vertex_pointer(3, 0, positions);
    let count = (positions.len() / 3) as i32;
    arrays.draw_arrays(mode, 0, count);
}

mod polygon {
    use super::*;

    #[test]
    fn all_inside_passes_through_unchanged() {
        let tri = [cv(0.0, 1.0, 1), cv(1.0, 2.0, 2), cv(2.0, 3.0, 3)];
        let poly = clip_triangle(&tri, NEAR);
        assert_eq!(poly.as_slice(), &tri);
    }

    #[test]
    fn on_plane_counts_as_inside() {
        let tri = [cv(0.0, NEAR, 1), cv(1.0, NEAR, 2), cv(2.0, NEAR, 3)];
        assert_eq!(clip_triangle(&tri, NEAR).len(), 3);
    }

    #[test]
    fn all_outside_is_rejected() {
        let tri = [cv(0.0, -1.0, 1), cv(1.0, 0.0, 2), cv(2.0, 0.05, 3)];
        assert!(clip_triangle(&tri, NEAR).is_empty());
    }

    #[test]
    fn one_outside_gives_quad_with_new_vertices_on_plane() {
        let tri = [cv(0.0, 1.0, 0xFF00_0000), cv(1.0, 1.0, 0xFF00_0000), cv(2.0, -1.0, 0xFFFF_FFFF)];
        let poly = clip_triangle(&tri, NEAR);
        assert_eq!(poly.len(), 4);
        assert_eq!(poly[0], tri[0]);
        assert_eq!(poly[1], tri[1]);
        assert_eq!(poly[2].w, NEAR);
        assert_eq!(poly[3].w, NEAR);

        // Edge 1->2: t = (0.1 - 1) / (-1 - 1) = 0.45
        let t = 0.45;
        assert!((poly[2].vertex.x - (1.0 + t)).abs() < 1e-5);
        assert!((poly[2].uv1.u - (1.0 + t)).abs() < 1e-5);
        let [_, r, _, _] = poly[2].vertex.argb.to_be_bytes();
        assert!((r as f32 - 255.0 * t).abs() <= 1.0, "r = {r}");
    }

    #[test]
    fn two_outside_gives_triangle() {
        let tri = [cv(0.0, 1.0, 1), cv(1.0, -1.0, 2), cv(2.0, -1.0, 3)];
        let poly = clip_triangle(&tri, NEAR);
        assert_eq!(poly.len(), 3);
        assert_eq!(poly[0], tri[0]);
        assert_eq!(poly[1].w, NEAR);
        assert_eq!(poly[2].w, NEAR);
    }
}

mod primitives {
    use super::*;

    fn source(ws: &[f32]) -> (Vec<Vertex>, Vec<f32>) {
        let vertices = ws
            .iter()
            .enumerate()
            .map(|(i, &w)| Vertex::from_color_position(0xFFFF_FFFF, i as f32, 0.0, w))
            .collect();
        (vertices, ws.to_vec())
    }

    #[test]
    fn strip_windows_alternate_winding() {
        let (vertices, w) = source(&[1.0, 1.0, 1.0, 1.0]);
        let src = ClipSource {
            vertices: &vertices,
            w: &w,
            uv1: None,
        };
        let mut out = vec![Vertex::default(); 12];
        let n = clip_primitives(Primitive::TriangleStrip, &src, NEAR, &mut out, None);
        assert_eq!(n, 6);
        let xs: Vec<f32> = out[..n].iter().map(|v| v.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 2.0, 1.0, 3.0]);
    }

    #[test]
    fn quads_split_into_two_triangles() {
        let (vertices, w) = source(&[1.0, 1.0, 1.0, 1.0]);
        let src = ClipSource {
            vertices: &vertices,
            w: &w,
            uv1: None,
        };
        let mut out = vec![Vertex::default(); 12];
        let n = clip_primitives(Primitive::Quads, &src, NEAR, &mut out, None);
        let xs: Vec<f32> = out[..n].iter().map(|v| v.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 0.0, 2.0, 3.0]);
    }

    #[test]
    fn full_destination_drops_trailing_triangles() {
        let (vertices, w) = source(&[1.0; 6]);
        let src = ClipSource {
            vertices: &vertices,
            w: &w,
            uv1: None,
        };
        let mut out = vec![Vertex::default(); 7];
        let n = clip_primitives(Primitive::Triangles, &src, NEAR, &mut out, None);
        assert_eq!(n, 6);
    }

    #[test]
    fn multi_tex_coords_follow_the_clip() {
        let (vertices, w) = source(&[1.0, 1.0, -1.0]);
        let uv1 = vec![TexCoord::new(0.0, 0.0), TexCoord::new(1.0, 0.0), TexCoord::new(1.0, 1.0)];
        let src = ClipSource {
            vertices: &vertices,
            w: &w,
            uv1: Some(&uv1),
        };
        let mut out = vec![Vertex::default(); 6];
        let mut out_uv1 = vec![TexCoord::default(); 6];
        let n = clip_primitives(Primitive::Triangles, &src, NEAR, &mut out, Some(&mut out_uv1));
        assert_eq!(n, 6);
        assert_eq!(out_uv1[0], uv1[0]);
        assert_eq!(out_uv1[1], uv1[1]);
        // Vertex on edge 1->2 at t = 0.45.
        assert!((out_uv1[2].v - 0.45).abs() < 1e-5);
    }
}

mod pipeline {
    use super::*;

    const TRIANGLE: [f32; 9] = [0.0, 0.0, 1.0, 1.0, 0.0, 2.0, 0.0, 1.0, 4.0];

    #[test]
    fn clipping_inside_geometry_matches_unclipped_output() {
        let mut clipped = context(64);
        clipped.enable(Capability::NEAR_Z_CLIP);
        draw(&mut clipped, Primitive::Triangles, &TRIANGLE);

        let mut plain = context(64);
        draw(&mut plain, Primitive::Triangles, &TRIANGLE);

        assert_eq!(clipped.get_error(), None);
        assert_eq!(clipped.output().vertices(), plain.output().vertices());
        assert_eq!(clipped.output().len(), 3);
    }

    #[test]
    fn geometry_behind_the_plane_emits_nothing() {
        let mut ctx = context(64);
        ctx.enable(Capability::NEAR_Z_CLIP);
        draw(
            &mut ctx,
            Primitive::Triangles,
            &[0.0, 0.0, -1.0, 1.0, 0.0, -2.0, 0.0, 1.0, 0.05],
        );
        assert_eq!(ctx.get_error(), None);
        assert!(ctx.output().vertices().is_empty());
    }

    #[test]
    fn quad_with_one_vertex_behind_becomes_three_triangles() {
        let mut ctx = context(64);
        ctx.enable(Capability::NEAR_Z_CLIP);
        draw(
            &mut ctx,
            Primitive::Quads,
            &[0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 1.0, 0.05],
        );
        let out = ctx.output().vertices();
        assert_eq!(out.len(), 9);
        for (i, v) in out.iter().enumerate() {
            let expected = if i % 3 == 2 {
                VertexFlag::EndOfPrimitive
            } else {
                VertexFlag::Continue
            };
            assert_eq!(v.flags, expected, "vertex {i}");
            // z equals w here, so every divided depth is 1.
            assert!((v.z - 1.0).abs() < 1e-5, "vertex {i} z = {}", v.z);
        }
    }

    #[test]
    fn clip_overflow_truncates_without_error() {
        let mut ctx = context(6);
        ctx.enable(Capability::NEAR_Z_CLIP);
        let strip: Vec<f32> = (0..6).flat_map(|i| [i as f32, 0.0, 1.0]).collect();
        draw(&mut ctx, Primitive::TriangleStrip, &strip);
        assert_eq!(ctx.get_error(), None);
        assert_eq!(ctx.output().len(), 6);
    }

    #[test]
    fn clipped_output_is_flagged_as_triangles() {
        let mut out = [Vertex::default(); 6];
        assign_flags(Primitive::Triangles, &mut out);
        assert_eq!(out[2].flags, VertexFlag::EndOfPrimitive);
        assert_eq!(out[3].flags, VertexFlag::Continue);
    }
}
