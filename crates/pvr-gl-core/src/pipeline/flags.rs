//! Primitive flag assembly: marks where each primitive ends for the
//! accelerator's strip-oriented input.

use crate::gpu::vertex::{TexCoord, Vertex, VertexFlag};
use crate::state::Primitive;

/// Assign vertex flags for `mode`, reordering quads into strip order.
///
/// `vertices` must hold whole primitives.
pub fn assign_flags(mode: Primitive, vertices: &mut [Vertex]) {
    match mode {
        Primitive::Triangles => flag_groups(vertices, 3),
        Primitive::Quads => {
            for quad in vertices.chunks_exact_mut(4) {
                quad.swap(2, 3);
            }
            flag_groups(vertices, 4);
        }
        // Point quads are emitted in strip order already.
        Primitive::Points => flag_groups(vertices, 4),
        Primitive::TriangleStrip => {
            for v in vertices.iter_mut() {
                v.flags = VertexFlag::Continue;
            }
            if let Some(last) = vertices.last_mut() {
                last.flags = VertexFlag::EndOfPrimitive;
            }
        }
    }
}

fn flag_groups(vertices: &mut [Vertex], arity: usize) {
    for group in vertices.chunks_exact_mut(arity) {
        for v in group.iter_mut() {
            v.flags = VertexFlag::Continue;
        }
        group[arity - 1].flags = VertexFlag::EndOfPrimitive;
    }
}

/// Apply the quad 2/3 swap to a parallel texture-coordinate run.
pub fn swap_quad_tex_coords(uvs: &mut [TexCoord]) {
    for quad in uvs.chunks_exact_mut(4) {
        quad.swap(2, 3);
    }
}
