//! Gouraud lighting for directional lights + ambient.

use glam::Vec3;

use super::{AmbientLight, DirectionalLight};
use crate::math::color::pack_argb;

/// Per-vertex lighting collaborator.
///
/// `positions` and `normals` are in eye space and index-aligned with
/// `colors`, which receives packed ARGB.
pub trait Lighting {
    fn compute_vertex_lighting(&mut self, positions: &[Vec3], normals: &[Vec3], colors: &mut [u32]);
}

/// Compute Gouraud lighting for a single vertex.
///
/// Evaluates: ambient + sum(max(0, dot(N, L[i])) * light_color[i])
/// for up to 4 directional lights plus ambient.
///
/// Returns lit vertex color as [R, G, B, A] with channels clamped to 0-255.
pub fn compute_lighting(
    normal: Vec3,
    base_color: [u8; 4],
    lights: &[DirectionalLight; 4],
    ambient: &AmbientLight,
) -> [u8; 4] {
    let mut lit = ambient.color;
    for light in lights {
        lit += normal.dot(light.direction).max(0.0) * light.color;
    }

    let channel = |scale: f32, base: u8| ((scale * base as f32) as u32).min(255) as u8;
    [
        channel(lit.x, base_color[0]),
        channel(lit.y, base_color[1]),
        channel(lit.z, base_color[2]),
        base_color[3],
    ]
}

/// Four directional lights, an ambient term and one material colour.
#[derive(Clone, Debug)]
pub struct DirectionalLighting {
    pub lights: [DirectionalLight; 4],
    pub ambient: AmbientLight,
    /// Material diffuse colour as [R, G, B, A].
    pub material: [u8; 4],
}

impl Default for DirectionalLighting {
    fn default() -> Self {
        Self {
            lights: [
                DirectionalLight {
                    direction: Vec3::Z,
                    color: Vec3::splat(0.8),
                },
                DirectionalLight::OFF,
                DirectionalLight::OFF,
                DirectionalLight::OFF,
            ],
            ambient: AmbientLight {
                color: Vec3::splat(0.2),
            },
            material: [255; 4],
        }
    }
}

impl Lighting for DirectionalLighting {
    fn compute_vertex_lighting(&mut self, _positions: &[Vec3], normals: &[Vec3], colors: &mut [u32]) {
        for (color, &normal) in colors.iter_mut().zip(normals) {
            let [r, g, b, a] = compute_lighting(normal, self.material, &self.lights, &self.ambient);
            *color = pack_argb(a, r, g, b);
        }
    }
}
