//! Collaborators consumed by the pipeline, with reference implementations.

pub mod lighting;
pub mod texture;
pub mod transform;

use glam::Vec3;

pub use lighting::{DirectionalLighting, Lighting};
pub use texture::{TextureInfo, TextureSource, TextureTable};
pub use transform::{Matrices, MatrixStack};

/// A directional light source.
#[derive(Clone, Copy, Debug)]
pub struct DirectionalLight {
    /// Normalized direction toward the light, in eye space.
    pub direction: Vec3,
    /// Light colour (linear RGB, 0.0-1.0).
    pub color: Vec3,
}

impl DirectionalLight {
    /// A light that contributes nothing (fills unused slots).
    pub const OFF: Self = Self {
        direction: Vec3::Y,
        color: Vec3::ZERO,
    };
}

/// Ambient light contribution.
#[derive(Clone, Copy, Debug)]
pub struct AmbientLight {
    /// Ambient colour (linear RGB, 0.0-1.0).
    pub color: Vec3,
}
