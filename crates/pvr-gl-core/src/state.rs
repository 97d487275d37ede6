//! Global rendering state read by every draw.

use bitflags::bitflags;
use glam::Vec3;

use crate::gpu::registers::{BlendMode, DepthCompare};
use crate::gpu::vertex::TexCoord;
use crate::math::color::WHITE;

/// Texture object name. `0` is the "no texture" binding.
pub type TextureId = u32;

/// Number of texture units (base texture plus one overlay).
pub const MAX_TEXTURE_UNITS: usize = 2;

bitflags! {
    /// Capabilities toggled with `enable` / `disable`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Capability: u32 {
        const DEPTH_TEST = 1 << 0;
        const BLEND = 1 << 1;
        const CULL_FACE = 1 << 2;
        const SCISSOR_TEST = 1 << 3;
        const FOG = 1 << 4;
        const LIGHTING = 1 << 5;
        const TEXTURE_2D = 1 << 6;
        const NEAR_Z_CLIP = 1 << 7;
        const TEXTURE_MATRIX = 1 << 8;
    }
}

/// Primitive topology of a draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Points,
    Triangles,
    TriangleStrip,
    Quads,
}

impl Primitive {
    /// Largest vertex count not exceeding `count` made of whole primitives.
    pub fn whole_primitives(self, count: usize) -> usize {
        match self {
            Primitive::Points => count,
            Primitive::Triangles => count - count % 3,
            Primitive::Quads => count - count % 4,
            Primitive::TriangleStrip => {
                if count < 3 {
                    0
                } else {
                    count
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadeModel {
    Flat,
    Smooth,
}

/// Depth comparison in API terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthFunc {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

impl DepthFunc {
    /// Hardware comparison. The accelerator stores 1/w, so ordering
    /// comparisons are inverted.
    pub fn to_hw(self) -> DepthCompare {
        match self {
            DepthFunc::Never => DepthCompare::Never,
            DepthFunc::Less => DepthCompare::GreaterEqual,
            DepthFunc::Equal => DepthCompare::Equal,
            DepthFunc::LessEqual => DepthCompare::Greater,
            DepthFunc::Greater => DepthCompare::LessEqual,
            DepthFunc::NotEqual => DepthCompare::NotEqual,
            DepthFunc::GreaterEqual => DepthCompare::Less,
            DepthFunc::Always => DepthCompare::Always,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrontFace {
    Cw,
    Ccw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CullFace {
    Front,
    Back,
    FrontAndBack,
}

/// Blend factor in API terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
}

impl BlendFactor {
    pub fn to_hw(self) -> BlendMode {
        match self {
            BlendFactor::Zero => BlendMode::Zero,
            BlendFactor::One => BlendMode::One,
            BlendFactor::DstColor => BlendMode::DestColor,
            BlendFactor::OneMinusDstColor => BlendMode::InvDestColor,
            BlendFactor::SrcAlpha => BlendMode::SrcAlpha,
            BlendFactor::OneMinusSrcAlpha => BlendMode::InvSrcAlpha,
            BlendFactor::DstAlpha => BlendMode::DestAlpha,
            BlendFactor::OneMinusDstAlpha => BlendMode::InvDestAlpha,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintTarget {
    PerspectiveCorrection,
    Fog,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintMode {
    Fastest,
    Nicest,
    DontCare,
}

/// User clip rectangle in 32-pixel tile units, inclusive on both ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UserClip {
    pub start_x: u32,
    pub start_y: u32,
    pub end_x: u32,
    pub end_y: u32,
}

/// Everything a draw reads besides the vertex data itself.
#[derive(Clone, Debug)]
pub struct PipelineState {
    pub(crate) enabled: Capability,
    pub(crate) shade_model: ShadeModel,
    pub(crate) depth_func: DepthFunc,
    pub(crate) depth_mask: bool,
    pub(crate) cull_face: CullFace,
    pub(crate) front_face: FrontFace,
    pub(crate) blend_src: BlendFactor,
    pub(crate) blend_dst: BlendFactor,
    pub(crate) supersample: bool,
    pub(crate) scissor: Option<UserClip>,
    pub(crate) bound_textures: [TextureId; MAX_TEXTURE_UNITS],
    pub(crate) active_texture: usize,
    pub(crate) client_active_texture: usize,
    pub(crate) clear_color: [f32; 3],
    pub(crate) current_color: u32,
    pub(crate) current_tex_coord: TexCoord,
    pub(crate) current_normal: Vec3,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            enabled: Capability::DEPTH_TEST,
            shade_model: ShadeModel::Smooth,
            depth_func: DepthFunc::Less,
            depth_mask: true,
            cull_face: CullFace::Back,
            front_face: FrontFace::Ccw,
            blend_src: BlendFactor::One,
            blend_dst: BlendFactor::Zero,
            supersample: false,
            scissor: None,
            bound_textures: [0; MAX_TEXTURE_UNITS],
            active_texture: 0,
            client_active_texture: 0,
            clear_color: [0.0; 3],
            current_color: WHITE,
            current_tex_coord: TexCoord::default(),
            current_normal: Vec3::Z,
        }
    }
}

impl PipelineState {
    pub fn is_enabled(&self, cap: Capability) -> bool {
        self.enabled.contains(cap)
    }

    pub fn shade_model(&self) -> ShadeModel {
        self.shade_model
    }

    pub fn depth_func(&self) -> DepthFunc {
        self.depth_func
    }

    pub fn depth_mask(&self) -> bool {
        self.depth_mask
    }

    pub fn cull_face(&self) -> CullFace {
        self.cull_face
    }

    pub fn front_face(&self) -> FrontFace {
        self.front_face
    }

    pub fn blend_func(&self) -> (BlendFactor, BlendFactor) {
        (self.blend_src, self.blend_dst)
    }

    pub fn supersample(&self) -> bool {
        self.supersample
    }

    pub fn scissor(&self) -> Option<UserClip> {
        self.scissor
    }

    /// Texture bound to `unit`, or 0.
    pub fn bound_texture(&self, unit: usize) -> TextureId {
        self.bound_textures.get(unit).copied().unwrap_or(0)
    }

    pub fn active_texture(&self) -> usize {
        self.active_texture
    }

    pub fn client_active_texture(&self) -> usize {
        self.client_active_texture
    }

    /// Background colour, already scaled by the clear alpha.
    pub fn clear_color(&self) -> [f32; 3] {
        self.clear_color
    }

    pub fn current_color(&self) -> u32 {
        self.current_color
    }

    pub fn current_tex_coord(&self) -> TexCoord {
        self.current_tex_coord
    }

    pub fn current_normal(&self) -> Vec3 {
        self.current_normal
    }
}
