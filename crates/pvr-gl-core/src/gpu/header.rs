//! Polygon header compilation from pipeline state.

use pvr_gl_hal::{DisplayList, Record};

use super::registers::{
    self, BlendMode, ClipMode, Culling, DepthCompare, FogMode, Shading, TexEnv, TexFilter,
    TexFormat, UvClamp,
};
use crate::render::texture::TextureInfo;
use crate::state::{Capability, CullFace, FrontFace, PipelineState, ShadeModel, UserClip};

/// Texture part of a textured header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureHeader {
    pub format: TexFormat,
    pub width: u16,
    pub height: u16,
    pub address: u32,
    pub twiddled: bool,
    pub mipmap: bool,
    pub filter: TexFilter,
    pub uv_clamp: UvClamp,
    pub env: TexEnv,
}

/// Decoded polygon header. Every vertex run in the stream follows one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PolyHeader {
    pub list: DisplayList,
    pub shading: Shading,
    pub depth_compare: DepthCompare,
    pub depth_write: bool,
    pub culling: Culling,
    pub clip_mode: ClipMode,
    pub fog: FogMode,
    pub blend_src: BlendMode,
    pub blend_dst: BlendMode,
    pub supersample: bool,
    pub texture: Option<TextureHeader>,
}

impl PolyHeader {
    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }

    /// Pack into the 8-word header record.
    pub fn pack(&self) -> Record {
        let mut cmd = registers::CMD_POLYHDR
            | (registers::list_bits(self.list) << registers::CMD_LIST_SHIFT)
            | (self.clip_mode.bits() << registers::CMD_CLIP_SHIFT);
        if self.shading == Shading::Gouraud {
            cmd |= registers::CMD_GOURAUD_BIT;
        }

        let mut mode1 = (self.depth_compare.bits() << registers::MODE1_DEPTH_SHIFT)
            | (self.culling.bits() << registers::MODE1_CULL_SHIFT);
        if !self.depth_write {
            mode1 |= registers::MODE1_DEPTH_WRITE_DISABLE_BIT;
        }

        let mut mode2 = (self.blend_src.bits() << registers::MODE2_SRC_BLEND_SHIFT)
            | (self.blend_dst.bits() << registers::MODE2_DST_BLEND_SHIFT)
            | (self.fog.bits() << registers::MODE2_FOG_SHIFT);
        if self.list == DisplayList::Translucent {
            mode2 |= registers::MODE2_ALPHA_BIT;
        }

        let mut mode3 = 0;
        if let Some(tex) = &self.texture {
            cmd |= registers::CMD_TEXTURE_BIT;
            mode1 |= registers::MODE1_TEXTURE_BIT;
            mode2 |= (tex.uv_clamp.bits() << registers::MODE2_UV_CLAMP_SHIFT)
                | (tex.filter.bits() << registers::MODE2_FILTER_SHIFT)
                | (tex.env.bits() << registers::MODE2_TEX_ENV_SHIFT)
                | (registers::size_code(tex.width) << registers::MODE2_U_SIZE_SHIFT)
                | (registers::size_code(tex.height) << registers::MODE2_V_SIZE_SHIFT);
            if self.supersample {
                mode2 |= registers::MODE2_SUPERSAMPLE_BIT;
            }
            mode3 = (tex.format.bits() << registers::MODE3_FORMAT_SHIFT)
                | ((tex.address >> 3) & registers::MODE3_ADDRESS_MASK);
            if tex.mipmap {
                mode3 |= registers::MODE3_MIPMAP_BIT;
            }
            if !tex.twiddled {
                mode3 |= registers::MODE3_NON_TWIDDLED_BIT;
            }
        }

        [cmd, mode1, mode2, mode3, 0, 0, 0, 0]
    }
}

impl UserClip {
    /// Pack into the 8-word user-clip record.
    pub fn pack(&self) -> Record {
        [
            registers::CMD_USERCLIP,
            0,
            0,
            0,
            self.start_x,
            self.start_y,
            self.end_x,
            self.end_y,
        ]
    }
}

fn culling(state: &PipelineState) -> Culling {
    if !state.is_enabled(Capability::CULL_FACE) {
        return Culling::None;
    }
    match (state.cull_face(), state.front_face()) {
        (CullFace::Back, FrontFace::Ccw) | (CullFace::Front, FrontFace::Cw) => Culling::Cw,
        (CullFace::Back, FrontFace::Cw) | (CullFace::Front, FrontFace::Ccw) => Culling::Ccw,
        // The accelerator cannot cull both windings; keep its default.
        (CullFace::FrontAndBack, _) => Culling::Ccw,
    }
}

/// Compile an untextured header from the current state.
pub fn compile_header(state: &PipelineState) -> PolyHeader {
    let blending = state.is_enabled(Capability::BLEND);
    let (blend_src, blend_dst) = if blending {
        let (src, dst) = state.blend_func();
        (src.to_hw(), dst.to_hw())
    } else {
        (BlendMode::One, BlendMode::Zero)
    };

    PolyHeader {
        list: if blending {
            DisplayList::Translucent
        } else {
            DisplayList::Opaque
        },
        shading: match state.shade_model() {
            ShadeModel::Flat => Shading::Flat,
            ShadeModel::Smooth => Shading::Gouraud,
        },
        depth_compare: if state.is_enabled(Capability::DEPTH_TEST) {
            state.depth_func().to_hw()
        } else {
            DepthCompare::Always
        },
        depth_write: state.depth_mask(),
        culling: culling(state),
        clip_mode: if state.is_enabled(Capability::SCISSOR_TEST) {
            ClipMode::Inside
        } else {
            ClipMode::Disable
        },
        fog: if state.is_enabled(Capability::FOG) {
            FogMode::Table
        } else {
            FogMode::Disable
        },
        blend_src,
        blend_dst,
        supersample: state.supersample(),
        texture: None,
    }
}

/// Compile a textured header for `texture` from the current state.
pub fn compile_header_textured(state: &PipelineState, texture: &TextureInfo) -> PolyHeader {
    let env = if state.is_enabled(Capability::BLEND) {
        texture.env
    } else {
        TexEnv::Replace
    };
    PolyHeader {
        texture: Some(TextureHeader {
            format: texture.format,
            width: texture.width,
            height: texture.height,
            address: texture.address,
            twiddled: texture.twiddled,
            mipmap: texture.mipmap,
            filter: texture.filter,
            uv_clamp: texture.uv_clamp,
            env,
        }),
        ..compile_header(state)
    }
}

/// Header of the modulating overlay pass drawn with the second texture unit.
pub fn compile_overlay_header(state: &PipelineState, texture: &TextureInfo) -> PolyHeader {
    let mut header = compile_header_textured(state, texture);
    header.list = DisplayList::Translucent;
    header.blend_src = BlendMode::DestColor;
    header.blend_dst = BlendMode::Zero;
    if let Some(tex) = header.texture.as_mut() {
        tex.env = TexEnv::Modulate;
    }
    header
}
