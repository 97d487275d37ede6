//! Field encodings of tile accelerator polygon headers.
//!
//! Word layout of a polygon header record:
//!
//! | word | contents                                                   |
//! |------|------------------------------------------------------------|
//! | 0    | command: type, list, clip mode, texture, shading           |
//! | 1    | mode 1: depth compare, culling, depth write, texture       |
//! | 2    | mode 2: blend factors, fog, filter, clamp, env, size codes |
//! | 3    | mode 3: mipmap, format, twiddling, texture address         |
//! | 4-7  | unused by the packed-colour vertex format                  |

use pvr_gl_hal::DisplayList;

/// Command word tag of a polygon header.
pub const CMD_POLYHDR: u32 = 0x8000_0000;
/// Command word tag of a user tile-clip record.
pub const CMD_USERCLIP: u32 = 0x2000_0000;

pub const CMD_LIST_SHIFT: u32 = 24;
pub const CMD_CLIP_SHIFT: u32 = 16;
pub const CMD_TEXTURE_BIT: u32 = 1 << 3;
pub const CMD_GOURAUD_BIT: u32 = 1 << 1;

pub const MODE1_DEPTH_SHIFT: u32 = 29;
pub const MODE1_CULL_SHIFT: u32 = 27;
/// Set to disable depth buffer updates.
pub const MODE1_DEPTH_WRITE_DISABLE_BIT: u32 = 1 << 26;
pub const MODE1_TEXTURE_BIT: u32 = 1 << 25;

pub const MODE2_SRC_BLEND_SHIFT: u32 = 29;
pub const MODE2_DST_BLEND_SHIFT: u32 = 26;
pub const MODE2_FOG_SHIFT: u32 = 22;
pub const MODE2_ALPHA_BIT: u32 = 1 << 20;
pub const MODE2_UV_CLAMP_SHIFT: u32 = 15;
pub const MODE2_FILTER_SHIFT: u32 = 13;
pub const MODE2_SUPERSAMPLE_BIT: u32 = 1 << 12;
pub const MODE2_TEX_ENV_SHIFT: u32 = 6;
pub const MODE2_U_SIZE_SHIFT: u32 = 3;
pub const MODE2_V_SIZE_SHIFT: u32 = 0;

pub const MODE3_MIPMAP_BIT: u32 = 1 << 31;
pub const MODE3_FORMAT_SHIFT: u32 = 27;
pub const MODE3_NON_TWIDDLED_BIT: u32 = 1 << 26;
pub const MODE3_ADDRESS_MASK: u32 = 0x001F_FFFF;

/// List field of the command word.
pub const fn list_bits(list: DisplayList) -> u32 {
    match list {
        DisplayList::Opaque => 0,
        DisplayList::Translucent => 2,
    }
}

/// Hardware depth comparison.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthCompare {
    Never = 0,
    Less = 1,
    Equal = 2,
    LessEqual = 3,
    Greater = 4,
    NotEqual = 5,
    GreaterEqual = 6,
    Always = 7,
}

/// Hardware culling mode. `Ccw` discards counter-clockwise polygons.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Culling {
    None = 0,
    Small = 1,
    Ccw = 2,
    Cw = 3,
}

/// Hardware blend factor.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    Zero = 0,
    One = 1,
    DestColor = 2,
    InvDestColor = 3,
    SrcAlpha = 4,
    InvSrcAlpha = 5,
    DestAlpha = 6,
    InvDestAlpha = 7,
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shading {
    Flat = 0,
    Gouraud = 1,
}

/// User tile-clip behaviour of a polygon.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipMode {
    Disable = 0,
    Inside = 2,
    Outside = 3,
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FogMode {
    Table = 0,
    Vertex = 1,
    Disable = 2,
    Table2 = 3,
}

/// Texel format.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TexFormat {
    Argb1555 = 0,
    Rgb565 = 1,
    Argb4444 = 2,
    Yuv422 = 3,
    Bump = 4,
    Pal4 = 5,
    Pal8 = 6,
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TexFilter {
    Nearest = 0,
    Bilinear = 2,
    Trilinear1 = 4,
    Trilinear2 = 6,
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UvClamp {
    None = 0,
    V = 1,
    U = 2,
    Uv = 3,
}

/// How texels combine with the vertex colour.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TexEnv {
    Replace = 0,
    Modulate = 1,
    Decal = 2,
    ModulateAlpha = 3,
}

macro_rules! field_bits {
    ($($ty:ty),*) => {
        $(impl $ty {
            /// Raw field value before shifting into its word.
            pub const fn bits(self) -> u32 {
                self as u32
            }
        })*
    };
}

field_bits!(
    DepthCompare,
    Culling,
    BlendMode,
    Shading,
    ClipMode,
    FogMode,
    TexFormat,
    TexFilter,
    UvClamp,
    TexEnv
);

/// Encode a texture edge length (8..=1024, power of two) as a size code.
pub fn size_code(texels: u16) -> u32 {
    let texels = texels.clamp(8, 1024);
    let log2 = 15 - texels.leading_zeros();
    log2 - 3
}
