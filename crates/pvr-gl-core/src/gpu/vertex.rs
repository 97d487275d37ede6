//! Vertex records in the tile accelerator's packed-colour layout.

use pvr_gl_hal::Record;

/// Command word of a vertex record.
///
/// The accelerator closes a strip on `EndOfPrimitive`; every other vertex
/// continues the current strip.
#[repr(u32)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VertexFlag {
    #[default]
    Continue = 0xE000_0000,
    EndOfPrimitive = 0xF000_0000,
}

impl VertexFlag {
    pub const fn bits(self) -> u32 {
        self as u32
    }
}

/// One output vertex: screen-space position, texture coordinate and colours.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub flags: VertexFlag,
    pub x: f32,
    pub y: f32,
    /// Depth term handed to the accelerator (z/w after the divide).
    pub z: f32,
    pub u: f32,
    pub v: f32,
    /// Base colour, packed ARGB.
    pub argb: u32,
    /// Offset (specular) colour, packed ARGB.
    pub oargb: u32,
}

/// A texture coordinate pair.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TexCoord {
    pub u: f32,
    pub v: f32,
}

impl TexCoord {
    pub const fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }
}

impl Vertex {
    /// Create a continuing vertex with only colour and position.
    pub fn from_color_position(argb: u32, x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            argb,
            ..Self::default()
        }
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.x = x;
        self.y = y;
        self.z = z;
    }

    pub fn tex_coord(&self) -> TexCoord {
        TexCoord::new(self.u, self.v)
    }

    pub fn set_tex_coord(&mut self, uv: TexCoord) {
        self.u = uv.u;
        self.v = uv.v;
    }

    /// Pack into the 8-word record written to the accelerator.
    pub fn pack(&self) -> Record {
        [
            self.flags.bits(),
            self.x.to_bits(),
            self.y.to_bits(),
            self.z.to_bits(),
            self.u.to_bits(),
            self.v.to_bits(),
            self.argb,
            self.oargb,
        ]
    }
}
