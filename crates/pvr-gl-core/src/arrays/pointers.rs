//! Attribute pointer registry: client arrays bound for the next draw.

use bitflags::bitflags;
use glam::{Vec2, Vec3};

use crate::error::GlError;
use crate::math::color::{pack_argb_f32, rgba_bytes_to_argb};

/// Borrowed client array with its element type.
#[derive(Clone, Copy, Debug)]
pub enum ArrayData<'a> {
    Float(&'a [f32]),
    UnsignedByte(&'a [u8]),
    UnsignedInt(&'a [u32]),
}

impl ArrayData<'_> {
    /// Length in elements.
    pub fn len(&self) -> usize {
        match self {
            ArrayData::Float(d) => d.len(),
            ArrayData::UnsignedByte(d) => d.len(),
            ArrayData::UnsignedInt(d) => d.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of one element in bytes.
    pub fn element_size(&self) -> usize {
        match self {
            ArrayData::UnsignedByte(_) => 1,
            ArrayData::Float(_) | ArrayData::UnsignedInt(_) => 4,
        }
    }
}

macro_rules! array_data_from {
    ($elem:ty, $variant:ident) => {
        impl<'a> From<&'a [$elem]> for ArrayData<'a> {
            fn from(data: &'a [$elem]) -> Self {
                ArrayData::$variant(data)
            }
        }

        impl<'a, const N: usize> From<&'a [$elem; N]> for ArrayData<'a> {
            fn from(data: &'a [$elem; N]) -> Self {
                ArrayData::$variant(data.as_slice())
            }
        }
    };
}

array_data_from!(f32, Float);
array_data_from!(u8, UnsignedByte);
array_data_from!(u32, UnsignedInt);

bitflags! {
    /// Which attribute arrays are bound for the next draw.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct AttribMask: u8 {
        const POSITION = 1 << 0;
        const NORMAL = 1 << 1;
        const COLOR = 1 << 2;
        const TEXCOORD0 = 1 << 3;
        const TEXCOORD1 = 1 << 4;
    }
}

/// One bound attribute: data, components per vertex and stride in elements.
#[derive(Clone, Copy, Debug)]
pub struct AttribPointer<'a> {
    data: ArrayData<'a>,
    size: usize,
    stride: usize,
}

impl<'a> AttribPointer<'a> {
    /// `stride_bytes` of 0 means tightly packed (`natural` elements apart).
    fn new(data: ArrayData<'a>, size: usize, stride_bytes: i32, natural: usize) -> Result<Self, GlError> {
        let stride_bytes = usize::try_from(stride_bytes).map_err(|_| GlError::InvalidValue)?;
        let element = data.element_size();
        if stride_bytes % element != 0 {
            return Err(GlError::InvalidValue);
        }
        let stride = if stride_bytes == 0 {
            natural
        } else {
            stride_bytes / element
        };
        Ok(Self { data, size, stride })
    }

    pub fn data(&self) -> ArrayData<'a> {
        self.data
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Stride in elements.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of vertices whose components lie entirely inside the array.
    pub fn vertex_count(&self) -> usize {
        let len = self.data.len();
        if len < self.size {
            0
        } else {
            (len - self.size) / self.stride + 1
        }
    }

    fn floats(&self, index: usize) -> &'a [f32] {
        let start = index * self.stride;
        match self.data {
            ArrayData::Float(d) => d.get(start..start + self.size).unwrap_or(&[]),
            _ => &[],
        }
    }

    /// Components 0..3 of vertex `index`; a two-component array yields z = 0.
    pub fn vec3(&self, index: usize) -> Vec3 {
        match *self.floats(index) {
            [x, y, z, ..] => Vec3::new(x, y, z),
            [x, y] => Vec3::new(x, y, 0.0),
            _ => Vec3::ZERO,
        }
    }

    pub fn vec2(&self, index: usize) -> Vec2 {
        match *self.floats(index) {
            [x, y, ..] => Vec2::new(x, y),
            _ => Vec2::ZERO,
        }
    }
}

/// Accepted colour array layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorFormat {
    /// One `u32` per vertex, already ARGB.
    Argb1ui,
    /// Four bytes per vertex in RGBA memory order.
    Rgba4ub,
    /// Three floats, alpha forced to 1.
    Rgb3f,
    Rgba4f,
}

#[derive(Clone, Copy, Debug)]
pub struct ColorArray<'a> {
    pub pointer: AttribPointer<'a>,
    pub format: ColorFormat,
}

impl ColorArray<'_> {
    /// Packed ARGB of vertex `index`.
    pub fn argb(&self, index: usize) -> u32 {
        let start = index * self.pointer.stride;
        match (self.format, self.pointer.data) {
            (ColorFormat::Argb1ui, ArrayData::UnsignedInt(d)) => d.get(start).copied().unwrap_or(0),
            (ColorFormat::Rgba4ub, ArrayData::UnsignedByte(d)) => match d.get(start..start + 4) {
                Some(&[r, g, b, a]) => rgba_bytes_to_argb([r, g, b, a]),
                _ => 0,
            },
            (ColorFormat::Rgb3f, ArrayData::Float(d)) => match d.get(start..start + 3) {
                Some(&[r, g, b]) => pack_argb_f32(1.0, r, g, b),
                _ => 0,
            },
            (ColorFormat::Rgba4f, ArrayData::Float(d)) => match d.get(start..start + 4) {
                Some(&[r, g, b, a]) => pack_argb_f32(a, r, g, b),
                _ => 0,
            },
            _ => 0,
        }
    }
}

/// The registry. Bindings live until the next draw consumes them.
#[derive(Clone, Copy, Debug)]
pub struct AttribPointers<'a> {
    enabled: AttribMask,
    position: Option<AttribPointer<'a>>,
    normal: Option<AttribPointer<'a>>,
    color: Option<ColorArray<'a>>,
    tex_coords: [Option<AttribPointer<'a>>; 2],
}

impl Default for AttribPointers<'_> {
    fn default() -> Self {
        Self {
            enabled: AttribMask::empty(),
            position: None,
            normal: None,
            color: None,
            tex_coords: [None; 2],
        }
    }
}

impl<'a> AttribPointers<'a> {
    pub fn set_vertex(&mut self, size: i32, stride: i32, data: ArrayData<'a>) -> Result<(), GlError> {
        if !(2..=3).contains(&size) {
            return Err(GlError::InvalidValue);
        }
        if !matches!(data, ArrayData::Float(_)) {
            return Err(GlError::InvalidEnum);
        }
        let size = size as usize;
        self.position = Some(AttribPointer::new(data, size, stride, size)?);
        self.enabled |= AttribMask::POSITION;
        Ok(())
    }

    pub fn set_normal(&mut self, stride: i32, data: ArrayData<'a>) -> Result<(), GlError> {
        if !matches!(data, ArrayData::Float(_)) {
            return Err(GlError::InvalidEnum);
        }
        self.normal = Some(AttribPointer::new(data, 3, stride, 3)?);
        self.enabled |= AttribMask::NORMAL;
        Ok(())
    }

    pub fn set_color(&mut self, size: i32, stride: i32, data: ArrayData<'a>) -> Result<(), GlError> {
        if !matches!(size, 1 | 3 | 4) {
            return Err(GlError::InvalidValue);
        }
        let format = match (size, data) {
            (1, ArrayData::UnsignedInt(_)) => ColorFormat::Argb1ui,
            (4, ArrayData::UnsignedByte(_)) => ColorFormat::Rgba4ub,
            (3, ArrayData::Float(_)) => ColorFormat::Rgb3f,
            (4, ArrayData::Float(_)) => ColorFormat::Rgba4f,
            _ => return Err(GlError::InvalidEnum),
        };
        let size = size as usize;
        let pointer = AttribPointer::new(data, size, stride, size)?;
        self.color = Some(ColorArray { pointer, format });
        self.enabled |= AttribMask::COLOR;
        Ok(())
    }

    /// Bind texture coordinates for `unit` (0 or 1).
    pub fn set_tex_coord(&mut self, unit: usize, size: i32, stride: i32, data: ArrayData<'a>) -> Result<(), GlError> {
        if size != 2 {
            return Err(GlError::InvalidValue);
        }
        if !matches!(data, ArrayData::Float(_)) {
            return Err(GlError::InvalidEnum);
        }
        let slot = self.tex_coords.get_mut(unit).ok_or(GlError::InvalidEnum)?;
        *slot = Some(AttribPointer::new(data, 2, stride, 2)?);
        self.enabled |= if unit == 0 {
            AttribMask::TEXCOORD0
        } else {
            AttribMask::TEXCOORD1
        };
        Ok(())
    }

    pub fn enabled(&self) -> AttribMask {
        self.enabled
    }

    pub fn is_bound(&self, attrib: AttribMask) -> bool {
        self.enabled.contains(attrib)
    }

    /// Forget every binding.
    pub fn clear(&mut self) {
        self.enabled = AttribMask::empty();
    }

    fn bound<T>(&self, attrib: AttribMask, slot: &Option<T>) -> Option<T>
    where
        T: Copy,
    {
        if self.enabled.contains(attrib) {
            *slot
        } else {
            None
        }
    }

    pub fn position(&self) -> Option<AttribPointer<'a>> {
        self.bound(AttribMask::POSITION, &self.position)
    }

    pub fn normal(&self) -> Option<AttribPointer<'a>> {
        self.bound(AttribMask::NORMAL, &self.normal)
    }

    pub fn color(&self) -> Option<ColorArray<'a>> {
        self.bound(AttribMask::COLOR, &self.color)
    }

    pub fn tex_coord(&self, unit: usize) -> Option<AttribPointer<'a>> {
        let attrib = match unit {
            0 => AttribMask::TEXCOORD0,
            1 => AttribMask::TEXCOORD1,
            _ => return None,
        };
        self.bound(attrib, &self.tex_coords[unit])
    }

    /// Smallest vertex count over every bound array.
    pub fn addressable_vertices(&self) -> usize {
        let counts = [
            self.position().map(|p| p.vertex_count()),
            self.normal().map(|p| p.vertex_count()),
            self.color().map(|c| c.pointer.vertex_count()),
            self.tex_coord(0).map(|p| p.vertex_count()),
            self.tex_coord(1).map(|p| p.vertex_count()),
        ];
        counts.into_iter().flatten().min().unwrap_or(0)
    }
}
