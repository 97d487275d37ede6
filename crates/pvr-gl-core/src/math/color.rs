//! Colour conversions for the vertex ARGB word.
//!
//! The tile accelerator takes packed 8-bit ARGB: [31:24]=A, [23:16]=R,
//! [15:8]=G, [7:0]=B.

/// Opaque white, the colour of a fresh context.
pub const WHITE: u32 = 0xFFFF_FFFF;

/// Convert a unit float to an 8-bit channel, clamping to [0, 1].
pub fn unit_to_u8(val: f32) -> u8 {
    (val.clamp(0.0, 1.0) * 255.0) as u8
}

/// Pack 8-bit channels into ARGB.
pub fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Pack unit float channels into ARGB.
pub fn pack_argb_f32(a: f32, r: f32, g: f32, b: f32) -> u32 {
    pack_argb(unit_to_u8(a), unit_to_u8(r), unit_to_u8(g), unit_to_u8(b))
}

/// Convert an RGBA byte quadruple (memory order) into ARGB.
pub fn rgba_bytes_to_argb(rgba: [u8; 4]) -> u32 {
    let [r, g, b, a] = rgba;
    pack_argb(a, r, g, b)
}

/// Split ARGB into `[a, r, g, b]`.
pub fn unpack_argb(argb: u32) -> [u8; 4] {
    argb.to_be_bytes()
}

/// Per-channel linear interpolation between two ARGB colours.
pub fn lerp_argb(from: u32, to: u32, t: f32) -> u32 {
    let a = unpack_argb(from);
    let b = unpack_argb(to);
    let mut out = [0u8; 4];
    for (o, (&x, &y)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
        let x = x as f32;
        *o = (x + (y as f32 - x) * t) as u8;
    }
    u32::from_be_bytes(out)
}
