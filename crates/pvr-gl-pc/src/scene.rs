//! Procedural demo scenes.
//!
//! Each scene sets the state it depends on, draws through one of the
//! submission paths and leaves the result queued in the context.

use clap::ValueEnum;
use glam::{Mat4, Vec3};

use pvr_gl_core::gpu::registers::TexFormat;
use pvr_gl_core::render::TextureInfo;
use pvr_gl_core::{BlendFactor, Capability, Context, Indices, Primitive, ShadeModel};

/// Texture ids registered by [`register_textures`].
pub const CHECKER: u32 = 1;
pub const LIGHTMAP: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Scene {
    /// Lit, indexed cube straddling the near plane.
    Cube,
    /// Immediate-mode gouraud strip.
    Strip,
    /// Textured quads with a lightmap overlay on the second unit.
    Quads,
    /// Immediate-mode point sprites.
    Points,
    /// Screen-space panel, rectangles and scissor.
    Hud,
    /// Every scene in turn.
    All,
}

impl Scene {
    /// Queue one frame of the scene. `clip` allows near-plane clipping
    /// where the scene uses it.
    pub fn draw(self, ctx: &mut Context, frame: u64, clip: bool) {
        let t = frame as f32 * 0.05;
        match self {
            Scene::Cube => cube(ctx, t, clip),
            Scene::Strip => strip(ctx, t),
            Scene::Quads => quads(ctx, t),
            Scene::Points => points(ctx, t),
            Scene::Hud => hud(ctx),
            Scene::All => {
                for scene in [Scene::Cube, Scene::Strip, Scene::Quads, Scene::Points, Scene::Hud] {
                    scene.draw(ctx, frame, clip);
                }
            }
        }
        if let Some(error) = ctx.get_error() {
            log::warn!("{self:?} scene raised {error} ({:#06X})", error.code());
        }
    }
}

/// Register the demo textures in video memory order.
pub fn register_textures(ctx: &mut Context) {
    ctx.textures_mut()
        .insert(CHECKER, TextureInfo::new(0x0020_0000, 64, 64, TexFormat::Rgb565));
    ctx.textures_mut()
        .insert(LIGHTMAP, TextureInfo::new(0x0020_2000, 32, 32, TexFormat::Argb4444));
}

fn camera(ctx: &mut Context, eye: Vec3, model: Mat4) {
    let aspect = ctx.config().screen_width as f32 / ctx.config().screen_height as f32;
    let matrices = ctx.matrices_mut();
    matrices.set_perspective(60f32.to_radians(), aspect, 0.1, 100.0);
    matrices.look_at(eye, Vec3::ZERO, Vec3::Y);
    matrices.model_view *= model;
}

fn cube(ctx: &mut Context, t: f32, clip: bool) {
    const POSITIONS: [f32; 24] = [
        -1.0, -1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0, -1.0, //
        -1.0, -1.0, 1.0, 1.0, -1.0, 1.0, 1.0, 1.0, 1.0, -1.0, 1.0, 1.0,
    ];
    const COLORS: [u8; 32] = [
        255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255, 255, 255, 0, 255, //
        255, 0, 255, 255, 0, 255, 255, 255, 255, 255, 255, 255, 64, 64, 64, 255,
    ];
    const FACES: [u16; 24] = [
        0, 3, 2, 1, 4, 5, 6, 7, 0, 1, 5, 4, 2, 3, 7, 6, 1, 2, 6, 5, 0, 4, 7, 3,
    ];
    // Corner normals point away from the centre.
    let normals = POSITIONS.map(|c| c * 0.577_35);

    // The eye sits close enough that the front corners cross the near plane.
    camera(ctx, Vec3::new(0.0, 0.5, 1.6), Mat4::from_rotation_y(t) * Mat4::from_rotation_x(t * 0.7));
    ctx.enable(Capability::LIGHTING);
    if clip {
        ctx.enable(Capability::NEAR_Z_CLIP);
    }
    ctx.enable(Capability::CULL_FACE);
    ctx.disable(Capability::TEXTURE_2D);
    ctx.shade_model(ShadeModel::Smooth);

    let mut arrays = ctx.client_arrays();
    arrays.vertex_pointer(3, 0, &POSITIONS);
    arrays.normal_pointer(0, &normals);
    arrays.color_pointer(4, 0, &COLORS);
    arrays.draw_elements(Primitive::Quads, FACES.len() as i32, Indices::U16(&FACES));

    ctx.disable(Capability::LIGHTING);
    ctx.disable(Capability::NEAR_Z_CLIP);
    ctx.disable(Capability::CULL_FACE);
}

fn strip(ctx: &mut Context, t: f32) {
    camera(ctx, Vec3::new(0.0, 0.0, 4.0), Mat4::from_rotation_z(t * 0.5));
    ctx.disable(Capability::TEXTURE_2D);

    ctx.begin(Primitive::TriangleStrip);
    for i in 0..8 {
        let x = -1.5 + i as f32 * 0.4;
        let y = if i % 2 == 0 { -0.5 } else { 0.5 };
        let phase = t + i as f32 * 0.3;
        ctx.color3f(0.5 + 0.5 * phase.sin(), 0.5 + 0.5 * phase.cos(), 1.0 - i as f32 / 8.0);
        ctx.vertex3f(x, y, 0.0);
    }
    ctx.end();
}

fn quads(ctx: &mut Context, t: f32) {
    const POSITIONS: [f32; 24] = [
        -2.0, -1.0, 0.0, -0.1, -1.0, 0.0, -0.1, 1.0, 0.0, -2.0, 1.0, 0.0, //
        0.1, -1.0, 0.0, 2.0, -1.0, 0.0, 2.0, 1.0, 0.0, 0.1, 1.0, 0.0,
    ];
    const UV0: [f32; 16] = [
        0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 2.0, 1.0, 2.0, 0.0, 0.0, 0.0,
    ];
    const UV1: [f32; 16] = [
        0.0, 1.0, 0.5, 1.0, 0.5, 0.0, 0.0, 0.0, //
        0.5, 1.0, 1.0, 1.0, 1.0, 0.0, 0.5, 0.0,
    ];

    camera(ctx, Vec3::new(0.0, 0.0, 5.0), Mat4::from_rotation_y(0.3 * t.sin()));
    ctx.enable(Capability::TEXTURE_2D);
    ctx.active_texture(0);
    ctx.bind_texture(CHECKER);
    ctx.active_texture(1);
    ctx.bind_texture(LIGHTMAP);
    ctx.active_texture(0);
    ctx.color1ui(0xFFFF_FFFF);

    let mut arrays = ctx.client_arrays();
    arrays.vertex_pointer(3, 0, &POSITIONS);
    arrays.client_active_texture(0);
    arrays.tex_coord_pointer(2, 0, &UV0);
    arrays.client_active_texture(1);
    arrays.tex_coord_pointer(2, 0, &UV1);
    arrays.client_active_texture(0);
    arrays.draw_arrays(Primitive::Quads, 0, 8);

    ctx.disable(Capability::TEXTURE_2D);
}

fn points(ctx: &mut Context, t: f32) {
    camera(ctx, Vec3::new(0.0, 0.0, 6.0), Mat4::IDENTITY);

    ctx.begin(Primitive::Points);
    for i in 0..16 {
        let a = t + i as f32 * core::f32::consts::TAU / 16.0;
        ctx.color4ub(255, (i * 16) as u8, 64, 255);
        ctx.vertex3f(2.0 * a.cos(), 2.0 * a.sin(), 0.0);
    }
    ctx.end();
}

fn hud(ctx: &mut Context) {
    const PANEL: [f32; 8] = [16.0, 16.0, 208.0, 16.0, 16.0, 80.0, 208.0, 80.0];
    const PANEL_COLORS: [u32; 4] = [0xC000_0040, 0xC000_0040, 0x8000_0000, 0x8000_0000];

    let (width, height) = (ctx.config().screen_width, ctx.config().screen_height);
    *ctx.matrices_mut() = pvr_gl_core::render::Matrices::new(width, height);
    ctx.disable(Capability::DEPTH_TEST);
    ctx.enable(Capability::BLEND);
    ctx.blend_func(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);

    // Two-component positions bypass the transform and land in pixels.
    let mut arrays = ctx.client_arrays();
    arrays.vertex_pointer(2, 0, &PANEL);
    arrays.color_pointer(1, 0, &PANEL_COLORS);
    arrays.draw_arrays(Primitive::TriangleStrip, 0, 4);

    ctx.enable(Capability::SCISSOR_TEST);
    ctx.scissor(0, 0, 320, 240);
    ctx.color1ui(0xFF20_C020);
    ctx.rectf(-0.9, -0.9, -0.5, -0.7);
    ctx.color1ui(0xFFC0_2020);
    ctx.rectf(0.5, -0.9, 0.9, -0.7);

    ctx.disable(Capability::SCISSOR_TEST);
    ctx.disable(Capability::BLEND);
    ctx.blend_func(BlendFactor::One, BlendFactor::Zero);
    ctx.enable(Capability::DEPTH_TEST);
}
