//! Pipeline state to polygon header mapping, packing and scissor tiles.

use pvr_gl_core::gpu::header::{compile_header, compile_header_textured};
use pvr_gl_core::gpu::registers::{
    BlendMode, ClipMode, Culling, DepthCompare, FogMode, Shading, TexEnv, TexFormat,
};
use pvr_gl_core::pipeline::StreamCommand;
use pvr_gl_core::render::TextureInfo;
use pvr_gl_core::state::UserClip;
use pvr_gl_core::{
    BlendFactor, Capability, Context, ContextConfig, CullFace, DepthFunc, FrontFace, GlError,
    HintMode, HintTarget, ShadeModel,
};
use pvr_gl_hal::DisplayList;

fn context() -> Context {
    Context::new(ContextConfig::default())
}

fn texture() -> TextureInfo {
    TextureInfo::new(0x1000, 64, 64, TexFormat::Rgb565)
}

mod mapping {
    use super::*;

    #[test]
    fn defaults_compile_to_opaque_gouraud() {
        let ctx = context();
        let h = compile_header(ctx.state());
        assert_eq!(h.list, DisplayList::Opaque);
        assert_eq!(h.shading, Shading::Gouraud);
        assert_eq!(h.depth_compare, DepthCompare::GreaterEqual);
        assert!(h.depth_write);
        assert_eq!(h.culling, Culling::None);
        assert_eq!(h.clip_mode, ClipMode::Disable);
        assert_eq!(h.fog, FogMode::Disable);
        assert_eq!((h.blend_src, h.blend_dst), (BlendMode::One, BlendMode::Zero));
        assert!(h.texture.is_none());
    }

    #[test]
    fn blending_selects_translucent_list_and_factors() {
        let mut ctx = context();
        ctx.blend_func(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);
        let h = compile_header(ctx.state());
        assert_eq!(h.list, DisplayList::Opaque);
        assert_eq!(h.blend_src, BlendMode::One);

        ctx.enable(Capability::BLEND);
        let h = compile_header(ctx.state());
        assert_eq!(h.list, DisplayList::Translucent);
        assert_eq!((h.blend_src, h.blend_dst), (BlendMode::SrcAlpha, BlendMode::InvSrcAlpha));
    }

    #[test]
    fn depth_state() {
        let mut ctx = context();
        ctx.depth_func(DepthFunc::LessEqual);
        ctx.depth_mask(false);
        let h = compile_header(ctx.state());
        assert_eq!(h.depth_compare, DepthCompare::Greater);
        assert!(!h.depth_write);

        ctx.disable(Capability::DEPTH_TEST);
        assert_eq!(compile_header(ctx.state()).depth_compare, DepthCompare::Always);
    }

    #[test]
    fn culling_combines_face_and_winding() {
        let mut ctx = context();
        ctx.enable(Capability::CULL_FACE);
        let cases = [
            (CullFace::Back, FrontFace::Ccw, Culling::Cw),
            (CullFace::Back, FrontFace::Cw, Culling::Ccw),
            (CullFace::Front, FrontFace::Ccw, Culling::Ccw),
            (CullFace::Front, FrontFace::Cw, Culling::Cw),
            (CullFace::FrontAndBack, FrontFace::Cw, Culling::Ccw),
        ];
        for (face, front, expected) in cases {
            ctx.cull_face(face);
            ctx.front_face(front);
            assert_eq!(compile_header(ctx.state()).culling, expected, "{face:?} {front:?}");
        }
    }

    #[test]
    fn flat_shading_scissor_and_fog() {
        let mut ctx = context();
        ctx.shade_model(ShadeModel::Flat);
        ctx.enable(Capability::SCISSOR_TEST | Capability::FOG);
        let h = compile_header(ctx.state());
        assert_eq!(h.shading, Shading::Flat);
        assert_eq!(h.clip_mode, ClipMode::Inside);
        assert_eq!(h.fog, FogMode::Table);
    }

    #[test]
    fn texture_env_applies_only_when_blending() {
        let mut ctx = context();
        let h = compile_header_textured(ctx.state(), &texture());
        assert_eq!(h.texture.map(|t| t.env), Some(TexEnv::Replace));

        ctx.enable(Capability::BLEND);
        let h = compile_header_textured(ctx.state(), &texture());
        assert_eq!(h.texture.map(|t| t.env), Some(TexEnv::Modulate));
    }

    #[test]
    fn perspective_hint_turns_on_supersampling() {
        let mut ctx = context();
        ctx.hint(HintTarget::PerspectiveCorrection, HintMode::Nicest);
        assert!(compile_header_textured(ctx.state(), &texture()).supersample);
        ctx.hint(HintTarget::PerspectiveCorrection, HintMode::Fastest);
        assert!(!compile_header_textured(ctx.state(), &texture()).supersample);
    }

    #[test]
    fn immediate_batch_uses_bound_texture() {
        let mut ctx = context();
        ctx.textures_mut().insert(3, texture());
        ctx.enable(Capability::TEXTURE_2D);
        ctx.bind_texture(3);
        ctx.begin(pvr_gl_core::Primitive::Triangles);
        ctx.end();
        let first = ctx.output().commands().next().copied();
        match first {
            Some(StreamCommand::Header(h)) => assert!(h.is_textured()),
            other => panic!("expected header, got {other:?}"),
        }
    }
}

mod packing {
    use super::*;

    #[test]
    fn default_header_words() {
        let words = compile_header(context().state()).pack();
        assert_eq!(words[0], 0x8000_0002);
        assert_eq!(words[1], 0xC000_0000);
        assert_eq!(words[2], 0x2080_0000);
        assert_eq!(&words[3..], &[0; 5]);
    }

    #[test]
    fn textured_header_words() {
        let words = compile_header_textured(context().state(), &texture()).pack();
        assert_eq!(words[0], 0x8000_000A);
        assert_eq!(words[1], 0xC200_0000);
        assert_eq!(words[2], 0x2080_401B);
        assert_eq!(words[3], 0x0800_0200);
    }

    #[test]
    fn disabled_depth_write_sets_its_bit() {
        let mut ctx = context();
        ctx.depth_mask(false);
        let words = compile_header(ctx.state()).pack();
        assert_eq!(words[1] & (1 << 26), 1 << 26);
    }

    #[test]
    fn user_clip_words() {
        let clip = UserClip {
            start_x: 1,
            start_y: 2,
            end_x: 3,
            end_y: 4,
        };
        assert_eq!(clip.pack(), [0x2000_0000, 0, 0, 0, 1, 2, 3, 4]);
    }
}

mod scissor {
    use super::*;

    fn scissor_tiles(x: i32, y: i32, w: i32, h: i32) -> Option<UserClip> {
        let mut ctx = context();
        ctx.scissor(x, y, w, h);
        ctx.state().scissor()
    }

    #[test]
    fn full_screen_covers_every_tile() {
        let expected = UserClip {
            start_x: 0,
            start_y: 0,
            end_x: 19,
            end_y: 14,
        };
        assert_eq!(scissor_tiles(0, 0, 640, 480), Some(expected));
        assert_eq!(scissor_tiles(0, 0, 4000, 4000), Some(expected));
    }

    #[test]
    fn origin_is_bottom_left() {
        let expected = UserClip {
            start_x: 1,
            start_y: 13,
            end_x: 2,
            end_y: 14,
        };
        assert_eq!(scissor_tiles(32, 0, 64, 64), Some(expected));
    }

    #[test]
    fn extreme_origins_clamp_without_overflow() {
        let right = UserClip {
            start_x: 20,
            start_y: 11,
            end_x: 20,
            end_y: 14,
        };
        assert_eq!(scissor_tiles(i32::MAX - 5, 0, 100, 100), Some(right));

        let corner = UserClip {
            start_x: 0,
            start_y: 15,
            end_x: 0,
            end_y: 15,
        };
        assert_eq!(scissor_tiles(i32::MIN, i32::MIN, 100, 100), Some(corner));
        assert!(scissor_tiles(0, i32::MAX, i32::MAX, i32::MAX).is_some());
    }

    #[test]
    fn scissor_is_emitted_into_the_stream() {
        let mut ctx = context();
        ctx.scissor(0, 0, 64, 64);
        let cmds: Vec<_> = ctx.output().commands().collect();
        assert!(matches!(cmds.as_slice(), [StreamCommand::UserClip(_)]));
    }

    #[test]
    fn negative_size_is_invalid_value() {
        let mut ctx = context();
        ctx.scissor(0, 0, -1, 10);
        assert_eq!(ctx.get_error(), Some(GlError::InvalidValue));
        assert!(ctx.state().scissor().is_none());
    }
}
