//! Submission tests using a mock transport.
//!
//! The mock captures every record written and every frame/list event so the
//! stream order can be checked end to end.

use std::cell::RefCell;
use std::rc::Rc;

use pvr_gl_core::gpu::registers::TexFormat;
use pvr_gl_core::gpu::{SubmitError, TaDriver};
use pvr_gl_core::render::TextureInfo;
use pvr_gl_core::{BlendFactor, Capability, Context, ContextConfig, Primitive, VertexFlag};
use pvr_gl_hal::{DisplayList, FrameControl, Record, TaTransport};

#[derive(Clone, Debug, PartialEq)]
enum Event {
    Background([f32; 3]),
    BeginFrame,
    BeginList(DisplayList),
    FinishFrame,
}

/// Mock transport that records all writes and frame events.
#[derive(Clone, Default)]
struct MockTransport {
    records: Rc<RefCell<Vec<Record>>>,
    events: Rc<RefCell<Vec<Event>>>,
}

impl MockTransport {
    fn records(&self) -> Vec<Record> {
        self.records.borrow().clone()
    }

    /// Command word of every record.
    fn commands(&self) -> Vec<u32> {
        self.records.borrow().iter().map(|r| r[0]).collect()
    }
}

#[derive(Debug)]
struct MockError;

impl TaTransport for MockTransport {
    type Error = MockError;

    fn write_record(&mut self, record: &Record) -> Result<(), MockError> {
        self.records.borrow_mut().push(*record);
        Ok(())
    }
}

impl FrameControl for MockTransport {
    fn set_background(&mut self, rgb: [f32; 3]) {
        self.events.borrow_mut().push(Event::Background(rgb));
    }

    fn begin_frame(&mut self) {
        self.events.borrow_mut().push(Event::BeginFrame);
    }

    fn begin_list(&mut self, list: DisplayList) {
        self.events.borrow_mut().push(Event::BeginList(list));
    }

    fn finish_frame(&mut self) {
        self.events.borrow_mut().push(Event::FinishFrame);
    }
}

/// Transport whose writes always fail.
struct FailingTransport;

impl TaTransport for FailingTransport {
    type Error = MockError;

    fn write_record(&mut self, _record: &Record) -> Result<(), MockError> {
        Err(MockError)
    }
}

const HEADER: u32 = 0x8000_0000;
const USER_CLIP: u32 = 0x2000_0000;
const VERTEX: u32 = VertexFlag::Continue.bits();
const VERTEX_EOL: u32 = VertexFlag::EndOfPrimitive.bits();

const TRIANGLE: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];

fn draw_triangle(ctx: &mut Context) {
    let mut arrays = ctx.client_arrays();
    arrays.vertex_pointer(3, 0, &TRIANGLE);
    arrays.draw_arrays(Primitive::Triangles, 0, 3);
}

fn is_header(word: u32) -> bool {
    word & 0xE000_0000 == HEADER
}

mod flush {
    use super::*;

    #[test]
    fn header_then_vertices() {
        let mock = MockTransport::default();
        let mut driver = TaDriver::new(mock.clone());
        let mut ctx = Context::new(ContextConfig::default());
        draw_triangle(&mut ctx);
        let expected: Vec<Record> = ctx.output().vertices().iter().map(|v| v.pack()).collect();

        ctx.flush(&mut driver).unwrap();

        let records = mock.records();
        assert_eq!(records.len(), 4);
        assert!(is_header(records[0][0]));
        assert_eq!(&records[1..], expected.as_slice());
        assert_eq!(mock.commands()[1..], [VERTEX, VERTEX, VERTEX_EOL]);
        assert_eq!(driver.records_written(), 4);
    }

    #[test]
    fn vertex_record_layout() {
        let mock = MockTransport::default();
        let mut driver = TaDriver::new(mock.clone());
        let mut ctx = Context::new(ContextConfig::default());
        ctx.color1ui(0x8040_2010);
        draw_triangle(&mut ctx);
        ctx.flush(&mut driver).unwrap();

        let second = mock.records()[2];
        assert_eq!(f32::from_bits(second[1]), 640.0);
        assert_eq!(f32::from_bits(second[2]), 240.0);
        assert_eq!(second[6], 0x8040_2010);
        assert_eq!(second[7], 0);
    }

    #[test]
    fn flush_resets_the_frame() {
        let mock = MockTransport::default();
        let mut driver = TaDriver::new(mock.clone());
        let mut ctx = Context::new(ContextConfig::default());
        draw_triangle(&mut ctx);
        ctx.flush(&mut driver).unwrap();
        assert!(ctx.output().is_empty());
        assert_eq!(ctx.output().commands().count(), 0);

        ctx.flush(&mut driver).unwrap();
        assert_eq!(mock.records().len(), 4);
    }

    #[test]
    fn opaque_list_goes_before_translucent() {
        let mock = MockTransport::default();
        let mut driver = TaDriver::new(mock.clone());
        let mut ctx = Context::new(ContextConfig::default());

        ctx.enable(Capability::BLEND);
        ctx.blend_func(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);
        ctx.color1ui(0x8000_0000);
        draw_triangle(&mut ctx);
        ctx.disable(Capability::BLEND);
        ctx.color1ui(0xFF00_0000);
        draw_triangle(&mut ctx);
        ctx.flush(&mut driver).unwrap();

        let records = mock.records();
        assert_eq!(records.len(), 8);
        assert_eq!(records[1][6], 0xFF00_0000);
        assert_eq!(records[5][6], 0x8000_0000);
    }

    #[test]
    fn user_clip_is_submitted_with_each_list() {
        let mock = MockTransport::default();
        let mut driver = TaDriver::new(mock.clone());
        let mut ctx = Context::new(ContextConfig::default());
        ctx.scissor(0, 0, 320, 240);
        draw_triangle(&mut ctx);
        ctx.flush(&mut driver).unwrap();

        let commands = mock.commands();
        assert_eq!(commands.iter().filter(|&&c| c == USER_CLIP).count(), 2);
        assert_eq!(commands[0], USER_CLIP);
        assert!(is_header(commands[1]));
    }

    #[test]
    fn overlays_follow_the_main_lists() {
        let mock = MockTransport::default();
        let mut driver = TaDriver::new(mock.clone());
        let mut ctx = Context::new(ContextConfig::default());
        ctx.textures_mut()
            .insert(1, TextureInfo::new(0x1000, 64, 64, TexFormat::Rgb565));
        ctx.textures_mut()
            .insert(2, TextureInfo::new(0x2000, 64, 64, TexFormat::Rgb565));
        ctx.enable(Capability::TEXTURE_2D);
        ctx.bind_texture(1);
        ctx.active_texture(1);
        ctx.bind_texture(2);

        let uvs = [0.0f32, 0.0, 1.0, 0.0, 0.0, 1.0];
        let mut arrays = ctx.client_arrays();
        arrays.vertex_pointer(3, 0, &TRIANGLE);
        arrays.tex_coord_pointer(2, 0, &uvs);
        arrays.client_active_texture(1);
        arrays.tex_coord_pointer(2, 0, &uvs);
        arrays.draw_arrays(Primitive::Triangles, 0, 3);
        ctx.flush(&mut driver).unwrap();

        let records = mock.records();
        assert_eq!(records.len(), 8);
        assert!(is_header(records[4][0]));
        // Overlay header: translucent list, textured, DestColor/Zero blend.
        assert_eq!((records[4][0] >> 24) & 0x7, 2);
        assert_eq!(records[4][3] & 0x001F_FFFF, 0x2000 >> 3);
        assert_eq!(records[4][2] >> 26, 0b010_000);
        assert!(ctx.overlays().is_empty());
    }
}

mod frames {
    use super::*;

    #[test]
    fn finish_frame_brackets_lists() {
        let mock = MockTransport::default();
        let mut driver = TaDriver::new(mock.clone());
        let mut ctx = Context::new(ContextConfig::default());
        draw_triangle(&mut ctx);
        ctx.finish_frame(&mut driver).unwrap();

        assert_eq!(
            *mock.events.borrow(),
            vec![
                Event::Background([0.0; 3]),
                Event::BeginFrame,
                Event::BeginList(DisplayList::Opaque),
                Event::BeginList(DisplayList::Translucent),
                Event::FinishFrame,
            ]
        );
        assert_eq!(mock.records().len(), 4);
    }

    #[test]
    fn clear_color_is_sent_premultiplied() {
        let mock = MockTransport::default();
        let mut driver = TaDriver::new(mock.clone());
        let mut ctx = Context::new(ContextConfig::default());
        ctx.clear_color(1.0, 0.5, 2.0, 0.5);
        ctx.finish_frame(&mut driver).unwrap();
        assert_eq!(mock.events.borrow()[0], Event::Background([0.5, 0.25, 0.5]));
    }

    #[test]
    fn submit_error_displays_transport_error() {
        let err: SubmitError<MockError> = MockError.into();
        assert_eq!(err.to_string(), "transport error: MockError");
    }

    #[test]
    fn transport_errors_surface_and_keep_the_frame() {
        let mut driver = TaDriver::new(FailingTransport);
        let mut ctx = Context::new(ContextConfig::default());
        draw_triangle(&mut ctx);
        let result = ctx.flush(&mut driver);
        assert!(matches!(result, Err(SubmitError::Transport(MockError))));
        assert_eq!(ctx.output().len(), 3);
    }

    #[test]
    fn reset_frame_discards_without_submitting() {
        let mock = MockTransport::default();
        let mut driver = TaDriver::new(mock.clone());
        let mut ctx = Context::new(ContextConfig::default());
        draw_triangle(&mut ctx);
        ctx.reset_frame();
        ctx.flush(&mut driver).unwrap();
        assert!(mock.records().is_empty());
    }
}
