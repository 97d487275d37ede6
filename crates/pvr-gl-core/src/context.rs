//! The rendering context: state, arenas and collaborators behind one owner.

use alloc::vec;
use alloc::vec::Vec;

use pvr_gl_hal::{DisplayList, FrameControl, TaTransport};

use crate::arrays::ClientArrays;
use crate::config::ContextConfig;
use crate::error::{ErrorSlot, GlError};
use crate::gpu::driver::{SubmitError, TaDriver};
use crate::gpu::header::{compile_header, compile_header_textured, PolyHeader};
use crate::gpu::vertex::TexCoord;
use crate::immediate::ImmediateBatch;
use crate::multitex::MultiTexPass;
use crate::pipeline::buffer::{ClipBuffer, Segment, StreamCommand, VertexBuffer};
use crate::pipeline::transform::LightScratch;
use crate::render::{DirectionalLighting, Lighting, Matrices, MatrixStack, TextureSource, TextureTable};
use crate::state::{
    BlendFactor, Capability, CullFace, DepthFunc, FrontFace, HintMode, HintTarget, PipelineState,
    ShadeModel, TextureId, UserClip, MAX_TEXTURE_UNITS,
};

/// Scissor and user-clip granularity in pixels.
const TILE_SIZE: i64 = 32;

/// One rendering context.
///
/// Generic over its collaborators so hosts can plug in their own matrix
/// stack, lighting model and texture manager.
pub struct Context<M = Matrices, L = DirectionalLighting, T = TextureTable> {
    pub(crate) config: ContextConfig,
    pub(crate) state: PipelineState,
    pub(crate) errors: ErrorSlot,
    pub(crate) output: VertexBuffer,
    pub(crate) clip: ClipBuffer,
    /// Second-unit coordinates of the draw in flight, aligned with the
    /// output cursor.
    pub(crate) multi_uv: Vec<TexCoord>,
    pub(crate) scratch: LightScratch,
    pub(crate) multitex: MultiTexPass,
    pub(crate) batch: Option<ImmediateBatch>,
    pub(crate) matrices: M,
    pub(crate) lighting: L,
    pub(crate) textures: T,
}

impl Context {
    /// Context with the reference matrix stack, lighting and texture table.
    pub fn new(config: ContextConfig) -> Self {
        let matrices = Matrices::new(config.screen_width, config.screen_height);
        Self::with_collaborators(config, matrices, DirectionalLighting::default(), TextureTable::new())
    }
}

impl<M, L, T> Context<M, L, T> {
    pub fn with_collaborators(config: ContextConfig, matrices: M, lighting: L, textures: T) -> Self {
        let capacity = config.max_vertices;
        Self {
            output: VertexBuffer::with_capacity(capacity),
            clip: ClipBuffer::with_capacity(capacity),
            multi_uv: vec![TexCoord::default(); capacity],
            scratch: LightScratch::with_capacity(capacity),
            multitex: MultiTexPass::new(),
            state: PipelineState::default(),
            errors: ErrorSlot::default(),
            batch: None,
            config,
            matrices,
            lighting,
            textures,
        }
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Read and clear the first error raised since the last call.
    pub fn get_error(&mut self) -> Option<GlError> {
        self.errors.take()
    }

    pub fn output(&self) -> &VertexBuffer {
        &self.output
    }

    pub fn overlays(&self) -> &MultiTexPass {
        &self.multitex
    }

    pub fn matrices(&self) -> &M {
        &self.matrices
    }

    pub fn matrices_mut(&mut self) -> &mut M {
        &mut self.matrices
    }

    pub fn lighting_mut(&mut self) -> &mut L {
        &mut self.lighting
    }

    pub fn textures(&self) -> &T {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut T {
        &mut self.textures
    }

    /// True between `begin` and `end`.
    pub fn in_batch(&self) -> bool {
        self.batch.is_some()
    }

    pub fn enable(&mut self, cap: Capability) {
        self.state.enabled.insert(cap);
    }

    pub fn disable(&mut self, cap: Capability) {
        self.state.enabled.remove(cap);
    }

    pub fn is_enabled(&self, cap: Capability) -> bool {
        self.state.is_enabled(cap)
    }

    pub fn shade_model(&mut self, model: ShadeModel) {
        self.state.shade_model = model;
    }

    pub fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.state.blend_src = src;
        self.state.blend_dst = dst;
    }

    pub fn depth_func(&mut self, func: DepthFunc) {
        self.state.depth_func = func;
    }

    pub fn depth_mask(&mut self, write: bool) {
        self.state.depth_mask = write;
    }

    pub fn front_face(&mut self, face: FrontFace) {
        self.state.front_face = face;
    }

    pub fn cull_face(&mut self, face: CullFace) {
        self.state.cull_face = face;
    }

    pub fn hint(&mut self, target: HintTarget, mode: HintMode) {
        if target == HintTarget::PerspectiveCorrection {
            self.state.supersample = mode == HintMode::Nicest;
        }
    }

    /// Set the background sent with the next frame. RGB is scaled by alpha.
    pub fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        let a = a.clamp(0.0, 1.0);
        self.state.clear_color = [r, g, b].map(|c| c.clamp(0.0, 1.0) * a);
    }

    /// Select the unit `bind_texture` applies to.
    pub fn active_texture(&mut self, unit: usize) {
        if unit >= MAX_TEXTURE_UNITS {
            self.errors.raise(GlError::InvalidEnum, "active_texture");
            return;
        }
        self.state.active_texture = unit;
    }

    /// Select the unit texture coordinate arrays are bound to.
    pub fn client_active_texture(&mut self, unit: usize) {
        if unit >= MAX_TEXTURE_UNITS {
            self.errors.raise(GlError::InvalidEnum, "client_active_texture");
            return;
        }
        self.state.client_active_texture = unit;
    }

    pub fn bind_texture(&mut self, id: TextureId) {
        self.state.bound_textures[self.state.active_texture] = id;
    }

    /// Restrict rasterization to the tiles covering the rectangle.
    ///
    /// `(x, y)` is the lower-left corner with the origin at the bottom of
    /// the screen. The rectangle is clamped to the screen and widened to
    /// whole 32-pixel tiles, then emitted into the stream so it applies to
    /// everything drawn after it.
    pub fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        if width < 0 || height < 0 {
            self.errors.raise(GlError::InvalidValue, "scissor");
            return;
        }
        if self.batch.is_some() {
            self.errors.raise(GlError::InvalidOperation, "scissor");
            return;
        }
        // i64 so no origin and size combination can overflow.
        let screen_w = i64::from(self.config.screen_width);
        let screen_h = i64::from(self.config.screen_height);
        let (x, y) = (i64::from(x), i64::from(y));
        let width = i64::from(width).min(screen_w);
        let height = i64::from(height).min(screen_h);

        let min_y = screen_h - height - y;
        let max_x = width + x;
        let max_y = height + min_y;
        let tiles_x = screen_w / TILE_SIZE;
        let tiles_y = screen_h / TILE_SIZE;

        let clip = UserClip {
            start_x: (x / TILE_SIZE).clamp(0, tiles_x) as u32,
            start_y: (min_y / TILE_SIZE).clamp(0, tiles_y) as u32,
            end_x: (max_x / TILE_SIZE - 1).clamp(0, tiles_x) as u32,
            end_y: (max_y / TILE_SIZE - 1).clamp(0, tiles_y) as u32,
        };
        self.state.scissor = Some(clip);
        self.output.push_user_clip(clip);
    }

    /// Discard everything queued for this frame without submitting it.
    pub fn reset_frame(&mut self) {
        self.output.reset();
        self.clip.reset();
        self.multitex.clear();
    }
}

impl<M: MatrixStack, L: Lighting, T: TextureSource> Context<M, L, T> {
    /// Start binding client arrays for one draw.
    pub fn client_arrays<'a>(&mut self) -> ClientArrays<'_, 'a, M, L, T> {
        ClientArrays::new(self)
    }

    /// Header for the next draw; textured when `textured` and the unit-0
    /// binding resolves.
    pub(crate) fn draw_header(&self, textured: bool) -> PolyHeader {
        if textured && self.state.is_enabled(Capability::TEXTURE_2D) {
            if let Some(info) = self.textures.texture(self.state.bound_texture(0)) {
                return compile_header_textured(&self.state, &info);
            }
        }
        compile_header(&self.state)
    }

    /// Submit the queued frame (opaque list, translucent list, overlays)
    /// and reset the arenas.
    pub fn flush<X: TaTransport>(&mut self, driver: &mut TaDriver<X>) -> Result<(), SubmitError<X::Error>> {
        self.submit_list(driver, DisplayList::Opaque)?;
        self.submit_list(driver, DisplayList::Translucent)?;
        self.submit_overlays(driver)?;
        log::debug!(
            "flushed {} vertices, {} overlays",
            self.output.len(),
            self.multitex.len()
        );
        self.reset_frame();
        Ok(())
    }

    /// As [`Context::flush`], bracketed by frame and list boundaries and
    /// preceded by the background colour.
    pub fn finish_frame<X>(&mut self, driver: &mut TaDriver<X>) -> Result<(), SubmitError<X::Error>>
    where
        X: TaTransport + FrameControl,
    {
        driver.set_background(self.state.clear_color());
        driver.begin_frame();
        driver.begin_list(DisplayList::Opaque);
        self.submit_list(driver, DisplayList::Opaque)?;
        driver.begin_list(DisplayList::Translucent);
        self.submit_list(driver, DisplayList::Translucent)?;
        self.submit_overlays(driver)?;
        driver.finish_frame();
        self.reset_frame();
        Ok(())
    }

    fn submit_list<X: TaTransport>(
        &self,
        driver: &mut TaDriver<X>,
        list: DisplayList,
    ) -> Result<(), SubmitError<X::Error>> {
        let mut current = DisplayList::Opaque;
        for segment in self.output.segments() {
            match segment {
                Segment::Command(StreamCommand::Header(header)) => {
                    current = header.list;
                    if current == list {
                        driver.submit_header(header)?;
                    }
                }
                Segment::Command(StreamCommand::UserClip(clip)) => driver.submit_user_clip(clip)?,
                Segment::Vertices(run) if current == list => driver.submit_vertices(run)?,
                Segment::Vertices(_) => {}
            }
        }
        Ok(())
    }

    fn submit_overlays<X: TaTransport>(&self, driver: &mut TaDriver<X>) -> Result<(), SubmitError<X::Error>> {
        for batch in self.multitex.batches() {
            driver.submit_header(&batch.header)?;
            driver.submit_vertices(&batch.vertices)?;
        }
        Ok(())
    }
}
