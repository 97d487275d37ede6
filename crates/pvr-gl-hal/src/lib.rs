#![no_std]

/// Size of one tile accelerator record in 32-bit words.
///
/// Polygon headers, vertices and user-clip commands all occupy one record.
pub const RECORD_WORDS: usize = 8;

/// One packed tile accelerator record.
pub type Record = [u32; RECORD_WORDS];

/// Abstracts the tile accelerator's record input (store queues or DMA).
///
/// Implementations own whatever buffering the hardware path needs; the
/// front-end only ever hands over whole records in stream order.
pub trait TaTransport {
    type Error: core::fmt::Debug;

    /// Write one 32-byte record to the tile accelerator.
    fn write_record(&mut self, record: &Record) -> Result<(), Self::Error>;
}

/// Primitive list selection for the tile accelerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayList {
    Opaque,
    Translucent,
}

/// Abstracts frame and list boundaries of the tile accelerator.
///
/// May be bundled into `TaTransport` implementations or used independently.
pub trait FrameControl {
    /// Colour the rasterizer fills uncovered pixels with, as linear RGB.
    fn set_background(&mut self, rgb: [f32; 3]);

    /// Open a new scene. Blocks until the previous scene has been accepted.
    fn begin_frame(&mut self);

    /// Switch the list records are binned into.
    fn begin_list(&mut self, list: DisplayList);

    /// Close the scene and hand it to the rasterizer.
    fn finish_frame(&mut self);
}
