//! Tile accelerator driver, generic over `TaTransport`.

use pvr_gl_hal::{DisplayList, FrameControl, TaTransport};

use super::header::PolyHeader;
use super::vertex::Vertex;
use crate::state::UserClip;

/// Error type for submission, generic over transport errors.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError<E: core::fmt::Debug> {
    /// Transport rejected a record.
    #[error("transport error: {0:?}")]
    Transport(E),
}

impl<E: core::fmt::Debug> From<E> for SubmitError<E> {
    fn from(e: E) -> Self {
        SubmitError::Transport(e)
    }
}

/// Owns a transport and writes packed records to it.
pub struct TaDriver<T: TaTransport> {
    ta: T,
    records_written: usize,
}

impl<T: TaTransport> TaDriver<T> {
    pub fn new(ta: T) -> Self {
        Self {
            ta,
            records_written: 0,
        }
    }

    pub fn submit_header(&mut self, header: &PolyHeader) -> Result<(), SubmitError<T::Error>> {
        self.ta.write_record(&header.pack())?;
        self.records_written += 1;
        Ok(())
    }

    pub fn submit_user_clip(&mut self, clip: &UserClip) -> Result<(), SubmitError<T::Error>> {
        self.ta.write_record(&clip.pack())?;
        self.records_written += 1;
        Ok(())
    }

    /// Submit a run of flagged vertices in order.
    pub fn submit_vertices(&mut self, vertices: &[Vertex]) -> Result<(), SubmitError<T::Error>> {
        for v in vertices {
            self.ta.write_record(&v.pack())?;
            self.records_written += 1;
        }
        Ok(())
    }

    /// Total records written since construction.
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    pub fn transport(&self) -> &T {
        &self.ta
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.ta
    }

    pub fn into_inner(self) -> T {
        self.ta
    }
}

/// Methods available when the transport also implements FrameControl.
impl<T: TaTransport + FrameControl> TaDriver<T> {
    pub fn set_background(&mut self, rgb: [f32; 3]) {
        self.ta.set_background(rgb);
    }

    pub fn begin_frame(&mut self) {
        self.ta.begin_frame();
    }

    pub fn begin_list(&mut self, list: DisplayList) {
        self.ta.begin_list(list);
    }

    pub fn finish_frame(&mut self) {
        self.ta.finish_frame();
    }
}
