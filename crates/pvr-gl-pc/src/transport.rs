//! Record dump transport for the PC debug host.
//!
//! Stands in for the store-queue path: every record is classified by its
//! command word, counted, logged at `trace` and optionally written out as
//! one hex line per record.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use pvr_gl_hal::{DisplayList, FrameControl, Record, TaTransport};

const CMD_MASK: u32 = 0xE000_0000;
const CMD_HEADER: u32 = 0x8000_0000;
const CMD_USER_CLIP: u32 = 0x2000_0000;
const CMD_VERTEX: u32 = 0xE000_0000;
const END_OF_STRIP: u32 = 0x1000_0000;

/// Per-frame record counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub headers: usize,
    pub user_clips: usize,
    pub vertices: usize,
    pub strips: usize,
    pub unknown: usize,
}

impl StreamStats {
    pub fn records(&self) -> usize {
        self.headers + self.user_clips + self.vertices + self.unknown
    }

    fn count(&mut self, record: &Record) {
        match record[0] & CMD_MASK {
            CMD_VERTEX => {
                self.vertices += 1;
                if record[0] & END_OF_STRIP != 0 {
                    self.strips += 1;
                }
            }
            CMD_HEADER => self.headers += 1,
            CMD_USER_CLIP => self.user_clips += 1,
            _ => self.unknown += 1,
        }
    }
}

impl Default for DumpTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// Transport that counts and optionally dumps records instead of sending them.
pub struct DumpTransport {
    out: Option<BufWriter<File>>,
    /// First dump failure; dumping stops once set.
    failed: Option<io::Error>,
    list: DisplayList,
    frame: u64,
    stats: StreamStats,
}

impl DumpTransport {
    /// Count only.
    pub fn new() -> Self {
        Self {
            out: None,
            failed: None,
            list: DisplayList::Opaque,
            frame: 0,
            stats: StreamStats::default(),
        }
    }

    /// Count and write every record to `path`.
    pub fn to_file(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            out: Some(BufWriter::new(file)),
            ..Self::new()
        })
    }

    /// Counts for the frame in progress (or the last finished one).
    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    pub fn frames(&self) -> u64 {
        self.frame
    }

    /// Flush buffered dump output, reporting any earlier dump failure.
    pub fn close(&mut self) -> io::Result<()> {
        if let Some(e) = self.failed.take() {
            return Err(e);
        }
        match self.out.as_mut() {
            Some(out) => out.flush(),
            None => Ok(()),
        }
    }

    fn write_marker(&mut self, marker: &str) -> io::Result<()> {
        match self.out.as_mut() {
            Some(out) => writeln!(out, "# {marker}"),
            None => Ok(()),
        }
    }

    /// Frame events cannot return errors; keep the first and stop dumping.
    fn marker(&mut self, marker: &str) {
        if let Err(e) = self.write_marker(marker) {
            self.fail(e);
        }
    }

    fn fail(&mut self, e: io::Error) {
        log::error!("dump write failed, dumping stopped: {e}");
        self.out = None;
        self.failed.get_or_insert(e);
    }
}

impl TaTransport for DumpTransport {
    type Error = io::Error;

    fn write_record(&mut self, record: &Record) -> Result<(), io::Error> {
        self.stats.count(record);
        log::trace!("{:?} {:08X?}", self.list, record);
        if let Some(out) = self.out.as_mut() {
            let words: Vec<String> = record.iter().map(|w| format!("{w:08X}")).collect();
            if let Err(e) = writeln!(out, "{}", words.join(" ")) {
                let kind = e.kind();
                self.fail(e);
                return Err(io::Error::new(kind, "record dump failed"));
            }
        }
        Ok(())
    }
}

impl FrameControl for DumpTransport {
    fn set_background(&mut self, rgb: [f32; 3]) {
        log::debug!("background {rgb:?}");
        let marker = format!("background {:.3} {:.3} {:.3}", rgb[0], rgb[1], rgb[2]);
        self.marker(&marker);
    }

    fn begin_frame(&mut self) {
        self.stats = StreamStats::default();
        let marker = format!("frame {}", self.frame);
        self.marker(&marker);
    }

    fn begin_list(&mut self, list: DisplayList) {
        self.list = list;
        let marker = format!("list {list:?}");
        self.marker(&marker);
    }

    fn finish_frame(&mut self) {
        log::info!("frame {}: {:?}", self.frame, self.stats);
        self.frame += 1;
        self.marker("end");
    }
}
