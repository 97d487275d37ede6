//! Output and clip arenas.
//!
//! Both are allocated once at their configured capacity and never grow;
//! a draw writes through `cursor_mut()` and commits with `advance()`.

use alloc::vec;
use alloc::vec::Vec;

use crate::gpu::header::PolyHeader;
use crate::gpu::vertex::{TexCoord, Vertex};
use crate::state::UserClip;

/// A non-vertex record in the output stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StreamCommand {
    Header(PolyHeader),
    UserClip(UserClip),
}

/// One piece of the output stream, in submission order.
#[derive(Clone, Copy, Debug)]
pub enum Segment<'b> {
    Command(&'b StreamCommand),
    Vertices(&'b [Vertex]),
}

/// Bump arena of finished vertex records plus the commands between them.
#[derive(Debug)]
pub struct VertexBuffer {
    records: Vec<Vertex>,
    cursor: usize,
    /// Commands anchored at the vertex index they precede.
    commands: Vec<(usize, StreamCommand)>,
}

impl VertexBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: vec![Vertex::default(); capacity],
            cursor: 0,
            commands: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    /// Records committed so far.
    pub fn len(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    pub fn remaining(&self) -> usize {
        self.records.len() - self.cursor
    }

    /// Writable space from the cursor to the end of the arena.
    pub fn cursor_mut(&mut self) -> &mut [Vertex] {
        &mut self.records[self.cursor..]
    }

    /// Commit `n` records written through `cursor_mut`. Saturates at capacity;
    /// returns how many were committed.
    pub fn advance(&mut self, n: usize) -> usize {
        let n = n.min(self.remaining());
        self.cursor += n;
        n
    }

    /// The first `n` records past the cursor, written but not yet committed.
    pub fn staged(&self, n: usize) -> &[Vertex] {
        let end = (self.cursor + n).min(self.records.len());
        &self.records[self.cursor..end]
    }

    /// Append one record, or return `false` when full.
    pub fn push(&mut self, vertex: Vertex) -> bool {
        match self.records.get_mut(self.cursor) {
            Some(slot) => {
                *slot = vertex;
                self.cursor += 1;
                true
            }
            None => false,
        }
    }

    /// The last `n` committed records.
    pub fn tail_mut(&mut self, n: usize) -> &mut [Vertex] {
        let start = self.cursor - n.min(self.cursor);
        &mut self.records[start..self.cursor]
    }

    /// Uncommit the last `n` records.
    pub fn rewind(&mut self, n: usize) {
        self.cursor -= n.min(self.cursor);
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.commands.clear();
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.records[..self.cursor]
    }

    pub fn commands(&self) -> impl Iterator<Item = &StreamCommand> {
        self.commands.iter().map(|(_, cmd)| cmd)
    }

    pub fn push_header(&mut self, header: PolyHeader) {
        self.commands.push((self.cursor, StreamCommand::Header(header)));
    }

    pub fn push_user_clip(&mut self, clip: UserClip) {
        self.commands.push((self.cursor, StreamCommand::UserClip(clip)));
    }

    /// Walk commands and vertex runs in stream order.
    pub fn segments(&self) -> Segments<'_> {
        Segments {
            buffer: self,
            next_command: 0,
            vertex_pos: 0,
        }
    }
}

/// Iterator returned by [`VertexBuffer::segments`].
pub struct Segments<'b> {
    buffer: &'b VertexBuffer,
    next_command: usize,
    vertex_pos: usize,
}

impl<'b> Iterator for Segments<'b> {
    type Item = Segment<'b>;

    fn next(&mut self) -> Option<Segment<'b>> {
        let buffer = self.buffer;
        let end = buffer.cursor;
        if let Some((anchor, cmd)) = buffer.commands.get(self.next_command) {
            let anchor = (*anchor).min(end);
            if anchor > self.vertex_pos {
                let run = &buffer.records[self.vertex_pos..anchor];
                self.vertex_pos = anchor;
                return Some(Segment::Vertices(run));
            }
            self.next_command += 1;
            return Some(Segment::Command(cmd));
        }
        if self.vertex_pos < end {
            let run = &buffer.records[self.vertex_pos..end];
            self.vertex_pos = end;
            return Some(Segment::Vertices(run));
        }
        None
    }
}

/// Clip-space staging arena: records plus index-aligned W and second-unit
/// texture coordinates.
#[derive(Debug)]
pub struct ClipBuffer {
    vertices: Vec<Vertex>,
    w: Vec<f32>,
    uv1: Vec<TexCoord>,
    len: usize,
}

impl ClipBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vertices: vec![Vertex::default(); capacity],
            w: vec![0.0; capacity],
            uv1: vec![TexCoord::default(); capacity],
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.vertices.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn reset(&mut self) {
        self.len = 0;
    }

    /// Append one clip-space vertex, or return `false` when full.
    pub fn push(&mut self, vertex: Vertex, w: f32, uv1: TexCoord) -> bool {
        if self.len >= self.capacity() {
            return false;
        }
        self.vertices[self.len] = vertex;
        self.w[self.len] = w;
        self.uv1[self.len] = uv1;
        self.len += 1;
        true
    }

    /// Reset and claim `n` slots for an array draw.
    pub fn prepare(&mut self, n: usize) -> Option<(&mut [Vertex], &mut [f32], &mut [TexCoord])> {
        if n > self.capacity() {
            return None;
        }
        self.len = n;
        Some((&mut self.vertices[..n], &mut self.w[..n], &mut self.uv1[..n]))
    }

    pub fn parts(&self) -> (&[Vertex], &[f32], &[TexCoord]) {
        (&self.vertices[..self.len], &self.w[..self.len], &self.uv1[..self.len])
    }

    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices[..self.len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_saturates_at_capacity() {
        let mut buf = VertexBuffer::with_capacity(4);
        assert_eq!(buf.advance(3), 3);
        assert_eq!(buf.advance(3), 1);
        assert_eq!(buf.remaining(), 0);
        assert!(buf.cursor_mut().is_empty());
        buf.reset();
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn segments_interleave_commands_and_runs() {
        let mut buf = VertexBuffer::with_capacity(8);
        buf.push_user_clip(UserClip::default());
        buf.push(Vertex::default());
        buf.push(Vertex::default());
        buf.push_user_clip(UserClip::default());
        buf.push(Vertex::default());

        let shape: Vec<_> = buf
            .segments()
            .map(|s| match s {
                Segment::Command(_) => 0,
                Segment::Vertices(run) => run.len(),
            })
            .collect();
        assert_eq!(shape, vec![0, 2, 0, 1]);
    }

    #[test]
    fn clip_buffer_keeps_parallel_arrays_aligned() {
        let mut clip = ClipBuffer::with_capacity(2);
        assert!(clip.push(Vertex::default(), 1.0, TexCoord::new(0.5, 0.5)));
        assert!(clip.push(Vertex::default(), 2.0, TexCoord::default()));
        assert!(!clip.push(Vertex::default(), 3.0, TexCoord::default()));
        let (v, w, uv) = clip.parts();
        assert_eq!((v.len(), w.len(), uv.len()), (2, 2, 2));
        assert_eq!(w, &[1.0, 2.0]);
    }
}
