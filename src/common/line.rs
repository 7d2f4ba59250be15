// src/common/line.rs

use core::fmt::Debug;

use heapless::{String, Vec};

use super::error::Ens210Error;
use super::timing::{LINE_MARKER, MAX_LINE_LEN};

/// A complete response line, marker stripped.
pub type Line<const N: usize = { MAX_LINE_LEN }> = String<N>;

/// Reassembles raw byte chunks from the bridge into lines.
///
/// The bridge ends each response with a newline followed by its `>` prompt;
/// everything before that marker is one line. USB transfers split responses
/// arbitrarily, so bytes are accumulated until the marker shows up.
#[derive(Debug, Default)]
pub struct LineBuffer<const N: usize = { MAX_LINE_LEN }> {
    buf: Vec<u8, N>,
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        LineBuffer { buf: Vec::new() }
    }

    /// Bytes currently buffered (an incomplete line).
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Drops any partial line.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Appends one byte; returns the line once the marker completes it.
    ///
    /// On overflow the partial line is discarded so the next marker starts fresh.
    /// Non-ASCII bytes are replaced by `?`; the bridge only prints ASCII.
    pub fn push<E: Debug>(&mut self, byte: u8) -> Result<Option<Line<N>>, Ens210Error<E>> {
        if self.buf.push(byte).is_err() {
            let got = self.buf.len();
            self.buf.clear();
            return Err(Ens210Error::BufferOverflow { needed: got + 1, got });
        }
        if !self.buf.ends_with(LINE_MARKER) {
            return Ok(None);
        }

        let end = self.buf.len() - LINE_MARKER.len();
        let mut line = Line::<N>::new();
        for &b in &self.buf[..end] {
            // Cannot fail: the line is shorter than the buffer.
            let _ = line.push(if b.is_ascii() { b as char } else { '?' });
        }
        self.buf.clear();
        Ok(Some(line))
    }

    /// Feeds a received chunk, calling `on_line` for every completed line.
    ///
    /// An overflow is reported after the whole chunk has been consumed, so lines
    /// following the oversized one are still delivered.
    pub fn feed<E, F>(&mut self, chunk: &[u8], mut on_line: F) -> Result<(), Ens210Error<E>>
    where
        E: Debug,
        F: FnMut(&str),
    {
        let mut overflow = None;
        for &byte in chunk {
            match self.push::<E>(byte) {
                Ok(Some(line)) => on_line(line.as_str()),
                Ok(None) => {}
                Err(e) => overflow = Some(e),
            }
        }
        match overflow {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
