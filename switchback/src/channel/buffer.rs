//! Pattern buffer with efficient tail-search optimization.
//!
//! Only the last N bytes of the buffer are searched for prompt patterns,
//! rather than the entire output. A full running configuration can be
//! hundreds of kilobytes, so this matters.

use bytes::BytesMut;
use regex::bytes::Regex;
use vte::{Parser, Perform};

/// Buffer for accumulating output and efficiently searching for patterns.
pub struct PatternBuffer {
    /// The accumulated output buffer, ANSI sequences already removed.
    buffer: BytesMut,

    /// How many bytes from the end to search for patterns.
    search_depth: usize,

    /// Escape-sequence parser; keeps state across chunk boundaries.
    parser: Parser,
}

impl PatternBuffer {
    /// Create a new pattern buffer with the specified search depth.
    ///
    /// # Arguments
    ///
    /// * `search_depth` - Number of bytes from the end to search for patterns.
    ///   Default recommendation is 1000 bytes.
    pub fn new(search_depth: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            search_depth,
            parser: Parser::new(),
        }
    }

    /// Extend the buffer with new data, stripping ANSI escape codes.
    pub fn extend(&mut self, data: &[u8]) {
        let mut sink = Printable(&mut self.buffer);
        self.parser.advance(&mut sink, data);
    }

    /// Search only the tail of the buffer for the pattern.
    ///
    /// Returns the match with byte offsets relative to the start of the
    /// search region (not the full buffer).
    pub fn search_tail(&self, pattern: &Regex) -> Option<regex::bytes::Match<'_>> {
        pattern.find(self.tail())
    }

    /// Check if the tail contains a pattern match.
    pub fn tail_contains(&self, pattern: &Regex) -> bool {
        self.search_tail(pattern).is_some()
    }

    /// Remove the first match of `pattern` found in the tail.
    ///
    /// Used to drop pager banners (`--More--`) from the captured output
    /// once they have been answered. Returns whether anything was removed.
    pub fn remove_tail_match(&mut self, pattern: &Regex) -> bool {
        let offset = self.tail_offset();
        let Some(m) = pattern.find(&self.buffer[offset..]) else {
            return false;
        };
        let (start, end) = (offset + m.start(), offset + m.end());
        let rest = self.buffer.split_off(end);
        self.buffer.truncate(start);
        self.buffer.unsplit(rest);
        true
    }

    /// Take ownership of the buffer contents and reset.
    pub fn take(&mut self) -> Vec<u8> {
        self.buffer.split().to_vec()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    fn tail_offset(&self) -> usize {
        self.buffer.len().saturating_sub(self.search_depth)
    }

    fn tail(&self) -> &[u8] {
        &self.buffer[self.tail_offset()..]
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl std::fmt::Debug for PatternBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternBuffer")
            .field("len", &self.buffer.len())
            .field("search_depth", &self.search_depth)
            .finish()
    }
}

/// vte performer that keeps printable text and line control characters.
struct Printable<'a>(&'a mut BytesMut);

impl Perform for Printable<'_> {
    fn print(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.0.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\n' | b'\r' | b'\t') {
            self.0.extend_from_slice(&[byte]);
        }
    }
}
