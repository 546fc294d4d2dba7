//! Byte accumulator for the sensor stream
//!
//! Bytes arrive in arbitrary chunks. They are kept here until a block
//! terminator shows up, then handed out one block at a time.

use super::constants::{BLOCK_TERMINATOR, DEFAULT_MAX_BUFFER_BYTES, RECORD_SEPARATOR};

/// Growable stream buffer with an overflow ceiling
///
/// Only 7-bit ASCII is retained: the sensor speaks plain ASCII, so any byte
/// with the high bit set is line noise and is dropped on append.
#[derive(Debug, Clone)]
pub struct ByteBuffer {
    data: Vec<u8>,
    max_len: usize,
}

impl ByteBuffer {
    /// Create an empty buffer with the default ceiling
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_BUFFER_BYTES)
    }

    /// Create an empty buffer that holds at most `max_len` unterminated bytes
    pub fn with_limit(max_len: usize) -> Self {
        Self {
            data: Vec::with_capacity(max_len.min(DEFAULT_MAX_BUFFER_BYTES)),
            max_len,
        }
    }

    /// Append bytes to the tail of the buffer
    ///
    /// Returns `Some(n)` when the unterminated tail grew past the ceiling and
    /// `n` bytes were discarded. Only the tail's complete records are dropped;
    /// the record after the last `\r` survives if it fits under the ceiling.
    /// Complete blocks already buffered are kept.
    pub fn append(&mut self, bytes: &[u8]) -> Option<usize> {
        self.data.extend(bytes.iter().copied().filter(|b| b.is_ascii()));

        let tail_start = self
            .data
            .iter()
            .rposition(|&b| b == BLOCK_TERMINATOR)
            .map_or(0, |i| i + 1);
        let tail_len = self.data.len() - tail_start;

        if tail_len > self.max_len {
            let keep_from = self.data[tail_start..]
                .iter()
                .rposition(|&b| b == RECORD_SEPARATOR as u8)
                .map(|i| tail_start + i + 1)
                .filter(|&start| self.data.len() - start <= self.max_len)
                .unwrap_or(self.data.len());
            self.data.drain(tail_start..keep_from);
            return Some(keep_from - tail_start);
        }
        None
    }

    /// Remove and return the text before the first terminator
    ///
    /// The terminator itself is consumed. Returns `None`, leaving the buffer
    /// untouched, if no terminator has been received yet.
    pub fn drain_block(&mut self) -> Option<String> {
        let end = self.data.iter().position(|&b| b == BLOCK_TERMINATOR)?;
        let block: Vec<u8> = self.data.drain(..=end).collect();
        Some(String::from_utf8_lossy(&block[..end]).into_owned())
    }

    /// Number of complete blocks waiting to be drained
    pub fn pending_blocks(&self) -> usize {
        self.data.iter().filter(|&&b| b == BLOCK_TERMINATOR).count()
    }

    /// Number of buffered bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Ceiling on unterminated bytes
    #[inline]
    pub fn limit(&self) -> usize {
        self.max_len
    }

    /// Drop everything buffered
    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl Default for ByteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_without_terminator() {
        let mut buf = ByteBuffer::new();
        assert_eq!(buf.append(b"V0109C4\rV02"), None);
        assert_eq!(buf.drain_block(), None);
        assert_eq!(buf.len(), 11);
    }

    #[test]
    fn test_drain_keeps_remainder() {
        let mut buf = ByteBuffer::new();
        buf.append(b"V0109C4$V02");

        assert_eq!(buf.drain_block().as_deref(), Some("V0109C4"));
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.drain_block(), None);

        buf.append(b"0000$");
        assert_eq!(buf.drain_block().as_deref(), Some("V020000"));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_drain_first_of_many() {
        let mut buf = ByteBuffer::new();
        buf.append(b"A$B$C");
        assert_eq!(buf.pending_blocks(), 2);

        assert_eq!(buf.drain_block().as_deref(), Some("A"));
        assert_eq!(buf.drain_block().as_deref(), Some("B"));
        assert_eq!(buf.drain_block(), None);
        assert_eq!(buf.pending_blocks(), 0);
    }

    #[test]
    fn test_empty_block() {
        let mut buf = ByteBuffer::new();
        buf.append(b"$");
        assert_eq!(buf.drain_block().as_deref(), Some(""));
    }

    #[test]
    fn test_non_ascii_dropped() {
        let mut buf = ByteBuffer::new();
        buf.append(&[b'V', 0xFF, b'0', 0x80, b'1', 0xC3, 0xA9, b'$']);
        assert_eq!(buf.drain_block().as_deref(), Some("V01"));
    }

    #[test]
    fn test_overflow_discards_unterminated_tail() {
        let mut buf = ByteBuffer::with_limit(8);
        assert_eq!(buf.append(b"V01"), None);
        assert_eq!(buf.append(b"0000000"), Some(10));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_overflow_keeps_record_in_progress() {
        let mut buf = ByteBuffer::with_limit(8);
        assert_eq!(buf.append(b"AAAA\rV01"), None);
        assert_eq!(buf.append(b"0"), Some(5));
        assert_eq!(buf.len(), 4);

        assert_eq!(buf.append(b"9C4$"), None);
        assert_eq!(buf.drain_block().as_deref(), Some("V0109C4"));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_overflow_drops_record_longer_than_limit() {
        let mut buf = ByteBuffer::with_limit(4);
        assert_eq!(buf.append(b"\rV0109C4"), Some(8));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_overflow_keeps_complete_blocks() {
        let mut buf = ByteBuffer::with_limit(8);
        assert_eq!(buf.append(b"V0109C4$xxxxxxxxxx"), Some(10));
        assert_eq!(buf.len(), 8);
        assert_eq!(buf.drain_block().as_deref(), Some("V0109C4"));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_at_limit_is_not_overflow() {
        let mut buf = ByteBuffer::with_limit(8);
        assert_eq!(buf.append(b"12345678"), None);
        assert_eq!(buf.len(), 8);
    }

    #[test]
    fn test_clear() {
        let mut buf = ByteBuffer::new();
        buf.append(b"V01$V02");
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.drain_block(), None);
    }
}
