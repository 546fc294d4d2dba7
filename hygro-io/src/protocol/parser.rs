//! Stream parser façade
//!
//! Composes [`ByteBuffer`], [`FrameExtractor`], [`split_records`] and
//! [`decode`] into a single `feed` call. Holds no state besides the buffer.

use super::buffer::ByteBuffer;
use super::constants::DEFAULT_MAX_BUFFER_BYTES;
use super::decoder::{decode, DecodeProblem};
use super::frame::{DrainPolicy, FrameExtractor};
use super::record::split_records;
use crate::types::Reading;

/// Parser settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    pub drain_policy: DrainPolicy,
    /// Ceiling on buffered bytes without a terminator
    pub max_buffer_bytes: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            drain_policy: DrainPolicy::default(),
            max_buffer_bytes: DEFAULT_MAX_BUFFER_BYTES,
        }
    }
}

/// Result of one `feed` call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedOutput {
    /// Decoded readings, in record order
    pub readings: Vec<Reading>,
    /// Malformed records and buffer overflows
    pub problems: Vec<DecodeProblem>,
    /// Records skipped for an unrecognized tag
    pub ignored: Vec<String>,
}

impl FeedOutput {
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty() && self.problems.is_empty() && self.ignored.is_empty()
    }

    /// Most recent reading of this feed, if any
    pub fn latest(&self) -> Option<&Reading> {
        self.readings.last()
    }
}

/// Incremental parser for the sensor byte stream
///
/// One instance per connection. Bytes may be fed in chunks of any size.
#[derive(Debug, Clone)]
pub struct SensorStreamParser {
    buffer: ByteBuffer,
    extractor: FrameExtractor,
}

impl SensorStreamParser {
    /// Create a parser with an empty buffer
    pub fn new(config: ParserConfig) -> Self {
        Self {
            buffer: ByteBuffer::with_limit(config.max_buffer_bytes),
            extractor: FrameExtractor::new(config.drain_policy),
        }
    }

    /// Feed newly read bytes and collect whatever became decodable
    ///
    /// An empty chunk is a no-op, even if complete blocks are still queued
    /// under [`DrainPolicy::Single`].
    pub fn feed(&mut self, bytes: &[u8]) -> FeedOutput {
        let mut output = FeedOutput::default();
        if bytes.is_empty() {
            return output;
        }

        log::trace!(
            "Feed: {} bytes {:?}",
            bytes.len(),
            String::from_utf8_lossy(bytes)
        );

        if let Some(discarded) = self.buffer.append(bytes) {
            log::warn!(
                "Discarded {} unterminated bytes (ceiling {})",
                discarded,
                self.buffer.limit()
            );
            output.problems.push(DecodeProblem::BufferOverflow { discarded });
        }

        for block in self.extractor.extract(&mut self.buffer) {
            log::trace!("Block: {:?}", block);
            for record in split_records(&block) {
                match decode(record) {
                    Ok(reading) => {
                        log::debug!("Record {:?} -> {}", record, reading);
                        output.readings.push(reading);
                    }
                    Err(DecodeProblem::Ignored { record }) => {
                        log::debug!("Record {:?} ignored", record);
                        output.ignored.push(record);
                    }
                    Err(problem) => {
                        log::debug!("{}", problem);
                        output.problems.push(problem);
                    }
                }
            }
        }

        output
    }

    /// Forget all buffered bytes
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Bytes waiting for a terminator (or queued blocks)
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Complete blocks still queued in the buffer
    pub fn pending_blocks(&self) -> usize {
        self.buffer.pending_blocks()
    }

    /// Drain policy applied on every feed
    pub fn policy(&self) -> DrainPolicy {
        self.extractor.policy()
    }
}

impl Default for SensorStreamParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}
