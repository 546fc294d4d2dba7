//! Humidity sensor line protocol
//!
//! Block format: `[RECORD] \r [RECORD] \r ... $`
//!
//! This module provides:
//! - `ByteBuffer`: accumulates bytes until a `$` terminator arrives
//! - `FrameExtractor`: drains complete blocks per a `DrainPolicy`
//! - `split_records` / `decode`: record splitting and hex field decoding
//! - `SensorStreamParser`: the `feed(bytes)` façade over all of the above
//!
//! Nothing here performs I/O; see [`crate::session`] for the reader thread.

pub mod buffer;
pub mod constants;
pub mod decoder;
pub mod frame;
pub mod parser;
pub mod record;

pub use buffer::ByteBuffer;
pub use decoder::{decode, DecodeProblem, MalformedReason};
pub use frame::{DrainPolicy, FrameExtractor};
pub use parser::{FeedOutput, ParserConfig, SensorStreamParser};
pub use record::split_records;
