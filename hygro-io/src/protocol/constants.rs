//! Constants for the humidity sensor line protocol
//!
//! Block format: `[RECORD] \r [RECORD] \r ... $`
//! Record format: `[TAG (3)] [HEX FIELD (4)] [ignored trailing text]`

// Framing
pub const BLOCK_TERMINATOR: u8 = b'$';
pub const RECORD_SEPARATOR: char = '\r';

// Record layout
pub const TAG_LEN: usize = 3;
pub const HEX_FIELD_LEN: usize = 4;
pub const MIN_RECORD_LEN: usize = TAG_LEN + HEX_FIELD_LEN; // 7

// Raw units to relative humidity percent
pub const HUMIDITY_SCALE: f64 = 0.005;

// Buffer limits
pub const DEFAULT_MAX_BUFFER_BYTES: usize = 4096;
