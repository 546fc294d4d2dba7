//! Record decoding
//!
//! Record format: `[TAG (3)] [HEX FIELD (4)] [trailing text, ignored]`
//!
//! The hex field is a big-endian ASCII rendering of a 16-bit raw value in
//! units of 0.005 %RH. Anything after the field is ignored.

use super::constants::{HEX_FIELD_LEN, HUMIDITY_SCALE, MIN_RECORD_LEN, TAG_LEN};
use crate::types::{Reading, RecordTag};

/// Why a record with a recognized tag could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedReason {
    /// Fewer than 7 characters
    #[error("too short ({len} characters)")]
    TooShort { len: usize },

    /// Hex field contains a non-hex character
    #[error("invalid hex field {field:?}")]
    InvalidHex { field: String },
}

/// Classification of anything the parser did not turn into a reading
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeProblem {
    /// Record without a recognized tag; not an error
    #[error("ignored record {record:?}: unrecognized tag")]
    Ignored { record: String },

    /// Recognized tag, but the record could not be decoded
    #[error("malformed record {record:?}: {reason}")]
    Malformed {
        record: String,
        reason: MalformedReason,
    },

    /// Unterminated data outgrew the buffer ceiling and was discarded
    #[error("buffer overflow: discarded {discarded} unterminated bytes")]
    BufferOverflow { discarded: usize },
}

impl DecodeProblem {
    /// Ignored records are expected traffic, not failures
    pub fn is_ignored(&self) -> bool {
        matches!(self, DecodeProblem::Ignored { .. })
    }
}

/// Decode a single trimmed record into a reading
///
/// Pure function of the record text: decoding the same record twice yields
/// bit-identical values.
pub fn decode(record: &str) -> Result<Reading, DecodeProblem> {
    let Some(tag) = RecordTag::from_prefix(record) else {
        return Err(DecodeProblem::Ignored {
            record: record.to_string(),
        });
    };

    let len = record.chars().count();
    if len < MIN_RECORD_LEN {
        return Err(malformed(record, MalformedReason::TooShort { len }));
    }

    let field: String = record.chars().skip(TAG_LEN).take(HEX_FIELD_LEN).collect();
    let raw = parse_hex_field(&field)
        .ok_or_else(|| malformed(record, MalformedReason::InvalidHex { field }))?;

    Ok(Reading::new(f64::from(raw) * HUMIDITY_SCALE, tag, raw))
}

/// Strict base-16 parse: only `[0-9A-Fa-f]`, no sign or separators
fn parse_hex_field(field: &str) -> Option<u16> {
    if !field.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(field, 16).ok()
}

fn malformed(record: &str, reason: MalformedReason) -> DecodeProblem {
    DecodeProblem::Malformed {
        record: record.to_string(),
        reason,
    }
}
