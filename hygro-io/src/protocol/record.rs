//! Record splitting within a message block

use super::constants::RECORD_SEPARATOR;

/// Split a block into trimmed records, in order
///
/// Empty records are kept; the decoder classifies them as ignored.
pub fn split_records(block: &str) -> impl Iterator<Item = &str> {
    block.split(RECORD_SEPARATOR).map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_and_trim() {
        let records: Vec<&str> = split_records("V010000\r\nV0209C4 \r").collect();
        assert_eq!(records, vec!["V010000", "V0209C4", ""]);
    }

    #[test]
    fn test_single_record() {
        let records: Vec<&str> = split_records("  V0109C4\n").collect();
        assert_eq!(records, vec!["V0109C4"]);
    }

    #[test]
    fn test_empty_block_is_one_empty_record() {
        let records: Vec<&str> = split_records("").collect();
        assert_eq!(records, vec![""]);
    }
}
