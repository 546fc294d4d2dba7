//! Humidity reading types

use std::fmt;

/// Record tag identifying which sensor channel produced a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordTag {
    /// `V01` record
    V01,
    /// `V02` record
    V02,
}

impl RecordTag {
    /// All recognized tags, in protocol order
    pub const ALL: [RecordTag; 2] = [RecordTag::V01, RecordTag::V02];

    /// Wire representation of the tag
    pub const fn as_str(&self) -> &'static str {
        match self {
            RecordTag::V01 => "V01",
            RecordTag::V02 => "V02",
        }
    }

    /// Match the tag at the start of a record (exact, case-sensitive)
    pub fn from_prefix(record: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tag| record.starts_with(tag.as_str()))
    }
}

impl fmt::Display for RecordTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded humidity reading
///
/// Immutable once produced. The value is not clamped: a sensor reporting
/// `FFFF` yields 327.675%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Relative humidity in percent
    pub humidity: f64,
    /// Tag of the record this reading came from
    pub tag: RecordTag,
    /// Raw 16-bit field as sent by the sensor
    pub raw: u16,
}

impl Reading {
    /// Create a new reading
    pub const fn new(humidity: f64, tag: RecordTag, raw: u16) -> Self {
        Self { humidity, tag, raw }
    }

    /// Check if the value lies in the physical 0-100% range
    pub fn is_physical(&self) -> bool {
        (0.0..=100.0).contains(&self.humidity)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.humidity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_from_prefix() {
        assert_eq!(RecordTag::from_prefix("V0109C4"), Some(RecordTag::V01));
        assert_eq!(RecordTag::from_prefix("V02"), Some(RecordTag::V02));
        assert_eq!(RecordTag::from_prefix("v0109C4"), None);
        assert_eq!(RecordTag::from_prefix("V03ABCD"), None);
        assert_eq!(RecordTag::from_prefix("V0"), None);
        assert_eq!(RecordTag::from_prefix(""), None);
    }

    #[test]
    fn test_reading_display_two_decimals() {
        let reading = Reading::new(12.5, RecordTag::V01, 0x09C4);
        assert_eq!(reading.to_string(), "12.50%");

        let reading = Reading::new(0.0, RecordTag::V02, 0);
        assert_eq!(reading.to_string(), "0.00%");
    }

    #[test]
    fn test_physical_range() {
        assert!(Reading::new(55.0, RecordTag::V01, 11000).is_physical());
        assert!(!Reading::new(327.675, RecordTag::V01, 0xFFFF).is_physical());
    }
}
