//! Block extraction from the stream buffer

use super::buffer::ByteBuffer;
use serde::{Deserialize, Serialize};

/// How many complete blocks a single feed may drain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DrainPolicy {
    /// At most one block per feed; further blocks wait for the next feed
    Single,
    /// Every complete block in the buffer
    #[default]
    All,
}

/// Pulls complete message blocks out of a [`ByteBuffer`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameExtractor {
    policy: DrainPolicy,
}

impl FrameExtractor {
    /// Create an extractor that drains per `policy`
    pub const fn new(policy: DrainPolicy) -> Self {
        Self { policy }
    }

    /// Configured drain policy
    pub const fn policy(&self) -> DrainPolicy {
        self.policy
    }

    /// Drain blocks from the buffer according to the policy, oldest first
    pub fn extract(&self, buffer: &mut ByteBuffer) -> Vec<String> {
        match self.policy {
            DrainPolicy::Single => buffer.drain_block().into_iter().collect(),
            DrainPolicy::All => std::iter::from_fn(|| buffer.drain_block()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_drains_one() {
        let mut buf = ByteBuffer::new();
        buf.append(b"A$B$C");

        let extractor = FrameExtractor::new(DrainPolicy::Single);
        assert_eq!(extractor.extract(&mut buf), vec!["A".to_string()]);
        assert_eq!(extractor.extract(&mut buf), vec!["B".to_string()]);
        assert!(extractor.extract(&mut buf).is_empty());
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn test_all_drains_every_block() {
        let mut buf = ByteBuffer::new();
        buf.append(b"A$B$C");

        let extractor = FrameExtractor::new(DrainPolicy::All);
        assert_eq!(
            extractor.extract(&mut buf),
            vec!["A".to_string(), "B".to_string()]
        );
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn test_no_terminator_yields_nothing() {
        let mut buf = ByteBuffer::new();
        buf.append(b"V0109C4");

        for policy in [DrainPolicy::Single, DrainPolicy::All] {
            assert!(FrameExtractor::new(policy).extract(&mut buf).is_empty());
        }
        assert_eq!(buf.len(), 7);
    }

    #[test]
    fn test_default_policy_is_all() {
        assert_eq!(FrameExtractor::default().policy(), DrainPolicy::All);
    }
}
