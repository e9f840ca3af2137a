//! Envelopes carried by a transport.

use verdant_messages::Tag;
use verdant_types::Rank;

/// A tagged payload in flight between two ranks.
///
/// The transport never looks inside `payload`; the tag alone decides which
/// decoder the receiver uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Rank that sent the payload.
    pub source: Rank,

    /// Tag the payload was sent under.
    pub tag: Tag,

    /// Encoded message bytes.
    pub payload: Vec<u8>,
}

impl Envelope {
    /// Create a new envelope.
    pub fn new(source: Rank, tag: Tag, payload: Vec<u8>) -> Self {
        Self {
            source,
            tag,
            payload,
        }
    }

    /// Check whether this envelope satisfies a receive for `tag` from
    /// `source` (`None` accepts any sender).
    pub fn matches(&self, source: Option<Rank>, tag: Tag) -> bool {
        self.tag == tag && source.map_or(true, |s| s == self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_matching() {
        let envelope = Envelope::new(Rank(2), Tag::RESULTS, vec![1, 2, 3]);

        assert!(envelope.matches(Some(Rank(2)), Tag::RESULTS));
        assert!(envelope.matches(None, Tag::RESULTS));
        assert!(!envelope.matches(Some(Rank(1)), Tag::RESULTS));
        assert!(!envelope.matches(None, Tag::CONFIG));
    }
}
