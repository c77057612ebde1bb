//! Request sequencing for overlapping fetches.
//!
//! Each fetch receives a monotonically increasing [`RequestId`]. Only the
//! outcome of the most recently issued request may be applied; anything older
//! is stale, regardless of the order in which responses arrive.

use std::fmt;

/// Identifier of a single issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues request ids and tracks which one is current.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: Option<RequestId>,
}

impl RequestSequence {
    /// Issues the next id, superseding every previously issued one.
    pub fn issue(&mut self) -> RequestId {
        let next = self.latest.map_or(1, |id| id.0 + 1);
        let id = RequestId(next);
        self.latest = Some(id);
        id
    }

    /// True only for the most recently issued id.
    pub fn is_latest(&self, id: RequestId) -> bool {
        self.latest == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_increase_monotonically() {
        let mut sequence = RequestSequence::default();
        let first = sequence.issue();
        let second = sequence.issue();

        assert!(second > first);
        assert_eq!(first.to_string(), "#1");
        assert_eq!(second.to_string(), "#2");
    }

    #[test]
    fn test_only_latest_is_current() {
        let mut sequence = RequestSequence::default();
        let stale = sequence.issue();
        let current = sequence.issue();

        assert!(!sequence.is_latest(stale));
        assert!(sequence.is_latest(current));
    }
}
