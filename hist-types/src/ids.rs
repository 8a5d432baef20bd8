//! Identity and ordering types for mirrorhist.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A unique token identifying one speculative history change.
///
/// Returned when a pending change is recorded and quoted back by the
/// authority when it confirms the change. UUID v4 format (16 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeId(uuid::Uuid);

impl ChangeId {
    /// Create a new random ChangeId.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Create a ChangeId from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        uuid::Uuid::from_slice(bytes).ok().map(Self)
    }

    /// Get the raw bytes of this ChangeId.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for ChangeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChangeId({})", self.0)
    }
}

/// A monotonically increasing marker tagging navigation requests.
///
/// Each request sent to a delegated authority carries the epoch current at
/// dispatch time, so the receiving side can recognize responses to
/// superseded requests as stale. Epochs are more reliable than timestamps
/// because they are assigned on a single logical thread and never repeat.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Epoch(u64);

impl Epoch {
    /// Create a new Epoch with the given value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the numeric value of this Epoch.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Create an Epoch representing "no navigation issued yet".
    pub fn zero() -> Self {
        Self(0)
    }

    /// Increment the epoch by one.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Epoch({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_id_is_uuid_v4() {
        let id = ChangeId::new();
        assert_eq!(id.as_bytes().len(), 16);
        assert_eq!(id.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn change_id_roundtrip() {
        let original = ChangeId::new();
        let bytes = original.as_bytes();
        let restored = ChangeId::from_bytes(bytes).unwrap();
        assert_eq!(original, restored);
    }

    #[test]
    fn change_id_from_invalid_length_fails() {
        assert!(ChangeId::from_bytes(&[0u8; 3]).is_none());
        assert!(ChangeId::from_bytes(&[0u8; 32]).is_none());
    }

    #[test]
    fn change_ids_are_unique() {
        let a = ChangeId::new();
        let b = ChangeId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn epoch_ordering() {
        let e1 = Epoch::new(100);
        let e2 = Epoch::new(200);
        assert!(e1 < e2);
        assert!(e2 > e1);
    }

    #[test]
    fn epoch_next() {
        let e = Epoch::new(100);
        assert_eq!(e.next().value(), 101);
    }

    #[test]
    fn epoch_zero() {
        let e = Epoch::zero();
        assert_eq!(e.value(), 0);
    }

    #[test]
    fn epoch_saturating_add() {
        let e = Epoch::new(u64::MAX);
        assert_eq!(e.next().value(), u64::MAX); // Saturates, doesn't wrap
    }
}
