//! Identifier types shared across the crate, with serde support.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier assigned to a task from a per-queue monotonic counter.
///
/// Ids are never reused within a queue, and comparing two ids orders the
/// tasks by submission time.
pub type TaskId = u64;

/// Name of a lockable resource.
///
/// Lock identifiers are opaque: two identifiers relate only by equality, and
/// any non-empty string is valid. Cloning is cheap; the backing string is
/// shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LockId(Arc<str>);

impl LockId {
    /// View the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LockId {
    fn from(value: &str) -> Self {
        Self(Arc::from(value))
    }
}

impl From<String> for LockId {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl fmt::Display for LockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for LockId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for LockId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_id_equality_is_by_content() {
        let a = LockId::from("gpu0");
        let b = LockId::from(String::from("gpu0"));
        assert_eq!(a, b);
        assert_ne!(a, LockId::from("gpu1"));
    }

    #[test]
    fn lock_id_serializes_as_plain_string() {
        let id = LockId::from("db");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"db\"");
        let back: LockId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn lock_id_displays_without_adornment() {
        assert_eq!(LockId::from("cache").to_string(), "cache");
    }
}
