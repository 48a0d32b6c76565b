//! Held-resource registry with all-or-nothing acquisition.

use std::collections::HashSet;

use crate::util::serde::LockId;

/// The set of resource identifiers currently held by running tasks.
///
/// Membership is binary, not counted: an identifier is present exactly when
/// one running task's lock set contains it. Every mutation happens under the
/// scheduler's state mutex, so the check-then-insert sequence in
/// [`try_acquire`](Self::try_acquire) is atomic with respect to every other
/// acquisition or release.
#[derive(Debug, Default)]
pub struct LockRegistry {
    held: HashSet<LockId>,
}

impl LockRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to acquire every identifier in `locks` at once.
    ///
    /// Fails without touching the registry when any identifier is already
    /// held; otherwise inserts all of them and succeeds. An empty set
    /// acquires trivially.
    pub fn try_acquire(&mut self, locks: &[LockId]) -> bool {
        if locks.iter().any(|lock| self.held.contains(lock)) {
            return false;
        }
        for lock in locks {
            self.held.insert(lock.clone());
        }
        true
    }

    /// Release every identifier in `locks`. Identifiers that are not held
    /// are ignored; release never fails.
    pub fn release(&mut self, locks: &[LockId]) {
        for lock in locks {
            self.held.remove(lock);
        }
    }

    /// True when no identifier is held.
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Number of identifiers currently held.
    pub fn len(&self) -> usize {
        self.held.len()
    }

    /// Sorted snapshot of the held identifiers.
    pub fn snapshot(&self) -> Vec<LockId> {
        let mut held: Vec<_> = self.held.iter().cloned().collect();
        held.sort_unstable();
        held
    }
}
