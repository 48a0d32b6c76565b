//! API-facing snapshot and listing models for embedders.

use serde::{Deserialize, Serialize};

use crate::core::{LockingQueue, QueueStats, Spawn, TaskMeta};
use crate::util::serde::LockId;

/// Point-in-time view of one queue, suitable for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSnapshot {
    /// Queue label.
    pub label: String,
    /// Whether admission of newly submitted work is frozen.
    pub paused: bool,
    /// Identifiers currently held by running tasks, sorted.
    pub held_locks: Vec<LockId>,
    /// Running tasks in admission order.
    pub running: Vec<TaskMeta>,
    /// Waiting tasks: the pre-pause list first, then the primary list.
    pub queued: Vec<TaskMeta>,
    /// Lifetime counters and current gauges.
    pub stats: QueueStats,
}

/// Capture a point-in-time view of `queue`.
///
/// Assembled from the introspection getters; concurrent completions may land
/// between fields.
pub fn snapshot<T, E, S>(queue: &LockingQueue<T, E, S>) -> QueueSnapshot
where
    T: Send + 'static,
    E: Send + 'static,
    S: Spawn + Send + Sync + 'static,
{
    QueueSnapshot {
        label: queue.label().to_owned(),
        paused: queue.is_paused(),
        held_locks: queue.held_locks(),
        running: queue.running_tasks(),
        queued: queue.queued_tasks(),
        stats: queue.stats(),
    }
}

/// Queue listing entry for configuration surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueListing {
    /// Queue name (the configuration map key).
    pub name: String,
    /// Configured default lock override, when set.
    pub default_lock: Option<String>,
}

/// Build queue listings from a configuration snapshot.
pub fn list_queues(cfg: &crate::config::QueueSetConfig) -> Vec<QueueListing> {
    cfg.queues
        .iter()
        .map(|(name, queue)| QueueListing {
            name: name.clone(),
            default_lock: queue.default_lock.clone(),
        })
        .collect()
}
