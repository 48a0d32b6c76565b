//! Core scheduling abstractions: the lock registry, tasks, and the queue.

pub mod error;
pub mod events;
pub mod locking_queue;
pub mod registry;
pub mod task;

pub use error::{AppResult, BuildError, TaskError};
pub use events::{EventKind, EventSink, InMemoryEventSink, QueueEvent};
pub use locking_queue::{DrainBarrier, LockingQueue, QueueStats, Spawn, DEFAULT_LOCK};
pub use registry::LockRegistry;
pub use task::{CompletionHandle, TaskMeta};
