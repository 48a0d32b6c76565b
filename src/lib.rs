//! # Locking Queue
//!
//! An in-process scheduler that admits asynchronous tasks by compound,
//! named-resource locking.
//!
//! Every task submitted to a [`core::LockingQueue`] declares the set of
//! resource identifiers it needs exclusive access to. The queue runs a task
//! only when none of those identifiers are held by another in-flight task:
//! tasks with disjoint sets run concurrently, tasks with overlapping sets
//! serialize, and contention for an identifier always resolves in submission
//! order.
//!
//! ## Core Behavior
//!
//! - **Compound locks**: a task acquires its whole identifier set or nothing;
//!   partial acquisition never happens.
//! - **FIFO fairness**: waiting tasks are rescanned front to back on every
//!   release, and an acquisition earlier in the scan denies identifiers to
//!   tasks behind it in the same scan.
//! - **Pause/resume barrier**: [`core::LockingQueue::pause`] freezes admission
//!   of newly submitted work while the captured backlog keeps draining, and
//!   hands back a barrier that resolves when that backlog is done.
//! - **Quiescence**: [`core::LockingQueue::on_empty`] resolves when no
//!   identifier is held at all.
//! - **Default lock**: tasks submitted without lock information share one
//!   implicit identifier, so bare submissions serialize; an explicitly empty
//!   set opts into full concurrency.
//!
//! ## Example
//!
//! ```rust,ignore
//! use locking_queue::core::LockingQueue;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let queue: LockingQueue<u32> = LockingQueue::new();
//!
//!     // Disjoint lock sets run concurrently.
//!     let a = queue.enqueue_with_locks(["gpu0"], async { Ok(1) });
//!     let b = queue.enqueue_with_locks(["gpu1"], async { Ok(2) });
//!     // Overlapping sets serialize, in submission order.
//!     let c = queue.enqueue_with_locks(["gpu0", "gpu1"], async { Ok(3) });
//!
//!     assert_eq!(a.await?, 1);
//!     assert_eq!(b.await?, 2);
//!     assert_eq!(c.await?, 3);
//!
//!     queue.on_empty().await;
//!     Ok(())
//! }
//! ```
//!
//! For complete examples, see:
//! - `tests/locking_queue_test.rs` - Admission and fairness integration tests
//! - `tests/pause_resume_test.rs` - Barrier and quiescence integration tests

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: the lock registry, tasks, and the queue.
pub mod core;
/// Configuration models for queues.
pub mod config;
/// Builders to construct queues from configuration.
pub mod builders;
/// Runtime adapters and the embedder-facing snapshot surface.
pub mod runtime;
/// Shared utilities.
pub mod util;
