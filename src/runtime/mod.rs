//! Runtime adapters and the embedder-facing snapshot surface.

pub mod api;
pub mod tokio_spawner;

pub use api::{list_queues, snapshot, QueueListing, QueueSnapshot};
pub use tokio_spawner::TokioSpawner;
