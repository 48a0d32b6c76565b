//! Task descriptors and completion handles.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::core::error::TaskError;
use crate::util::clock::now_ms;
use crate::util::serde::{LockId, TaskId};

/// Boxed unit of work producing a success value or a failure reason.
pub(crate) type TaskFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send>>;

/// Immutable descriptor of a submitted task.
///
/// Built once at submission time; this is the shape introspection and
/// snapshots return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskMeta {
    /// Queue-assigned identifier; doubles as the submission order.
    pub id: TaskId,
    /// Resources the task holds for the whole time it runs, deduplicated.
    pub locks: Vec<LockId>,
    /// Wall-clock submission time in milliseconds since the Unix epoch.
    pub enqueued_at_ms: u128,
}

impl TaskMeta {
    /// Build a descriptor, dropping repeated lock identifiers while keeping
    /// first-occurrence order.
    pub(crate) fn new(id: TaskId, locks: Vec<LockId>) -> Self {
        let mut seen = HashSet::new();
        let locks = locks
            .into_iter()
            .filter(|lock| seen.insert(lock.clone()))
            .collect();
        Self {
            id,
            locks,
            enqueued_at_ms: now_ms(),
        }
    }
}

/// A submitted task waiting for admission: its descriptor, the operation to
/// run, and the channel that resolves the caller's completion handle.
pub(crate) struct Task<T, E> {
    pub(crate) meta: TaskMeta,
    pub(crate) op: TaskFuture<T, E>,
    pub(crate) done: oneshot::Sender<Result<T, E>>,
}

/// Caller's view of one task's eventual outcome.
///
/// Resolves exactly once: with the operation's own result once the task has
/// run, or with [`TaskError::Abandoned`] if the task can never run. Dropping
/// the handle detaches from the outcome without cancelling the task.
#[derive(Debug)]
pub struct CompletionHandle<T, E> {
    id: TaskId,
    rx: oneshot::Receiver<Result<T, E>>,
}

impl<T, E> CompletionHandle<T, E> {
    pub(crate) fn new(id: TaskId, rx: oneshot::Receiver<Result<T, E>>) -> Self {
        Self { id, rx }
    }

    /// Identifier of the task this handle resolves for.
    pub const fn task_id(&self) -> TaskId {
        self.id
    }
}

impl<T, E> Future for CompletionHandle<T, E> {
    type Output = Result<T, TaskError<E>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        Pin::new(&mut this.rx).poll(cx).map(|res| match res {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(reason)) => Err(TaskError::Failed(reason)),
            Err(_) => Err(TaskError::Abandoned),
        })
    }
}
