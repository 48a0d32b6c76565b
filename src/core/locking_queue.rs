//! The locking queue: admission of async tasks by compound resource locks.

use std::collections::VecDeque;
use std::future::Future;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{oneshot, watch};

use crate::config::QueueConfig;
use crate::core::error::BuildError;
use crate::core::events::{EventKind, EventSink, QueueEvent};
use crate::core::registry::LockRegistry;
use crate::core::task::{CompletionHandle, Task, TaskMeta};
use crate::runtime::TokioSpawner;
use crate::util::partition::partition_in_order;
use crate::util::serde::{LockId, TaskId};

/// Implicit resource identifier assigned to tasks submitted without locks.
pub const DEFAULT_LOCK: &str = "__default__";

/// Abstraction for spawning task execution on a runtime.
pub trait Spawn {
    /// Spawn an async task that returns a future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Internal counters for queue statistics (thread-safe).
#[derive(Debug, Default)]
struct QueueCounters {
    submitted: AtomicU64,
    started: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

/// Point-in-time statistics: lifetime counters plus current gauges.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct QueueStats {
    /// Tasks accepted by enqueue since the queue was created.
    pub submitted: u64,
    /// Tasks admitted to run, immediately or from a waiting list.
    pub started: u64,
    /// Tasks whose operation resolved successfully.
    pub completed: u64,
    /// Tasks whose operation resolved with a failure reason.
    pub failed: u64,
    /// Tasks currently waiting across both lists.
    pub queued: usize,
    /// Tasks currently running.
    pub running: usize,
    /// Resource identifiers currently held.
    pub held_locks: usize,
}

/// Which waiting list a reprocessing pass scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaitList {
    /// Receives every new submission; driven by completions while not paused.
    Primary,
    /// Captured at pause time; driven by completions while paused.
    PrePause,
}

/// Scheduler state guarded by the queue's one mutex.
struct SchedState<T, E> {
    /// Identifiers held by running tasks.
    registry: LockRegistry,
    /// Primary waiting list.
    queued: VecDeque<Task<T, E>>,
    /// Waiting list captured at pause time; it alone drains while paused.
    queued_before_pause: VecDeque<Task<T, E>>,
    /// Descriptors of in-flight tasks, in admission order.
    running: Vec<TaskMeta>,
    /// While set, newly submitted work is never admitted.
    paused: bool,
    /// Barrier channel for the pause epoch still waiting to drain.
    barrier: Option<watch::Sender<bool>>,
    /// Next task identifier.
    next_id: TaskId,
}

impl<T, E> SchedState<T, E> {
    fn new() -> Self {
        Self {
            registry: LockRegistry::new(),
            queued: VecDeque::new(),
            queued_before_pause: VecDeque::new(),
            running: Vec::new(),
            paused: false,
            barrier: None,
            next_id: 0,
        }
    }

    /// Receiver tracking the barrier for the current pause epoch.
    ///
    /// While `paused` is set a barrier is always installed: `pause` creates
    /// it before releasing the state lock and only `resume` clears it.
    /// Absent a barrier there is no epoch still draining; the receiver
    /// starts resolved.
    fn subscribe_barrier(&self) -> watch::Receiver<bool> {
        self.barrier
            .as_ref()
            .map_or_else(|| watch::channel(true).1, watch::Sender::subscribe)
    }
}

/// State and services shared by every clone of a queue handle.
struct Inner<T, E, S> {
    label: String,
    /// Identifier granted to tasks submitted without an explicit lock set.
    default_lock: LockId,
    spawner: S,
    state: Mutex<SchedState<T, E>>,
    /// Epoch counter bumped whenever a primary pass leaves no identifier held.
    quiescence: watch::Sender<u64>,
    counters: QueueCounters,
    events: Mutex<Option<Box<dyn EventSink>>>,
}

impl<T, E, S> Inner<T, E, S>
where
    T: Send + 'static,
    E: Send + 'static,
    S: Spawn + Send + Sync + 'static,
{
    /// Record a lifecycle event when a sink is attached.
    fn record(&self, kind: EventKind, task: Option<TaskId>) {
        if let Some(sink) = self.events.lock().as_mut() {
            sink.record(QueueEvent::new(kind, task));
        }
    }

    /// One stable partition pass over a waiting list.
    ///
    /// Scans the list front to back; tasks whose whole lock set acquires are
    /// collected in order, the rest keep their relative order. A successful
    /// acquisition mutates the registry mid-pass, so a task near the front
    /// denies contested identifiers to tasks behind it in the same pass;
    /// contention therefore resolves in submission order. When the pass
    /// leaves no identifier held, the drain barrier resolves (pre-pause
    /// pass) or the quiescence epoch advances (primary pass).
    ///
    /// The caller holds the state lock and launches the returned tasks after
    /// releasing it.
    fn reprocess(&self, state: &mut SchedState<T, E>, list: WaitList) -> Vec<Task<T, E>> {
        let waiting = match list {
            WaitList::Primary => mem::take(&mut state.queued),
            WaitList::PrePause => mem::take(&mut state.queued_before_pause),
        };
        let registry = &mut state.registry;
        let (runnable, still_waiting) =
            partition_in_order(waiting, |task| registry.try_acquire(&task.meta.locks));
        match list {
            WaitList::Primary => state.queued = still_waiting,
            WaitList::PrePause => state.queued_before_pause = still_waiting,
        }

        for task in &runnable {
            state.running.push(task.meta.clone());
            self.record(EventKind::Started, Some(task.meta.id));
            tracing::info!("task {} admitted from queue", task.meta.id);
        }

        if state.registry.is_empty() {
            match list {
                WaitList::PrePause => self.resolve_barrier(state),
                WaitList::Primary => {
                    self.quiescence.send_modify(|epoch| *epoch = epoch.wrapping_add(1));
                    self.record(EventKind::AllFree, None);
                    tracing::debug!("all resources free");
                }
            }
        }
        runnable
    }

    /// Resolve the pause barrier for the current drain epoch, once.
    fn resolve_barrier(&self, state: &mut SchedState<T, E>) {
        if let Some(barrier) = &state.barrier {
            if !*barrier.borrow() {
                barrier.send_replace(true);
                self.record(EventKind::Drained, None);
                tracing::info!("pre-pause work drained");
            }
        }
    }

    /// Retire a finished task: drop it from the running set, release its
    /// locks, and reprocess whichever waiting list the current mode drives.
    fn task_finished(inner: &Arc<Self>, task: TaskId) {
        let mut state = inner.state.lock();
        if let Some(pos) = state.running.iter().position(|meta| meta.id == task) {
            let meta = state.running.remove(pos);
            state.registry.release(&meta.locks);
        }
        let list = if state.paused {
            WaitList::PrePause
        } else {
            WaitList::Primary
        };
        let runnable = inner.reprocess(&mut state, list);
        drop(state);
        for next in runnable {
            Self::launch(inner, next);
        }
    }

    /// Start an admitted task on the runtime.
    ///
    /// The caller has already placed the task's descriptor in the running set
    /// and acquired its locks.
    fn launch(inner: &Arc<Self>, task: Task<T, E>) {
        inner.counters.started.fetch_add(1, Ordering::Relaxed);
        let Task { meta, op, done } = task;
        let shared = Arc::clone(inner);
        let guard = FinishGuard {
            inner: Arc::clone(inner),
            task: meta.id,
        };
        inner.spawner.spawn(async move {
            tracing::debug!("executing task {}", meta.id);
            let result = op.await;
            match &result {
                Ok(_) => {
                    shared.counters.completed.fetch_add(1, Ordering::Relaxed);
                    shared.record(EventKind::Completed, Some(meta.id));
                    tracing::info!("task {} completed", meta.id);
                }
                Err(_) => {
                    shared.counters.failed.fetch_add(1, Ordering::Relaxed);
                    shared.record(EventKind::Failed, Some(meta.id));
                    tracing::warn!("task {} failed", meta.id);
                }
            }
            // Resolve the caller's handle before any lock is released.
            let _ = done.send(result);
            drop(guard);
        });
    }
}

/// Drop guard that retires a finished task.
///
/// Removal from the running set, lock release, and the follow-up
/// reprocessing pass all run from `Drop`, so an operation that panics, or a
/// driver dropped at runtime shutdown, cannot leave identifiers held.
struct FinishGuard<T, E, S>
where
    T: Send + 'static,
    E: Send + 'static,
    S: Spawn + Send + Sync + 'static,
{
    inner: Arc<Inner<T, E, S>>,
    task: TaskId,
}

impl<T, E, S> Drop for FinishGuard<T, E, S>
where
    T: Send + 'static,
    E: Send + 'static,
    S: Spawn + Send + Sync + 'static,
{
    fn drop(&mut self) {
        Inner::task_finished(&self.inner, self.task);
    }
}

/// An asynchronous task queue that admits work by compound resource locks.
///
/// Each submitted task names the set of resource identifiers it must hold
/// exclusively while it runs. A task is admitted the moment every identifier
/// in its set is free and holds all of them until its operation resolves:
/// tasks with disjoint sets run concurrently, tasks with overlapping sets
/// serialize. Waiting tasks are scanned front to back on every release, so
/// contention for an identifier always resolves in submission order.
///
/// Handles are cheap to clone; every clone drives the same queue.
pub struct LockingQueue<T, E = anyhow::Error, S = TokioSpawner> {
    inner: Arc<Inner<T, E, S>>,
}

impl<T, E, S> Clone for LockingQueue<T, E, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E> LockingQueue<T, E, TokioSpawner>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Create a queue with default configuration, spawning onto the current
    /// tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics outside a tokio runtime context; use
    /// [`with_spawner`](Self::with_spawner) to supply a handle explicitly.
    pub fn new() -> Self {
        Self::with_spawner(TokioSpawner::current())
    }
}

impl<T, E> Default for LockingQueue<T, E, TokioSpawner>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E, S> LockingQueue<T, E, S>
where
    T: Send + 'static,
    E: Send + 'static,
    S: Spawn + Send + Sync + 'static,
{
    /// Create a queue with default configuration and an explicit spawner.
    pub fn with_spawner(spawner: S) -> Self {
        Self::from_config_unchecked(QueueConfig::default(), spawner)
    }

    /// Create a queue from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidConfig`] when the configuration fails
    /// validation.
    pub fn with_config(config: QueueConfig, spawner: S) -> Result<Self, BuildError> {
        config.validate().map_err(BuildError::InvalidConfig)?;
        Ok(Self::from_config_unchecked(config, spawner))
    }

    fn from_config_unchecked(config: QueueConfig, spawner: S) -> Self {
        let (quiescence, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                label: config.label,
                default_lock: config
                    .default_lock
                    .as_deref()
                    .unwrap_or(DEFAULT_LOCK)
                    .into(),
                spawner,
                state: Mutex::new(SchedState::new()),
                quiescence,
                counters: QueueCounters::default(),
                events: Mutex::new(None),
            }),
        }
    }

    /// Attach an event sink; it observes every transition from then on.
    pub fn with_event_sink(self, sink: Box<dyn EventSink>) -> Self {
        *self.inner.events.lock() = Some(sink);
        self
    }

    /// Submit an operation with no explicit lock set.
    ///
    /// The task is assigned the queue's shared default identifier, so bare
    /// submissions serialize with one another and with anything else naming
    /// that identifier. Use
    /// [`enqueue_with_locks`](Self::enqueue_with_locks) with an empty set
    /// for unrestricted concurrency.
    pub fn enqueue<F>(&self, op: F) -> CompletionHandle<T, E>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        let default_lock = self.inner.default_lock.clone();
        self.enqueue_with_locks([default_lock], op)
    }

    /// Submit an operation that holds every identifier in `locks` while it
    /// runs.
    ///
    /// The operation starts at once when the queue is not paused and the
    /// whole set is free; otherwise the task joins the back of the primary
    /// waiting list. Duplicate identifiers in `locks` are collapsed. An
    /// empty set conflicts with nothing and is admitted immediately unless
    /// paused.
    ///
    /// The returned handle resolves once, with the operation's own result,
    /// or with [`TaskError::Abandoned`](crate::core::TaskError::Abandoned)
    /// if the queue is dropped while the task still waits.
    pub fn enqueue_with_locks<I, F>(&self, locks: I, op: F) -> CompletionHandle<T, E>
    where
        I: IntoIterator,
        I::Item: Into<LockId>,
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        let locks: Vec<LockId> = locks.into_iter().map(Into::into).collect();
        let (done_tx, done_rx) = oneshot::channel();
        self.inner.counters.submitted.fetch_add(1, Ordering::Relaxed);

        let mut state = self.inner.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        let task = Task {
            meta: TaskMeta::new(id, locks),
            op: Box::pin(op),
            done: done_tx,
        };

        // Order matters: a paused queue must not touch the registry at all.
        if state.paused || !state.registry.try_acquire(&task.meta.locks) {
            self.inner.record(EventKind::Enqueued, Some(id));
            state.queued.push_back(task);
            drop(state);
            tracing::debug!("task {} queued", id);
        } else {
            state.running.push(task.meta.clone());
            self.inner.record(EventKind::Started, Some(id));
            drop(state);
            tracing::info!("task {} started immediately", id);
            Inner::launch(&self.inner, task);
        }
        CompletionHandle::new(id, done_rx)
    }

    /// Freeze admission of newly submitted work and capture the backlog.
    ///
    /// Everything currently waiting moves to the back of the pre-pause list,
    /// which keeps draining while the queue is paused; tasks submitted after
    /// this call sit untouched until [`resume`](Self::resume). The returned
    /// barrier resolves once the captured work has drained and no resource
    /// identifier is held. Pausing an already paused queue shares the same
    /// drain epoch: every barrier from it resolves together.
    pub fn pause(&self) -> DrainBarrier {
        let mut state = self.inner.state.lock();
        if state.paused {
            return DrainBarrier {
                rx: state.subscribe_barrier(),
            };
        }

        state.paused = true;
        let migrated = mem::take(&mut state.queued);
        state.queued_before_pause.extend(migrated);
        if state.barrier.is_none() {
            state.barrier = Some(watch::channel(false).0);
        }
        self.inner.record(EventKind::Paused, None);
        tracing::info!(
            "queue paused with {} running and {} captured",
            state.running.len(),
            state.queued_before_pause.len()
        );

        // Drive the captured list once; with nothing running this resolves
        // the barrier on the spot, and it readmits any pre-pause work left
        // over from an earlier epoch whose locks have since freed.
        let runnable = self.inner.reprocess(&mut state, WaitList::PrePause);
        let rx = state.subscribe_barrier();
        drop(state);
        for task in runnable {
            Inner::launch(&self.inner, task);
        }
        DrainBarrier { rx }
    }

    /// Restore admission of newly submitted work.
    ///
    /// Runs one pass over the primary waiting list straight away. Resuming
    /// while pre-pause work is still pending leaves that work where it is;
    /// the next pause adopts it at the front of its captured list.
    pub fn resume(&self) {
        let mut state = self.inner.state.lock();
        if !state.paused {
            return;
        }
        state.paused = false;
        if state.barrier.as_ref().is_some_and(|b| *b.borrow()) {
            // Epoch fully drained; the next pause starts a fresh barrier.
            state.barrier = None;
        }
        self.inner.record(EventKind::Resumed, None);
        tracing::info!("queue resumed with {} waiting", state.queued.len());
        let runnable = self.inner.reprocess(&mut state, WaitList::Primary);
        drop(state);
        for task in runnable {
            Inner::launch(&self.inner, task);
        }
    }

    /// True while admission of newly submitted work is frozen.
    pub fn is_paused(&self) -> bool {
        self.inner.state.lock().paused
    }

    /// Resolve once no resource identifier is held.
    ///
    /// Returns immediately when the registry is already empty; otherwise
    /// waits for the next general quiescence signal, fired when a
    /// reprocessing pass outside of pause leaves the registry empty. This is
    /// a snapshot guarantee: by the time the caller observes resolution, new
    /// tasks may hold locks again.
    pub async fn on_empty(&self) {
        // Subscribe before checking so a signal between the check and the
        // await cannot be missed.
        let mut rx = self.inner.quiescence.subscribe();
        if self.inner.state.lock().registry.is_empty() {
            return;
        }
        let _ = rx.changed().await;
    }

    /// Subscribe to the general quiescence signal.
    ///
    /// The channel carries an epoch counter incremented each time a
    /// reprocessing pass outside of pause leaves the registry empty; await
    /// `changed` on the receiver to observe the next epoch.
    pub fn subscribe_empty(&self) -> watch::Receiver<u64> {
        self.inner.quiescence.subscribe()
    }

    /// Descriptors of tasks currently running, in admission order.
    pub fn running_tasks(&self) -> Vec<TaskMeta> {
        self.inner.state.lock().running.clone()
    }

    /// Descriptors of tasks currently waiting: the pre-pause list first,
    /// then the primary list, reflecting that pre-pause tasks have logical
    /// priority.
    pub fn queued_tasks(&self) -> Vec<TaskMeta> {
        let state = self.inner.state.lock();
        state
            .queued_before_pause
            .iter()
            .chain(state.queued.iter())
            .map(|task| task.meta.clone())
            .collect()
    }

    /// Number of tasks currently running.
    pub fn running_len(&self) -> usize {
        self.inner.state.lock().running.len()
    }

    /// Number of tasks currently waiting across both lists.
    pub fn queued_len(&self) -> usize {
        let state = self.inner.state.lock();
        state.queued.len() + state.queued_before_pause.len()
    }

    /// Sorted identifiers currently held by running tasks.
    pub fn held_locks(&self) -> Vec<LockId> {
        self.inner.state.lock().registry.snapshot()
    }

    /// Identifier granted to tasks submitted without an explicit lock set.
    pub fn default_lock(&self) -> &LockId {
        &self.inner.default_lock
    }

    /// Label used in logs and snapshots.
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Point-in-time statistics: lifetime counters plus current gauges.
    pub fn stats(&self) -> QueueStats {
        let (queued, running, held_locks) = {
            let state = self.inner.state.lock();
            (
                state.queued.len() + state.queued_before_pause.len(),
                state.running.len(),
                state.registry.len(),
            )
        };
        QueueStats {
            submitted: self.inner.counters.submitted.load(Ordering::Relaxed),
            started: self.inner.counters.started.load(Ordering::Relaxed),
            completed: self.inner.counters.completed.load(Ordering::Relaxed),
            failed: self.inner.counters.failed.load(Ordering::Relaxed),
            queued,
            running,
            held_locks,
        }
    }
}

/// Handle returned by [`LockingQueue::pause`].
///
/// Resolves when a pass over the pre-pause list leaves no resource
/// identifier held. Tasks that hold no identifiers do not delay it.
#[derive(Debug, Clone)]
pub struct DrainBarrier {
    rx: watch::Receiver<bool>,
}

impl DrainBarrier {
    /// Wait for the drain epoch this barrier belongs to.
    ///
    /// Resolves immediately when the epoch has already drained, and also
    /// when the queue itself is dropped, since nothing can be running then.
    pub async fn wait(mut self) {
        if *self.rx.borrow_and_update() {
            return;
        }
        while self.rx.changed().await.is_ok() {
            if *self.rx.borrow() {
                return;
            }
        }
    }
}
