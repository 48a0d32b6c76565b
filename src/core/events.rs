//! Queue lifecycle event sinks.
//!
//! Provides an in-memory ring buffer for tests and embedders that want an
//! ordered record of scheduler transitions.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::util::clock::now_ms;
use crate::util::serde::TaskId;

/// Kind of scheduler transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Task appended to a waiting list.
    Enqueued,
    /// Task admitted: its whole lock set was acquired.
    Started,
    /// Task's operation resolved successfully.
    Completed,
    /// Task's operation resolved with a failure reason.
    Failed,
    /// Admission of newly submitted work frozen.
    Paused,
    /// Admission of newly submitted work restored.
    Resumed,
    /// Every task captured at pause time has completed.
    Drained,
    /// No resource identifier is held by any task.
    AllFree,
}

/// Recorded scheduler transition.
#[derive(Debug, Clone)]
pub struct QueueEvent {
    /// What happened.
    pub kind: EventKind,
    /// Task the event concerns, for task-scoped kinds.
    pub task: Option<TaskId>,
    /// Timestamp milliseconds.
    pub at_ms: u128,
}

impl QueueEvent {
    /// Build an event stamped with the current wall-clock time.
    pub fn new(kind: EventKind, task: Option<TaskId>) -> Self {
        Self {
            kind,
            task,
            at_ms: now_ms(),
        }
    }
}

/// Event sink abstraction.
///
/// `record` may run while the queue's internal state is locked;
/// implementations must not call back into the queue.
pub trait EventSink: Send {
    /// Record one scheduler event.
    fn record(&mut self, event: QueueEvent);
}

/// In-memory event sink for testing and dev.
///
/// Keeps at most `max_events` entries, discarding the oldest on overflow.
pub struct InMemoryEventSink {
    events: VecDeque<QueueEvent>,
    max_events: usize,
}

impl InMemoryEventSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<QueueEvent> {
        self.events.iter().cloned().collect()
    }

    /// Sequence of recorded kinds, in order.
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.iter().map(|e| e.kind).collect()
    }
}

impl EventSink for InMemoryEventSink {
    fn record(&mut self, event: QueueEvent) {
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Lets a sink be attached to a queue while the caller keeps a handle for
/// reading it back afterwards.
impl<S: EventSink> EventSink for Arc<Mutex<S>> {
    fn record(&mut self, event: QueueEvent) {
        self.lock().record(event);
    }
}
