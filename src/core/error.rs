//! Error types for queue operations.

use thiserror::Error;

/// Reason a completion handle resolved without a success value.
///
/// The scheduler never synthesizes failures of its own: `Failed` wraps the
/// reason produced by the task's operation, and `Abandoned` reports that the
/// operation can no longer resolve at all.
#[derive(Debug, Error)]
pub enum TaskError<E> {
    /// The operation ran to completion and produced this failure reason.
    #[error("task failed: {0}")]
    Failed(E),
    /// The operation will never produce a result. The queue was dropped while
    /// the task was still waiting, or the operation panicked mid-run.
    #[error("task abandoned before completion")]
    Abandoned,
}

impl<E> TaskError<E> {
    /// The failure reason produced by the operation, when there is one.
    pub fn into_failed(self) -> Option<E> {
        match self {
            Self::Failed(reason) => Some(reason),
            Self::Abandoned => None,
        }
    }

    /// True when the task was dropped or panicked rather than run to the end.
    pub const fn is_abandoned(&self) -> bool {
        matches!(self, Self::Abandoned)
    }
}

/// Errors produced while constructing queues.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Configuration failed validation.
    #[error("config invalid: {0}")]
    InvalidConfig(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
