//! Error types for workbound
//!
//! Centralized error handling using thiserror. Errors raised by the
//! worker's own perform/reserve primitives and by registered hooks cross
//! this boundary as boxed trait objects so their identity survives intact.

use thiserror::Error;

use crate::hooks::HookPoint;

/// Boxed error carried across the worker, queue, and hook seams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// All error types that can occur in workbound
#[derive(Debug, Error)]
pub enum WorkboundError {
    /// Per-run job bound is not configured at all
    #[error("{var} must be set to the number of jobs to perform per fork")]
    LimitMissing { var: String },

    /// Per-run job bound is present but not a positive integer
    #[error("{var} must be a positive integer, got {value:?}")]
    LimitInvalid { var: String, value: String },

    /// A registered lifecycle hook failed
    #[error("{point} hook failed: {source}")]
    Hook { point: HookPoint, source: BoxError },

    /// A job's own execution failed; surfaced unchanged
    #[error(transparent)]
    Job(BoxError),

    /// Reserving the next job from the queue failed; surfaced unchanged
    #[error(transparent)]
    Queue(BoxError),
}

impl WorkboundError {
    /// Wrap a job execution failure without altering its message.
    pub fn job(err: impl Into<BoxError>) -> Self {
        Self::Job(err.into())
    }

    /// Wrap a queue reservation failure without altering its message.
    pub fn queue(err: impl Into<BoxError>) -> Self {
        Self::Queue(err.into())
    }

    /// Wrap a hook failure, recording which lifecycle point raised it.
    pub fn hook(point: HookPoint, err: impl Into<BoxError>) -> Self {
        Self::Hook {
            point,
            source: err.into(),
        }
    }
}

/// Result type alias for workbound operations
pub type Result<T> = std::result::Result<T, WorkboundError>;
