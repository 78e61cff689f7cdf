//! The worker seam consumed by the bounded loop.
//!
//! Everything the loop needs from the surrounding queue library fits in
//! one trait: perform a job, claim the next one, and read the shutdown
//! flag. The loop never sets the flag and never inspects a job.

use async_trait::async_trait;

use crate::error::Result;

/// A queue worker as seen by the bounded loop.
///
/// `perform` and `reserve` may block on arbitrary external I/O; the loop
/// awaits them one at a time and imposes no timeout. Job failures and
/// reservation failures surface through the returned `Result` and are
/// never caught or retried by the loop.
#[async_trait]
pub trait Worker: Send {
    /// Unit of work. Opaque; handed to `perform` unchanged.
    type Job: Send;

    /// Execute a single job.
    async fn perform(&mut self, job: Self::Job) -> Result<()>;

    /// Claim the next job from the queue, or `None` when it is empty.
    async fn reserve(&mut self) -> Result<Option<Self::Job>>;

    /// Whether the surrounding process has been asked to shut down.
    /// The flag is owned externally; this is a read, never a write.
    fn is_shutting_down(&self) -> bool;
}
