//! The bounded work loop.
//!
//! `BoundedRunner::run` executes between 1 and N jobs per call: the job
//! handed in by the supervisor first, then jobs it reserves itself, until
//! the bound is reached, the queue is empty, or shutdown is requested.

use std::sync::Arc;

use crate::error::Result;
use crate::hooks::{HookPoint, HookRegistry};
use crate::limit::{EnvLimit, LimitSource};
use crate::worker::Worker;

/// Why a bounded run stopped executing jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The configured bound was reached
    LimitReached,
    /// The queue had no job to hand out
    QueueEmpty,
    /// The shutdown flag was set
    ShuttingDown,
}

/// Summary of one bounded run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Jobs executed during the run, the initial job included.
    pub jobs_performed: u32,
    /// What ended the loop.
    pub stop_reason: StopReason,
}

/// BoundedRunner executes the per-process work loop.
///
/// Each run:
/// 1. Resolves the job bound (fresh read, fails fast when unset)
/// 2. Runs the before hooks
/// 3. Performs the initial job, then self-reserved jobs, up to the bound
/// 4. Runs the after hooks and reports how it stopped
pub struct BoundedRunner<W> {
    /// Lifecycle hooks, shared for the life of the process.
    hooks: Arc<HookRegistry<W>>,
    /// Where the per-run job bound comes from.
    limit: Arc<dyn LimitSource>,
}

impl<W: Worker> BoundedRunner<W> {
    /// Create a runner reading `JOBS_PER_FORK` from the environment.
    pub fn new(hooks: Arc<HookRegistry<W>>) -> Self {
        Self {
            hooks,
            limit: Arc::new(EnvLimit::new()),
        }
    }

    /// Create a runner with a custom bound source.
    pub fn with_limit(hooks: Arc<HookRegistry<W>>, limit: Arc<dyn LimitSource>) -> Self {
        Self { hooks, limit }
    }

    /// The registry this runner dispatches hooks from.
    pub fn hooks(&self) -> &Arc<HookRegistry<W>> {
        &self.hooks
    }

    /// Execute up to the configured number of jobs, starting with
    /// `initial_job`.
    ///
    /// The initial job always runs first; every further job is reserved
    /// from the worker's own queue. The loop stops at the bound, at the
    /// first empty reserve, or as soon as the shutdown flag is seen at an
    /// iteration boundary. Before hooks run ahead of the first job, after
    /// hooks run once the loop has exited, and job, reservation, and hook
    /// failures propagate immediately, skipping whatever would have come
    /// after them.
    pub async fn run(&self, worker: &mut W, initial_job: W::Job) -> Result<RunReport> {
        // The bound must resolve before anything observable happens: no
        // hook runs and no job executes on a configuration error.
        let limit = match self.limit.jobs_per_fork() {
            Ok(limit) => limit,
            Err(err) => {
                tracing::error!(error = %err, "Bounded run refused to start");
                return Err(err);
            }
        };

        tracing::debug!(limit, "Starting bounded run");
        self.hooks.run(HookPoint::BeforeLoop, worker)?;

        // Fresh counter on this stack frame; nothing survives the call.
        let mut jobs_performed: u32 = 0;
        let mut initial = Some(initial_job);

        let stop_reason = loop {
            if jobs_performed >= limit {
                break StopReason::LimitReached;
            }
            if worker.is_shutting_down() {
                break StopReason::ShuttingDown;
            }
            match initial.take() {
                Some(job) => worker.perform(job).await?,
                None => match worker.reserve().await? {
                    Some(job) => worker.perform(job).await?,
                    // An empty reserve ends the run; retrying in a tight
                    // spin would hammer the backing store.
                    None => break StopReason::QueueEmpty,
                },
            }
            jobs_performed += 1;
        };

        self.hooks.run(HookPoint::AfterLoop, worker)?;
        tracing::info!(jobs_performed, stop_reason = ?stop_reason, "Bounded run finished");

        Ok(RunReport {
            jobs_performed,
            stop_reason,
        })
    }
}
