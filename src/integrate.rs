//! Worker integration - routes the perform entry point through the
//! bounded loop.
//!
//! `BoundedWorker` wraps an existing worker so that one call to its
//! perform entry point executes a whole bounded run, while the wrapped
//! worker's single-job perform stays reachable as `perform_one`.
//! Wrapping composes: decorators stack in either order because each
//! layer delegates to the one it holds instead of patching anything
//! global.

use async_trait::async_trait;

use crate::error::Result;
use crate::runner::BoundedRunner;
use crate::worker::Worker;

/// A worker whose perform entry point executes a bounded run.
///
/// The supervisor keeps calling perform once per forked child, exactly
/// as before; each call now works through up to the configured number of
/// jobs instead of one.
pub struct BoundedWorker<W: Worker> {
    /// The wrapped worker; still owns queue access and the shutdown flag.
    inner: W,
    /// The loop installed over `inner`'s perform entry point.
    runner: BoundedRunner<W>,
}

impl<W: Worker> BoundedWorker<W> {
    /// Wrap `inner` so its perform entry point runs the bounded loop.
    pub fn new(inner: W, runner: BoundedRunner<W>) -> Self {
        Self { inner, runner }
    }

    /// The original single-job perform, unchanged.
    ///
    /// The bounded loop delegates here for every job it executes;
    /// callers that want exactly one job can too.
    pub async fn perform_one(&mut self, job: W::Job) -> Result<()> {
        self.inner.perform(job).await
    }

    /// Shared access to the wrapped worker.
    pub fn inner(&self) -> &W {
        &self.inner
    }

    /// Exclusive access to the wrapped worker.
    pub fn inner_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Unwrap, returning the original worker.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[async_trait]
impl<W: Worker> Worker for BoundedWorker<W> {
    type Job = W::Job;

    async fn perform(&mut self, job: Self::Job) -> Result<()> {
        self.runner.run(&mut self.inner, job).await?;
        Ok(())
    }

    async fn reserve(&mut self) -> Result<Option<Self::Job>> {
        self.inner.reserve().await
    }

    fn is_shutting_down(&self) -> bool {
        self.inner.is_shutting_down()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::HookRegistry;
    use crate::limit::{EnvLimit, FixedLimit};
    use std::collections::VecDeque;
    use std::sync::Arc;

    /// Minimal queue-backed worker.
    struct SimpleWorker {
        queue: VecDeque<u32>,
        performed: Vec<u32>,
        reserve_calls: u32,
        shutdown: bool,
    }

    impl SimpleWorker {
        fn with_queue(jobs: &[u32]) -> Self {
            Self {
                queue: jobs.iter().copied().collect(),
                performed: Vec::new(),
                reserve_calls: 0,
                shutdown: false,
            }
        }
    }

    #[async_trait]
    impl Worker for SimpleWorker {
        type Job = u32;

        async fn perform(&mut self, job: Self::Job) -> Result<()> {
            self.performed.push(job);
            Ok(())
        }

        async fn reserve(&mut self) -> Result<Option<Self::Job>> {
            self.reserve_calls += 1;
            Ok(self.queue.pop_front())
        }

        fn is_shutting_down(&self) -> bool {
            self.shutdown
        }
    }

    /// Pass-through decorator counting entries into each primitive.
    struct AuditWorker<W: Worker> {
        inner: W,
        performs: u32,
        reserves: u32,
    }

    impl<W: Worker> AuditWorker<W> {
        fn new(inner: W) -> Self {
            Self {
                inner,
                performs: 0,
                reserves: 0,
            }
        }
    }

    #[async_trait]
    impl<W: Worker> Worker for AuditWorker<W> {
        type Job = W::Job;

        async fn perform(&mut self, job: Self::Job) -> Result<()> {
            self.performs += 1;
            self.inner.perform(job).await
        }

        async fn reserve(&mut self) -> Result<Option<Self::Job>> {
            self.reserves += 1;
            self.inner.reserve().await
        }

        fn is_shutting_down(&self) -> bool {
            self.inner.is_shutting_down()
        }
    }

    fn bounded(inner: SimpleWorker, limit: u32) -> BoundedWorker<SimpleWorker> {
        let hooks = Arc::new(HookRegistry::new());
        let runner = BoundedRunner::with_limit(hooks, Arc::new(FixedLimit(limit)));
        BoundedWorker::new(inner, runner)
    }

    #[tokio::test]
    async fn test_perform_runs_a_full_bounded_run() {
        let mut worker = bounded(SimpleWorker::with_queue(&[2, 3, 4, 5]), 3);

        worker.perform(1).await.unwrap();

        assert_eq!(worker.inner().performed, vec![1, 2, 3]);
        assert_eq!(worker.inner().queue.len(), 2);
    }

    #[tokio::test]
    async fn test_perform_one_bypasses_the_loop() {
        // The bound is unconfigured on purpose; the single-job path must
        // not care.
        let hooks = Arc::new(HookRegistry::new());
        let runner = BoundedRunner::with_limit(
            hooks,
            Arc::new(EnvLimit::var("WORKBOUND_INTEGRATE_TEST_UNSET")),
        );
        let mut worker = BoundedWorker::new(SimpleWorker::with_queue(&[2, 3]), runner);

        worker.perform_one(1).await.unwrap();

        assert_eq!(worker.inner().performed, vec![1]);
        assert_eq!(worker.inner().reserve_calls, 0);
    }

    #[tokio::test]
    async fn test_reserve_and_shutdown_delegate() {
        let mut worker = bounded(SimpleWorker::with_queue(&[7]), 1);

        assert_eq!(worker.reserve().await.unwrap(), Some(7));
        assert_eq!(worker.reserve().await.unwrap(), None);
        assert!(!worker.is_shutting_down());

        worker.inner_mut().shutdown = true;
        assert!(worker.is_shutting_down());
    }

    #[tokio::test]
    async fn test_into_inner_returns_the_wrapped_worker() {
        let mut worker = bounded(SimpleWorker::with_queue(&[2]), 2);
        worker.perform(1).await.unwrap();

        let inner = worker.into_inner();
        assert_eq!(inner.performed, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_bounding_outside_another_decorator() {
        let audited = AuditWorker::new(SimpleWorker::with_queue(&[2, 3, 4]));
        let hooks = Arc::new(HookRegistry::new());
        let runner = BoundedRunner::with_limit(hooks, Arc::new(FixedLimit(3)));
        let mut worker = BoundedWorker::new(audited, runner);

        worker.perform(1).await.unwrap();

        // Every job of the run went through the audit layer.
        assert_eq!(worker.inner().performs, 3);
        assert_eq!(worker.inner().reserves, 2);
        assert_eq!(worker.inner().inner.performed, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_bounding_inside_another_decorator() {
        let mut worker = AuditWorker::new(bounded(SimpleWorker::with_queue(&[2, 3]), 2));

        worker.perform(1).await.unwrap();

        // The outer layer saw one entry; the bounded layer expanded it
        // into a full run underneath.
        assert_eq!(worker.performs, 1);
        assert_eq!(worker.inner.inner().performed, vec![1, 2]);
    }
}
