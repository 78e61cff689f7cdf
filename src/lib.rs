//! Workbound - bounded job execution for forked queue workers
//!
//! Workbound caps how many jobs a single worker process executes before it
//! is recycled, instead of letting one child churn through jobs forever.
//! The supervisor still calls perform once per fork; the bounded loop
//! turns that one call into up to `JOBS_PER_FORK` jobs, with lifecycle
//! hooks around the run and cooperative shutdown between jobs.

pub mod error;
pub mod hooks;
pub mod integrate;
pub mod limit;
pub mod runner;
pub mod worker;

pub use error::{Result, WorkboundError};
