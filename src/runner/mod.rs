//! Runner module - executes the bounded per-process work loop.
//!
//! This module provides the loop that caps jobs per worker process:
//! - BoundedRunner for driving a worker through one bounded run
//! - RunReport and StopReason for describing how a run ended

mod bounded;

pub use bounded::{BoundedRunner, RunReport, StopReason};
