//! Lifecycle hook registration and dispatch.
//!
//! A `HookRegistry` maps each lifecycle point to an ordered list of
//! callables. Registries are created once at process start, shared as an
//! `Arc`, and live for the life of the process; per-point lists are
//! initialized lazily on first registration.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{BoxError, Result, WorkboundError};

/// Lifecycle points at which registered hooks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    /// Runs once per bounded run, before the first job executes.
    BeforeLoop,
    /// Runs once per bounded run, after the loop has exited.
    AfterLoop,
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HookPoint::BeforeLoop => "before-bounded-loop",
            HookPoint::AfterLoop => "after-bounded-loop",
        };
        write!(f, "{}", name)
    }
}

/// A registered callable. Receives the worker as its sole argument.
pub type Hook<C> = Arc<dyn Fn(&mut C) -> std::result::Result<(), BoxError> + Send + Sync>;

/// Ordered hook storage keyed by lifecycle point.
///
/// Registration appends; nothing ever replaces or removes an earlier
/// hook. `run` dispatches in registration order and stops at the first
/// failure.
pub struct HookRegistry<C> {
    hooks: Mutex<HashMap<HookPoint, Vec<Hook<C>>>>,
}

impl<C> HookRegistry<C> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            hooks: Mutex::new(HashMap::new()),
        }
    }

    /// Append a callable to the list for `point`.
    pub fn register<F>(&self, point: HookPoint, hook: F)
    where
        F: Fn(&mut C) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        let mut entries = self.entries();
        let list = entries.entry(point).or_default();
        list.push(Arc::new(hook));
        tracing::debug!(point = %point, registered = list.len(), "Hook registered");
    }

    /// Append a callable to run before the first job of a bounded run.
    ///
    /// Shorthand for `register(HookPoint::BeforeLoop, hook)`.
    pub fn before<F>(&self, hook: F)
    where
        F: Fn(&mut C) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        self.register(HookPoint::BeforeLoop, hook);
    }

    /// Append a callable to run after a bounded run's loop has exited.
    ///
    /// Shorthand for `register(HookPoint::AfterLoop, hook)`.
    pub fn after<F>(&self, hook: F)
    where
        F: Fn(&mut C) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        self.register(HookPoint::AfterLoop, hook);
    }

    /// All hooks registered for `point`, in registration order.
    ///
    /// Never fails; a point with no registrations yields an empty list.
    pub fn get(&self, point: HookPoint) -> Vec<Hook<C>> {
        self.entries().get(&point).cloned().unwrap_or_default()
    }

    /// Invoke every hook registered for `point`, in registration order.
    ///
    /// Stops at the first failing hook and surfaces its error; later
    /// hooks do not run in that case.
    pub fn run(&self, point: HookPoint, ctx: &mut C) -> Result<()> {
        for hook in self.get(point) {
            hook(ctx).map_err(|err| WorkboundError::hook(point, err))?;
        }
        Ok(())
    }

    // Hooks are invoked outside the lock, so a poisoned map is still
    // well formed and safe to keep using.
    fn entries(&self) -> MutexGuard<'_, HashMap<HookPoint, Vec<Hook<C>>>> {
        self.hooks.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<C> Default for HookRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}
