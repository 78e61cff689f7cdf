//! Per-run job bound configuration.
//!
//! The bound is read fresh at the start of every bounded run, never
//! cached, so operators can change it between child processes without
//! restarting the supervisor.

use std::env;

use crate::error::{Result, WorkboundError};

/// Environment variable consulted by default for the per-run job bound.
pub const DEFAULT_LIMIT_VAR: &str = "JOBS_PER_FORK";

/// Source of the per-run job bound.
///
/// Implementations must resolve the bound on every call and must return
/// a positive value or an error; a missing or malformed bound is a
/// configuration error, not a silent default.
pub trait LimitSource: Send + Sync {
    /// The maximum number of jobs one bounded run may execute.
    fn jobs_per_fork(&self) -> Result<u32>;
}

/// Bound read from an environment variable, `JOBS_PER_FORK` by default.
#[derive(Debug, Clone)]
pub struct EnvLimit {
    var: String,
}

impl EnvLimit {
    /// Read the bound from `JOBS_PER_FORK`.
    pub fn new() -> Self {
        Self {
            var: DEFAULT_LIMIT_VAR.to_string(),
        }
    }

    /// Read the bound from a differently named variable.
    pub fn var(name: impl Into<String>) -> Self {
        Self { var: name.into() }
    }

    /// The variable this source reads.
    pub fn var_name(&self) -> &str {
        &self.var
    }
}

impl Default for EnvLimit {
    fn default() -> Self {
        Self::new()
    }
}

impl LimitSource for EnvLimit {
    fn jobs_per_fork(&self) -> Result<u32> {
        match env::var(&self.var) {
            Ok(raw) => parse_limit(&self.var, &raw),
            Err(env::VarError::NotPresent) => Err(WorkboundError::LimitMissing {
                var: self.var.clone(),
            }),
            Err(env::VarError::NotUnicode(raw)) => Err(WorkboundError::LimitInvalid {
                var: self.var.clone(),
                value: raw.to_string_lossy().into_owned(),
            }),
        }
    }
}

/// Fixed bound, for tests and embedders that resolve configuration
/// themselves.
#[derive(Debug, Clone, Copy)]
pub struct FixedLimit(pub u32);

impl LimitSource for FixedLimit {
    fn jobs_per_fork(&self) -> Result<u32> {
        if self.0 == 0 {
            return Err(WorkboundError::LimitInvalid {
                var: "fixed limit".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(self.0)
    }
}

fn parse_limit(var: &str, raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(WorkboundError::LimitInvalid {
            var: var.to_string(),
            value: raw.to_string(),
        }),
    }
}
