//! Worker-count resolution for the filter dispatcher.
//!
//! ## Purpose
//!
//! This module decides how many filter workers to launch from three optional
//! environment signals and the detected CPU capacity.
//!
//! ## Design notes
//!
//! * **Injectable**: Resolution is a pure function over a [`WorkerEnv`] value
//!   and a detected CPU count, so it can be tested without touching the
//!   process environment.
//! * **Forgiving**: Non-numeric or negative values are treated as unset.
//!
//! ## Key concepts
//!
//! * **Capacity**: `NUMBER_OF_CPUS` if positive, else the OS CPU count, floored at 1.
//! * **Filtering override**: `CCX_NPROC_SENS`, honored when positive.
//! * **General override**: `OMP_NUM_THREADS`, clamped to `[1, capacity]`;
//!   an explicit `0` counts as set and yields one worker.
//!
//! ## Invariants
//!
//! * `1 <= capacity`.
//! * `1 <= resolved <= min(capacity, ndesi)` whenever `ndesi >= 1`.

use std::env;

/// Declared number of CPUs.
pub const DECLARED_CPUS_VAR: &str = "NUMBER_OF_CPUS";

/// Worker count for sensitivity filtering only.
pub const FILTER_WORKERS_VAR: &str = "CCX_NPROC_SENS";

/// General-purpose worker count.
pub const GENERAL_WORKERS_VAR: &str = "OMP_NUM_THREADS";

/// Raw worker-count signals, as read from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerEnv {
    /// Value of [`DECLARED_CPUS_VAR`].
    pub declared_cpus: Option<String>,
    /// Value of [`FILTER_WORKERS_VAR`].
    pub filter_workers: Option<String>,
    /// Value of [`GENERAL_WORKERS_VAR`].
    pub general_workers: Option<String>,
}

impl WorkerEnv {
    /// Read the three signals from the process environment.
    pub fn from_process() -> Self {
        Self {
            declared_cpus: env::var(DECLARED_CPUS_VAR).ok(),
            filter_workers: env::var(FILTER_WORKERS_VAR).ok(),
            general_workers: env::var(GENERAL_WORKERS_VAR).ok(),
        }
    }

    /// Set the declared CPU count.
    pub fn declared_cpus(mut self, value: impl Into<String>) -> Self {
        self.declared_cpus = Some(value.into());
        self
    }

    /// Set the filtering-specific worker count.
    pub fn filter_workers(mut self, value: impl Into<String>) -> Self {
        self.filter_workers = Some(value.into());
        self
    }

    /// Set the general-purpose worker count.
    pub fn general_workers(mut self, value: impl Into<String>) -> Self {
        self.general_workers = Some(value.into());
        self
    }

    /// CPU capacity: declared count if positive, else `detected`, floored at 1.
    pub fn capacity(&self, detected: usize) -> usize {
        match parse_count(self.declared_cpus.as_deref()) {
            Some(declared) if declared > 0 => declared,
            _ => detected.max(1),
        }
    }

    /// Resolve the number of workers for `ndesi` design variables.
    ///
    /// Returns 0 only when `ndesi == 0`.
    pub fn resolve(&self, detected: usize, ndesi: usize) -> usize {
        let capacity = self.capacity(detected);

        let requested = match parse_count(self.filter_workers.as_deref()) {
            Some(n) if n > 0 => n.min(capacity),
            _ => match parse_count(self.general_workers.as_deref()) {
                Some(n) => n.clamp(1, capacity),
                None => capacity,
            },
        };

        requested.min(ndesi)
    }
}

/// CPU count reported by the operating system.
pub fn detected_cpus() -> usize {
    num_cpus::get()
}

/// Parse a non-negative count; anything else is treated as unset.
fn parse_count(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
}
