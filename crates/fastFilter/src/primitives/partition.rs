//! Contiguous work partitioning for filter workers.
//!
//! ## Purpose
//!
//! This module splits the ordered design-variable set into one contiguous
//! range per worker. Ranges are expressed with 1-based inclusive bounds so
//! they can be logged and compared against the design-variable numbering
//! used by the optimization driver.
//!
//! ## Invariants
//!
//! * Exactly `num_workers` ranges are produced.
//! * Ranges are contiguous, non-overlapping, and cover `[1, ndesi]` once.
//! * Every range except possibly the trailing ones has length `ceil(ndesi / num_workers)`.
//! * Trailing ranges may be empty when `ceil` rounding exhausts the set early.

use std::fmt;
use std::ops::Range;

/// A contiguous, inclusive range of 1-based design-variable indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkRange {
    /// Worker slot that owns this range.
    pub worker: usize,
    /// First design variable (1-based).
    pub first: usize,
    /// Last design variable (1-based, inclusive).
    pub last: usize,
}

impl WorkRange {
    /// Number of design variables in the range.
    pub fn len(&self) -> usize {
        (self.last + 1).saturating_sub(self.first)
    }

    /// Whether the range holds no design variables.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 0-based, half-open view of the same range.
    pub fn as_zero_based(&self) -> Range<usize> {
        let start = self.first - 1;
        start..start + self.len()
    }
}

impl fmt::Display for WorkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.first, self.last)
    }
}

/// Chunk length shared by all workers: `ceil(ndesi / num_workers)`.
pub fn chunk_len(ndesi: usize, num_workers: usize) -> usize {
    if num_workers == 0 {
        return ndesi;
    }
    ndesi.div_ceil(num_workers)
}

/// Range assigned to `worker` out of `num_workers`.
pub fn work_range(worker: usize, ndesi: usize, num_workers: usize) -> WorkRange {
    let chunk = chunk_len(ndesi, num_workers);
    let first = worker * chunk + 1;
    let last = ((worker + 1) * chunk).min(ndesi);

    // Keep empty ranges anchored just past the end so `as_zero_based` never
    // points outside the design-variable set.
    let first = first.min(last + 1);

    WorkRange {
        worker,
        first,
        last,
    }
}

/// Split `[1, ndesi]` into `num_workers` contiguous ranges.
pub fn partition(ndesi: usize, num_workers: usize) -> Vec<WorkRange> {
    (0..num_workers)
        .map(|worker| work_range(worker, ndesi, num_workers))
        .collect()
}
