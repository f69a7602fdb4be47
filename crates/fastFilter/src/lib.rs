//! # fastFilter
//!
//! Parallel sensitivity filtering for mesh-based structural optimization.
//!
//! ## What is sensitivity filtering?
//!
//! In node-based shape and topology optimization every design variable (an
//! optimizable mesh node) carries a sensitivity. Handing raw sensitivities to
//! the optimizer tends to produce spatially incoherent, checkerboard-like
//! updates. Filtering replaces each sensitivity by a weighted average of
//! itself and the design variables within a fixed radius, and writes the
//! result into the feasible-direction vector consumed by the optimizer.
//!
//! **How one filtering call works:**
//!
//! 1. Copy the third sensitivity component of every node into slot 0 of the
//!    feasible direction.
//! 2. If the objective record carries no radius, mirror slot 0 into slot 1
//!    and stop.
//! 3. Otherwise index the design-variable coordinates, resolve the worker
//!    count, and split the design variables into contiguous ranges.
//! 4. Filter every range on its own worker with private scratch, join, and
//!    merge the results.
//!
//! ## Quick Start
//!
//! ```rust
//! use fastFilter::prelude::*;
//!
//! // Three nodes on a line, all of them design variables
//! let co = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0];
//! let gradproj = vec![0.0, 0.0, 1.0, 0.0, 0.0, 4.0, 0.0, 0.0, 1.0];
//! let nodedesi = vec![0, 1, 2];
//! let mut feasdir = vec![0.0; 6];
//!
//! let filter = Filter::new()
//!     .weight_function(Uniform)
//!     .adapter(Batch)
//!     .parallel(false)
//!     .build()?;
//!
//! let report = filter.filter(&co, &gradproj, &nodedesi, &ObjectSet::with_radius(1.5)?, &mut feasdir)?;
//!
//! assert!(report.filtered);
//! assert_eq!(feasdir[2], 2.0); // (1 + 4 + 1) / 3
//! assert_eq!(feasdir[3], feasdir[2]);
//! # Result::<(), FilterError>::Ok(())
//! ```
//!
//! ## Worker count
//!
//! The number of workers is resolved per call from the environment:
//!
//! | Variable          | Meaning                                              |
//! |-------------------|------------------------------------------------------|
//! | `NUMBER_OF_CPUS`  | Declared capacity; the OS CPU count is used otherwise |
//! | `CCX_NPROC_SENS`  | Workers for filtering, wins when positive            |
//! | `OMP_NUM_THREADS` | General worker count, clamped to `[1, capacity]`     |
//!
//! The result never exceeds the number of design variables. Use
//! [`WorkerEnv`](prelude::WorkerEnv) with `.worker_env(..)` to inject the
//! values instead of reading the process environment.
//!
//! ## Weighting
//!
//! No weighting profile is selected by default; pick one of the
//! [`WeightFunction`](prelude::WeightFunction) profiles or supply your own
//! through `WeightFunction::Custom`.
//!
//! ## Logging
//!
//! The dispatcher emits `tracing` records (the worker count at `INFO`,
//! partition details at `DEBUG`). Install any subscriber to see them.

#![allow(non_snake_case)]
#![deny(missing_docs)]

// ============================================================================
// Internal Modules
// ============================================================================

// Layer 1: Primitives - errors, partitioning, scratch buffers.
mod primitives;

// Layer 2: Math - neighbor search and weighting profiles.
mod math;

// Layer 3: Algorithms - the per-partition filter worker.
mod algorithms;

// Layer 4: Engine - worker-count resolution and parallel dispatch.
mod engine;

// Layer 5: Adapters - execution adapters.
mod adapters;

// High-level fluent API.
//
// Provides the `Filter` builder for configuring and running the filter.
mod api;

// Input data handling.
//
// Contains the `FilterInput` trait and the `ObjectSet` record.
mod input;

// ============================================================================
// Dispatch Building Blocks
// ============================================================================

/// Lower-level dispatch API for custom neighbor searches and kernels.
///
/// [`run_filter`](dispatch::run_filter) accepts any
/// [`FilterKernel`](prelude::FilterKernel); [`filter_pass`](dispatch::filter_pass)
/// accepts any [`NeighborSearch`](dispatch::NeighborSearch).
pub mod dispatch {
    pub use crate::algorithms::filter::{filter_range, DispatchContext};
    pub use crate::engine::executor::{
        filter_pass, mirror_slots, run_filter, seed_feasible_direction, DispatchOptions,
    };
    pub use crate::engine::workers::{
        detected_cpus, DECLARED_CPUS_VAR, FILTER_WORKERS_VAR, GENERAL_WORKERS_VAR,
    };
    pub use crate::input::{RADIUS_BLANK_WIDTH, RADIUS_FIELD_OFFSET, RADIUS_FIELD_WIDTH};
    pub use crate::math::neighborhood::{NeighborSearch, SortedAxes};
    pub use crate::primitives::buffer::{ScratchBuffers, ScratchStripe, STRIPE_PADDING};
    pub use crate::primitives::partition::{chunk_len, partition, work_range};
}

// ============================================================================
// Prelude
// ============================================================================

/// Standard fastFilter prelude.
pub mod prelude {
    pub use crate::api::{
        Adapter::Batch,
        BatchFilter, FilterBuilder as Filter, FilterError, FilterInput, FilterKernel,
        FilterReport, ObjectSet, WeightFunction,
        WeightFunction::{Custom, Gaussian, Linear, Quadratic, Uniform},
        WorkRange, WorkerEnv,
    };
}
