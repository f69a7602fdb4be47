//! High-level API for sensitivity filtering.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry point. It implements a
//! fluent builder for the filter settings and a marker-type adapter step that
//! produces the execution builder.
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builder; only the weight function has no default.
//! * **Polymorphic**: Marker types transition to specialized adapter builders.
//! * **Validated**: Settings are validated when `.build()` is called on the adapter.
//!
//! ### Configuration Flow
//!
//! 1. Create a [`FilterBuilder`] via `Filter::new()`.
//! 2. Chain configuration methods (`.weight_function()`, `.parallel()`, etc.).
//! 3. Select an adapter via `.adapter(Batch)` and call `.build()`.

// Internal dependencies
use crate::adapters::batch::BatchFilterBuilder;

// Publicly re-exported types
pub use crate::adapters::batch::BatchFilter;
pub use crate::engine::executor::FilterReport;
pub use crate::engine::workers::WorkerEnv;
pub use crate::input::{FilterInput, ObjectSet};
pub use crate::math::kernel::{FilterKernel, WeightFunction};
pub use crate::primitives::errors::FilterError;
pub use crate::primitives::partition::WorkRange;

// ============================================================================
// Base Builder
// ============================================================================

/// Settings shared by every execution adapter.
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    /// Distance weighting profile. Must be set before building.
    pub weight_function: Option<WeightFunction>,
    /// Parallel dispatch. Adapters choose the default.
    pub parallel: Option<bool>,
    /// Worker-count signals. `None` reads the process environment per call.
    pub worker_env: Option<WorkerEnv>,
}

impl FilterBuilder {
    /// Create a builder with no weight function selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the distance weighting profile.
    pub fn weight_function(mut self, wf: WeightFunction) -> Self {
        self.weight_function = Some(wf);
        self
    }

    /// Set parallel execution mode.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Use explicit worker-count signals instead of the process environment.
    pub fn worker_env(mut self, env: WorkerEnv) -> Self {
        self.worker_env = Some(env);
        self
    }

    /// Select the execution adapter.
    pub fn adapter<A: FilterAdapter>(self, _adapter: A) -> A::Output {
        A::convert(self)
    }
}

/// Conversion from the base builder into an adapter-specific builder.
pub trait FilterAdapter {
    /// Adapter-specific builder.
    type Output;

    /// Wrap the base settings.
    fn convert(builder: FilterBuilder) -> Self::Output;
}

// ============================================================================
// Adapter Module
// ============================================================================

/// Adapter selection namespace.
#[allow(non_snake_case)]
pub mod Adapter {
    pub use super::Batch;
}

// ============================================================================
// Adapter Marker Types
// ============================================================================

/// Marker for in-memory filtering of a whole design-variable set.
#[derive(Debug, Clone, Copy)]
pub struct Batch;

impl FilterAdapter for Batch {
    type Output = BatchFilterBuilder;

    fn convert(mut builder: FilterBuilder) -> Self::Output {
        // Parallel unless the caller opted out
        builder.parallel = Some(builder.parallel.unwrap_or(true));
        BatchFilterBuilder { base: builder }
    }
}
