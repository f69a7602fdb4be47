//! Batch adapter for sensitivity filtering.
//!
//! ## Purpose
//!
//! This module provides the batch execution adapter: it filters the whole
//! design-variable set of one optimization iteration in memory, with optional
//! parallel dispatch.
//!
//! ## Design notes
//!
//! * **Processing**: One call filters all design variables.
//! * **Delegation**: Delegates computation to the execution engine.
//! * **Reusable**: A built filter can be applied once per optimization iteration.
//! * **Generics**: Filtering is generic over `Float` types.
//!
//! ## Invariants
//!
//! * `co` and `gradproj` hold three values per mesh node, `feasdir` two.
//! * Design nodes are 0-based mesh node indices.
//!
//! ## Non-goals
//!
//! * This adapter does not own or cache the mesh between calls.

// External dependencies
use num_traits::Float;
use std::fmt::Debug;
use std::result::Result;

// Internal dependencies
use crate::api::FilterBuilder;
use crate::engine::executor::{run_filter, DispatchOptions, FilterReport};
use crate::engine::workers::WorkerEnv;
use crate::input::{FilterInput, ObjectSet};
use crate::math::kernel::WeightFunction;
use crate::primitives::errors::FilterError;

// ============================================================================
// Batch Filter Builder
// ============================================================================

/// Builder for the batch filter processor.
#[derive(Debug, Clone)]
pub struct BatchFilterBuilder {
    /// Shared settings
    pub base: FilterBuilder,
}

impl Default for BatchFilterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchFilterBuilder {
    /// Create a new batch builder with parallel dispatch enabled.
    fn new() -> Self {
        let mut base = FilterBuilder::default();
        base.parallel = Some(true);
        Self { base }
    }

    /// Set parallel execution mode.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.base.parallel = Some(parallel);
        self
    }

    /// Set the distance weighting profile.
    pub fn weight_function(mut self, wf: WeightFunction) -> Self {
        self.base.weight_function = Some(wf);
        self
    }

    /// Use explicit worker-count signals instead of the process environment.
    pub fn worker_env(mut self, env: WorkerEnv) -> Self {
        self.base.worker_env = Some(env);
        self
    }

    /// Build the batch processor.
    pub fn build(self) -> Result<BatchFilter, FilterError> {
        let weight_function = self
            .base
            .weight_function
            .ok_or(FilterError::MissingWeightFunction)?;

        Ok(BatchFilter {
            weight_function,
            options: DispatchOptions {
                parallel: self.base.parallel.unwrap_or(true),
                worker_env: self.base.worker_env,
            },
        })
    }
}

// ============================================================================
// Batch Filter Processor
// ============================================================================

/// Batch sensitivity filter.
#[derive(Debug, Clone)]
pub struct BatchFilter {
    weight_function: WeightFunction,
    options: DispatchOptions,
}

impl BatchFilter {
    /// Filter the design-node sensitivities of `gradproj` into `feasdir`.
    ///
    /// Filtering only happens when `objectset` carries a radius; otherwise
    /// the third sensitivity component is copied into both slots of `feasdir`.
    pub fn filter<T, I1, I2>(
        &self,
        co: &I1,
        gradproj: &I2,
        nodedesi: &[usize],
        objectset: &ObjectSet,
        feasdir: &mut [T],
    ) -> Result<FilterReport<T>, FilterError>
    where
        T: Float + Debug + Send + Sync,
        I1: FilterInput<T> + ?Sized,
        I2: FilterInput<T> + ?Sized,
    {
        let co_slice = co.as_filter_slice()?;
        let gradproj_slice = gradproj.as_filter_slice()?;

        run_filter(
            co_slice,
            gradproj_slice,
            nodedesi,
            objectset,
            &self.weight_function,
            &self.options,
            feasdir,
        )
    }

    /// Configured weighting profile.
    pub fn weight_function(&self) -> WeightFunction {
        self.weight_function
    }

    /// Whether workers run on a thread pool.
    pub fn is_parallel(&self) -> bool {
        self.options.parallel
    }
}
