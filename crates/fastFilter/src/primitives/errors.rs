//! Error types for sensitivity filtering.
//!
//! ## Purpose
//!
//! This module defines the single error type returned by every fallible
//! operation in the crate, from builder validation to worker dispatch.
//!
//! ## Design notes
//!
//! * **Fatal by default**: Allocation and worker-launch failures abort the call.
//! * **Local recovery**: Malformed environment values never reach this type;
//!   they are resolved to defaults by the worker-count resolver.
//! * **Cloneable**: Errors can be stored as deferred builder errors.

use thiserror::Error;

/// Errors raised while configuring or running the sensitivity filter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// An input array does not have the length implied by the mesh size.
    #[error("{field} has length {got}, expected {expected}")]
    MismatchedInputs {
        /// Name of the offending array.
        field: &'static str,
        /// Length implied by the number of mesh nodes.
        expected: usize,
        /// Length actually provided.
        got: usize,
    },

    /// A design variable refers to a node outside the mesh.
    #[error("design variable {index} refers to node {node}, but the mesh has {nk} nodes")]
    InvalidDesignNode {
        /// 1-based design-variable index.
        index: usize,
        /// 0-based node index that was supplied.
        node: usize,
        /// Number of mesh nodes.
        nk: usize,
    },

    /// The radius field of the configuration record could not be used.
    #[error("invalid filter radius {0:?}")]
    InvalidRadius(String),

    /// No weighting strategy was selected before building the filter.
    #[error("no weight function selected; call `.weight_function(..)` before `.build()`")]
    MissingWeightFunction,

    /// Generic input validation failure.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A scratch or coordinate buffer could not be allocated.
    #[error("failed to allocate {len} elements for {what}")]
    Allocation {
        /// Buffer that failed to allocate.
        what: &'static str,
        /// Requested element count (saturated on overflow).
        len: usize,
    },

    /// The worker group could not be started.
    #[error("failed to launch filter workers: {0}")]
    WorkerLaunch(String),
}
