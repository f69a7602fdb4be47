//! Layer 3: Algorithms
//!
//! ## Purpose
//!
//! This layer provides the filter worker: the weighted-average smoothing of a
//! contiguous range of design variables.
//!
//! ## Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Adapters
//!   ↓
//! Layer 4: Engine
//!   ↓
//! Layer 3: Algorithms ← You are here
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Per-partition weighted-average filter worker.
pub mod filter;
