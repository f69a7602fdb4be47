//! Layer 1: Primitives
//!
//! ## Purpose
//!
//! This layer provides the low-level building blocks shared by every other
//! layer: the error type, the work partitioner, and the striped scratch
//! buffers handed to filter workers.
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
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Striped per-worker scratch buffers.
pub mod buffer;

/// Error types.
pub mod errors;

/// Contiguous work partitioning.
pub mod partition;
