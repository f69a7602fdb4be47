//! Layer 4: Engine
//!
//! ## Purpose
//!
//! This layer provides the filter dispatcher: worker-count resolution and the
//! fork-join execution of the filter workers over a scoped rayon pool.
//!
//! ## Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Adapters
//!   ↓
//! Layer 4: Engine ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Parallel dispatch engine for sensitivity filtering.
pub mod executor;

/// Worker-count resolution from environment signals.
pub mod workers;
