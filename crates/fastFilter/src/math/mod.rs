//! Layer 2: Math
//!
//! ## Purpose
//!
//! This layer provides the numerical collaborators of the filter: the radius
//! neighbor search over design-variable coordinates and the distance
//! weighting profiles.
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
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Distance weighting profiles.
pub mod kernel;

/// Radius neighbor search (sorted-axis index).
pub mod neighborhood;
