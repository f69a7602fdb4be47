//! Distance weighting for sensitivity filtering.
//!
//! ## Purpose
//!
//! This module provides the weighting seam used by filter workers. A
//! [`FilterKernel`] maps the distance between two design variables to a
//! non-negative weight; the worker then forms the normalized weighted sum of
//! the neighbors' sensitivities.
//!
//! ## Design notes
//!
//! * **Pluggable**: Any `Sync` type can implement [`FilterKernel`].
//! * **No implicit profile**: [`WeightFunction`] offers selectable profiles,
//!   but the filter builder never picks one on the caller's behalf.
//! * **Normalized input**: Profiles are defined over `u = distance / radius`.
//!
//! ## Invariants
//!
//! * Weights outside the radius (`u > 1`) are zero for every bounded profile.
//! * Weights are deterministic functions of `(distance, radius)`.

use num_traits::Float;

/// Strategy mapping a neighbor distance to a filter weight.
pub trait FilterKernel<T: Float>: Sync {
    /// Weight of a neighbor at `distance` for a filter of the given `radius`.
    fn weight(&self, distance: T, radius: T) -> T;

    /// Short name used in log records.
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Built-in distance-weighting profiles.
#[derive(Debug, Clone, Copy)]
pub enum WeightFunction {
    /// Cone filter: `1 - u`.
    Linear,
    /// `1 - u²`.
    Quadratic,
    /// `exp(-u² / 2σ²)` with `σ = 1/3`, truncated at the radius.
    Gaussian,
    /// Plain average of all neighbors inside the radius.
    Uniform,
    /// Caller-supplied profile over `u`; negative results are clamped to zero.
    Custom(fn(f64) -> f64),
}

impl WeightFunction {
    /// Evaluate the profile at the normalized distance `u`.
    pub fn compute_weight<T: Float>(&self, u: T) -> T {
        if u < T::zero() {
            return T::zero();
        }
        if u > T::one() && !matches!(self, WeightFunction::Custom(_)) {
            return T::zero();
        }

        match self {
            WeightFunction::Linear => T::one() - u,
            WeightFunction::Quadratic => T::one() - u * u,
            WeightFunction::Gaussian => {
                // 3σ at the radius
                let nine_halves = T::from(4.5).unwrap_or_else(T::one);
                (-(u * u) * nine_halves).exp()
            }
            WeightFunction::Uniform => T::one(),
            WeightFunction::Custom(f) => {
                let w = u.to_f64().map(f).and_then(T::from).unwrap_or_else(T::zero);
                if w > T::zero() {
                    w
                } else {
                    T::zero()
                }
            }
        }
    }
}

impl<T: Float> FilterKernel<T> for WeightFunction {
    fn weight(&self, distance: T, radius: T) -> T {
        if radius <= T::zero() {
            return if distance <= T::zero() {
                T::one()
            } else {
                T::zero()
            };
        }
        self.compute_weight(distance / radius)
    }

    fn name(&self) -> &'static str {
        match self {
            WeightFunction::Linear => "linear",
            WeightFunction::Quadratic => "quadratic",
            WeightFunction::Gaussian => "gaussian",
            WeightFunction::Uniform => "uniform",
            WeightFunction::Custom(_) => "custom",
        }
    }
}
