//! Weighted-average filtering of one worker's design-variable range.
//!
//! ## Purpose
//!
//! This module implements the per-partition filter worker. For every design
//! variable in its range the worker collects the neighbors inside the filter
//! radius, weights them with the configured kernel, and stores the
//! normalized weighted sum of their raw sensitivities.
//!
//! ## Invariants
//!
//! * The worker only writes to its scratch stripe and its output slice.
//! * The result for a design variable does not depend on how the design
//!   variables were partitioned.
//! * A non-positive weight sum leaves the raw sensitivity unchanged.

use num_traits::Float;

use crate::math::kernel::FilterKernel;
use crate::math::neighborhood::NeighborSearch;
use crate::primitives::buffer::ScratchStripe;
use crate::primitives::partition::WorkRange;

/// Read-only state shared by every worker of one filtering call.
pub struct DispatchContext<'a, T: Float, S: ?Sized, K: ?Sized> {
    /// Neighbor index over the design variables.
    pub search: &'a S,
    /// Weighting strategy.
    pub kernel: &'a K,
    /// Raw sensitivity of each design variable, in design-variable order.
    pub sensitivities: &'a [T],
    /// Effective filter radius.
    pub radius: T,
}

impl<'a, T, S, K> DispatchContext<'a, T, S, K>
where
    T: Float,
    S: NeighborSearch<T> + ?Sized,
    K: FilterKernel<T> + ?Sized,
{
    /// Filtered sensitivity of design variable `j` (0-based).
    pub fn filter_one(&self, j: usize, stripe: &mut ScratchStripe<'_, T>) -> T {
        let count = self
            .search
            .find_within(j, self.radius, stripe.neighbor, stripe.r);

        let mut weight_sum = T::zero();
        let mut value_sum = T::zero();
        for k in 0..count {
            let w = self.kernel.weight(stripe.r[k], self.radius);
            stripe.filterval[k] = w;
            weight_sum = weight_sum + w;
            value_sum = value_sum + w * self.sensitivities[stripe.neighbor[k]];
        }

        if weight_sum > T::zero() {
            value_sum / weight_sum
        } else {
            self.sensitivities[j]
        }
    }
}

/// Filter every design variable of `range` into `out`.
///
/// `out[i]` receives the filtered value of the `i`-th design variable of the
/// range, so `out.len()` must equal `range.len()`.
pub fn filter_range<T, S, K>(
    ctx: &DispatchContext<'_, T, S, K>,
    range: WorkRange,
    mut stripe: ScratchStripe<'_, T>,
    out: &mut [T],
) where
    T: Float,
    S: NeighborSearch<T> + ?Sized,
    K: FilterKernel<T> + ?Sized,
{
    for (slot, j) in out.iter_mut().zip(range.as_zero_based()) {
        *slot = ctx.filter_one(j, &mut stripe);
    }
}
