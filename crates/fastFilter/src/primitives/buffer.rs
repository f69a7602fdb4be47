//! Per-worker scratch buffers for the filter workers.
//!
//! Three parallel arrays (`neighbor`, `r`, `filterval`) are allocated once per
//! filtering call and striped so that worker `i` owns the elements
//! `[i * stride, (i + 1) * stride)` of each array, with
//! `stride = ndesi + STRIPE_PADDING`.

use num_traits::Float;

use crate::primitives::errors::FilterError;

/// Slack added to each stripe beyond one slot per design variable.
pub const STRIPE_PADDING: usize = 6;

/// Scratch arrays shared by all workers of one filtering call.
#[derive(Debug)]
pub struct ScratchBuffers<T> {
    neighbor: Vec<usize>,
    r: Vec<T>,
    filterval: Vec<T>,
    stride: usize,
    num_workers: usize,
}

/// Exclusive view of one worker's stripe.
#[derive(Debug)]
pub struct ScratchStripe<'a, T> {
    /// Candidate neighbor design variables (0-based).
    pub neighbor: &'a mut [usize],
    /// Distances matching `neighbor`.
    pub r: &'a mut [T],
    /// Filter weights matching `neighbor`.
    pub filterval: &'a mut [T],
}

impl<'a, T> ScratchStripe<'a, T> {
    /// Usable length of the stripe.
    pub fn capacity(&self) -> usize {
        self.neighbor.len()
    }
}

impl<T: Float> ScratchBuffers<T> {
    /// Allocate zeroed stripes for `num_workers` workers over `ndesi` design variables.
    pub fn allocate(ndesi: usize, num_workers: usize) -> Result<Self, FilterError> {
        let overflow = FilterError::Allocation {
            what: "scratch stripes",
            len: usize::MAX,
        };
        let stride = ndesi
            .checked_add(STRIPE_PADDING)
            .ok_or_else(|| overflow.clone())?;
        let len = stride.checked_mul(num_workers).ok_or(overflow)?;

        Ok(Self {
            neighbor: zeroed(len, 0usize, "neighbor stripes")?,
            r: zeroed(len, T::zero(), "distance stripes")?,
            filterval: zeroed(len, T::zero(), "filter weight stripes")?,
            stride,
            num_workers,
        })
    }

    /// Stripe length (`ndesi + STRIPE_PADDING`).
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of stripes.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Offset of worker `i`'s stripe inside each array.
    pub fn offset(&self, worker: usize) -> usize {
        worker * self.stride
    }

    /// Total element count of each array.
    pub fn len(&self) -> usize {
        self.neighbor.len()
    }

    /// Whether no stripes were allocated.
    pub fn is_empty(&self) -> bool {
        self.neighbor.is_empty()
    }

    /// Split the arrays into disjoint per-worker stripes, in worker order.
    pub fn stripes_mut(&mut self) -> Vec<ScratchStripe<'_, T>> {
        let stride = self.stride;
        self.neighbor
            .chunks_mut(stride)
            .zip(self.r.chunks_mut(stride))
            .zip(self.filterval.chunks_mut(stride))
            .map(|((neighbor, r), filterval)| ScratchStripe {
                neighbor,
                r,
                filterval,
            })
            .collect()
    }
}

fn zeroed<V: Copy>(len: usize, value: V, what: &'static str) -> Result<Vec<V>, FilterError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| FilterError::Allocation { what, len })?;
    buf.resize(len, value);
    Ok(buf)
}
