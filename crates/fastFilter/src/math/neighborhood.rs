//! Radius neighbor search over design-variable coordinates.
//!
//! ## Purpose
//!
//! This module provides the neighbor-search collaborator used by filter
//! workers: for a given design variable, find every design variable whose
//! Euclidean distance is within the filter radius.
//!
//! ## Design notes
//!
//! * **Seam**: Workers only see the [`NeighborSearch`] trait.
//! * **Prepared once**: [`SortedAxes`] is built single-threaded before
//!   dispatch and shared read-only by every worker.
//! * **Axis pruning**: Each query bisects the three sorted axes and scans the
//!   narrowest candidate slab, then checks the exact distance.
//! * **Caller buffers**: Results are written into the worker's scratch stripe,
//!   so queries never allocate.
//!
//! ## Key concepts
//!
//! * **xo, yo, zo**: Design-variable coordinates in design-variable order.
//! * **x, y, z**: The same coordinates, each sorted ascending.
//! * **nx, ny, nz**: Permutations with `x[k] == xo[nx[k]]` (likewise y, z).
//!
//! ## Invariants
//!
//! * A design variable is always its own neighbor at distance zero.
//! * Results are deterministic: candidates are visited in sorted-axis order
//!   with ties broken by design-variable index.
//!
//! ## Non-goals
//!
//! * This module does not support dynamic updates of the coordinates.
//! * This module does not implement k-nearest queries.

use num_traits::Float;
use std::cmp::Ordering;

use crate::primitives::errors::FilterError;

/// Neighbor-search collaborator consumed by filter workers.
pub trait NeighborSearch<T: Float>: Sync {
    /// Number of indexed design variables.
    fn len(&self) -> usize;

    /// Whether the index is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write all design variables within `radius` of `query` into
    /// `neighbors`/`distances` and return how many were written.
    ///
    /// Both output slices must hold at least [`len`](Self::len) elements.
    fn find_within(
        &self,
        query: usize,
        radius: T,
        neighbors: &mut [usize],
        distances: &mut [T],
    ) -> usize;
}

/// Sorted per-axis coordinate index over the design variables.
#[derive(Debug, Clone)]
pub struct SortedAxes<T> {
    /// Original x coordinates, in design-variable order.
    pub xo: Vec<T>,
    /// Original y coordinates, in design-variable order.
    pub yo: Vec<T>,
    /// Original z coordinates, in design-variable order.
    pub zo: Vec<T>,
    /// Sorted x coordinates.
    pub x: Vec<T>,
    /// Sorted y coordinates.
    pub y: Vec<T>,
    /// Sorted z coordinates.
    pub z: Vec<T>,
    /// Design variable at each sorted x position.
    pub nx: Vec<usize>,
    /// Design variable at each sorted y position.
    pub ny: Vec<usize>,
    /// Design variable at each sorted z position.
    pub nz: Vec<usize>,
}

impl<T: Float + Send + Sync> SortedAxes<T> {
    /// Gather and sort the coordinates of the design nodes.
    ///
    /// `co` holds three coordinates per mesh node; `nodedesi` holds the
    /// 0-based mesh node of each design variable.
    pub fn prepare(co: &[T], nodedesi: &[usize]) -> Result<Self, FilterError> {
        let ndesi = nodedesi.len();
        let nk = co.len() / 3;

        let mut xo = with_capacity(ndesi, "xo")?;
        let mut yo = with_capacity(ndesi, "yo")?;
        let mut zo = with_capacity(ndesi, "zo")?;

        for (index, &node) in nodedesi.iter().enumerate() {
            if node >= nk {
                return Err(FilterError::InvalidDesignNode {
                    index: index + 1,
                    node,
                    nk,
                });
            }
            xo.push(co[3 * node]);
            yo.push(co[3 * node + 1]);
            zo.push(co[3 * node + 2]);
        }

        let (x, nx) = sort_axis(&xo, "x")?;
        let (y, ny) = sort_axis(&yo, "y")?;
        let (z, nz) = sort_axis(&zo, "z")?;

        Ok(Self {
            xo,
            yo,
            zo,
            x,
            y,
            z,
            nx,
            ny,
            nz,
        })
    }

    /// Coordinates of design variable `j` (0-based).
    pub fn point(&self, j: usize) -> [T; 3] {
        [self.xo[j], self.yo[j], self.zo[j]]
    }

    fn slab(sorted: &[T], center: T, radius: T) -> (usize, usize) {
        let lo = center - radius;
        let hi = center + radius;
        let start = sorted.partition_point(|&v| v < lo);
        let end = sorted.partition_point(|&v| v <= hi);
        (start, end.max(start))
    }
}

impl<T: Float + Send + Sync> NeighborSearch<T> for SortedAxes<T> {
    fn len(&self) -> usize {
        self.xo.len()
    }

    fn find_within(
        &self,
        query: usize,
        radius: T,
        neighbors: &mut [usize],
        distances: &mut [T],
    ) -> usize {
        let [qx, qy, qz] = self.point(query);

        let slabs = [
            (Self::slab(&self.x, qx, radius), &self.nx),
            (Self::slab(&self.y, qy, radius), &self.ny),
            (Self::slab(&self.z, qz, radius), &self.nz),
        ];
        let ((start, end), perm) = slabs
            .iter()
            .min_by_key(|((start, end), _)| end - start)
            .copied()
            .unwrap_or(((0, 0), &self.nx));

        let radius_sq = radius * radius;
        let capacity = neighbors.len().min(distances.len());
        let mut count = 0;

        for &k in &perm[start..end] {
            if count == capacity {
                break;
            }
            let dx = self.xo[k] - qx;
            let dy = self.yo[k] - qy;
            let dz = self.zo[k] - qz;
            let d_sq = dx * dx + dy * dy + dz * dz;
            if d_sq <= radius_sq {
                neighbors[count] = k;
                distances[count] = d_sq.sqrt();
                count += 1;
            }
        }

        count
    }
}

fn with_capacity<T>(len: usize, what: &'static str) -> Result<Vec<T>, FilterError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| FilterError::Allocation { what, len })?;
    Ok(buf)
}

fn sort_axis<T: Float>(values: &[T], what: &'static str) -> Result<(Vec<T>, Vec<usize>), FilterError> {
    let mut order: Vec<usize> = with_capacity(values.len(), what)?;
    order.extend(0..values.len());

    // Stable sort keeps ties in design-variable order.
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(Ordering::Equal)
    });

    let sorted = order.iter().map(|&k| values[k]).collect();
    Ok((sorted, order))
}
