//! Parallel dispatch engine for sensitivity filtering.
//!
//! ## Purpose
//!
//! This module drives one filtering call end to end: it seeds the feasible
//! direction from the raw sensitivities, short-circuits when no radius is
//! configured, and otherwise prepares the neighbor index, resolves the worker
//! count, allocates striped scratch, fans the partitions out to a scoped
//! worker group, joins it, and merges the results.
//!
//! ## Design notes
//!
//! * **Per-call state**: Everything workers read lives in a [`DispatchContext`]
//!   borrowed for the duration of the call; there is no global state.
//! * **Fork-join**: Workers run inside `rayon::ThreadPool::scope`, so every
//!   worker has joined before scratch is released, on every exit path.
//! * **No shared writes**: Each worker writes its own scratch stripe and its
//!   own slice of the result buffer; results reach `feasdir` after the join.
//! * **Generics**: Generic over `Float` types.
//!
//! ## Key concepts
//!
//! * **Slot 0 / slot 1**: `feasdir` holds two values per node; slot 1 mirrors
//!   slot 0 once filtering is done.
//! * **Short circuit**: A blank radius field means no search, no threads, no scratch.
//!
//! ## Invariants
//!
//! * `gradproj.len() == 3 * nk`, `co.len() == 3 * nk`, `feasdir.len() == 2 * nk`.
//! * One worker is launched per partition.
//!
//! ## Non-goals
//!
//! * This module does not retry failed allocations or launches.
//! * This module does not cancel running workers.

// Feature-gated imports
#[cfg(feature = "cpu")]
use rayon::ThreadPoolBuilder;

// External dependencies
use num_traits::Float;
use std::fmt::Debug;
use tracing::{debug, info};

// Internal dependencies
use crate::algorithms::filter::{filter_range, DispatchContext};
use crate::engine::workers::{detected_cpus, WorkerEnv};
use crate::input::ObjectSet;
use crate::math::kernel::FilterKernel;
use crate::math::neighborhood::{NeighborSearch, SortedAxes};
use crate::primitives::buffer::{ScratchBuffers, ScratchStripe};
use crate::primitives::errors::FilterError;
use crate::primitives::partition::{partition, WorkRange};

// ============================================================================
// Options and Report
// ============================================================================

/// Dispatch settings for one filtering call.
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    /// Run workers on a thread pool. When false a single worker runs inline.
    pub parallel: bool,
    /// Worker-count signals. `None` reads the process environment at dispatch time.
    pub worker_env: Option<WorkerEnv>,
}

/// Summary of a filtering call.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterReport<T> {
    /// Whether spatial filtering ran (false on the short-circuit path).
    pub filtered: bool,
    /// Effective filter radius, if any.
    pub radius: Option<T>,
    /// Number of design variables.
    pub ndesi: usize,
    /// Number of workers launched.
    pub num_workers: usize,
    /// Range assigned to each worker.
    pub partitions: Vec<WorkRange>,
}

impl<T> FilterReport<T> {
    fn short_circuit(ndesi: usize) -> Self {
        Self {
            filtered: false,
            radius: None,
            ndesi,
            num_workers: 0,
            partitions: Vec::new(),
        }
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Filter the sensitivities of the design nodes into `feasdir`.
///
/// # Parameters
///
/// * `co` - Node coordinates, three per mesh node
/// * `gradproj` - Projected sensitivities, three per mesh node (third is used)
/// * `nodedesi` - 0-based mesh node of each design variable
/// * `objectset` - Objective record holding the filter radius
/// * `kernel` - Distance weighting strategy
/// * `options` - Dispatch settings
/// * `feasdir` - Output, two slots per mesh node
#[allow(clippy::too_many_arguments)]
pub fn run_filter<T, K>(
    co: &[T],
    gradproj: &[T],
    nodedesi: &[usize],
    objectset: &ObjectSet,
    kernel: &K,
    options: &DispatchOptions,
    feasdir: &mut [T],
) -> Result<FilterReport<T>, FilterError>
where
    T: Float + Debug + Send + Sync,
    K: FilterKernel<T> + ?Sized,
{
    let nk = validate_lengths(co, gradproj, feasdir)?;
    let ndesi = nodedesi.len();

    seed_feasible_direction(gradproj, feasdir);

    let radius = match objectset.filter_radius::<T>()? {
        Some(radius) if ndesi > 0 => radius,
        _ => {
            debug!(nk, ndesi, "no filter radius configured, copying sensitivities");
            mirror_slots(feasdir);
            return Ok(FilterReport::short_circuit(ndesi));
        }
    };

    // Single-threaded preparation of the shared neighbor index.
    let axes = SortedAxes::prepare(co, nodedesi)?;
    let sensitivities: Vec<T> = nodedesi.iter().map(|&node| gradproj[3 * node + 2]).collect();

    let num_workers = if options.parallel {
        let env = options
            .worker_env
            .clone()
            .unwrap_or_else(WorkerEnv::from_process);
        env.resolve(detected_cpus(), ndesi)
    } else {
        1
    };

    info!(
        num_workers,
        ndesi,
        kernel = kernel.name(),
        "Using up to {} cpu(s) for filtering the sensitivities.",
        num_workers
    );

    let ctx = DispatchContext {
        search: &axes,
        kernel,
        sensitivities: &sensitivities,
        radius,
    };
    let (smoothed, partitions) = filter_pass(&ctx, num_workers, options.parallel)?;

    for (&node, &value) in nodedesi.iter().zip(&smoothed) {
        feasdir[2 * node] = value;
    }
    mirror_slots(feasdir);

    Ok(FilterReport {
        filtered: true,
        radius: Some(radius),
        ndesi,
        num_workers,
        partitions,
    })
}

/// Run the partitioned filter over every indexed design variable.
///
/// Returns the filtered value of each design variable, in design-variable
/// order, together with the partition each worker received.
pub fn filter_pass<T, S, K>(
    ctx: &DispatchContext<'_, T, S, K>,
    num_workers: usize,
    parallel: bool,
) -> Result<(Vec<T>, Vec<WorkRange>), FilterError>
where
    T: Float + Send + Sync,
    S: NeighborSearch<T> + ?Sized,
    K: FilterKernel<T> + ?Sized,
{
    let ndesi = ctx.search.len();
    let num_workers = num_workers.clamp(1, ndesi.max(1));

    let mut scratch = ScratchBuffers::<T>::allocate(ndesi, num_workers)?;
    let partitions = partition(ndesi, num_workers);
    debug!(
        ndesi,
        num_workers,
        stride = scratch.stride(),
        "partitioned design variables"
    );

    let mut smoothed = Vec::new();
    smoothed
        .try_reserve_exact(ndesi)
        .map_err(|_| FilterError::Allocation {
            what: "filtered sensitivities",
            len: ndesi,
        })?;
    smoothed.resize(ndesi, T::zero());

    let jobs = assign_jobs(&partitions, scratch.stripes_mut(), &mut smoothed);
    run_workers(ctx, jobs, parallel)?;

    // All workers have joined; scratch goes away here.
    drop(scratch);

    Ok((smoothed, partitions))
}

/// Copy the third sensitivity component of each node into slot 0.
pub fn seed_feasible_direction<T: Float>(gradproj: &[T], feasdir: &mut [T]) {
    for (slots, grad) in feasdir.chunks_exact_mut(2).zip(gradproj.chunks_exact(3)) {
        slots[0] = grad[2];
    }
}

/// Copy slot 0 into slot 1 for every node.
pub fn mirror_slots<T: Float>(feasdir: &mut [T]) {
    for slots in feasdir.chunks_exact_mut(2) {
        slots[1] = slots[0];
    }
}

// ============================================================================
// Worker Fan-out
// ============================================================================

type Job<'a, T> = (WorkRange, ScratchStripe<'a, T>, &'a mut [T]);

fn assign_jobs<'a, T>(
    partitions: &[WorkRange],
    stripes: Vec<ScratchStripe<'a, T>>,
    mut out: &'a mut [T],
) -> Vec<Job<'a, T>> {
    partitions
        .iter()
        .zip(stripes)
        .map(|(&range, stripe)| {
            let (head, tail) = std::mem::take(&mut out).split_at_mut(range.len());
            out = tail;
            (range, stripe, head)
        })
        .collect()
}

#[cfg(feature = "cpu")]
fn run_workers<T, S, K>(
    ctx: &DispatchContext<'_, T, S, K>,
    jobs: Vec<Job<'_, T>>,
    parallel: bool,
) -> Result<(), FilterError>
where
    T: Float + Send + Sync,
    S: NeighborSearch<T> + ?Sized,
    K: FilterKernel<T> + ?Sized,
{
    if !parallel || jobs.len() <= 1 {
        run_inline(ctx, jobs);
        return Ok(());
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(jobs.len())
        .thread_name(|i| format!("filter-worker-{i}"))
        .build()
        .map_err(|e| FilterError::WorkerLaunch(e.to_string()))?;

    pool.scope(|scope| {
        for (range, stripe, out) in jobs {
            scope.spawn(move |_| filter_range(ctx, range, stripe, out));
        }
    });

    Ok(())
}

// Sequential fallback (when cpu feature is not enabled)
#[cfg(not(feature = "cpu"))]
fn run_workers<T, S, K>(
    ctx: &DispatchContext<'_, T, S, K>,
    jobs: Vec<Job<'_, T>>,
    _parallel: bool,
) -> Result<(), FilterError>
where
    T: Float + Send + Sync,
    S: NeighborSearch<T> + ?Sized,
    K: FilterKernel<T> + ?Sized,
{
    run_inline(ctx, jobs);
    Ok(())
}

fn run_inline<T, S, K>(ctx: &DispatchContext<'_, T, S, K>, jobs: Vec<Job<'_, T>>)
where
    T: Float,
    S: NeighborSearch<T> + ?Sized,
    K: FilterKernel<T> + ?Sized,
{
    for (range, stripe, out) in jobs {
        filter_range(ctx, range, stripe, out);
    }
}

fn validate_lengths<T>(co: &[T], gradproj: &[T], feasdir: &[T]) -> Result<usize, FilterError> {
    if gradproj.len() % 3 != 0 {
        return Err(FilterError::InvalidInput(format!(
            "gradproj length {} is not a multiple of 3",
            gradproj.len()
        )));
    }
    let nk = gradproj.len() / 3;

    if co.len() != 3 * nk {
        return Err(FilterError::MismatchedInputs {
            field: "co",
            expected: 3 * nk,
            got: co.len(),
        });
    }
    if feasdir.len() != 2 * nk {
        return Err(FilterError::MismatchedInputs {
            field: "feasdir",
            expected: 2 * nk,
            got: feasdir.len(),
        });
    }

    Ok(nk)
}
