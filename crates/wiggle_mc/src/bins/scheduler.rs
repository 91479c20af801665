//! Concurrent execution of independent bin jobs.
//!
//! Results are written into a slot vector pre-sized to the number of bins,
//! so output order is the bin order whatever order the jobs finish in.

use super::{BinDescriptor, BinResult, IntegrationOutcome, JobError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// How bin jobs are dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchKind {
    /// One job per worker of a dedicated thread pool.
    Parallel,
    /// Jobs run one after another on the calling thread.
    Sequential,
}

impl Default for DispatchKind {
    fn default() -> Self {
        Self::Parallel
    }
}

impl fmt::Display for DispatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parallel => write!(f, "parallel"),
            Self::Sequential => write!(f, "sequential"),
        }
    }
}

impl FromStr for DispatchKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "parallel" => Ok(Self::Parallel),
            "sequential" => Ok(Self::Sequential),
            _ => Err(format!(
                "Invalid dispatch '{}'. Valid values: parallel, sequential",
                s
            )),
        }
    }
}

/// Dispatch policy with its thread budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Rayon pool with `threads` workers, all cores when `None`.
    Parallel {
        /// Worker count.
        threads: Option<usize>,
    },
    /// Calling thread only.
    Sequential,
}

impl Dispatch {
    /// Builds the policy from its kind and an optional thread count.
    pub fn new(kind: DispatchKind, threads: Option<usize>) -> Self {
        match kind {
            DispatchKind::Parallel => Self::Parallel { threads },
            DispatchKind::Sequential => Self::Sequential,
        }
    }
}

impl Default for Dispatch {
    fn default() -> Self {
        Self::Parallel { threads: None }
    }
}

/// Scheduler failure; bin failures are reported per bin instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// The worker pool could not be created.
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(String),
}

/// Runs `job` for every bin and returns results in bin order.
///
/// # Arguments
///
/// * `bins` - Bins in output order
/// * `dispatch` - Sequential or parallel execution
/// * `job` - Integrates one bin
///
/// # Errors
///
/// Returns `SchedulerError::ThreadPool` if the worker pool cannot be built.
/// A failing job only marks its own row as failed.
///
/// # Examples
///
/// ```rust
/// use wiggle_mc::bins::{schedule, BinDescriptor, Dispatch, IntegrationOutcome};
///
/// let bins: Vec<_> = (0..4).map(|i| BinDescriptor::new(i, i as f64, i as f64 + 1.0)).collect();
/// let rows = schedule(&bins, Dispatch::Parallel { threads: Some(2) }, |bin| {
///     Ok(IntegrationOutcome {
///         value: bin.midpoint,
///         error: 0.0,
///         chi_squared_per_dof: 0.0,
///         calls: 0,
///         non_finite: 0,
///     })
/// })
/// .unwrap();
/// assert_eq!(rows[3].value(), 3.5);
/// ```
pub fn schedule<F>(
    bins: &[BinDescriptor],
    dispatch: Dispatch,
    job: F,
) -> Result<Vec<BinResult>, SchedulerError>
where
    F: Fn(&BinDescriptor) -> Result<IntegrationOutcome, JobError> + Sync + Send,
{
    let mut slots: Vec<Result<IntegrationOutcome, JobError>> = bins
        .iter()
        .map(|bin| Err(JobError::NotExecuted { bin: bin.index }))
        .collect();

    match dispatch {
        Dispatch::Sequential => {
            debug!(bins = bins.len(), "dispatching sequentially");
            for (slot, bin) in slots.iter_mut().zip(bins) {
                *slot = job(bin);
            }
        }
        Dispatch::Parallel { threads } => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads.unwrap_or(0))
                .thread_name(|i| format!("wiggle-bin-{}", i))
                .build()
                .map_err(|e| SchedulerError::ThreadPool(e.to_string()))?;
            debug!(
                bins = bins.len(),
                threads = pool.current_num_threads(),
                "dispatching in parallel"
            );
            pool.install(|| {
                slots
                    .par_iter_mut()
                    .zip(bins.par_iter())
                    .for_each(|(slot, bin)| *slot = job(bin));
            });
        }
    }

    Ok(slots
        .into_iter()
        .zip(bins)
        .map(|(outcome, bin)| BinResult { bin: *bin, outcome })
        .collect())
}
