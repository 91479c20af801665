//! Error types for run configuration.
//!
//! Configuration errors are fatal: they are raised while resolving the run
//! before any bin is scheduled.

use crate::vegas::config::{MAX_CALLS, MAX_GRID_BINS, MAX_ITERATIONS, MIN_CALLS};
use thiserror::Error;
use wiggle_core::types::CoreError;

/// Configuration error for the integration engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Call count outside the valid range.
    #[error("Invalid {stage} call count {calls}: must be in range [{min}, {max}]", min = MIN_CALLS, max = MAX_CALLS)]
    InvalidCallCount {
        /// Stage name (warm-up or refine).
        stage: &'static str,
        /// Rejected value.
        calls: usize,
    },

    /// Iteration count outside the valid range.
    #[error("Invalid {stage} iteration count {iterations}: must be in range [1, {max}]", max = MAX_ITERATIONS)]
    InvalidIterationCount {
        /// Stage name (warm-up or refine).
        stage: &'static str,
        /// Rejected value.
        iterations: usize,
    },

    /// Importance-grid bin count outside the valid range.
    #[error("Invalid grid bin count {0}: must be in range [2, {max}]", max = MAX_GRID_BINS)]
    InvalidGridBins(usize),

    /// Lower bound not strictly below upper bound, or non-finite bounds.
    #[error("Invalid range for '{name}': [{min}, {max}]")]
    InvalidRange {
        /// Parameter name.
        name: &'static str,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// Histogram with no bins.
    #[error("Invalid bin count for '{name}': {bins}")]
    InvalidBinCount {
        /// Histogram name.
        name: &'static str,
        /// Rejected value.
        bins: usize,
    },

    /// Observable mode not recognised.
    #[error("Unknown observable mode: {0}")]
    UnknownMode(String),

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },

    /// Invalid physics input.
    #[error(transparent)]
    Core(#[from] CoreError),
}
