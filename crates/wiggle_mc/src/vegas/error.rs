//! Error types for the adaptive sampler.

use thiserror::Error;

/// Errors raised by [`integrate`](super::integrate) before sampling starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SamplerError {
    /// Integrand, domain and grid disagree on the number of dimensions.
    #[error("Dimension mismatch: integrand {integrand}, domain {domain}, grid {grid}")]
    DimensionMismatch {
        /// Integrand dimension.
        integrand: usize,
        /// Domain dimension.
        domain: usize,
        /// Grid dimension.
        grid: usize,
    },

    /// Fewer than two calls per iteration.
    #[error("At least 2 calls per iteration are required, got {0}")]
    TooFewCalls(usize),

    /// No iterations requested.
    #[error("At least 1 iteration is required")]
    NoIterations,

    /// Zero-dimensional integrand.
    #[error("Integrand has no dimensions")]
    NoDimensions,
}
