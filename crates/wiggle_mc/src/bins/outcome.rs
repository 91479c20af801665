//! Per-bin results and failures.

use super::BinDescriptor;
use crate::vegas::SamplerError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Final estimate of one bin after normalisation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntegrationOutcome {
    /// Integral estimate.
    pub value: f64,
    /// One-sigma error estimate.
    pub error: f64,
    /// χ²/dof across refine iterations.
    pub chi_squared_per_dof: f64,
    /// Integrand evaluations over both stages.
    pub calls: usize,
    /// Non-finite samples over both stages.
    pub non_finite: usize,
}

/// Failure of a single bin.
///
/// A failed bin does not stop the run; it is reported in place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JobError {
    /// The sampler rejected its arguments.
    #[error("Bin {bin}: sampler error: {source}")]
    Sampler {
        /// Bin index.
        bin: usize,
        /// Underlying error.
        #[source]
        source: SamplerError,
    },

    /// The refined estimate is NaN or infinite.
    #[error("Bin {bin}: non-finite estimate {value} +/- {error}")]
    NonFinite {
        /// Bin index.
        bin: usize,
        /// Estimate.
        value: f64,
        /// Error estimate.
        error: f64,
    },

    /// The job never ran.
    #[error("Bin {bin}: not executed")]
    NotExecuted {
        /// Bin index.
        bin: usize,
    },
}

impl JobError {
    /// Index of the failed bin.
    pub fn bin(&self) -> usize {
        match self {
            Self::Sampler { bin, .. } | Self::NonFinite { bin, .. } | Self::NotExecuted { bin } => {
                *bin
            }
        }
    }
}

/// Descriptor and outcome of one bin, in histogram order.
#[derive(Debug, Clone, PartialEq)]
pub struct BinResult {
    /// The bin.
    pub bin: BinDescriptor,
    /// Estimate or failure.
    pub outcome: Result<IntegrationOutcome, JobError>,
}

impl BinResult {
    /// Estimate, NaN for a failed bin.
    #[inline]
    pub fn value(&self) -> f64 {
        self.outcome.as_ref().map_or(f64::NAN, |o| o.value)
    }

    /// Error estimate, NaN for a failed bin.
    #[inline]
    pub fn error(&self) -> f64 {
        self.outcome.as_ref().map_or(f64::NAN, |o| o.error)
    }

    /// Whether the bin failed.
    #[inline]
    pub fn is_failed(&self) -> bool {
        self.outcome.is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_row_is_nan() {
        let row = BinResult {
            bin: BinDescriptor::new(4, 0.0, 1.0),
            outcome: Err(JobError::NotExecuted { bin: 4 }),
        };
        assert!(row.is_failed());
        assert!(row.value().is_nan());
        assert!(row.error().is_nan());
        assert_eq!(row.outcome.unwrap_err().bin(), 4);
    }

    #[test]
    fn test_error_display() {
        let err = JobError::Sampler {
            bin: 1,
            source: SamplerError::NoIterations,
        };
        assert_eq!(
            err.to_string(),
            "Bin 1: sampler error: At least 1 iteration is required"
        );
    }
}
