//! Adaptive sampler configuration.
//!
//! This module provides configuration types and builders for the two-stage
//! VEGAS integration performed for every histogram bin.

use crate::error::ConfigError;

/// Minimum number of integrand calls per iteration (variance needs two).
pub const MIN_CALLS: usize = 2;

/// Maximum number of integrand calls per iteration.
pub const MAX_CALLS: usize = 1_000_000_000;

/// Maximum number of iterations per stage.
pub const MAX_ITERATIONS: usize = 10_000;

/// Maximum number of importance-grid bins per dimension.
pub const MAX_GRID_BINS: usize = 1_000;

/// Default number of importance-grid bins per dimension.
pub const DEFAULT_GRID_BINS: usize = 50;

/// Default grid damping exponent.
pub const DEFAULT_ALPHA: f64 = 1.5;

/// Handling of NaN or infinite integrand values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NonFinitePolicy {
    /// Count the value, replace it by zero and keep sampling.
    #[default]
    Discard,
    /// Feed the value into the estimate; the bin will fail.
    Propagate,
}

impl NonFinitePolicy {
    /// Lower-case name.
    pub fn name(&self) -> &'static str {
        match self {
            NonFinitePolicy::Discard => "discard",
            NonFinitePolicy::Propagate => "propagate",
        }
    }
}

impl std::str::FromStr for NonFinitePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "discard" => Ok(NonFinitePolicy::Discard),
            "propagate" => Ok(NonFinitePolicy::Propagate),
            _ => Err(ConfigError::InvalidParameter {
                name: "non_finite",
                value: format!("unknown policy '{}'", s),
            }),
        }
    }
}

/// Calls and iterations for one sampler stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StagePlan {
    /// Integrand evaluations per iteration.
    pub calls: usize,
    /// Number of grid-adapting iterations.
    pub iterations: usize,
}

impl StagePlan {
    /// Creates a stage plan.
    #[inline]
    pub fn new(calls: usize, iterations: usize) -> Self {
        Self { calls, iterations }
    }

    fn validate(&self, stage: &'static str) -> Result<(), ConfigError> {
        if self.calls < MIN_CALLS || self.calls > MAX_CALLS {
            return Err(ConfigError::InvalidCallCount {
                stage,
                calls: self.calls,
            });
        }
        if self.iterations == 0 || self.iterations > MAX_ITERATIONS {
            return Err(ConfigError::InvalidIterationCount {
                stage,
                iterations: self.iterations,
            });
        }
        Ok(())
    }
}

/// Two-stage VEGAS configuration.
///
/// Immutable configuration shared by every bin job of a run.
/// Use [`VegasConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use wiggle_mc::vegas::{NonFinitePolicy, VegasConfig};
///
/// let config = VegasConfig::builder()
///     .warm_up(10_000, 10)
///     .refine(100_000, 1)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.warm_up().calls, 10_000);
/// assert_eq!(config.refine().iterations, 1);
/// assert_eq!(config.non_finite(), NonFinitePolicy::Discard);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct VegasConfig {
    warm_up: StagePlan,
    refine: StagePlan,
    grid_bins: usize,
    alpha: f64,
    non_finite: NonFinitePolicy,
    seed: u64,
}

impl VegasConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> VegasConfigBuilder {
        VegasConfigBuilder::default()
    }

    /// Warm-up stage plan.
    #[inline]
    pub fn warm_up(&self) -> StagePlan {
        self.warm_up
    }

    /// Refine stage plan.
    #[inline]
    pub fn refine(&self) -> StagePlan {
        self.refine
    }

    /// Importance-grid bins per dimension.
    #[inline]
    pub fn grid_bins(&self) -> usize {
        self.grid_bins
    }

    /// Grid damping exponent.
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Non-finite value policy.
    #[inline]
    pub fn non_finite(&self) -> NonFinitePolicy {
        self.non_finite
    }

    /// Base seed of the run.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - a stage has fewer than 2 or more than 1,000,000,000 calls
    /// - a stage has 0 or more than 10,000 iterations
    /// - `grid_bins` is outside [2, 1,000]
    /// - `alpha` is negative or non-finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.warm_up.validate("warm-up")?;
        self.refine.validate("refine")?;
        if self.grid_bins < 2 || self.grid_bins > MAX_GRID_BINS {
            return Err(ConfigError::InvalidGridBins(self.grid_bins));
        }
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "alpha",
                value: format!("{} is not a non-negative number", self.alpha),
            });
        }
        Ok(())
    }
}

/// Builder for [`VegasConfig`].
///
/// Both stage plans are mandatory; the remaining settings default to
/// 50 grid bins, α = 1.5, [`NonFinitePolicy::Discard`] and seed 0.
#[derive(Clone, Debug, Default)]
pub struct VegasConfigBuilder {
    warm_up: Option<StagePlan>,
    refine: Option<StagePlan>,
    grid_bins: Option<usize>,
    alpha: Option<f64>,
    non_finite: NonFinitePolicy,
    seed: u64,
}

impl VegasConfigBuilder {
    /// Sets the warm-up stage.
    ///
    /// # Arguments
    ///
    /// * `calls` - Integrand calls per iteration
    /// * `iterations` - Number of iterations
    #[inline]
    pub fn warm_up(mut self, calls: usize, iterations: usize) -> Self {
        self.warm_up = Some(StagePlan::new(calls, iterations));
        self
    }

    /// Sets the refine stage.
    ///
    /// # Arguments
    ///
    /// * `calls` - Integrand calls per iteration
    /// * `iterations` - Number of iterations
    #[inline]
    pub fn refine(mut self, calls: usize, iterations: usize) -> Self {
        self.refine = Some(StagePlan::new(calls, iterations));
        self
    }

    /// Sets the importance-grid bin count.
    #[inline]
    pub fn grid_bins(mut self, grid_bins: usize) -> Self {
        self.grid_bins = Some(grid_bins);
        self
    }

    /// Sets the grid damping exponent.
    #[inline]
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Sets the non-finite value policy.
    #[inline]
    pub fn non_finite(mut self, policy: NonFinitePolicy) -> Self {
        self.non_finite = policy;
        self
    }

    /// Sets the base seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a stage is missing or any value is invalid.
    pub fn build(self) -> Result<VegasConfig, ConfigError> {
        let warm_up = self.warm_up.ok_or(ConfigError::InvalidParameter {
            name: "warm_up",
            value: "must be specified".to_string(),
        })?;
        let refine = self.refine.ok_or(ConfigError::InvalidParameter {
            name: "refine",
            value: "must be specified".to_string(),
        })?;

        let config = VegasConfig {
            warm_up,
            refine,
            grid_bins: self.grid_bins.unwrap_or(DEFAULT_GRID_BINS),
            alpha: self.alpha.unwrap_or(DEFAULT_ALPHA),
            non_finite: self.non_finite,
            seed: self.seed,
        };

        config.validate()?;
        Ok(config)
    }
}
