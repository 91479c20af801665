//! VEGAS importance-sampling integrator.
//!
//! [`integrate`] runs a number of iterations of `calls` samples each,
//! refines the importance grid after every iteration and combines the
//! iteration estimates by inverse-variance weighting:
//!
//! ```text
//! I = Σ wᵢ Iᵢ / Σ wᵢ,   σ = 1 / √(Σ wᵢ),   wᵢ = 1 / σᵢ²
//! ```
//!
//! An iteration with zero variance is weighted by the mean of the previous
//! weights; if none exist the result is a running average with zero error.
//!
//! The [`Stage`] decides what survives from the previous call: the grid,
//! the accumulated averages, both or neither.

use super::config::{NonFinitePolicy, VegasConfig};
use super::error::SamplerError;
use super::grid::Grid;
use super::Integrand;
use crate::domain::IntegrationDomain;
use crate::rng::SamplerRng;

/// Sampler stage selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Fresh uniform grid, accumulated averages discarded.
    WarmUp,
    /// Adapted grid kept, accumulated averages discarded.
    Refine,
    /// Adapted grid and accumulated averages kept.
    Continue,
}

/// Combined estimate returned by [`integrate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VegasEstimate {
    /// Integral estimate.
    pub value: f64,
    /// One-standard-deviation error.
    pub error: f64,
    /// χ² per degree of freedom across the combined iterations.
    pub chi_squared_per_dof: f64,
    /// Iterations run in this call.
    pub iterations: usize,
    /// Integrand calls per iteration.
    pub calls: usize,
    /// Non-finite integrand values met in this call.
    pub non_finite: usize,
}

/// Grid and running averages of one integration.
///
/// A state is created for one bin job and dropped with it; it is never
/// shared between threads.
#[derive(Clone, Debug)]
pub struct VegasState {
    grid: Grid,
    alpha: f64,
    non_finite: NonFinitePolicy,
    sum_weights: f64,
    weighted_sum: f64,
    chi_squared: f64,
    samples: usize,
}

impl VegasState {
    /// Creates a state with a uniform grid.
    ///
    /// # Arguments
    ///
    /// * `dimensions` - Number of integration dimensions
    /// * `config` - Grid size, damping and non-finite policy
    pub fn new(dimensions: usize, config: &VegasConfig) -> Self {
        Self {
            grid: Grid::uniform(dimensions, config.grid_bins()),
            alpha: config.alpha(),
            non_finite: config.non_finite(),
            sum_weights: 0.0,
            weighted_sum: 0.0,
            chi_squared: 0.0,
            samples: 0,
        }
    }

    /// Number of dimensions.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.grid.dimensions()
    }

    /// Current importance grid.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Iterations folded into the running average.
    #[inline]
    pub fn samples(&self) -> usize {
        self.samples
    }

    fn reset_averages(&mut self) {
        self.sum_weights = 0.0;
        self.weighted_sum = 0.0;
        self.chi_squared = 0.0;
        self.samples = 0;
    }

    fn prepare(&mut self, stage: Stage) {
        match stage {
            Stage::WarmUp => {
                self.grid.reset();
                self.reset_averages();
            }
            Stage::Refine => self.reset_averages(),
            Stage::Continue => {}
        }
    }
}

/// Integrates `integrand` over `domain`.
///
/// # Arguments
///
/// * `integrand` - Function to integrate
/// * `domain` - Rectangular integration region
/// * `calls` - Samples per iteration (at least 2)
/// * `stage` - What to keep from the previous call on `state`
/// * `iterations` - Number of grid-adapting iterations
/// * `rng` - Source of uniform variates
/// * `state` - Grid and running averages
///
/// # Errors
///
/// Returns `SamplerError` if the dimensions disagree or `calls`/`iterations`
/// are too small. Non-finite integrand values are not errors; they are
/// handled by the state's [`NonFinitePolicy`] and counted in the estimate.
///
/// # Examples
///
/// ```rust
/// use wiggle_mc::domain::IntegrationDomain;
/// use wiggle_mc::rng::SamplerRng;
/// use wiggle_mc::vegas::{integrate, FnIntegrand, Stage, VegasConfig, VegasState};
///
/// let config = VegasConfig::builder().warm_up(1_000, 5).refine(10_000, 1).build().unwrap();
/// let f = FnIntegrand::new(2, |x: &[f64]| x[0] * x[1]);
/// let domain = IntegrationDomain::unit(2);
/// let mut state = VegasState::new(2, &config);
/// let mut rng = SamplerRng::from_seed(1);
///
/// let est = integrate(&f, &domain, 10_000, Stage::WarmUp, 5, &mut rng, &mut state).unwrap();
/// assert!((est.value - 0.25).abs() < 5.0 * est.error + 1e-3);
/// ```
pub fn integrate<I: Integrand + ?Sized>(
    integrand: &I,
    domain: &IntegrationDomain,
    calls: usize,
    stage: Stage,
    iterations: usize,
    rng: &mut SamplerRng,
    state: &mut VegasState,
) -> Result<VegasEstimate, SamplerError> {
    let dims = integrand.dimensions();
    if dims == 0 {
        return Err(SamplerError::NoDimensions);
    }
    if dims != domain.dimensions() || dims != state.dimensions() {
        return Err(SamplerError::DimensionMismatch {
            integrand: dims,
            domain: domain.dimensions(),
            grid: state.dimensions(),
        });
    }
    if calls < 2 {
        return Err(SamplerError::TooFewCalls(calls));
    }
    if iterations == 0 {
        return Err(SamplerError::NoIterations);
    }

    state.prepare(stage);

    let bins = state.grid.bins();
    let volume = domain.volume();
    let bounds = domain.as_slice();
    let n = calls as f64;

    let mut uniform = vec![0.0; dims];
    let mut position = vec![0.0; dims];
    let mut interval = vec![0usize; dims];
    let mut point = vec![0.0; dims];
    let mut importance = vec![0.0; dims * bins];

    let mut cumulative = 0.0;
    let mut cumulative_error = 0.0;
    let mut non_finite = 0usize;

    for it in 0..iterations {
        importance.iter_mut().for_each(|d| *d = 0.0);
        let mut sum = 0.0;
        let mut sum_sq = 0.0;

        for _ in 0..calls {
            rng.fill_uniform(&mut uniform);
            let jacobian = state.grid.map(&uniform, &mut position, &mut interval);
            for (x, (&y, &(lo, hi))) in point.iter_mut().zip(position.iter().zip(bounds)) {
                *x = lo + y * (hi - lo);
            }

            let mut f = integrand.evaluate(&point);
            if !f.is_finite() {
                non_finite += 1;
                if state.non_finite == NonFinitePolicy::Discard {
                    f = 0.0;
                }
            }

            let weighted = f * jacobian * volume;
            let weighted_sq = weighted * weighted;
            sum += weighted;
            sum_sq += weighted_sq;
            for (j, &k) in interval.iter().enumerate() {
                importance[j * bins + k] += weighted_sq;
            }
        }

        let mean = sum / n;
        let variance = ((sum_sq / n - mean * mean) / (n - 1.0)).max(0.0);

        let weight = if variance > 0.0 {
            1.0 / variance
        } else if state.sum_weights > 0.0 {
            state.sum_weights / state.samples as f64
        } else {
            0.0
        };

        if weight > 0.0 {
            let previous_weights = state.sum_weights;
            let previous_mean = if previous_weights > 0.0 {
                state.weighted_sum / previous_weights
            } else {
                0.0
            };
            let deviation = mean - previous_mean;

            state.samples += 1;
            state.sum_weights += weight;
            state.weighted_sum += mean * weight;

            cumulative = state.weighted_sum / state.sum_weights;
            cumulative_error = (1.0 / state.sum_weights).sqrt();

            if state.samples == 1 {
                state.chi_squared = 0.0;
            } else {
                let samples = state.samples as f64;
                state.chi_squared *= samples - 2.0;
                state.chi_squared +=
                    (weight / (1.0 + weight / previous_weights)) * deviation * deviation;
                state.chi_squared /= samples - 1.0;
            }
        } else {
            cumulative += (mean - cumulative) / (it as f64 + 1.0);
            cumulative_error = 0.0;
        }

        state.grid.refine(&importance, state.alpha);
    }

    Ok(VegasEstimate {
        value: cumulative,
        error: cumulative_error,
        chi_squared_per_dof: state.chi_squared,
        iterations,
        calls,
        non_finite,
    })
}
