//! # VEGAS Adaptive Sampler
//!
//! Importance-sampling Monte Carlo integration over rectangular domains.
//!
//! ## Module Structure
//!
//! - [`config`]: [`VegasConfig`] builder, stage plans, non-finite policy
//! - [`grid`]: per-dimension importance grid and its refinement
//! - [`integrator`]: [`integrate`], [`VegasState`], [`Stage`]
//! - [`error`]: [`SamplerError`]
//!
//! ## Two-Stage Usage
//!
//! ```rust
//! use wiggle_mc::domain::IntegrationDomain;
//! use wiggle_mc::rng::SamplerRng;
//! use wiggle_mc::vegas::{integrate, FnIntegrand, Stage, VegasConfig, VegasState};
//!
//! let config = VegasConfig::builder().warm_up(1_000, 5).refine(10_000, 1).build().unwrap();
//! let f = FnIntegrand::new(1, |x: &[f64]| 3.0 * x[0] * x[0]);
//! let domain = IntegrationDomain::unit(1);
//! let mut state = VegasState::new(1, &config);
//! let mut rng = SamplerRng::from_seed(7);
//!
//! // warm-up adapts the grid; its estimate is thrown away
//! let _ = integrate(&f, &domain, 1_000, Stage::WarmUp, 5, &mut rng, &mut state).unwrap();
//! let est = integrate(&f, &domain, 10_000, Stage::Refine, 1, &mut rng, &mut state).unwrap();
//! assert!((est.value - 1.0).abs() < 0.01);
//! ```

pub mod config;
pub mod error;
pub mod grid;
pub mod integrator;

pub use config::{NonFinitePolicy, StagePlan, VegasConfig, VegasConfigBuilder};
pub use error::SamplerError;
pub use grid::Grid;
pub use integrator::{integrate, Stage, VegasEstimate, VegasState};

/// A real-valued function on a fixed-dimension domain.
///
/// Implementations are evaluated concurrently by different bin jobs and
/// must therefore be `Sync`.
pub trait Integrand: Sync {
    /// Number of integration dimensions.
    fn dimensions(&self) -> usize;

    /// Evaluates the function at `point` (length [`dimensions`](Self::dimensions)).
    fn evaluate(&self, point: &[f64]) -> f64;
}

/// Adapts a closure into an [`Integrand`].
pub struct FnIntegrand<F> {
    dimensions: usize,
    function: F,
}

impl<F> FnIntegrand<F>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    /// Wraps `function` as a `dimensions`-dimensional integrand.
    pub fn new(dimensions: usize, function: F) -> Self {
        Self {
            dimensions,
            function,
        }
    }
}

impl<F> Integrand for FnIntegrand<F>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    #[inline]
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    #[inline]
    fn evaluate(&self, point: &[f64]) -> f64 {
        (self.function)(point)
    }
}
