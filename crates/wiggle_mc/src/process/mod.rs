//! Physics processes.
//!
//! A [`Process`] owns its validated parameters and knows, for every bin of
//! its histogram, the per-bin snapshot, the integration domain, the
//! normalisation and the integrand. The engine only talks to this trait.
//!
//! - [`DileptonProcess`]: γγ → l⁺l⁻ in ultra-peripheral heavy-ion collisions
//! - [`InclusiveJetProcess`]: leading-order single inclusive jets in pp

pub mod dilepton;
pub mod inclusive_jet;

pub use dilepton::{DileptonProcess, PhaseSpacePoint, Veto};
pub use inclusive_jet::InclusiveJetProcess;

use crate::bins::BinDescriptor;
use crate::domain::IntegrationDomain;
use crate::error::ConfigError;
use crate::vegas::Integrand;

/// A differential cross section integrated bin by bin.
pub trait Process: Sync {
    /// Immutable per-bin parameter copy.
    type Snapshot: Send + Sync;

    /// Short name for logs and reports.
    fn name(&self) -> &'static str;

    /// Number of sampled coordinates.
    fn dimensions(&self) -> usize;

    /// Histogram bins in output order.
    fn histogram(&self) -> Vec<BinDescriptor>;

    /// Snapshot handed to every evaluation of `bin`.
    fn snapshot(&self, bin: &BinDescriptor) -> Self::Snapshot;

    /// Integration domain of `bin`.
    fn domain(&self, bin: &BinDescriptor) -> Result<IntegrationDomain, ConfigError>;

    /// Integrand at `point`; zero for vetoed configurations.
    fn evaluate(&self, point: &[f64], snapshot: &Self::Snapshot) -> f64;

    /// Factor applied to the refined estimate and its error.
    fn normalisation(&self, _bin: &BinDescriptor) -> f64 {
        1.0
    }
}

/// A process paired with one bin's snapshot, as seen by the sampler.
pub struct BoundIntegrand<'a, P: Process> {
    process: &'a P,
    snapshot: &'a P::Snapshot,
}

impl<'a, P: Process> BoundIntegrand<'a, P> {
    /// Binds `snapshot` to `process`.
    #[inline]
    pub fn new(process: &'a P, snapshot: &'a P::Snapshot) -> Self {
        Self { process, snapshot }
    }
}

impl<P: Process> Integrand for BoundIntegrand<'_, P> {
    #[inline]
    fn dimensions(&self) -> usize {
        self.process.dimensions()
    }

    #[inline]
    fn evaluate(&self, point: &[f64]) -> f64 {
        self.process.evaluate(point, self.snapshot)
    }
}
