//! Two-stage integration of a single bin.
//!
//! A job moves through `WarmUp → Refine → Done`. The warm-up stage adapts
//! the importance grid from a uniform start and its estimate is discarded;
//! the refine stage keeps the grid, resets the running averages and
//! produces the reported estimate. Each stage draws from its own random
//! stream derived from the job seed, so a bin's result depends only on the
//! run seed and the bin index.

use super::{BinDescriptor, IntegrationOutcome, JobError};
use crate::domain::IntegrationDomain;
use crate::process::{BoundIntegrand, Process};
use crate::rng::{bin_seed, stream_seed, SamplerRng};
use crate::vegas::{integrate, Stage, VegasConfig, VegasEstimate, VegasState};
use tracing::{debug, info, warn};

const WARM_UP_STREAM: u64 = 0;
const REFINE_STREAM: u64 = 1;

/// Lifecycle of a [`BinIntegrationJob`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JobPhase {
    /// Grid adaptation pending.
    WarmUp,
    /// Final estimate pending.
    Refine,
    /// Outcome available.
    Done,
}

/// Integration of one bin; owns its snapshot, sampler state and RNG.
pub struct BinIntegrationJob<'a, P: Process> {
    process: &'a P,
    config: &'a VegasConfig,
    bin: BinDescriptor,
    snapshot: P::Snapshot,
    domain: IntegrationDomain,
    seed: u64,
    rng: SamplerRng,
    state: VegasState,
    phase: JobPhase,
    warm_up: Option<VegasEstimate>,
    outcome: Option<IntegrationOutcome>,
}

impl<'a, P: Process> BinIntegrationJob<'a, P> {
    /// Creates a job in [`JobPhase::WarmUp`].
    ///
    /// # Arguments
    ///
    /// * `process` - Process providing snapshot, integrand and normalisation
    /// * `bin` - Bin to integrate
    /// * `domain` - Integration domain of the bin
    /// * `config` - Stage plans, grid settings and run seed
    pub fn new(
        process: &'a P,
        bin: BinDescriptor,
        domain: IntegrationDomain,
        config: &'a VegasConfig,
    ) -> Self {
        let seed = bin_seed(config.seed(), bin.index);
        Self {
            process,
            config,
            bin,
            snapshot: process.snapshot(&bin),
            state: VegasState::new(domain.dimensions(), config),
            domain,
            seed,
            rng: SamplerRng::from_seed(stream_seed(seed, WARM_UP_STREAM)),
            phase: JobPhase::WarmUp,
            warm_up: None,
            outcome: None,
        }
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    /// The bin being integrated.
    #[inline]
    pub fn bin(&self) -> &BinDescriptor {
        &self.bin
    }

    /// Job seed derived from the run seed and the bin index.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Discarded warm-up estimate, once the warm-up has run.
    #[inline]
    pub fn warm_up_estimate(&self) -> Option<&VegasEstimate> {
        self.warm_up.as_ref()
    }

    /// Advances one phase.
    ///
    /// Returns the outcome once the job is done; stepping a finished job
    /// returns the same outcome again.
    pub fn step(&mut self) -> Result<Option<IntegrationOutcome>, JobError> {
        match self.phase {
            JobPhase::WarmUp => {
                let plan = self.config.warm_up();
                let estimate = self.run_stage(Stage::WarmUp, plan.calls, plan.iterations)?;
                debug!(
                    bin = self.bin.index,
                    value = estimate.value,
                    error = estimate.error,
                    "warm-up complete"
                );
                self.warm_up = Some(estimate);
                self.rng = SamplerRng::from_seed(stream_seed(self.seed, REFINE_STREAM));
                self.phase = JobPhase::Refine;
                Ok(None)
            }
            JobPhase::Refine => {
                let plan = self.config.refine();
                let estimate = self.run_stage(Stage::Refine, plan.calls, plan.iterations)?;
                self.phase = JobPhase::Done;

                let norm = self.process.normalisation(&self.bin);
                let value = estimate.value * norm;
                let error = estimate.error * norm.abs();
                if !(value.is_finite() && error.is_finite()) {
                    return Err(JobError::NonFinite {
                        bin: self.bin.index,
                        value,
                        error,
                    });
                }

                let warm_up = self.warm_up.as_ref();
                let outcome = IntegrationOutcome {
                    value,
                    error,
                    chi_squared_per_dof: estimate.chi_squared_per_dof,
                    calls: estimate.calls * estimate.iterations
                        + warm_up.map_or(0, |w| w.calls * w.iterations),
                    non_finite: estimate.non_finite + warm_up.map_or(0, |w| w.non_finite),
                };
                debug!(
                    bin = self.bin.index,
                    value,
                    error,
                    chi2 = outcome.chi_squared_per_dof,
                    "refine complete"
                );
                self.outcome = Some(outcome);
                Ok(self.outcome)
            }
            JobPhase::Done => Ok(self.outcome),
        }
    }

    /// Runs the remaining phases to completion.
    ///
    /// # Errors
    ///
    /// Returns `JobError` if the sampler rejects its arguments or the
    /// refined estimate is not finite.
    pub fn run(mut self) -> Result<IntegrationOutcome, JobError> {
        let thread = rayon::current_thread_index().unwrap_or(0);
        info!(
            bin = self.bin.index,
            midpoint = self.bin.midpoint,
            thread,
            "integrating bin"
        );
        loop {
            if let Some(outcome) = self.step()? {
                info!(
                    bin = self.bin.index,
                    thread,
                    value = outcome.value,
                    error = outcome.error,
                    "bin finished"
                );
                return Ok(outcome);
            }
        }
    }

    fn run_stage(
        &mut self,
        stage: Stage,
        calls: usize,
        iterations: usize,
    ) -> Result<VegasEstimate, JobError> {
        let integrand = BoundIntegrand::new(self.process, &self.snapshot);
        let estimate = integrate(
            &integrand,
            &self.domain,
            calls,
            stage,
            iterations,
            &mut self.rng,
            &mut self.state,
        )
        .map_err(|source| JobError::Sampler {
            bin: self.bin.index,
            source,
        })?;
        if estimate.non_finite > 0 {
            warn!(
                bin = self.bin.index,
                stage = ?stage,
                count = estimate.non_finite,
                policy = self.config.non_finite().name(),
                "non-finite integrand values"
            );
        }
        Ok(estimate)
    }
}
