//! End-to-end histogram runs.

use crate::bins::{schedule, BinIntegrationJob, BinResult, Dispatch, SchedulerError};
use crate::domain::IntegrationDomain;
use crate::error::ConfigError;
use crate::process::Process;
use crate::vegas::VegasConfig;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that stop a run before or while scheduling.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// Invalid sampler or process configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The scheduler could not start.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Completed histogram in bin order.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    process: &'static str,
    rows: Vec<BinResult>,
    elapsed: Duration,
}

impl Histogram {
    /// Assembles a histogram from ordered rows.
    pub fn new(process: &'static str, rows: Vec<BinResult>, elapsed: Duration) -> Self {
        Self {
            process,
            rows,
            elapsed,
        }
    }

    /// Name of the process that produced the rows.
    #[inline]
    pub fn process(&self) -> &'static str {
        self.process
    }

    /// Rows in bin order.
    #[inline]
    pub fn rows(&self) -> &[BinResult] {
        &self.rows
    }

    /// Wall-clock duration of the run.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of failed bins.
    pub fn failed_bins(&self) -> usize {
        self.rows.iter().filter(|r| r.is_failed()).count()
    }

    /// Sum of `value × width` over successful bins; a zero-width bin
    /// contributes its value.
    pub fn integral(&self) -> f64 {
        self.rows
            .iter()
            .filter(|r| !r.is_failed())
            .map(|r| {
                let width = r.bin.width();
                if width > 0.0 {
                    r.value() * width
                } else {
                    r.value()
                }
            })
            .sum()
    }
}

/// Integrates every bin of `process` and collects the rows in bin order.
///
/// All domains are resolved before the first job starts, so configuration
/// errors never leave a partial histogram.
///
/// # Errors
///
/// Returns `PipelineError` for invalid configuration or if the thread pool
/// cannot be built. Individual bin failures are reported in the rows.
pub fn run_histogram<P: Process>(
    process: &P,
    config: &VegasConfig,
    dispatch: Dispatch,
) -> Result<Histogram, PipelineError> {
    config.validate()?;
    let bins = process.histogram();
    let domains = bins
        .iter()
        .map(|bin| process.domain(bin))
        .collect::<Result<Vec<IntegrationDomain>, ConfigError>>()?;

    info!(
        process = process.name(),
        bins = bins.len(),
        dimensions = process.dimensions(),
        seed = config.seed(),
        "starting histogram"
    );

    let start = Instant::now();
    let rows = schedule(&bins, dispatch, |bin| {
        BinIntegrationJob::new(process, *bin, domains[bin.index].clone(), config).run()
    })?;
    let histogram = Histogram::new(process.name(), rows, start.elapsed());

    let failed = histogram.failed_bins();
    if failed > 0 {
        for row in histogram.rows() {
            if let Err(err) = &row.outcome {
                warn!(bin = row.bin.index, error = %err, "bin failed");
            }
        }
    }
    info!(
        process = process.name(),
        failed,
        elapsed_ms = histogram.elapsed().as_millis() as u64,
        "histogram complete"
    );
    Ok(histogram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bins::{BinDescriptor, JobError};

    struct Constant;

    impl Process for Constant {
        type Snapshot = ();

        fn name(&self) -> &'static str {
            "constant"
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn histogram(&self) -> Vec<BinDescriptor> {
            (0..3)
                .map(|i| BinDescriptor::new(i, i as f64, i as f64 + 0.5))
                .collect()
        }

        fn snapshot(&self, _bin: &BinDescriptor) {}

        fn domain(&self, bin: &BinDescriptor) -> Result<IntegrationDomain, ConfigError> {
            IntegrationDomain::new(vec![(0.0, 1.0), (bin.lower, bin.upper)])
        }

        fn evaluate(&self, _point: &[f64], _snapshot: &()) -> f64 {
            4.0
        }
    }

    fn config() -> VegasConfig {
        VegasConfig::builder()
            .warm_up(100, 2)
            .refine(1_000, 1)
            .build()
            .unwrap()
    }

    #[test]
    fn test_constant_histogram() {
        let histogram = run_histogram(&Constant, &config(), Dispatch::Sequential).unwrap();
        assert_eq!(histogram.process(), "constant");
        assert_eq!(histogram.rows().len(), 3);
        assert_eq!(histogram.failed_bins(), 0);
        for row in histogram.rows() {
            assert!((row.value() - 2.0).abs() < 1e-10);
        }
        assert!((histogram.integral() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let a = run_histogram(&Constant, &config(), Dispatch::Sequential).unwrap();
        let b = run_histogram(&Constant, &config(), Dispatch::Parallel { threads: Some(3) }).unwrap();
        assert_eq!(a.rows(), b.rows());
    }

    #[test]
    fn test_failed_rows_counted() {
        let rows = vec![
            BinResult {
                bin: BinDescriptor::new(0, 0.0, 1.0),
                outcome: Err(JobError::NotExecuted { bin: 0 }),
            },
        ];
        let histogram = Histogram::new("x", rows, Duration::ZERO);
        assert_eq!(histogram.failed_bins(), 1);
        assert_eq!(histogram.integral(), 0.0);
    }
}
