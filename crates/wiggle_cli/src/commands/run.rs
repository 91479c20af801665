//! Run command implementation
//!
//! Integrates every histogram bin of the configured process, prints the
//! table and persists it in the configured format.

use tracing::{info, warn};
use wiggle_core::physics::ToyPartonDistribution;
use wiggle_mc::pipeline::{run_histogram, Histogram};
use wiggle_mc::process::{DileptonProcess, InclusiveJetProcess};
use wiggle_mc::sink::{ConsoleSink, JsonSink, OutputFormat, ResultSink, TabularSink};
use wiggle_mc::vegas::VegasConfig;

use crate::config::{ProcessKind, RunConfig};
use crate::{CliError, Result};

/// Run the configured histogram
///
/// Every row is written before a failed bin turns into a non-zero exit.
pub fn run(config: &RunConfig) -> Result<()> {
    let histogram = integrate(config)?;

    ConsoleSink::stdout().write(&histogram)?;
    write_output(config, &histogram)?;

    let failed = histogram.failed_bins();
    if failed > 0 {
        return Err(CliError::FailedBins {
            failed,
            total: histogram.rows().len(),
        });
    }
    Ok(())
}

/// Build the process and integrate all of its bins.
pub fn integrate(config: &RunConfig) -> Result<Histogram> {
    let vegas = config.integration.vegas_config()?;
    log_summary(config, &vegas);

    let dispatch = config.integration.dispatch();
    let histogram = match config.process {
        ProcessKind::Dilepton => {
            let process =
                DileptonProcess::new(config.dilepton.clone(), config.integration.sampling)?;
            run_histogram(&process, &vegas, dispatch)?
        }
        ProcessKind::InclusiveJet => {
            let process = InclusiveJetProcess::new(
                config.inclusive_jet.clone(),
                ToyPartonDistribution::default(),
            )?;
            run_histogram(&process, &vegas, dispatch)?
        }
    };
    Ok(histogram)
}

fn write_output(config: &RunConfig, histogram: &Histogram) -> Result<()> {
    let path = config.output.resolved_path();
    match config.output.format {
        OutputFormat::Tsv => TabularSink::create(&path)?.write(histogram)?,
        OutputFormat::Json => JsonSink::create(&path)?.write(histogram)?,
    }
    if histogram.failed_bins() > 0 {
        warn!(path = %path.display(), "failed bins written as nan rows");
    }
    Ok(())
}

fn log_summary(config: &RunConfig, vegas: &VegasConfig) {
    match config.process {
        ProcessKind::Dilepton => {
            let p = &config.dilepton;
            info!(
                energy = p.collision_energy,
                mode = %p.mode,
                kt = ?(p.kt.min, p.kt.max),
                rapidity = ?(p.rapidity.min, p.rapidity.max),
                sudakov = ?p.sudakov.window().map(|r| (r.min, r.max)),
                mass_cut = ?p.mass_cut.window().map(|r| (r.min, r.max)),
                asymmetry_cut = ?p.asymmetry_cut.window().map(|r| (r.min, r.max)),
                anisotropic = p.anisotropic,
                lepton = %p.lepton,
                sampling = %config.integration.sampling,
                "Dilepton run"
            );
        }
        ProcessKind::InclusiveJet => {
            let p = &config.inclusive_jet;
            info!(
                energy = p.collision_energy,
                rapidity = ?(p.rapidity.min, p.rapidity.max),
                pt = ?(p.transverse_momentum.min, p.transverse_momentum.max),
                bins = p.transverse_momentum.bins,
                quark_jets = p.quark_jets,
                gluon_jets = p.gluon_jets,
                scale_factor = p.scale_factor,
                "Inclusive jet run"
            );
        }
    }

    let warm_up = vegas.warm_up();
    let refine = vegas.refine();
    info!(
        warm_up_calls = warm_up.calls,
        warm_up_iterations = warm_up.iterations,
        refine_calls = refine.calls,
        refine_iterations = refine.iterations,
        seed = vegas.seed(),
        non_finite = vegas.non_finite().name(),
        dispatch = %config.integration.dispatch,
        workers = config.integration.workers(),
        "Sampler settings"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StageSettings;
    use wiggle_mc::bins::DispatchKind;
    use wiggle_mc::params::HistogramAxis;
    use wiggle_mc::sink::HistogramReport;
    use wiggle_mc::ObservableMode;

    fn quick_config(name: &str) -> RunConfig {
        let mut config = RunConfig::default();
        config.integration.warm_up = StageSettings {
            calls: 200,
            iterations: 2,
        };
        config.integration.refine = StageSettings {
            calls: 1_000,
            iterations: 1,
        };
        config.integration.dispatch = DispatchKind::Sequential;
        config.integration.seed = 3;
        config.output.path = Some(std::env::temp_dir().join(name));
        config
    }

    #[test]
    fn test_total_run_writes_one_row() {
        let config = quick_config("wiggle_run_total.txt");
        run(&config).unwrap();

        let path = config.output.resolved_path();
        let text = std::fs::read_to_string(&path).unwrap();
        let fields: Vec<&str> = text.trim_end().split('\t').collect();
        assert_eq!(text.lines().count(), 1);
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], "0.000000e+00");
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_json_output_for_differential_run() {
        let mut config = quick_config("wiggle_run_imbalance.json");
        config.dilepton.mode = ObservableMode::Imbalance;
        config.dilepton.imbalance = HistogramAxis::new(0.0, 0.1, 3);
        config.output.format = OutputFormat::Json;
        run(&config).unwrap();

        let path = config.output.resolved_path();
        let report: HistogramReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(report.process, "dilepton");
        assert_eq!(report.bins.len(), 3);
        assert_eq!(report.failed_bins, 0);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_integrate_is_reproducible() {
        let mut config = quick_config("unused.txt");
        config.process = ProcessKind::InclusiveJet;
        config.inclusive_jet.transverse_momentum = HistogramAxis::new(50.0, 150.0, 2);

        let a = integrate(&config).unwrap();
        let b = integrate(&config).unwrap();
        assert_eq!(a.process(), "inclusive-jet");
        assert_eq!(a.rows(), b.rows());
    }
}
