//! Run configuration management
//!
//! Handles loading the run description from a TOML file, environment
//! variables and command-line arguments.

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use wiggle_mc::bins::{BinSampling, Dispatch, DispatchKind};
use wiggle_mc::params::{DileptonParameters, InclusiveJetParameters};
use wiggle_mc::sink::OutputFormat;
use wiggle_mc::vegas::config::{DEFAULT_ALPHA, DEFAULT_GRID_BINS};
use wiggle_mc::vegas::{NonFinitePolicy, VegasConfig};
use wiggle_mc::ObservableMode;

/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "WIGGLE_LOG_LEVEL";
/// Environment variable overriding the worker count.
pub const ENV_THREADS: &str = "WIGGLE_THREADS";
/// Environment variable overriding the base seed.
pub const ENV_SEED: &str = "WIGGLE_SEED";
/// Environment variable overriding the output path.
pub const ENV_OUTPUT: &str = "WIGGLE_OUTPUT";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid process: {0}. Must be one of: dilepton, inclusive-jet")]
    InvalidProcess(String),

    #[error("Invalid thread count: {0}. Must be at least 1")]
    InvalidThreads(usize),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),

    #[error(transparent)]
    Engine(#[from] wiggle_mc::ConfigError),
}

/// Verbosity of the `wiggle` log on stderr
///
/// The engine reports each bin's start and result at `info`, per-stage
/// estimates and grid diagnostics at `debug`, and discarded non-finite
/// samples at `warn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Every sampler event, including per-iteration traces
    Trace,
    /// Warm-up and refine estimates of every bin
    Debug,
    /// Run summary and per-bin progress
    #[default]
    Info,
    /// Non-finite integrand values and failed bins only
    Warn,
    /// Fatal errors only
    Error,
}

impl LogLevel {
    const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.as_filter_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::InvalidLogLevel(s.to_string()))
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

/// Parses a numeric environment override, quoting the variable on failure.
fn parse_env<T: FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::EnvError(format!("{}={}", name, raw)))
}

/// Physics process driven by a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessKind {
    /// γγ → l⁺l⁻ in ultra-peripheral collisions
    #[default]
    Dilepton,
    /// Leading-order single inclusive jet production
    InclusiveJet,
}

impl FromStr for ProcessKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "dilepton" | "dijet" => Ok(ProcessKind::Dilepton),
            "inclusive-jet" | "incjet" | "jet" => Ok(ProcessKind::InclusiveJet),
            _ => Err(ConfigError::InvalidProcess(s.to_string())),
        }
    }
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessKind::Dilepton => write!(f, "dilepton"),
            ProcessKind::InclusiveJet => write!(f, "inclusive-jet"),
        }
    }
}

fn deserialize_from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

/// Calls and iterations of one sampler stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StageSettings {
    pub calls: usize,
    pub iterations: usize,
}

/// Sampler and dispatch settings (`[integration]` table)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IntegrationSettings {
    /// Grid-training stage
    pub warm_up: StageSettings,
    /// Measurement stage
    pub refine: StageSettings,
    /// Importance-grid bins per dimension
    pub grid_bins: usize,
    /// Grid damping exponent
    pub alpha: f64,
    /// Base seed; each bin mixes it with its index
    pub seed: u64,
    #[serde(deserialize_with = "deserialize_from_str")]
    pub non_finite: NonFinitePolicy,
    /// Worker threads, all cores when unset
    pub threads: Option<usize>,
    #[serde(deserialize_with = "deserialize_from_str")]
    pub dispatch: DispatchKind,
    #[serde(deserialize_with = "deserialize_from_str")]
    pub sampling: BinSampling,
}

impl Default for IntegrationSettings {
    fn default() -> Self {
        Self {
            warm_up: StageSettings {
                calls: 10_000,
                iterations: 10,
            },
            refine: StageSettings {
                calls: 100_000,
                iterations: 1,
            },
            grid_bins: DEFAULT_GRID_BINS,
            alpha: DEFAULT_ALPHA,
            seed: 0,
            non_finite: NonFinitePolicy::default(),
            threads: None,
            dispatch: DispatchKind::default(),
            sampling: BinSampling::default(),
        }
    }
}

impl IntegrationSettings {
    /// Builds the sampler configuration shared by every bin.
    pub fn vegas_config(&self) -> Result<VegasConfig, ConfigError> {
        let config = VegasConfig::builder()
            .warm_up(self.warm_up.calls, self.warm_up.iterations)
            .refine(self.refine.calls, self.refine.iterations)
            .grid_bins(self.grid_bins)
            .alpha(self.alpha)
            .non_finite(self.non_finite)
            .seed(self.seed)
            .build()?;
        Ok(config)
    }

    pub fn dispatch(&self) -> Dispatch {
        Dispatch::new(self.dispatch, self.threads)
    }

    /// Number of threads the run will occupy
    pub fn workers(&self) -> usize {
        match self.dispatch() {
            Dispatch::Sequential => 1,
            Dispatch::Parallel { threads } => threads.unwrap_or_else(num_cpus::get),
        }
    }
}

/// Result file settings (`[output]` table)
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Destination file; `results.<ext>` when unset
    pub path: Option<PathBuf>,
    #[serde(deserialize_with = "deserialize_from_str")]
    pub format: OutputFormat,
}

impl OutputSettings {
    /// Destination file with the format's default name filled in.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("results.{}", self.format.extension())))
    }
}

/// Complete description of one run
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    #[serde(deserialize_with = "deserialize_from_str")]
    pub log_level: LogLevel,
    #[serde(deserialize_with = "deserialize_from_str")]
    pub process: ProcessKind,
    pub integration: IntegrationSettings,
    pub dilepton: DileptonParameters,
    pub inclusive_jet: InclusiveJetParameters,
    pub output: OutputSettings,
}

impl RunConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Apply `WIGGLE_*` overrides looked up through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level.parse()?;
        }

        if let Some(raw) = lookup(ENV_THREADS) {
            self.integration.threads = Some(parse_env(ENV_THREADS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_SEED) {
            self.integration.seed = parse_env(ENV_SEED, &raw)?;
        }

        if let Some(output) = lookup(ENV_OUTPUT) {
            self.output.path = Some(PathBuf::from(output));
        }

        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) {
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        if let Some(process) = cli.process {
            self.process = process;
        }
        if let Some(mode) = cli.mode {
            self.dilepton.mode = mode;
        }
        if let Some(threads) = cli.threads {
            self.integration.threads = Some(threads);
        }
        if cli.sequential {
            self.integration.dispatch = DispatchKind::Sequential;
        }
        if let Some(seed) = cli.seed {
            self.integration.seed = seed;
        }
        if let Some(path) = &cli.output {
            self.output.path = Some(path.clone());
        }
        if let Some(format) = cli.format {
            self.output.format = format;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(threads) = self.integration.threads {
            if threads == 0 {
                return Err(ConfigError::InvalidThreads(threads));
            }
        }
        self.integration.vegas_config()?;
        match self.process {
            ProcessKind::Dilepton => self.dilepton.validate()?,
            ProcessKind::InclusiveJet => self.inclusive_jet.validate()?,
        }
        Ok(())
    }
}

/// Command-line overrides
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_file: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
    pub process: Option<ProcessKind>,
    pub mode: Option<ObservableMode>,
    pub threads: Option<usize>,
    pub sequential: bool,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<RunConfig, ConfigError> {
    let mut config = match &cli.config_file {
        Some(path) => RunConfig::from_file(path)?,
        None => RunConfig::default(),
    };

    config.apply_env(|key| std::env::var(key).ok())?;
    config.merge_with_cli(cli);

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use wiggle_core::physics::Lepton;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    // ========================================================================
    // Defaults and parsing
    // ========================================================================

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.process, ProcessKind::Dilepton);
        assert_eq!(config.integration.warm_up.calls, 10_000);
        assert_eq!(config.integration.refine.iterations, 1);
        assert_eq!(config.integration.dispatch, DispatchKind::Parallel);
        assert_eq!(config.output.resolved_path(), PathBuf::from("results.txt"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Warn").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str(" info ").unwrap(), LogLevel::Info);
        assert!(LogLevel::from_str("loud").is_err());
        for level in LogLevel::ALL {
            assert_eq!(level.to_string().parse::<LogLevel>().unwrap(), level);
        }
        assert_eq!(LogLevel::Error.to_string(), "error");
    }

    #[test]
    fn test_process_parsing() {
        assert_eq!(ProcessKind::from_str("dilepton").unwrap(), ProcessKind::Dilepton);
        assert_eq!(
            ProcessKind::from_str("inclusive_jet").unwrap(),
            ProcessKind::InclusiveJet
        );
        assert_eq!(ProcessKind::from_str("incjet").unwrap(), ProcessKind::InclusiveJet);
        assert!(ProcessKind::from_str("higgs").is_err());
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_str = r#"
            log_level = "debug"
            process = "dilepton"

            [integration]
            warm_up = { calls = 2000, iterations = 5 }
            refine = { calls = 20000, iterations = 1 }
            seed = 7
            threads = 4
            non_finite = "propagate"
            sampling = "average"

            [dilepton]
            collision_energy = 5020.0
            mode = "imbalance"
            lepton = "muon"
            imbalance = { min = 0.0, max = 0.1, bins = 5 }
            mass_cut = { enabled = true, min = 4.0, max = 45.0 }

            [output]
            path = "qt.json"
            format = "json"
        "#;

        let config = RunConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.integration.warm_up.iterations, 5);
        assert_eq!(config.integration.seed, 7);
        assert_eq!(config.integration.workers(), 4);
        assert_eq!(config.integration.non_finite, NonFinitePolicy::Propagate);
        assert_eq!(config.integration.sampling, BinSampling::Averaged);
        assert_eq!(config.dilepton.mode, ObservableMode::Imbalance);
        assert_eq!(config.dilepton.lepton, Lepton::Muon);
        assert_eq!(config.dilepton.imbalance.bins, 5);
        assert!(config.dilepton.mass_cut.enabled);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.resolved_path(), PathBuf::from("qt.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_deserialization() {
        let config = RunConfig::from_toml("process = \"inclusive-jet\"").unwrap();
        assert_eq!(config.process, ProcessKind::InclusiveJet);
        assert_eq!(config.integration, IntegrationSettings::default());
        assert_eq!(config.inclusive_jet, InclusiveJetParameters::default());
    }

    #[test]
    fn test_toml_rejects_unknown_values() {
        assert!(RunConfig::from_toml("process = \"higgs\"").is_err());
        assert!(RunConfig::from_toml("[dilepton]\nmode = 9").is_err());
        assert!(RunConfig::from_toml("[integration]\ndispatch = \"eager\"").is_err());
    }

    #[test]
    fn test_sample_file_parses() {
        let config = RunConfig::from_toml(include_str!("../../../wiggle.toml")).unwrap();
        assert!(config.validate().is_ok());
    }

    // ========================================================================
    // Overrides
    // ========================================================================

    #[test]
    fn test_env_overrides() {
        let mut config = RunConfig::default();
        config
            .apply_env(env(&[
                (ENV_LOG_LEVEL, "warn"),
                (ENV_THREADS, "3"),
                (ENV_SEED, "99"),
                (ENV_OUTPUT, "out.txt"),
            ]))
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.integration.threads, Some(3));
        assert_eq!(config.integration.seed, 99);
        assert_eq!(config.output.path, Some(PathBuf::from("out.txt")));
    }

    #[test]
    fn test_env_rejects_garbage() {
        let mut config = RunConfig::default();
        assert!(matches!(
            config.apply_env(env(&[(ENV_THREADS, "many")])),
            Err(ConfigError::EnvError(_))
        ));
        assert!(config.apply_env(env(&[(ENV_LOG_LEVEL, "loud")])).is_err());
    }

    #[test]
    fn test_cli_args_merge() {
        let mut config = RunConfig::default();
        config.apply_env(env(&[(ENV_SEED, "5")])).unwrap();

        let cli = CliArgs {
            mode: Some(ObservableMode::PairMomentum),
            seed: Some(11),
            sequential: true,
            threads: Some(8),
            format: Some(OutputFormat::Json),
            ..CliArgs::default()
        };
        config.merge_with_cli(&cli);

        assert_eq!(config.dilepton.mode, ObservableMode::PairMomentum);
        assert_eq!(config.integration.seed, 11);
        assert_eq!(config.integration.dispatch(), Dispatch::Sequential);
        assert_eq!(config.integration.workers(), 1);
        assert_eq!(config.output.resolved_path(), PathBuf::from("results.json"));
    }

    #[test]
    fn test_validate() {
        let mut config = RunConfig::default();
        config.integration.threads = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidThreads(0))));

        let mut config = RunConfig::default();
        config.integration.refine.calls = 1;
        assert!(matches!(config.validate(), Err(ConfigError::Engine(_))));

        let mut config = RunConfig::default();
        config.dilepton.collision_energy = -1.0;
        assert!(config.validate().is_err());

        // only the selected process is validated
        config.process = ProcessKind::InclusiveJet;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_build_config_missing_file() {
        let cli = CliArgs {
            config_file: Some(PathBuf::from("/nonexistent/wiggle.toml")),
            ..CliArgs::default()
        };
        assert!(matches!(build_config(&cli), Err(ConfigError::FileError(_))));
    }
}
