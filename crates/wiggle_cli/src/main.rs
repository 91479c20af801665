//! Wiggle CLI - binned cross sections from the command line
//!
//! This is the operational entry point for the Wiggle Monte Carlo engine.
//!
//! # Commands
//!
//! - `wiggle run` - Integrate every histogram bin and write the results
//! - `wiggle check` - Validate the configuration and print the run layout
//! - `wiggle inspect <POINT>...` - Evaluate the integrand at a single point
//!
//! # Configuration
//!
//! Settings are read from a TOML file (`-c`), then overridden by `WIGGLE_*`
//! environment variables and finally by command-line flags.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wiggle_mc::sink::OutputFormat;
use wiggle_mc::ObservableMode;

mod commands;
mod config;
mod error;

use config::{build_config, CliArgs, LogLevel, ProcessKind};
pub use error::{CliError, Result};

/// Binned cross sections via two-stage adaptive Monte Carlo
#[derive(Parser)]
#[command(name = "wiggle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE", env = "WIGGLE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Process (dilepton, inclusive-jet)
    #[arg(short, long, global = true)]
    process: Option<ProcessKind>,

    /// Differential observable of the dilepton process
    #[arg(short, long, global = true)]
    mode: Option<ObservableMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Integrate every bin and write the histogram
    Run {
        /// Worker threads for parallel dispatch
        #[arg(short, long)]
        threads: Option<usize>,

        /// Run bins one after another on the main thread
        #[arg(long)]
        sequential: bool,

        /// Base seed; each bin mixes it with its index
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output file
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Validate the configuration and print the run layout
    Check,

    /// Evaluate the integrand at one point
    Inspect {
        /// Histogram bin providing the fixed observable value
        #[arg(short, long, default_value_t = 0)]
        bin: usize,

        /// Interpret the point as unit-hypercube coordinates
        #[arg(short, long)]
        unit: bool,

        /// Coordinates, one per integration dimension
        #[arg(required = true, allow_negative_numbers = true)]
        point: Vec<f64>,
    },
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn execute(cli: Cli) -> Result<()> {
    let mut args = CliArgs {
        config_file: cli.config,
        log_level: cli.log_level,
        process: cli.process,
        mode: cli.mode,
        ..CliArgs::default()
    };
    if let Commands::Run {
        threads,
        sequential,
        seed,
        output,
        format,
    } = &cli.command
    {
        args.threads = *threads;
        args.sequential = *sequential;
        args.seed = *seed;
        args.output = output.clone();
        args.format = *format;
    }

    let config = build_config(&args)?;
    init_tracing(config.log_level.as_filter_str());
    info!(
        process = %config.process,
        log_level = %config.log_level,
        "Wiggle v{}",
        env!("CARGO_PKG_VERSION")
    );

    match cli.command {
        Commands::Run { .. } => commands::run::run(&config),
        Commands::Check => commands::check::run(&config),
        Commands::Inspect { bin, unit, point } => commands::inspect::run(&config, bin, &point, unit),
    }
}

fn main() -> ExitCode {
    match execute(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
