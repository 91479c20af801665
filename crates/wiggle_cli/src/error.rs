//! CLI error types

use thiserror::Error;
use wiggle_mc::pipeline::PipelineError;
use wiggle_mc::sink::SinkError;

/// Errors surfaced by the `wiggle` binary
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Configuration error: {0}")]
    Engine(#[from] wiggle_mc::ConfigError),

    #[error("Run failed: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Output error: {0}")]
    Sink(#[from] SinkError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{failed} of {total} bins failed")]
    FailedBins { failed: usize, total: usize },
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
