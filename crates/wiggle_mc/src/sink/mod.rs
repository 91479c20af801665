//! Result output destinations.
//!
//! A [`ResultSink`] receives the completed [`Histogram`] once, after every
//! bin has finished:
//! - [`ConsoleSink`]: human-readable table with a commented header
//! - [`TabularSink`]: headerless tab-separated `x  y  error` rows
//! - [`JsonSink`]: full report with per-bin diagnostics
//!
//! Failed bins appear in place with `nan` value and error.

mod console;
mod json;
mod tabular;

pub use console::ConsoleSink;
pub use json::{BinReport, HistogramReport, JsonSink};
pub use tabular::TabularSink;

use crate::pipeline::Histogram;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Histogram output destination.
pub trait ResultSink {
    /// Destination name for logs.
    fn name(&self) -> &str;

    /// Writes all rows of `histogram` in bin order.
    fn write(&mut self, histogram: &Histogram) -> Result<(), SinkError>;
}

/// Output failure.
#[derive(Debug, Error)]
pub enum SinkError {
    /// I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tab-separated writer failure.
    #[error("Tabular output error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialisation failure.
    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),
}

/// File format of the persisted histogram.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated rows.
    #[default]
    Tsv,
    /// JSON report.
    Json,
}

impl OutputFormat {
    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Tsv => "txt",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tsv => write!(f, "tsv"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tsv" | "txt" | "table" => Ok(Self::Tsv),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format '{}'. Valid values: tsv, json", s)),
        }
    }
}

/// Formats `value` as `d.dddddde±XX`, six fractional digits and at least
/// two exponent digits.
///
/// ```rust
/// use wiggle_mc::sink::format_scientific;
///
/// assert_eq!(format_scientific(1234.56), "1.234560e+03");
/// assert_eq!(format_scientific(-2.5e-12), "-2.500000e-12");
/// assert_eq!(format_scientific(f64::NAN), "nan");
/// ```
pub fn format_scientific(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let formatted = format!("{:.6e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_scientific() {
        assert_eq!(format_scientific(0.0), "0.000000e+00");
        assert_eq!(format_scientific(1.0), "1.000000e+00");
        assert_eq!(format_scientific(6.02214076e23), "6.022141e+23");
        assert_eq!(format_scientific(1.5e-300), "1.500000e-300");
        assert_eq!(format_scientific(f64::INFINITY), "inf");
        assert_eq!(format_scientific(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Tsv);
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.extension(), "json");
    }
}
