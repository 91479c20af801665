//! JSON report output.

use super::{ResultSink, SinkError};
use crate::bins::BinResult;
use crate::pipeline::Histogram;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// One bin of a [`HistogramReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinReport {
    /// Bin index.
    pub index: usize,
    /// Left edge.
    pub lower: f64,
    /// Right edge.
    pub upper: f64,
    /// Representative value.
    pub midpoint: f64,
    /// Estimate, absent for failed bins.
    pub value: Option<f64>,
    /// Error estimate, absent for failed bins.
    pub error: Option<f64>,
    /// χ²/dof of the refine stage.
    pub chi_squared_per_dof: Option<f64>,
    /// Non-finite samples over both stages.
    pub non_finite: Option<usize>,
    /// Failure description.
    pub failure: Option<String>,
}

impl From<&BinResult> for BinReport {
    fn from(row: &BinResult) -> Self {
        let ok = row.outcome.as_ref().ok();
        Self {
            index: row.bin.index,
            lower: row.bin.lower,
            upper: row.bin.upper,
            midpoint: row.bin.midpoint,
            value: ok.map(|o| o.value),
            error: ok.map(|o| o.error),
            chi_squared_per_dof: ok.map(|o| o.chi_squared_per_dof),
            non_finite: ok.map(|o| o.non_finite),
            failure: row.outcome.as_ref().err().map(|e| e.to_string()),
        }
    }
}

/// Serialisable form of a [`Histogram`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramReport {
    /// Producing process.
    pub process: String,
    /// RFC 3339 timestamp.
    pub generated_at: String,
    /// Wall-clock run time in seconds.
    pub elapsed_seconds: f64,
    /// Number of failed bins.
    pub failed_bins: usize,
    /// Bins in order.
    pub bins: Vec<BinReport>,
}

impl From<&Histogram> for HistogramReport {
    fn from(histogram: &Histogram) -> Self {
        Self {
            process: histogram.process().to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            elapsed_seconds: histogram.elapsed().as_secs_f64(),
            failed_bins: histogram.failed_bins(),
            bins: histogram.rows().iter().map(BinReport::from).collect(),
        }
    }
}

/// Writes a pretty-printed [`HistogramReport`].
pub struct JsonSink<W: Write> {
    writer: W,
    name: String,
}

impl JsonSink<BufWriter<File>> {
    /// Creates (or truncates) the file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            name: path.display().to_string(),
        })
    }
}

impl<W: Write> JsonSink<W> {
    /// Sink writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            name: "json".to_string(),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for JsonSink<W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, histogram: &Histogram) -> Result<(), SinkError> {
        let report = HistogramReport::from(histogram);
        serde_json::to_writer_pretty(&mut self.writer, &report)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        info!(sink = %self.name, bins = report.bins.len(), "report written");
        Ok(())
    }
}
