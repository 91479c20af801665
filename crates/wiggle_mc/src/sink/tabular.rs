//! Headerless tab-separated output.

use super::{format_scientific, ResultSink, SinkError};
use crate::pipeline::Histogram;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes one `x  y  error` row per bin, tab-separated, no header.
pub struct TabularSink<W: Write> {
    writer: csv::Writer<W>,
    name: String,
}

impl TabularSink<File> {
    /// Creates (or truncates) the file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        Ok(Self::with_name(file, path.display().to_string()))
    }
}

impl<W: Write> TabularSink<W> {
    /// Sink writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self::with_name(writer, "tabular".to_string())
    }

    fn with_name(writer: W, name: String) -> Self {
        let writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_writer(writer);
        Self { writer, name }
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer
            .into_inner()
            .map_err(|e| SinkError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))
    }
}

impl<W: Write> ResultSink for TabularSink<W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, histogram: &Histogram) -> Result<(), SinkError> {
        for row in histogram.rows() {
            self.writer.write_record([
                format_scientific(row.bin.midpoint),
                format_scientific(row.value()),
                format_scientific(row.error()),
            ])?;
        }
        self.writer.flush()?;
        info!(sink = %self.name, rows = histogram.rows().len(), "histogram written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bins::{BinDescriptor, BinResult, IntegrationOutcome};
    use std::time::Duration;

    fn histogram() -> Histogram {
        let rows = (0..3)
            .map(|i| BinResult {
                bin: BinDescriptor::new(i, i as f64, i as f64 + 1.0),
                outcome: Ok(IntegrationOutcome {
                    value: 10.0 * i as f64,
                    error: 0.25,
                    chi_squared_per_dof: 1.0,
                    calls: 100,
                    non_finite: 0,
                }),
            })
            .collect();
        Histogram::new("test", rows, Duration::ZERO)
    }

    #[test]
    fn test_rows_in_order() {
        let mut sink = TabularSink::new(Vec::new());
        sink.write(&histogram()).unwrap();
        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "5.000000e-01\t0.000000e+00\t2.500000e-01");
        assert_eq!(lines[2], "2.500000e+00\t2.000000e+01\t2.500000e-01");
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join("wiggle_tabular_test.txt");
        {
            let mut sink = TabularSink::create(&path).unwrap();
            sink.write(&histogram()).unwrap();
        }
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_path(&path)
            .unwrap();
        let records: Vec<_> = reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].get(1), Some("1.000000e+01"));
        std::fs::remove_file(path).ok();
    }
}
