//! Human-readable table output.

use super::{format_scientific, ResultSink, SinkError};
use crate::pipeline::Histogram;
use std::io::{self, Write};

const RULE: &str = "----------------------------------------";
const HEADER: &str = "#   x    \t    y    \t   error  ";

/// Writes the histogram as a commented table followed by the run time.
pub struct ConsoleSink<W: Write> {
    writer: W,
}

impl ConsoleSink<io::Stdout> {
    /// Sink writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    /// Sink writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for ConsoleSink<W> {
    fn name(&self) -> &str {
        "console"
    }

    fn write(&mut self, histogram: &Histogram) -> Result<(), SinkError> {
        writeln!(self.writer, "{}", RULE)?;
        writeln!(self.writer, "{}", HEADER)?;
        for row in histogram.rows() {
            writeln!(
                self.writer,
                "{}\t{}\t{}",
                format_scientific(row.bin.midpoint),
                format_scientific(row.value()),
                format_scientific(row.error())
            )?;
        }
        writeln!(self.writer, "{}", RULE)?;
        if histogram.failed_bins() > 0 {
            writeln!(self.writer, "Failed bins: {}", histogram.failed_bins())?;
        }
        writeln!(
            self.writer,
            "Elapsed time: {:.3} seconds",
            histogram.elapsed().as_secs_f64()
        )?;
        writeln!(self.writer, "{}", RULE)?;
        self.writer.flush()?;
        Ok(())
    }
}
