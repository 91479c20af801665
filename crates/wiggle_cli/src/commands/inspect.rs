//! Inspect command implementation
//!
//! Evaluates the integrand of one bin at a single point and prints the
//! reconstructed kinematics, the veto that fired or the weight.

use std::io::{self, Write};
use wiggle_core::physics::ToyPartonDistribution;
use wiggle_mc::bins::BinDescriptor;
use wiggle_mc::domain::IntegrationDomain;
use wiggle_mc::process::{DileptonProcess, InclusiveJetProcess, Process};
use wiggle_mc::sink::format_scientific;

use crate::config::{ProcessKind, RunConfig};
use crate::{CliError, Result};

/// Run the inspect command
pub fn run(config: &RunConfig, bin: usize, point: &[f64], unit: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_inspection(&mut out, config, bin, point, unit)?;
    out.flush()?;
    Ok(())
}

/// Evaluate `point` in bin `bin` and write the diagnostics to `out`.
///
/// With `unit` set the point is mapped from the unit hypercube onto the
/// bin's integration domain first.
pub fn write_inspection<W: Write>(
    out: &mut W,
    config: &RunConfig,
    bin: usize,
    point: &[f64],
    unit: bool,
) -> Result<()> {
    match config.process {
        ProcessKind::Dilepton => {
            let process =
                DileptonProcess::new(config.dilepton.clone(), config.integration.sampling)?;
            let bins = process.histogram();
            let descriptor = select_bin(&bins, bin)?;
            let physical = resolve_point(&process.domain(descriptor)?, point, unit)?;

            write_bin(out, descriptor)?;
            for (coordinate, value) in process.layout().coordinates().iter().zip(&physical) {
                write_value(out, coordinate.variable.label(), *value)?;
            }

            let snapshot = process.snapshot(descriptor);
            let inspection = process.inspect(&physical, &snapshot);
            match &inspection.phase_space {
                Err(veto) => writeln!(out, "Vetoed: {}", veto)?,
                Ok(ps) => {
                    write_value(out, "x1", ps.x1)?;
                    write_value(out, "x2", ps.x2)?;
                    write_value(out, "s_hat [GeV^2]", ps.s_hat)?;
                    write_value(out, "t_hat [GeV^2]", ps.t_hat)?;
                    write_value(out, "u_hat [GeV^2]", ps.u_hat)?;
                    write_value(out, "M [GeV]", ps.mass)?;
                    write_value(out, "|p1| [GeV]", ps.p1.magnitude())?;
                    write_value(out, "|p2| [GeV]", ps.p2.magnitude())?;
                    write_value(out, "Aj", ps.asymmetry())?;
                }
            }
            write_value(out, "weight", inspection.weight)?;
        }
        ProcessKind::InclusiveJet => {
            let process = InclusiveJetProcess::new(
                config.inclusive_jet.clone(),
                ToyPartonDistribution::default(),
            )?;
            let bins = process.histogram();
            let descriptor = select_bin(&bins, bin)?;
            let physical = resolve_point(&process.domain(descriptor)?, point, unit)?;

            write_bin(out, descriptor)?;
            for (label, value) in ["x_a", "y_c", "pT [GeV]"].iter().zip(&physical) {
                write_value(out, label, *value)?;
            }
            write_value(out, "weight", process.evaluate(&physical, &()))?;
        }
    }
    Ok(())
}

fn select_bin(bins: &[BinDescriptor], index: usize) -> Result<&BinDescriptor> {
    bins.get(index).ok_or_else(|| {
        CliError::InvalidArgument(format!(
            "bin {} out of range, histogram has {} bin(s)",
            index,
            bins.len()
        ))
    })
}

fn resolve_point(domain: &IntegrationDomain, point: &[f64], unit: bool) -> Result<Vec<f64>> {
    if point.len() != domain.dimensions() {
        return Err(CliError::InvalidArgument(format!(
            "expected {} coordinates, got {}",
            domain.dimensions(),
            point.len()
        )));
    }
    if !unit {
        return Ok(point.to_vec());
    }
    if let Some(u) = point.iter().find(|u| !(0.0..=1.0).contains(*u)) {
        return Err(CliError::InvalidArgument(format!(
            "unit coordinate {} outside [0, 1]",
            u
        )));
    }
    Ok(domain.from_unit(point))
}

fn write_bin<W: Write>(out: &mut W, bin: &BinDescriptor) -> io::Result<()> {
    writeln!(
        out,
        "Bin {}: [{}, {}], midpoint {}",
        bin.index,
        format_scientific(bin.lower),
        format_scientific(bin.upper),
        format_scientific(bin.midpoint)
    )
}

fn write_value<W: Write>(out: &mut W, label: &str, value: f64) -> io::Result<()> {
    writeln!(out, "{:<20}{}", label, format_scientific(value))
}
