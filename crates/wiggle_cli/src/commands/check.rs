//! Check command implementation
//!
//! Resolves the run exactly as `run` would and prints the summary, the
//! integration coordinates and the bin table without sampling anything.

use std::io::{self, Write};
use wiggle_core::physics::ToyPartonDistribution;
use wiggle_mc::bins::BinDescriptor;
use wiggle_mc::domain::IntegrationDomain;
use wiggle_mc::process::{DileptonProcess, InclusiveJetProcess, Process};
use wiggle_mc::sink::format_scientific;

use crate::config::{ProcessKind, RunConfig};
use crate::Result;

const RULE: &str = "----------------------------------------";
const JET_COORDINATES: [&str; 3] = ["x_a", "y_c", "pT [GeV]"];

/// Run the check command
pub fn run(config: &RunConfig) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, config)?;
    out.flush()?;
    Ok(())
}

/// Write the resolved run layout to `out`.
pub fn write_report<W: Write>(out: &mut W, config: &RunConfig) -> Result<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Process:          {}", config.process)?;

    let (labels, domain, bins): (Vec<&str>, IntegrationDomain, Vec<BinDescriptor>) =
        match config.process {
            ProcessKind::Dilepton => {
                let p = &config.dilepton;
                let process = DileptonProcess::new(p.clone(), config.integration.sampling)?;
                let layout = process.layout();

                writeln!(out, "Collision energy: {} GeV", p.collision_energy)?;
                writeln!(out, "Mode:             {} (code {})", p.mode, p.mode.code())?;
                writeln!(out, "kT range:         [{}, {}] GeV", p.kt.min, p.kt.max)?;
                writeln!(out, "Rapidity range:   [{}, {}]", p.rapidity.min, p.rapidity.max)?;
                if let Some(r) = p.sudakov.window() {
                    writeln!(out, "Sudakov lT:       [{}, {}] GeV", r.min, r.max)?;
                }
                if let Some(r) = p.mass_cut.window() {
                    writeln!(out, "Mass window:      ({}, {}) GeV", r.min, r.max)?;
                }
                if let Some(r) = p.asymmetry_cut.window() {
                    writeln!(out, "Aj window:        [{}, {}]", r.min, r.max)?;
                }
                if p.anisotropic {
                    writeln!(out, "Including anisotropic contribution")?;
                }
                writeln!(out, "Lepton type:      {}", p.lepton)?;

                let labels = layout
                    .coordinates()
                    .iter()
                    .map(|c| c.variable.label())
                    .collect();
                (labels, layout.base_domain().clone(), process.histogram())
            }
            ProcessKind::InclusiveJet => {
                let p = &config.inclusive_jet;
                let process =
                    InclusiveJetProcess::new(p.clone(), ToyPartonDistribution::default())?;

                writeln!(out, "Collision energy: {} GeV", p.collision_energy)?;
                writeln!(out, "Rapidity range:   [{}, {}]", p.rapidity.min, p.rapidity.max)?;
                writeln!(
                    out,
                    "Jets:             quark {}, gluon {}",
                    p.quark_jets, p.gluon_jets
                )?;
                writeln!(out, "Scale factor:     {}", p.scale_factor)?;

                let bins = process.histogram();
                let domain = match bins.first() {
                    Some(bin) => process.domain(bin)?,
                    None => IntegrationDomain::unit(process.dimensions()),
                };
                (JET_COORDINATES.to_vec(), domain, bins)
            }
        };

    let integration = &config.integration;
    writeln!(
        out,
        "Warm-up:          {} calls for {} iterations",
        integration.warm_up.calls, integration.warm_up.iterations
    )?;
    writeln!(
        out,
        "Refine:           {} calls for {} iterations",
        integration.refine.calls, integration.refine.iterations
    )?;
    writeln!(
        out,
        "Dispatch:         {} with {} worker(s)",
        integration.dispatch,
        integration.workers()
    )?;
    writeln!(out, "Bin sampling:     {}", integration.sampling)?;
    writeln!(out, "Output:           {}", config.output.resolved_path().display())?;

    writeln!(out, "{}", RULE)?;
    writeln!(out, "Integration coordinates ({}):", labels.len())?;
    for (i, label) in labels.iter().enumerate() {
        let (lower, upper) = domain.bounds(i);
        writeln!(
            out,
            "{:>4}  {:<20}\t{}\t{}",
            i,
            label,
            format_scientific(lower),
            format_scientific(upper)
        )?;
    }

    writeln!(out, "{}", RULE)?;
    writeln!(out, "Bins ({}):", bins.len())?;
    for bin in &bins {
        writeln!(
            out,
            "{:>4}  {}\t{}\t{}",
            bin.index,
            format_scientific(bin.lower),
            format_scientific(bin.upper),
            format_scientific(bin.midpoint)
        )?;
    }
    writeln!(out, "{}", RULE)?;
    Ok(())
}
