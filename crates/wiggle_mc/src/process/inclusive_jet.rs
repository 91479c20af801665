//! Leading-order single inclusive jet production in pp collisions.
//!
//! Partons `a(x_a) + b(x_b) → c(p_T, y_c) + d`; only jet `c` is measured,
//! so only its rapidity is restricted. Sampled coordinates are
//! `(x_a, y_c, p_T)` with `p_T` integrated over each histogram bin; the
//! reported value is `dσ/dp_T dy` in nb/GeV averaged over the bin.
//!
//! Every 2 → 2 channel is split into its quark-jet and gluon-jet parts
//! according to the flavour of the measured parton, which lets a run keep
//! only quark or only gluon jets.

use super::Process;
use crate::bins::BinDescriptor;
use crate::domain::IntegrationDomain;
use crate::error::ConfigError;
use crate::params::InclusiveJetParameters;
use std::f64::consts::PI;
use wiggle_core::physics::constants::GEV2_TO_NANOBARN;
use wiggle_core::physics::pdf::MAX_FLAVOUR;
use wiggle_core::physics::{PartonDistribution, ToyPartonDistribution};

const CF: f64 = 4.0 / 3.0;
const CA: f64 = 3.0;
const NF: usize = MAX_FLAVOUR as usize;

#[inline]
fn amp_a(n1: f64, n2: f64, d: f64) -> f64 {
    CF / CA * (n1 * n1 + n2 * n2) / (d * d)
}

#[inline]
fn amp_b(n: f64, d1: f64, d2: f64) -> f64 {
    amp_a(n, d1, d2) + amp_a(n, d2, d1) - 2.0 * CF / (CA * CA) * (n * n) / (d1 * d2)
}

#[inline]
fn amp_c(n1: f64, n2: f64, d: f64) -> f64 {
    CF * CF / (CA * CA) * (n1 * n1 + n2 * n2) / (n1 * n2) - amp_a(n1, n2, d)
}

#[inline]
fn amp_d(n1: f64, n2: f64, n3: f64) -> f64 {
    2.0 * CA / CF * (CA - n1 * n2 / (n3 * n3) - n1 * n3 / (n2 * n2) - n2 * n3 / (n1 * n1))
}

/// Densities of `b̄ … g … b` at one `(x, μ)`, indexed by `flavour + 5`.
struct Densities([f64; 2 * NF + 1]);

impl Densities {
    fn new<D: PartonDistribution>(pdf: &D, x: f64, scale: f64) -> Self {
        let mut f = [0.0; 2 * NF + 1];
        for (slot, flavour) in f.iter_mut().zip(-MAX_FLAVOUR..=MAX_FLAVOUR) {
            *slot = pdf.parton_density(flavour, x, scale);
        }
        Self(f)
    }

    #[inline]
    fn gluon(&self) -> f64 {
        self.0[NF]
    }

    #[inline]
    fn quark(&self, i: usize) -> f64 {
        self.0[NF + i]
    }

    #[inline]
    fn antiquark(&self, i: usize) -> f64 {
        self.0[NF - i]
    }
}

/// Squared matrix elements summed over channels, split by the measured
/// parton.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct JetChannels {
    quark: f64,
    gluon: f64,
}

fn channels(a: &Densities, b: &Densities, s: f64, t: f64, u: f64) -> JetChannels {
    let mut quark = 0.0;
    let mut gluon = 0.0;
    let flavours = 1..=NF;

    // q q' → q q'
    let mut dis = 0.0;
    for i in flavours.clone() {
        for j in flavours.clone().filter(|&j| j != i) {
            dis += (a.quark(i) + a.antiquark(i)) * (b.quark(j) + b.antiquark(j));
        }
    }
    quark += dis * (amp_a(s, u, t) + amp_a(s, t, u));

    // q q̄ pairs of one flavour
    let annihilation: f64 = flavours
        .clone()
        .map(|i| a.quark(i) * b.antiquark(i) + a.antiquark(i) * b.quark(i))
        .sum();

    // q q̄ → q' q̄'
    let dis = annihilation * (NF - 1) as f64;
    quark += dis * (amp_a(t, u, s) + amp_a(u, t, s));

    // q q → q q
    let dis: f64 = 0.5
        * flavours
            .clone()
            .map(|i| a.quark(i) * b.quark(i) + a.antiquark(i) * b.antiquark(i))
            .sum::<f64>();
    quark += dis * (amp_b(s, t, u) + amp_b(s, u, t));

    // q q̄ → q q̄
    quark += annihilation * (amp_b(u, s, t) + amp_b(t, s, u));

    // q q̄ → g g
    gluon += 0.5 * annihilation * 6.0 * (amp_c(t, u, s) + amp_c(u, t, s));

    // g g → q q̄
    let dis = a.gluon() * b.gluon() * NF as f64;
    quark += dis * (27.0 / 32.0) * (amp_c(t, u, s) + amp_c(u, t, s));

    // g q → g q
    let dis: f64 = flavours
        .clone()
        .map(|i| a.gluon() * (b.quark(i) + b.antiquark(i)))
        .sum();
    gluon += dis * (-9.0 / 4.0) * amp_c(s, u, t);
    quark += dis * (-9.0 / 4.0) * amp_c(s, t, u);

    // q g → q g
    let dis: f64 = flavours
        .map(|i| (a.quark(i) + a.antiquark(i)) * b.gluon())
        .sum();
    quark += dis * (-9.0 / 4.0) * amp_c(s, u, t);
    gluon += dis * (-9.0 / 4.0) * amp_c(s, t, u);

    // g g → g g
    let dis = 0.5 * a.gluon() * b.gluon();
    gluon += dis * (amp_d(s, t, u) + amp_d(s, u, t));

    JetChannels { quark, gluon }
}

/// Single inclusive jet process over a parton distribution `D`.
///
/// # Examples
///
/// ```rust
/// use wiggle_core::physics::ToyPartonDistribution;
/// use wiggle_mc::params::InclusiveJetParameters;
/// use wiggle_mc::process::{InclusiveJetProcess, Process};
///
/// let process = InclusiveJetProcess::new(
///     InclusiveJetParameters::default(),
///     ToyPartonDistribution::default(),
/// )
/// .unwrap();
/// assert_eq!(process.dimensions(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct InclusiveJetProcess<D: PartonDistribution = ToyPartonDistribution> {
    params: InclusiveJetParameters,
    pdf: D,
}

impl<D: PartonDistribution> InclusiveJetProcess<D> {
    /// Validates `params` and binds the parton distribution.
    pub fn new(params: InclusiveJetParameters, pdf: D) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self { params, pdf })
    }

    /// Run parameters.
    #[inline]
    pub fn parameters(&self) -> &InclusiveJetParameters {
        &self.params
    }

    /// `dσ/dp_T dy` integrand at `(x_a, y_c, p_T)`, before bin averaging.
    pub fn differential(&self, xa: f64, yc: f64, pt: f64) -> f64 {
        let sqrt_s = self.params.collision_energy;
        let xt = 2.0 * pt / sqrt_s;
        let xa_min = xt * yc.exp() / (2.0 - xt * (-yc).exp());
        if !(xa >= xa_min && xa <= 1.0) {
            return 0.0;
        }
        let denominator = 2.0 * xa - xt * yc.exp();
        let xb = xa * xt * (-yc).exp() / denominator;
        if !(0.0..=1.0).contains(&xb) {
            return 0.0;
        }

        let s = xa * xb * sqrt_s * sqrt_s;
        let t = -xa * pt * sqrt_s * (-yc).exp();
        let u = -xb * pt * sqrt_s * yc.exp();

        let scale = pt * self.params.scale_factor;
        let alpha_s = self.pdf.alpha_s(scale);
        let a = Densities::new(&self.pdf, xa, scale);
        let b = Densities::new(&self.pdf, xb, scale);

        let jets = channels(&a, &b, s, t, u);
        let amplitude = if self.params.quark_jets { jets.quark } else { 0.0 }
            + if self.params.gluon_jets { jets.gluon } else { 0.0 };

        let dsigma_dt = PI * alpha_s * alpha_s / (s * s);
        let pre_factor = 2.0 / PI * xa * xb / denominator;
        let jacobian = 2.0 * PI * pt;
        let per_rapidity = 1.0 / self.params.rapidity.width();

        jacobian * pre_factor * dsigma_dt * amplitude * per_rapidity * GEV2_TO_NANOBARN
    }
}

impl<D: PartonDistribution> Process for InclusiveJetProcess<D> {
    type Snapshot = ();

    fn name(&self) -> &'static str {
        "inclusive-jet"
    }

    fn dimensions(&self) -> usize {
        3
    }

    fn histogram(&self) -> Vec<BinDescriptor> {
        self.params.histogram()
    }

    fn snapshot(&self, _bin: &BinDescriptor) {}

    fn domain(&self, bin: &BinDescriptor) -> Result<IntegrationDomain, ConfigError> {
        let rapidity = self.params.rapidity;
        IntegrationDomain::new(vec![
            (0.0, 1.0),
            (rapidity.min, rapidity.max),
            (bin.lower, bin.upper),
        ])
    }

    #[inline]
    fn evaluate(&self, point: &[f64], _snapshot: &()) -> f64 {
        self.differential(point[0], point[1], point[2])
    }

    fn normalisation(&self, bin: &BinDescriptor) -> f64 {
        1.0 / bin.width()
    }
}
