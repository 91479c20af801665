//! Parton distribution functions and the strong coupling.
//!
//! This module provides:
//! - [`PartonDistribution`]: lookup interface used by hadronic integrands
//! - [`ToyPartonDistribution`]: the Les Houches benchmark parameterisation
//!   with one-loop α_s running
//!
//! ## Flavour Convention
//!
//! | flavour | −5 | −4 | −3 | −2 | −1 | 0 | 1 | 2 | 3 | 4 | 5 |
//! |---------|----|----|----|----|----|---|---|---|---|---|---|
//! | parton  | b̄ | c̄ | s̄ | d̄ | ū | g | u | d | s | c | b |
//!
//! `parton_density` returns the number density `f(x, μ)`, not `x f`.

use std::f64::consts::PI;

/// Highest quark flavour index.
pub const MAX_FLAVOUR: i32 = 5;

/// Parton densities and strong coupling at a given scale.
///
/// Implementations must be shareable across worker threads; every bin of a
/// run reads the same instance.
pub trait PartonDistribution: Send + Sync {
    /// Number density of `flavour` at momentum fraction `x` and scale `scale`
    /// (GeV). Returns `0.0` outside `0 < x < 1` or for unknown flavours.
    fn parton_density(&self, flavour: i32, x: f64, scale: f64) -> f64;

    /// Strong coupling α_s at `scale` (GeV).
    fn alpha_s(&self, scale: f64) -> f64;
}

/// Les Houches toy parton densities (no DGLAP evolution) with one-loop α_s.
///
/// The densities are the benchmark input distributions at `Q₀ = √2 GeV`:
///
/// ```text
/// x u_v = 5.1072 x^0.8 (1 − x)³      x d_v = 3.06432 x^0.8 (1 − x)⁴
/// x g   = 1.7 x^−0.1 (1 − x)⁵        x d̄   = 0.1939875 x^−0.1 (1 − x)⁶
/// x ū   = (1 − x) x d̄                x s = x s̄ = 0.2 x (ū + d̄)
/// ```
///
/// Charm and bottom vanish. The scale argument only affects α_s.
///
/// # Examples
///
/// ```rust
/// use wiggle_core::physics::{PartonDistribution, ToyPartonDistribution};
///
/// let pdf = ToyPartonDistribution::default();
/// assert!(pdf.parton_density(0, 0.1, 100.0) > pdf.parton_density(1, 0.1, 100.0));
/// assert!(pdf.alpha_s(91.1876) > 0.1 && pdf.alpha_s(91.1876) < 0.15);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToyPartonDistribution {
    lambda_qcd: f64,
    active_flavours: u32,
    freeze_scale: f64,
}

impl Default for ToyPartonDistribution {
    fn default() -> Self {
        Self {
            lambda_qcd: 0.226,
            active_flavours: 5,
            freeze_scale: 1.0,
        }
    }
}

impl ToyPartonDistribution {
    /// Creates a toy distribution with a custom Λ_QCD (GeV).
    ///
    /// Below `freeze_scale` the coupling is held at its value at
    /// `freeze_scale`.
    pub fn new(lambda_qcd: f64, active_flavours: u32, freeze_scale: f64) -> Self {
        Self {
            lambda_qcd,
            active_flavours,
            freeze_scale: freeze_scale.max(lambda_qcd * 1.5),
        }
    }

    fn x_valence_up(x: f64) -> f64 {
        5.107_2 * x.powf(0.8) * (1.0 - x).powi(3)
    }

    fn x_valence_down(x: f64) -> f64 {
        3.064_32 * x.powf(0.8) * (1.0 - x).powi(4)
    }

    fn x_gluon(x: f64) -> f64 {
        1.7 * x.powf(-0.1) * (1.0 - x).powi(5)
    }

    fn x_anti_down(x: f64) -> f64 {
        0.193_987_5 * x.powf(-0.1) * (1.0 - x).powi(6)
    }

    fn x_anti_up(x: f64) -> f64 {
        (1.0 - x) * Self::x_anti_down(x)
    }

    fn x_strange(x: f64) -> f64 {
        0.2 * (Self::x_anti_up(x) + Self::x_anti_down(x))
    }

    /// Momentum density `x f(x)` for `flavour`.
    pub fn momentum_density(&self, flavour: i32, x: f64) -> f64 {
        if !(x > 0.0 && x < 1.0) {
            return 0.0;
        }
        match flavour {
            0 => Self::x_gluon(x),
            1 => Self::x_valence_up(x) + Self::x_anti_up(x),
            2 => Self::x_valence_down(x) + Self::x_anti_down(x),
            -1 => Self::x_anti_up(x),
            -2 => Self::x_anti_down(x),
            3 | -3 => Self::x_strange(x),
            _ => 0.0,
        }
    }
}

impl PartonDistribution for ToyPartonDistribution {
    fn parton_density(&self, flavour: i32, x: f64, _scale: f64) -> f64 {
        if flavour.abs() > MAX_FLAVOUR {
            return 0.0;
        }
        let xf = self.momentum_density(flavour, x);
        if xf == 0.0 {
            0.0
        } else {
            xf / x
        }
    }

    fn alpha_s(&self, scale: f64) -> f64 {
        let mu = scale.max(self.freeze_scale);
        let beta0 = 33.0 - 2.0 * self.active_flavours as f64;
        let log = (mu * mu / (self.lambda_qcd * self.lambda_qcd)).ln();
        12.0 * PI / (beta0 * log)
    }
}
