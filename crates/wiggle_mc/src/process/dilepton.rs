//! γγ → l⁺l⁻ in ultra-peripheral heavy-ion collisions.
//!
//! Each nucleus emits two photons, one per amplitude: k₁ and k_a from the
//! first nucleus, k₂ and k_b from the second. The lepton pair is described
//! by its average momentum P_T and imbalance q_T, so that
//!
//! ```text
//! p₁ = q_T/2 + P_T,   p₂ = q_T/2 − P_T,
//! k₂ = q_T − l_T − k₁,   k_b = q_T − l_T − k_a
//! ```
//!
//! where l_T is the soft-radiation momentum (zero unless the Sudakov
//! sub-integration is enabled). The weight combines the two photon fluxes,
//! the Born-level γγ → l⁺l⁻ matrix element with its optional cos 4φ
//! modulation and the impact-parameter kernel `b/2π · J₀(b |k₁ − k_a|)`.
//!
//! Configurations with a momentum fraction outside `(0, 1)`, or failing an
//! enabled cut, contribute exactly zero.

use super::Process;
use crate::bins::{BinDescriptor, BinSampling};
use crate::domain::IntegrationDomain;
use crate::error::ConfigError;
use crate::modes::{ModeLayout, ObservableMode, Variable};
use crate::params::{DileptonParameters, FixedObservable, ParameterSnapshot};
use std::f64::consts::PI;
use std::fmt;
use wiggle_core::kinematics::KinematicVector;
use wiggle_core::math::bessel_j0;
use wiggle_core::physics::constants::{ALPHA_EM, PROTON_MASS_SQ};
use wiggle_core::physics::Nucleus;

/// Reason a sample point contributes zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Veto {
    /// x₁ or x₂ outside `(0, 1)`.
    MomentumFraction,
    /// Pair mass outside the enabled window.
    MassWindow,
    /// Pair mass at or below twice the lepton mass.
    LeptonThreshold,
    /// Momentum asymmetry outside the enabled window.
    Asymmetry,
}

impl fmt::Display for Veto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::MomentumFraction => "momentum fraction outside (0, 1)",
            Self::MassWindow => "pair mass outside window",
            Self::LeptonThreshold => "pair mass below lepton threshold",
            Self::Asymmetry => "asymmetry outside window",
        };
        f.write_str(reason)
    }
}

/// Kinematics of one accepted sample point.
#[derive(Clone, Debug)]
pub struct PhaseSpacePoint {
    /// First photon, first nucleus.
    pub k1: KinematicVector,
    /// First photon, first nucleus, conjugate amplitude.
    pub ka: KinematicVector,
    /// Pair average momentum.
    pub pair: KinematicVector,
    /// Pair momentum imbalance.
    pub imbalance: KinematicVector,
    /// Soft-radiation momentum.
    pub resolution: KinematicVector,
    /// First lepton momentum.
    pub p1: KinematicVector,
    /// Second lepton momentum.
    pub p2: KinematicVector,
    /// First lepton rapidity.
    pub rapidity1: f64,
    /// Second lepton rapidity.
    pub rapidity2: f64,
    /// Impact parameter in GeV⁻¹.
    pub impact_parameter: f64,
    /// Momentum fraction carried by photons of the first nucleus.
    pub x1: f64,
    /// Momentum fraction carried by photons of the second nucleus.
    pub x2: f64,
    /// Partonic Mandelstam ŝ.
    pub s_hat: f64,
    /// Partonic Mandelstam t̂.
    pub t_hat: f64,
    /// Partonic Mandelstam û.
    pub u_hat: f64,
    /// Pair invariant mass √ŝ.
    pub mass: f64,
}

impl PhaseSpacePoint {
    /// `||p₁| − |p₂|| / (|p₁| + |p₂|)`.
    pub fn asymmetry(&self) -> f64 {
        let a = self.p1.magnitude();
        let b = self.p2.magnitude();
        (a - b).abs() / (a + b)
    }
}

/// Weight and kinematics of a single point, for diagnostics.
#[derive(Clone, Debug)]
pub struct Inspection {
    /// Kinematics, or the first veto that applied.
    pub phase_space: Result<PhaseSpacePoint, Veto>,
    /// Integrand value.
    pub weight: f64,
}

/// Dilepton process resolved for one run.
///
/// # Examples
///
/// ```rust
/// use wiggle_mc::bins::BinSampling;
/// use wiggle_mc::params::DileptonParameters;
/// use wiggle_mc::process::{DileptonProcess, Process};
///
/// let process = DileptonProcess::new(DileptonParameters::default(), BinSampling::Midpoint).unwrap();
/// assert_eq!(process.dimensions(), 11);
/// assert_eq!(process.histogram().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct DileptonProcess {
    params: DileptonParameters,
    nucleus: Nucleus,
    layout: ModeLayout,
}

impl DileptonProcess {
    /// Validates `params` and resolves the coordinate layout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for invalid parameters.
    pub fn new(params: DileptonParameters, sampling: BinSampling) -> Result<Self, ConfigError> {
        params.validate()?;
        let nucleus = params.nucleus.to_nucleus()?;
        let layout = ModeLayout::resolve(&params, sampling)?;
        Ok(Self {
            params,
            nucleus,
            layout,
        })
    }

    /// Run parameters.
    #[inline]
    pub fn parameters(&self) -> &DileptonParameters {
        &self.params
    }

    /// Coordinate layout.
    #[inline]
    pub fn layout(&self) -> &ModeLayout {
        &self.layout
    }

    /// Photon-emitting nucleus.
    #[inline]
    pub fn nucleus(&self) -> &Nucleus {
        &self.nucleus
    }

    /// Kinematics and weight at `point`.
    pub fn inspect(&self, point: &[f64], snapshot: &ParameterSnapshot) -> Inspection {
        let phase_space = self.phase_space(point, snapshot);
        let weight = match &phase_space {
            Ok(ps) => self.weight(ps, snapshot),
            Err(_) => 0.0,
        };
        Inspection {
            phase_space,
            weight,
        }
    }

    #[inline]
    fn coordinate(&self, point: &[f64], snapshot: &ParameterSnapshot, variable: Variable) -> f64 {
        match self.layout.slot(variable) {
            Some(i) => point[i],
            None => snapshot.fixed_value(variable).unwrap_or(0.0),
        }
    }

    /// Builds the kinematics at `point` and applies the vetoes in order:
    /// momentum fractions, mass window, lepton threshold, asymmetry.
    pub fn phase_space(
        &self,
        point: &[f64],
        snapshot: &ParameterSnapshot,
    ) -> Result<PhaseSpacePoint, Veto> {
        use Variable::*;

        let params = snapshot.parameters();
        let value = |v| self.coordinate(point, snapshot, v);

        let k1 = KinematicVector::from_polar(value(K1Magnitude), value(K1Angle));
        let ka = KinematicVector::from_polar(value(KaMagnitude), value(KaAngle));
        let rapidity1 = value(Rapidity1);
        let rapidity2 = value(Rapidity2);

        let pair_angle = value(PairAngle);
        let imbalance_angle = match self.layout.mode() {
            ObservableMode::Azimuth => pair_angle + value(RelativeAngle),
            _ => value(ImbalanceAngle),
        };
        let pair = KinematicVector::from_polar(value(PairMagnitude), pair_angle);
        let imbalance = KinematicVector::from_polar(value(ImbalanceMagnitude), imbalance_angle);
        let resolution = if self.layout.is_sudakov() {
            KinematicVector::from_polar(value(ResolutionMagnitude), value(ResolutionAngle))
        } else {
            KinematicVector::zero()
        };
        let impact_parameter = value(ImpactParameter);

        let half_imbalance = 0.5 * &imbalance;
        let p1 = &half_imbalance + &pair;
        let p2 = &half_imbalance - &pair;

        let sqrt_s = params.collision_energy;
        let pt_hard = p1.magnitude().max(p2.magnitude());
        let x1 = pt_hard * (rapidity1.exp() + rapidity2.exp()) / sqrt_s;
        let x2 = pt_hard * ((-rapidity1).exp() + (-rapidity2).exp()) / sqrt_s;
        if !(x1 > 0.0 && x1 < 1.0 && x2 > 0.0 && x2 < 1.0) {
            return Err(Veto::MomentumFraction);
        }

        let s_hat = x1 * x2 * sqrt_s * sqrt_s;
        let t_hat = -x1 * sqrt_s * pt_hard * (-rapidity1).exp();
        let u_hat = -x1 * sqrt_s * pt_hard * (-rapidity2).exp();
        let mass = s_hat.sqrt();

        if let Some(window) = params.mass_cut.window() {
            if !window.contains_open(mass) {
                return Err(Veto::MassWindow);
            }
        }
        if mass <= params.lepton.pair_threshold() {
            return Err(Veto::LeptonThreshold);
        }

        let phase_space = PhaseSpacePoint {
            k1,
            ka,
            pair,
            imbalance,
            resolution,
            p1,
            p2,
            rapidity1,
            rapidity2,
            impact_parameter,
            x1,
            x2,
            s_hat,
            t_hat,
            u_hat,
            mass,
        };
        if let Some(window) = params.asymmetry_cut.window() {
            if !window.contains(phase_space.asymmetry()) {
                return Err(Veto::Asymmetry);
            }
        }
        Ok(phase_space)
    }

    /// Integrand value of an accepted point.
    pub fn weight(&self, ps: &PhaseSpacePoint, snapshot: &ParameterSnapshot) -> f64 {
        let params = snapshot.parameters();
        let nucleus = snapshot.nucleus();

        let q = &ps.imbalance - &ps.resolution;
        let k2 = &q - &ps.k1;
        let kb = &q - &ps.ka;

        let x1_sq = ps.x1 * ps.x1 * PROTON_MASS_SQ;
        let x2_sq = ps.x2 * ps.x2 * PROTON_MASS_SQ;
        let k1_sq = x1_sq + ps.k1.magnitude_squared();
        let ka_sq = x1_sq + ps.ka.magnitude_squared();
        let k2_sq = x2_sq + k2.magnitude_squared();
        let kb_sq = x2_sq + kb.magnitude_squared();

        let (t, u) = (ps.t_hat, ps.u_hat);
        let isotropic =
            (ps.k1.phi() - ps.ka.phi() + k2.phi() - kb.phi()).cos() * (t * t + u * u) / (t * u);
        let anisotropic = if params.anisotropic {
            2.0 * (ps.k1.phi() + ps.ka.phi() + k2.phi() + kb.phi() - 4.0 * ps.pair.phi()).cos()
        } else {
            0.0
        };
        let born = ps.k1.magnitude() * ps.ka.magnitude() * k2.magnitude() * kb.magnitude()
            * (isotropic - anisotropic)
            * 2.0
            * ALPHA_EM
            * ALPHA_EM
            / (ps.s_hat * ps.s_hat);

        let flux_a = nucleus.photon_flux(k1_sq.sqrt(), ka_sq.sqrt());
        let flux_b = nucleus.photon_flux(k2_sq.sqrt(), kb_sq.sqrt());

        let b = ps.impact_parameter;
        let dk = &ps.k1 - &ps.ka;
        let kernel = b / (2.0 * PI) * bessel_j0(b * dk.magnitude());

        let mut jacobian =
            ps.pair.magnitude() * ps.imbalance.magnitude() * ps.k1.magnitude() * ps.ka.magnitude();
        if self.layout.is_sudakov() {
            jacobian *= ps.resolution.magnitude();
        }

        jacobian * kernel * flux_a * flux_b * born
    }
}

impl Process for DileptonProcess {
    type Snapshot = ParameterSnapshot;

    fn name(&self) -> &'static str {
        "dilepton"
    }

    fn dimensions(&self) -> usize {
        self.layout.dimensions()
    }

    fn histogram(&self) -> Vec<BinDescriptor> {
        self.params.histogram()
    }

    fn snapshot(&self, bin: &BinDescriptor) -> ParameterSnapshot {
        let fixed = match self.layout.sampling() {
            BinSampling::Midpoint => FixedObservable::for_mode(self.layout.mode(), bin.midpoint),
            BinSampling::Averaged => FixedObservable::Free,
        };
        ParameterSnapshot::new(&self.params, self.nucleus, fixed)
    }

    fn domain(&self, bin: &BinDescriptor) -> Result<IntegrationDomain, ConfigError> {
        self.layout.bin_domain(bin)
    }

    #[inline]
    fn evaluate(&self, point: &[f64], snapshot: &ParameterSnapshot) -> f64 {
        match self.phase_space(point, snapshot) {
            Ok(ps) => self.weight(&ps, snapshot),
            Err(_) => 0.0,
        }
    }

    fn normalisation(&self, bin: &BinDescriptor) -> f64 {
        let averaged = self.layout.sampling() == BinSampling::Averaged;
        if averaged && self.layout.mode().is_differential() && bin.width() > 0.0 {
            1.0 / bin.width()
        } else {
            1.0
        }
    }
}
