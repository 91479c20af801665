//! Physics run parameters.
//!
//! This module provides the serialisable inputs of a run:
//! - [`Range`], [`HistogramAxis`], [`Cut`]: building blocks
//! - [`DileptonParameters`]: γγ → l⁺l⁻ in ultra-peripheral collisions
//! - [`InclusiveJetParameters`]: single inclusive jets in pp collisions
//! - [`ParameterSnapshot`]: per-bin immutable copy handed to the integrand
//!
//! All types deserialise from TOML with sensible defaults for omitted
//! fields; call `validate()` before use.

mod snapshot;

pub use snapshot::{FixedObservable, ParameterSnapshot};

use crate::bins::BinDescriptor;
use crate::error::ConfigError;
use crate::modes::ObservableMode;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use wiggle_core::physics::constants::fm_to_inverse_gev;
use wiggle_core::physics::form_factor::{LEAD_CHARGE, LEAD_RADIUS_FM, YUKAWA_RANGE_FM};
use wiggle_core::physics::{Lepton, Nucleus};

/// Closed interval `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Range {
    /// Creates a range.
    #[inline]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Width `max − min`.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// `min < x < max`.
    #[inline]
    pub fn contains_open(&self, x: f64) -> bool {
        x > self.min && x < self.max
    }

    /// `min <= x <= max`.
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    /// Requires finite bounds with `min < max`.
    pub fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min >= self.max {
            return Err(ConfigError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Like [`validate`](Self::validate) and additionally `min >= 0`.
    pub fn validate_magnitude(&self, name: &'static str) -> Result<(), ConfigError> {
        self.validate(name)?;
        if self.min < 0.0 {
            return Err(ConfigError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    fn scaled(&self, factor: f64) -> Self {
        Self::new(self.min * factor, self.max * factor)
    }
}

/// Histogram range with a bin count.
///
/// The range doubles as the integration range of the variable when it is
/// not the binned observable.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistogramAxis {
    /// Lower edge of the first bin.
    pub min: f64,
    /// Upper edge of the last bin.
    pub max: f64,
    /// Number of equal-width bins.
    #[serde(default = "default_bins")]
    pub bins: usize,
}

fn default_bins() -> usize {
    10
}

impl HistogramAxis {
    /// Creates an axis.
    #[inline]
    pub const fn new(min: f64, max: f64, bins: usize) -> Self {
        Self { min, max, bins }
    }

    /// The `[min, max]` range.
    #[inline]
    pub fn range(&self) -> Range {
        Range::new(self.min, self.max)
    }

    /// Requires a valid non-negative range and at least one bin.
    pub fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        self.range().validate(name)?;
        if self.bins == 0 {
            return Err(ConfigError::InvalidBinCount { name, bins: 0 });
        }
        Ok(())
    }

    /// Bin descriptors with edges multiplied by `scale`.
    ///
    /// Edges are `min + i·w` and `min + (i+1)·w` with `w = (max − min)/bins`;
    /// the representative value is their midpoint.
    pub fn descriptors(&self, scale: f64) -> Vec<BinDescriptor> {
        let min = self.min * scale;
        let width = (self.max - self.min) * scale / self.bins as f64;
        (0..self.bins)
            .map(|i| {
                let lower = min + i as f64 * width;
                let upper = min + (i + 1) as f64 * width;
                BinDescriptor::new(i, lower, upper)
            })
            .collect()
    }
}

/// Optional window cut on a derived quantity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cut {
    /// Whether the cut is applied.
    #[serde(default)]
    pub enabled: bool,
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Cut {
    /// Disabled cut with the given window.
    #[inline]
    pub const fn disabled(min: f64, max: f64) -> Self {
        Self {
            enabled: false,
            min,
            max,
        }
    }

    /// Enabled cut with the given window.
    #[inline]
    pub const fn enabled(min: f64, max: f64) -> Self {
        Self {
            enabled: true,
            min,
            max,
        }
    }

    /// The window if the cut is enabled.
    #[inline]
    pub fn window(&self) -> Option<Range> {
        self.enabled.then(|| Range::new(self.min, self.max))
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.enabled {
            Range::new(self.min, self.max).validate(name)?;
        }
        Ok(())
    }
}

/// Photon-emitting nucleus.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NucleusParameters {
    /// Charge number `Z`.
    pub charge: f64,
    /// Hard-sphere radius in fm.
    pub radius_fm: f64,
    /// Yukawa range in fm.
    pub yukawa_range_fm: f64,
}

impl Default for NucleusParameters {
    fn default() -> Self {
        Self {
            charge: LEAD_CHARGE,
            radius_fm: LEAD_RADIUS_FM,
            yukawa_range_fm: YUKAWA_RANGE_FM,
        }
    }
}

impl NucleusParameters {
    /// Builds the validated [`Nucleus`].
    pub fn to_nucleus(&self) -> Result<Nucleus, ConfigError> {
        Ok(Nucleus::new(
            self.charge,
            self.radius_fm,
            self.yukawa_range_fm,
        )?)
    }
}

/// Inputs of the γγ → l⁺l⁻ calculation.
///
/// Momenta in GeV, impact parameter in fm, angles in radians.
///
/// # Examples
///
/// ```rust
/// use wiggle_mc::modes::ObservableMode;
/// use wiggle_mc::params::DileptonParameters;
///
/// let params = DileptonParameters {
///     mode: ObservableMode::Imbalance,
///     ..DileptonParameters::default()
/// };
/// params.validate().unwrap();
/// assert_eq!(params.histogram().len(), params.imbalance.bins);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DileptonParameters {
    /// Nucleon-nucleon centre-of-mass energy √s in GeV.
    pub collision_energy: f64,
    /// Differential observable.
    #[serde(
        deserialize_with = "crate::modes::deserialize_mode",
        serialize_with = "crate::modes::serialize_mode"
    )]
    pub mode: ObservableMode,
    /// Photon transverse-momentum magnitude range.
    pub kt: Range,
    /// Lepton rapidity range.
    pub rapidity: Range,
    /// Pair momentum |P_T| range and bins.
    pub pair_momentum: HistogramAxis,
    /// Momentum imbalance |q_T| range and bins.
    pub imbalance: HistogramAxis,
    /// Impact parameter range (fm) and bins.
    pub impact_parameter: HistogramAxis,
    /// Azimuthal angle between q_T and P_T, range and bins.
    pub azimuth: HistogramAxis,
    /// Soft-radiation sub-integration over l_T.
    pub sudakov: Cut,
    /// Pair invariant-mass window.
    pub mass_cut: Cut,
    /// Transverse-momentum asymmetry window.
    pub asymmetry_cut: Cut,
    /// Include the cos 4φ anisotropic term.
    pub anisotropic: bool,
    /// Lepton flavour.
    pub lepton: Lepton,
    /// Photon-emitting nucleus.
    pub nucleus: NucleusParameters,
}

impl Default for DileptonParameters {
    fn default() -> Self {
        Self {
            collision_energy: 5020.0,
            mode: ObservableMode::Total,
            kt: Range::new(0.0, 0.1),
            rapidity: Range::new(-2.4, 2.4),
            pair_momentum: HistogramAxis::new(4.0, 20.0, 16),
            imbalance: HistogramAxis::new(0.0, 0.2, 20),
            impact_parameter: HistogramAxis::new(13.24, 50.0, 10),
            azimuth: HistogramAxis::new(0.0, PI, 12),
            sudakov: Cut::disabled(0.0, 0.1),
            mass_cut: Cut::disabled(4.0, 45.0),
            asymmetry_cut: Cut::disabled(0.0, 0.1),
            anisotropic: false,
            lepton: Lepton::All,
            nucleus: NucleusParameters::default(),
        }
    }
}

impl DileptonParameters {
    /// Validates all ranges and cuts.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `collision_energy` is not positive
    /// - a range is empty, reversed or non-finite
    /// - a magnitude range has a negative lower bound
    /// - a histogram has zero bins
    /// - an enabled cut has an invalid window
    /// - the nucleus parameters are not positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.collision_energy.is_finite() && self.collision_energy > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "collision_energy",
                value: format!("{} must be positive", self.collision_energy),
            });
        }
        self.kt.validate_magnitude("kt")?;
        self.rapidity.validate("rapidity")?;
        self.pair_momentum.validate("pair_momentum")?;
        self.pair_momentum.range().validate_magnitude("pair_momentum")?;
        self.imbalance.validate("imbalance")?;
        self.imbalance.range().validate_magnitude("imbalance")?;
        self.impact_parameter.validate("impact_parameter")?;
        self.impact_parameter
            .range()
            .validate_magnitude("impact_parameter")?;
        self.azimuth.validate("azimuth")?;
        if self.sudakov.enabled {
            Range::new(self.sudakov.min, self.sudakov.max).validate_magnitude("sudakov")?;
        }
        self.mass_cut.validate("mass_cut")?;
        self.asymmetry_cut.validate("asymmetry_cut")?;
        self.nucleus.to_nucleus()?;
        Ok(())
    }

    /// Impact-parameter range converted to GeV⁻¹.
    #[inline]
    pub fn impact_parameter_range(&self) -> Range {
        self.impact_parameter.range().scaled(fm_to_inverse_gev(1.0))
    }

    /// Histogram axis of the current mode, `None` for [`ObservableMode::Total`].
    pub fn binned_axis(&self) -> Option<HistogramAxis> {
        match self.mode {
            ObservableMode::Total => None,
            ObservableMode::PairMomentum => Some(self.pair_momentum),
            ObservableMode::Imbalance => Some(self.imbalance),
            ObservableMode::ImpactParameter => Some(self.impact_parameter),
            ObservableMode::Azimuth => Some(self.azimuth),
        }
    }

    /// Bin descriptors of the current mode.
    ///
    /// [`ObservableMode::Total`] has a single bin at zero; impact-parameter
    /// bins are expressed in GeV⁻¹.
    pub fn histogram(&self) -> Vec<BinDescriptor> {
        match (self.mode, self.binned_axis()) {
            (ObservableMode::ImpactParameter, Some(axis)) => {
                axis.descriptors(fm_to_inverse_gev(1.0))
            }
            (_, Some(axis)) => axis.descriptors(1.0),
            (_, None) => vec![BinDescriptor::new(0, 0.0, 0.0)],
        }
    }
}

/// Inputs of the leading-order single inclusive jet calculation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InclusiveJetParameters {
    /// Proton-proton centre-of-mass energy √s in GeV.
    pub collision_energy: f64,
    /// Jet rapidity range.
    pub rapidity: Range,
    /// Jet transverse momentum range (GeV) and bins.
    pub transverse_momentum: HistogramAxis,
    /// Include quark jets.
    pub quark_jets: bool,
    /// Include gluon jets.
    pub gluon_jets: bool,
    /// Renormalisation/factorisation scale in units of the jet p_T.
    pub scale_factor: f64,
}

impl Default for InclusiveJetParameters {
    fn default() -> Self {
        Self {
            collision_energy: 2760.0,
            rapidity: Range::new(-2.1, 2.1),
            transverse_momentum: HistogramAxis::new(30.0, 500.0, 188),
            quark_jets: true,
            gluon_jets: true,
            scale_factor: 1.0,
        }
    }
}

impl InclusiveJetParameters {
    /// Validates energies, ranges and the scale factor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.collision_energy.is_finite() && self.collision_energy > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "collision_energy",
                value: format!("{} must be positive", self.collision_energy),
            });
        }
        self.rapidity.validate("rapidity")?;
        self.transverse_momentum.validate("transverse_momentum")?;
        if self.transverse_momentum.min <= 0.0 {
            return Err(ConfigError::InvalidRange {
                name: "transverse_momentum",
                min: self.transverse_momentum.min,
                max: self.transverse_momentum.max,
            });
        }
        if !(self.scale_factor.is_finite() && self.scale_factor > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "scale_factor",
                value: format!("{} must be positive", self.scale_factor),
            });
        }
        Ok(())
    }

    /// Bin descriptors over the jet p_T axis.
    pub fn histogram(&self) -> Vec<BinDescriptor> {
        self.transverse_momentum.descriptors(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ================================================================
    // Building blocks
    // ================================================================

    #[test]
    fn test_range_validation() {
        assert!(Range::new(0.0, 1.0).validate("r").is_ok());
        assert!(Range::new(1.0, 1.0).validate("r").is_err());
        assert!(Range::new(2.0, 1.0).validate("r").is_err());
        assert!(Range::new(f64::NAN, 1.0).validate("r").is_err());
        assert!(Range::new(-1.0, 1.0).validate_magnitude("r").is_err());
    }

    #[test]
    fn test_range_containment() {
        let r = Range::new(1.0, 2.0);
        assert!(!r.contains_open(1.0));
        assert!(r.contains(1.0));
        assert!(r.contains_open(1.5));
    }

    #[test]
    fn test_axis_descriptors() {
        let axis = HistogramAxis::new(0.0, 1.0, 4);
        let bins = axis.descriptors(1.0);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].index, 0);
        assert_relative_eq!(bins[1].lower, 0.25, epsilon = 1e-15);
        assert_relative_eq!(bins[1].upper, 0.5, epsilon = 1e-15);
        assert_relative_eq!(bins[3].midpoint, 0.875, epsilon = 1e-15);
    }

    #[test]
    fn test_axis_zero_bins() {
        assert!(matches!(
            HistogramAxis::new(0.0, 1.0, 0).validate("x"),
            Err(ConfigError::InvalidBinCount { name: "x", bins: 0 })
        ));
    }

    #[test]
    fn test_cut_window() {
        assert_eq!(Cut::disabled(1.0, 2.0).window(), None);
        assert_eq!(Cut::enabled(1.0, 2.0).window(), Some(Range::new(1.0, 2.0)));
        // a disabled cut may carry any window
        assert!(Cut::disabled(2.0, 1.0).validate("c").is_ok());
        assert!(Cut::enabled(2.0, 1.0).validate("c").is_err());
    }

    // ================================================================
    // Dilepton parameters
    // ================================================================

    #[test]
    fn test_default_dilepton_valid() {
        DileptonParameters::default().validate().unwrap();
    }

    #[test]
    fn test_total_mode_single_bin() {
        let params = DileptonParameters::default();
        let bins = params.histogram();
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].midpoint, 0.0);
    }

    #[test]
    fn test_impact_parameter_bins_in_inverse_gev() {
        let params = DileptonParameters {
            mode: ObservableMode::ImpactParameter,
            impact_parameter: HistogramAxis::new(10.0, 20.0, 2),
            ..DileptonParameters::default()
        };
        let bins = params.histogram();
        assert_relative_eq!(bins[0].lower, fm_to_inverse_gev(10.0), epsilon = 1e-12);
        assert_relative_eq!(bins[1].upper, fm_to_inverse_gev(20.0), epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_energy() {
        let params = DileptonParameters {
            collision_energy: 0.0,
            ..DileptonParameters::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidParameter {
                name: "collision_energy",
                ..
            })
        ));
    }

    #[test]
    fn test_enabled_sudakov_needs_valid_range() {
        let params = DileptonParameters {
            sudakov: Cut::enabled(0.1, 0.0),
            ..DileptonParameters::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_invalid_nucleus() {
        let params = DileptonParameters {
            nucleus: NucleusParameters {
                charge: -1.0,
                ..NucleusParameters::default()
            },
            ..DileptonParameters::default()
        };
        assert!(matches!(params.validate(), Err(ConfigError::Core(_))));
    }

    #[test]
    fn test_dilepton_from_toml() {
        let text = r#"
            collision_energy = 5360.0
            mode = "imbalance"
            lepton = "muon"
            imbalance = { min = 0.0, max = 0.1, bins = 5 }
            mass_cut = { enabled = true, min = 10.0, max = 40.0 }
        "#;
        let params: DileptonParameters = toml::from_str(text).unwrap();
        assert_eq!(params.mode, ObservableMode::Imbalance);
        assert_eq!(params.lepton, Lepton::Muon);
        assert_eq!(params.histogram().len(), 5);
        assert_eq!(params.mass_cut.window(), Some(Range::new(10.0, 40.0)));
        assert_eq!(params.kt, DileptonParameters::default().kt);
    }

    #[test]
    fn test_dilepton_legacy_mode_code() {
        let params: DileptonParameters = toml::from_str("mode = 3").unwrap();
        assert_eq!(params.mode, ObservableMode::ImpactParameter);
        assert!(toml::from_str::<DileptonParameters>("mode = 9").is_err());
        assert!(toml::from_str::<DileptonParameters>("mode = \"rapidity\"").is_err());
    }

    // ================================================================
    // Inclusive jet parameters
    // ================================================================

    #[test]
    fn test_default_jet_valid() {
        let params = InclusiveJetParameters::default();
        params.validate().unwrap();
        assert_eq!(params.histogram().len(), 188);
    }

    #[test]
    fn test_jet_rejects_zero_pt() {
        let params = InclusiveJetParameters {
            transverse_momentum: HistogramAxis::new(0.0, 10.0, 2),
            ..InclusiveJetParameters::default()
        };
        assert!(params.validate().is_err());
    }
}
