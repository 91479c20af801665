//! Mapping between sampled coordinates and kinematic variables.

use super::ObservableMode;
use crate::bins::{BinDescriptor, BinSampling};
use crate::domain::IntegrationDomain;
use crate::error::ConfigError;
use crate::params::{DileptonParameters, Range};
use std::f64::consts::PI;

const FULL_TURN: Range = Range::new(0.0, 2.0 * PI);

/// Kinematic variable that can occupy a sampled coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variable {
    /// |k₁|, first photon from nucleus A.
    K1Magnitude,
    /// φ(k₁).
    K1Angle,
    /// |k_a|, first photon from nucleus A in the conjugate amplitude.
    KaMagnitude,
    /// φ(k_a).
    KaAngle,
    /// y₁, first lepton rapidity.
    Rapidity1,
    /// y₂, second lepton rapidity.
    Rapidity2,
    /// |P_T|.
    PairMagnitude,
    /// φ(P_T).
    PairAngle,
    /// |q_T|.
    ImbalanceMagnitude,
    /// φ(q_T).
    ImbalanceAngle,
    /// b in GeV⁻¹.
    ImpactParameter,
    /// |l_T|, soft-radiation momentum.
    ResolutionMagnitude,
    /// φ(l_T).
    ResolutionAngle,
    /// φ(q_T) − φ(P_T).
    RelativeAngle,
}

impl Variable {
    /// Number of variables.
    pub const COUNT: usize = 14;

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label with units.
    pub fn label(&self) -> &'static str {
        match self {
            Self::K1Magnitude => "|k1| [GeV]",
            Self::K1Angle => "phi(k1)",
            Self::KaMagnitude => "|ka| [GeV]",
            Self::KaAngle => "phi(ka)",
            Self::Rapidity1 => "y1",
            Self::Rapidity2 => "y2",
            Self::PairMagnitude => "|PT| [GeV]",
            Self::PairAngle => "phi(PT)",
            Self::ImbalanceMagnitude => "|qT| [GeV]",
            Self::ImbalanceAngle => "phi(qT)",
            Self::ImpactParameter => "b [1/GeV]",
            Self::ResolutionMagnitude => "|lT| [GeV]",
            Self::ResolutionAngle => "phi(lT)",
            Self::RelativeAngle => "phi(qT) - phi(PT)",
        }
    }
}

/// One sampled coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    /// Variable the coordinate feeds.
    pub variable: Variable,
    /// Lower integration bound.
    pub lower: f64,
    /// Upper integration bound.
    pub upper: f64,
}

impl Coordinate {
    fn new(variable: Variable, range: Range) -> Self {
        Self {
            variable,
            lower: range.min,
            upper: range.max,
        }
    }
}

/// Resolved coordinate order and base domain for one run.
///
/// Coordinates 0..6 are the photon and lepton variables, followed by the
/// mode-specific variables, then the two soft-radiation coordinates when
/// enabled, then the binned variable itself for bin-averaged sampling.
///
/// # Examples
///
/// ```rust
/// use wiggle_mc::bins::BinSampling;
/// use wiggle_mc::modes::{ModeLayout, ObservableMode, Variable};
/// use wiggle_mc::params::DileptonParameters;
///
/// let params = DileptonParameters {
///     mode: ObservableMode::PairMomentum,
///     ..DileptonParameters::default()
/// };
/// let layout = ModeLayout::resolve(&params, BinSampling::Midpoint).unwrap();
/// assert_eq!(layout.dimensions(), 10);
/// assert_eq!(layout.slot(Variable::PairAngle), Some(6));
/// assert_eq!(layout.slot(Variable::PairMagnitude), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ModeLayout {
    mode: ObservableMode,
    sudakov: bool,
    sampling: BinSampling,
    coordinates: Vec<Coordinate>,
    slots: [Option<usize>; Variable::COUNT],
    domain: IntegrationDomain,
}

impl ModeLayout {
    /// Builds the layout for `params.mode`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a range cannot form a valid domain.
    pub fn resolve(params: &DileptonParameters, sampling: BinSampling) -> Result<Self, ConfigError> {
        use Variable::*;

        let pair = params.pair_momentum.range();
        let imbalance = params.imbalance.range();
        let impact = params.impact_parameter_range();

        let mut coordinates = vec![
            Coordinate::new(K1Magnitude, params.kt),
            Coordinate::new(K1Angle, FULL_TURN),
            Coordinate::new(KaMagnitude, params.kt),
            Coordinate::new(KaAngle, FULL_TURN),
            Coordinate::new(Rapidity1, params.rapidity),
            Coordinate::new(Rapidity2, params.rapidity),
        ];
        let mode_coordinates: Vec<(Variable, Range)> = match params.mode {
            ObservableMode::Total => vec![
                (PairMagnitude, pair),
                (PairAngle, FULL_TURN),
                (ImbalanceMagnitude, imbalance),
                (ImbalanceAngle, FULL_TURN),
                (ImpactParameter, impact),
            ],
            ObservableMode::PairMomentum => vec![
                (PairAngle, FULL_TURN),
                (ImbalanceMagnitude, imbalance),
                (ImbalanceAngle, FULL_TURN),
                (ImpactParameter, impact),
            ],
            ObservableMode::Imbalance => vec![
                (PairMagnitude, pair),
                (PairAngle, FULL_TURN),
                (ImbalanceAngle, FULL_TURN),
                (ImpactParameter, impact),
            ],
            ObservableMode::ImpactParameter => vec![
                (PairMagnitude, pair),
                (PairAngle, FULL_TURN),
                (ImbalanceMagnitude, imbalance),
                (ImbalanceAngle, FULL_TURN),
            ],
            ObservableMode::Azimuth => vec![
                (PairMagnitude, pair),
                (ImbalanceMagnitude, imbalance),
                (PairAngle, FULL_TURN),
                (ImpactParameter, impact),
            ],
        };
        coordinates.extend(
            mode_coordinates
                .into_iter()
                .map(|(variable, range)| Coordinate::new(variable, range)),
        );

        let sudakov = params.sudakov.enabled;
        if sudakov {
            let resolution = Range::new(params.sudakov.min, params.sudakov.max);
            coordinates.push(Coordinate::new(ResolutionMagnitude, resolution));
            coordinates.push(Coordinate::new(ResolutionAngle, FULL_TURN));
        }

        if sampling == BinSampling::Averaged {
            if let (Some(variable), Some(axis)) = (params.mode.binned_variable(), params.binned_axis()) {
                let range = match params.mode {
                    ObservableMode::ImpactParameter => impact,
                    _ => axis.range(),
                };
                coordinates.push(Coordinate::new(variable, range));
            }
        }

        let mut slots = [None; Variable::COUNT];
        for (i, coordinate) in coordinates.iter().enumerate() {
            slots[coordinate.variable.index()] = Some(i);
        }
        let domain = IntegrationDomain::new(
            coordinates.iter().map(|c| (c.lower, c.upper)).collect(),
        )?;

        Ok(Self {
            mode: params.mode,
            sudakov,
            sampling,
            coordinates,
            slots,
            domain,
        })
    }

    /// Observable mode.
    #[inline]
    pub fn mode(&self) -> ObservableMode {
        self.mode
    }

    /// Whether the soft-radiation coordinates are present.
    #[inline]
    pub fn is_sudakov(&self) -> bool {
        self.sudakov
    }

    /// Bin sampling policy.
    #[inline]
    pub fn sampling(&self) -> BinSampling {
        self.sampling
    }

    /// Number of sampled coordinates.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.coordinates.len()
    }

    /// Coordinates in sampling order.
    #[inline]
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    /// Coordinate index of `variable`, `None` if it is not sampled.
    #[inline]
    pub fn slot(&self, variable: Variable) -> Option<usize> {
        self.slots[variable.index()]
    }

    /// Domain shared by all bins.
    #[inline]
    pub fn base_domain(&self) -> &IntegrationDomain {
        &self.domain
    }

    /// Coordinate index of the binned variable when it is sampled.
    pub fn binned_slot(&self) -> Option<usize> {
        self.mode.binned_variable().and_then(|v| self.slot(v))
    }

    /// Domain for `bin`: the base domain with the binned coordinate
    /// narrowed to the bin edges when bin-averaging.
    pub fn bin_domain(&self, bin: &BinDescriptor) -> Result<IntegrationDomain, ConfigError> {
        match self.binned_slot() {
            Some(slot) => self.domain.with_override(slot, bin.lower, bin.upper),
            None => Ok(self.domain.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Cut;
    use approx::assert_relative_eq;

    fn params(mode: ObservableMode) -> DileptonParameters {
        DileptonParameters {
            mode,
            ..DileptonParameters::default()
        }
    }

    #[test]
    fn test_dimensions_match_mode() {
        for mode in ObservableMode::ALL {
            for sudakov in [false, true] {
                let mut p = params(mode);
                p.sudakov = if sudakov {
                    Cut::enabled(0.0, 0.1)
                } else {
                    Cut::disabled(0.0, 0.1)
                };
                let layout = ModeLayout::resolve(&p, BinSampling::Midpoint).unwrap();
                assert_eq!(layout.dimensions(), mode.dimensions(sudakov));
                assert_eq!(layout.base_domain().dimensions(), layout.dimensions());
            }
        }
    }

    #[test]
    fn test_total_layout() {
        let layout = ModeLayout::resolve(&params(ObservableMode::Total), BinSampling::Midpoint).unwrap();
        assert_eq!(layout.slot(Variable::PairMagnitude), Some(6));
        assert_eq!(layout.slot(Variable::ImpactParameter), Some(10));
        assert_eq!(layout.slot(Variable::RelativeAngle), None);
        assert_eq!(layout.binned_slot(), None);
    }

    #[test]
    fn test_sudakov_appended_after_mode() {
        let mut p = params(ObservableMode::Total);
        p.sudakov = Cut::enabled(0.0, 0.05);
        let layout = ModeLayout::resolve(&p, BinSampling::Midpoint).unwrap();
        assert_eq!(layout.slot(Variable::ResolutionMagnitude), Some(11));
        assert_eq!(layout.slot(Variable::ResolutionAngle), Some(12));
        assert_eq!(layout.base_domain().bounds(11), (0.0, 0.05));
    }

    #[test]
    fn test_impact_parameter_domain_in_inverse_gev() {
        let p = params(ObservableMode::Total);
        let layout = ModeLayout::resolve(&p, BinSampling::Midpoint).unwrap();
        let (lo, hi) = layout.base_domain().bounds(10);
        assert_relative_eq!(lo, p.impact_parameter_range().min, epsilon = 1e-12);
        assert_relative_eq!(hi, p.impact_parameter_range().max, epsilon = 1e-12);
        assert!(hi > p.impact_parameter.max);
    }

    #[test]
    fn test_averaged_adds_binned_coordinate() {
        let p = params(ObservableMode::Imbalance);
        let layout = ModeLayout::resolve(&p, BinSampling::Averaged).unwrap();
        assert_eq!(layout.dimensions(), 11);
        assert_eq!(layout.binned_slot(), Some(10));

        let bins = p.histogram();
        let domain = layout.bin_domain(&bins[3]).unwrap();
        assert_eq!(domain.bounds(10), (bins[3].lower, bins[3].upper));
    }

    #[test]
    fn test_averaged_total_unchanged() {
        let p = params(ObservableMode::Total);
        let midpoint = ModeLayout::resolve(&p, BinSampling::Midpoint).unwrap();
        let averaged = ModeLayout::resolve(&p, BinSampling::Averaged).unwrap();
        assert_eq!(midpoint.coordinates(), averaged.coordinates());
    }

    #[test]
    fn test_midpoint_bin_domain_is_base() {
        let p = params(ObservableMode::Azimuth);
        let layout = ModeLayout::resolve(&p, BinSampling::Midpoint).unwrap();
        let bins = p.histogram();
        assert_eq!(&layout.bin_domain(&bins[0]).unwrap(), layout.base_domain());
    }
}
