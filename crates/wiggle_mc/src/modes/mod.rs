//! Observable modes and their integration layouts.
//!
//! The mode decides which kinematic variable is binned and therefore which
//! variables are sampled. Six photon/lepton coordinates are always sampled;
//! the mode adds four or five more, and the soft-radiation sub-integration
//! appends two.
//!
//! | Mode | Binned | Dimensions | With Sudakov |
//! |------|--------|-----------:|-------------:|
//! | `total` | nothing | 11 | 13 |
//! | `pair-momentum` | \|P_T\| | 10 | 12 |
//! | `imbalance` | \|q_T\| | 10 | 12 |
//! | `impact-parameter` | b | 10 | 12 |
//! | `azimuth` | φ(q_T) − φ(P_T) | 10 | 12 |

mod layout;

pub use layout::{Coordinate, ModeLayout, Variable};

use crate::error::ConfigError;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of coordinates sampled in every mode.
pub const BASE_DIMENSIONS: usize = 6;

/// Number of coordinates added by the soft-radiation sub-integration.
pub const SUDAKOV_DIMENSIONS: usize = 2;

/// Differential observable of a dilepton run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ObservableMode {
    /// Fiducial cross section, single bin.
    #[default]
    Total,
    /// dσ/d|P_T|.
    PairMomentum,
    /// dσ/d|q_T|.
    Imbalance,
    /// dσ/db.
    ImpactParameter,
    /// dσ/dΔφ between q_T and P_T.
    Azimuth,
}

impl ObservableMode {
    /// All modes in legacy code order.
    pub const ALL: [Self; 5] = [
        Self::Total,
        Self::PairMomentum,
        Self::Imbalance,
        Self::ImpactParameter,
        Self::Azimuth,
    ];

    /// Maps the legacy integer selector 0..=4.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownMode` for any other code.
    pub fn from_code(code: i64) -> Result<Self, ConfigError> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or_else(|| ConfigError::UnknownMode(code.to_string()))
    }

    /// Legacy integer selector.
    pub fn code(&self) -> i64 {
        match self {
            Self::Total => 0,
            Self::PairMomentum => 1,
            Self::Imbalance => 2,
            Self::ImpactParameter => 3,
            Self::Azimuth => 4,
        }
    }

    /// Configuration name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::PairMomentum => "pair-momentum",
            Self::Imbalance => "imbalance",
            Self::ImpactParameter => "impact-parameter",
            Self::Azimuth => "azimuth",
        }
    }

    /// Whether the mode produces a histogram rather than a single number.
    #[inline]
    pub fn is_differential(&self) -> bool {
        !matches!(self, Self::Total)
    }

    /// Variable the histogram is binned in.
    pub fn binned_variable(&self) -> Option<Variable> {
        match self {
            Self::Total => None,
            Self::PairMomentum => Some(Variable::PairMagnitude),
            Self::Imbalance => Some(Variable::ImbalanceMagnitude),
            Self::ImpactParameter => Some(Variable::ImpactParameter),
            Self::Azimuth => Some(Variable::RelativeAngle),
        }
    }

    /// Number of sampled coordinates for midpoint-sampled bins.
    ///
    /// ```rust
    /// use wiggle_mc::modes::ObservableMode;
    ///
    /// assert_eq!(ObservableMode::Total.dimensions(false), 11);
    /// assert_eq!(ObservableMode::Imbalance.dimensions(true), 12);
    /// ```
    pub fn dimensions(&self, sudakov: bool) -> usize {
        let extra = if self.is_differential() { 4 } else { 5 };
        let soft = if sudakov { SUDAKOV_DIMENSIONS } else { 0 };
        BASE_DIMENSIONS + extra + soft
    }
}

impl fmt::Display for ObservableMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObservableMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalised.as_str() {
            "total" => Ok(Self::Total),
            "pair-momentum" | "pt" => Ok(Self::PairMomentum),
            "imbalance" | "qt" => Ok(Self::Imbalance),
            "impact-parameter" | "b" => Ok(Self::ImpactParameter),
            "azimuth" | "phi" => Ok(Self::Azimuth),
            other => match other.parse::<i64>() {
                Ok(code) => Self::from_code(code),
                Err(_) => Err(ConfigError::UnknownMode(s.to_string())),
            },
        }
    }
}

/// Accepts a mode name or a legacy integer code.
pub(crate) fn deserialize_mode<'de, D>(deserializer: D) -> Result<ObservableMode, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Code(i64),
        Name(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Code(code) => ObservableMode::from_code(code).map_err(de::Error::custom),
        Repr::Name(name) => name.parse().map_err(de::Error::custom),
    }
}

pub(crate) fn serialize_mode<S>(mode: &ObservableMode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(mode.name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_dimensions() {
        assert_eq!(ObservableMode::Total.dimensions(false), 11);
        assert_eq!(ObservableMode::Total.dimensions(true), 13);
        for mode in &ObservableMode::ALL[1..] {
            assert_eq!(mode.dimensions(false), 10);
            assert_eq!(mode.dimensions(true), 12);
        }
    }

    #[test]
    fn test_codes_round_trip() {
        for mode in ObservableMode::ALL {
            assert_eq!(ObservableMode::from_code(mode.code()).unwrap(), mode);
            assert_eq!(mode.name().parse::<ObservableMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_unknown_mode() {
        assert_eq!(
            ObservableMode::from_code(5),
            Err(ConfigError::UnknownMode("5".to_string()))
        );
        assert!(ObservableMode::from_code(-1).is_err());
        assert!("rapidity".parse::<ObservableMode>().is_err());
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(
            "Pair_Momentum".parse::<ObservableMode>().unwrap(),
            ObservableMode::PairMomentum
        );
        assert_eq!("2".parse::<ObservableMode>().unwrap(), ObservableMode::Imbalance);
    }
}
