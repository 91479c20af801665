//! Final-state lepton species.

use super::constants::{ELECTRON_MASS, MUON_MASS, TAU_MASS};
use crate::types::CoreError;
use std::fmt;
use std::str::FromStr;

/// Lepton flavour produced in the γγ → l⁺l⁻ process.
///
/// A specific flavour imposes the pair-production threshold `M > 2 m_l`.
/// [`Lepton::All`] imposes no threshold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Lepton {
    /// e⁺e⁻
    Electron,
    /// μ⁺μ⁻
    Muon,
    /// τ⁺τ⁻
    Tau,
    /// No flavour selected.
    #[default]
    All,
}

impl Lepton {
    /// Maps the legacy integer selector (1 = e, 2 = μ, 3 = τ, anything
    /// else = all).
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Lepton::Electron,
            2 => Lepton::Muon,
            3 => Lepton::Tau,
            _ => Lepton::All,
        }
    }

    /// Rest mass in GeV, or `None` for [`Lepton::All`].
    #[inline]
    pub fn mass(&self) -> Option<f64> {
        match self {
            Lepton::Electron => Some(ELECTRON_MASS),
            Lepton::Muon => Some(MUON_MASS),
            Lepton::Tau => Some(TAU_MASS),
            Lepton::All => None,
        }
    }

    /// Pair invariant-mass threshold `2 m_l` in GeV (zero for `All`).
    #[inline]
    pub fn pair_threshold(&self) -> f64 {
        self.mass().map_or(0.0, |m| 2.0 * m)
    }

    /// Lower-case name.
    pub fn name(&self) -> &'static str {
        match self {
            Lepton::Electron => "electron",
            Lepton::Muon => "muon",
            Lepton::Tau => "tau",
            Lepton::All => "all",
        }
    }
}

impl FromStr for Lepton {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "electron" | "e" => Ok(Lepton::Electron),
            "muon" | "mu" => Ok(Lepton::Muon),
            "tau" => Ok(Lepton::Tau),
            "all" => Ok(Lepton::All),
            _ => Err(CoreError::UnknownLepton(s.to_string())),
        }
    }
}

impl fmt::Display for Lepton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
