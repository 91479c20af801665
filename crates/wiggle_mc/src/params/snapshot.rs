//! Per-bin parameter snapshots.
//!
//! Concurrent bins never share mutable state: each job receives its own
//! [`ParameterSnapshot`], a copy of the run parameters in which the binned
//! observable is optionally pinned to the bin's representative value.

use super::DileptonParameters;
use crate::modes::{ObservableMode, Variable};
use wiggle_core::physics::Nucleus;

/// Observable pinned for the duration of one bin.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum FixedObservable {
    /// Nothing pinned; every variable comes from the sample point.
    #[default]
    Free,
    /// |P_T| in GeV.
    PairMomentum(f64),
    /// |q_T| in GeV.
    Imbalance(f64),
    /// b in GeV⁻¹.
    ImpactParameter(f64),
    /// Angle between q_T and P_T in radians.
    Azimuth(f64),
}

impl FixedObservable {
    /// Pins the binned observable of `mode` to `value`.
    pub fn for_mode(mode: ObservableMode, value: f64) -> Self {
        match mode {
            ObservableMode::Total => Self::Free,
            ObservableMode::PairMomentum => Self::PairMomentum(value),
            ObservableMode::Imbalance => Self::Imbalance(value),
            ObservableMode::ImpactParameter => Self::ImpactParameter(value),
            ObservableMode::Azimuth => Self::Azimuth(value),
        }
    }

    /// The pinned variable, if any.
    pub fn variable(&self) -> Option<Variable> {
        match self {
            Self::Free => None,
            Self::PairMomentum(_) => Some(Variable::PairMagnitude),
            Self::Imbalance(_) => Some(Variable::ImbalanceMagnitude),
            Self::ImpactParameter(_) => Some(Variable::ImpactParameter),
            Self::Azimuth(_) => Some(Variable::RelativeAngle),
        }
    }

    /// The pinned value, if any.
    pub fn value(&self) -> Option<f64> {
        match *self {
            Self::Free => None,
            Self::PairMomentum(v)
            | Self::Imbalance(v)
            | Self::ImpactParameter(v)
            | Self::Azimuth(v) => Some(v),
        }
    }
}

/// Immutable parameter set owned by one bin job.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSnapshot {
    parameters: DileptonParameters,
    nucleus: Nucleus,
    fixed: FixedObservable,
}

impl ParameterSnapshot {
    /// Copies `parameters` and pins `fixed`.
    pub fn new(parameters: &DileptonParameters, nucleus: Nucleus, fixed: FixedObservable) -> Self {
        Self {
            parameters: parameters.clone(),
            nucleus,
            fixed,
        }
    }

    /// Run parameters.
    #[inline]
    pub fn parameters(&self) -> &DileptonParameters {
        &self.parameters
    }

    /// Photon-emitting nucleus.
    #[inline]
    pub fn nucleus(&self) -> &Nucleus {
        &self.nucleus
    }

    /// Pinned observable.
    #[inline]
    pub fn fixed(&self) -> FixedObservable {
        self.fixed
    }

    /// Pinned value of `variable`, if it is the pinned one.
    #[inline]
    pub fn fixed_value(&self, variable: Variable) -> Option<f64> {
        if self.fixed.variable() == Some(variable) {
            self.fixed.value()
        } else {
            None
        }
    }
}
