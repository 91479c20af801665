//! Histogram bin descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One histogram bin.
///
/// Bins are produced in ascending order; `index` is the position in the
/// final output and never changes with scheduling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BinDescriptor {
    /// Position in the histogram.
    pub index: usize,
    /// Left edge.
    pub lower: f64,
    /// Right edge.
    pub upper: f64,
    /// Representative value `(lower + upper) / 2`.
    pub midpoint: f64,
}

impl BinDescriptor {
    /// Creates a descriptor; the midpoint is derived from the edges.
    #[inline]
    pub fn new(index: usize, lower: f64, upper: f64) -> Self {
        Self {
            index,
            lower,
            upper,
            midpoint: 0.5 * (lower + upper),
        }
    }

    /// `upper − lower`.
    #[inline]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// How the binned observable is sampled inside a bin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinSampling {
    /// Pin the observable to the bin midpoint.
    #[default]
    Midpoint,
    /// Integrate the observable over the bin and divide by its width.
    Averaged,
}

impl BinSampling {
    /// Configuration name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Midpoint => "midpoint",
            Self::Averaged => "averaged",
        }
    }
}

impl fmt::Display for BinSampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BinSampling {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "midpoint" => Ok(Self::Midpoint),
            "averaged" | "average" => Ok(Self::Averaged),
            _ => Err(format!(
                "Invalid bin sampling '{}'. Valid values: midpoint, averaged",
                s
            )),
        }
    }
}
