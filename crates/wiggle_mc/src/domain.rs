//! Rectangular integration domains.

use crate::error::ConfigError;

/// Ordered `(lower, upper)` bounds, one pair per integration dimension.
///
/// Bounds are finite with `lower <= upper`; a zero-width dimension yields a
/// zero integral.
///
/// # Examples
///
/// ```rust
/// use wiggle_mc::domain::IntegrationDomain;
///
/// let domain = IntegrationDomain::new(vec![(0.0, 2.0), (-1.0, 1.0)]).unwrap();
/// assert_eq!(domain.dimensions(), 2);
/// assert_eq!(domain.volume(), 4.0);
///
/// let narrowed = domain.with_override(1, 0.0, 0.5).unwrap();
/// assert_eq!(narrowed.bounds(1), (0.0, 0.5));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct IntegrationDomain {
    bounds: Vec<(f64, f64)>,
}

impl IntegrationDomain {
    /// Creates a domain from bound pairs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRange` for non-finite bounds or
    /// `lower > upper`.
    pub fn new(bounds: Vec<(f64, f64)>) -> Result<Self, ConfigError> {
        for &(lower, upper) in &bounds {
            check_bounds(lower, upper)?;
        }
        Ok(Self { bounds })
    }

    /// Unit hypercube of the given dimension.
    pub fn unit(dimensions: usize) -> Self {
        Self {
            bounds: vec![(0.0, 1.0); dimensions],
        }
    }

    /// Number of dimensions.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.bounds.len()
    }

    /// Bounds of dimension `dim`.
    ///
    /// # Panics
    ///
    /// Panics if `dim` is out of range.
    #[inline]
    pub fn bounds(&self, dim: usize) -> (f64, f64) {
        self.bounds[dim]
    }

    /// All bound pairs in dimension order.
    #[inline]
    pub fn as_slice(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    /// Product of the widths of all dimensions.
    pub fn volume(&self) -> f64 {
        self.bounds.iter().map(|(lo, hi)| hi - lo).product()
    }

    /// Returns a copy with dimension `dim` replaced by `[lower, upper]`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `dim` is out of range or the bounds are
    /// invalid.
    pub fn with_override(&self, dim: usize, lower: f64, upper: f64) -> Result<Self, ConfigError> {
        if dim >= self.bounds.len() {
            return Err(ConfigError::InvalidParameter {
                name: "dimension",
                value: format!("{} exceeds domain dimension {}", dim, self.bounds.len()),
            });
        }
        check_bounds(lower, upper)?;
        let mut bounds = self.bounds.clone();
        bounds[dim] = (lower, upper);
        Ok(Self { bounds })
    }

    /// Maps a point of the unit hypercube into this domain.
    pub fn from_unit(&self, unit: &[f64]) -> Vec<f64> {
        self.bounds
            .iter()
            .zip(unit)
            .map(|(&(lo, hi), &u)| lo + u * (hi - lo))
            .collect()
    }
}

fn check_bounds(lower: f64, upper: f64) -> Result<(), ConfigError> {
    if !(lower.is_finite() && upper.is_finite()) || lower > upper {
        return Err(ConfigError::InvalidRange {
            name: "domain",
            min: lower,
            max: upper,
        });
    }
    Ok(())
}
