//! Nuclear charge form factor and equivalent-photon flux.
//!
//! The charge distribution is a hard sphere of radius `R` folded with a
//! Yukawa potential of range `a₀`, giving
//!
//! ```text
//! F(k) = 3 (sin kR − kR cos kR) / (kR)³ · 1 / (1 + a₀² k²)
//! ```
//!
//! The transverse-momentum-dependent photon flux pairs two such factors:
//!
//! ```text
//! xf(k, k') = Z² α / π² · F(k) F(k') / (k² k'²)
//! ```

use super::constants::{fm_to_inverse_gev, ALPHA_EM};
use crate::math::spherical_kernel;
use crate::types::CoreError;
use std::f64::consts::{PI, SQRT_2};

/// Charge number of lead.
pub const LEAD_CHARGE: f64 = 82.0;

/// Hard-sphere radius of lead in fm.
pub const LEAD_RADIUS_FM: f64 = 6.62;

/// Yukawa range in fm.
pub const YUKAWA_RANGE_FM: f64 = 1.0 / SQRT_2;

/// Nucleus acting as a source of quasi-real photons.
///
/// # Examples
///
/// ```rust
/// use wiggle_core::physics::Nucleus;
///
/// let lead = Nucleus::lead();
/// assert!((lead.form_factor(0.0) - 1.0).abs() < 1e-12);
/// assert_eq!(lead.photon_flux(0.0, 0.01), 0.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nucleus {
    charge: f64,
    radius_fm: f64,
    yukawa_range_fm: f64,
}

impl Default for Nucleus {
    fn default() -> Self {
        Self::lead()
    }
}

impl Nucleus {
    /// Creates a nucleus description.
    ///
    /// # Arguments
    ///
    /// * `charge` - Charge number `Z`
    /// * `radius_fm` - Hard-sphere radius in fm
    /// * `yukawa_range_fm` - Yukawa range in fm
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidNucleus` if any argument is not a positive
    /// finite number.
    pub fn new(charge: f64, radius_fm: f64, yukawa_range_fm: f64) -> Result<Self, CoreError> {
        for (name, value) in [
            ("charge", charge),
            ("radius_fm", radius_fm),
            ("yukawa_range_fm", yukawa_range_fm),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(CoreError::InvalidNucleus { name, value });
            }
        }
        Ok(Self {
            charge,
            radius_fm,
            yukawa_range_fm,
        })
    }

    /// Lead-208 with the default radius and Yukawa range.
    pub fn lead() -> Self {
        Self {
            charge: LEAD_CHARGE,
            radius_fm: LEAD_RADIUS_FM,
            yukawa_range_fm: YUKAWA_RANGE_FM,
        }
    }

    /// Charge number `Z`.
    #[inline]
    pub fn charge(&self) -> f64 {
        self.charge
    }

    /// Hard-sphere radius in fm.
    #[inline]
    pub fn radius_fm(&self) -> f64 {
        self.radius_fm
    }

    /// Yukawa range in fm.
    #[inline]
    pub fn yukawa_range_fm(&self) -> f64 {
        self.yukawa_range_fm
    }

    /// Charge form factor at momentum `k` (GeV).
    #[inline]
    pub fn form_factor(&self, k: f64) -> f64 {
        let radius = fm_to_inverse_gev(self.radius_fm);
        let a0 = fm_to_inverse_gev(self.yukawa_range_fm);
        spherical_kernel(k * radius) / (1.0 + a0 * a0 * k * k)
    }

    /// Photon flux product for the two photons emitted by this nucleus.
    ///
    /// Returns `0.0` if either momentum is non-positive.
    ///
    /// # Arguments
    ///
    /// * `k` - Magnitude of the first photon's virtuality vector (GeV)
    /// * `k_prime` - Magnitude of the conjugate-amplitude photon (GeV)
    #[inline]
    pub fn photon_flux(&self, k: f64, k_prime: f64) -> f64 {
        if k <= 0.0 || k_prime <= 0.0 {
            return 0.0;
        }
        let z2 = self.charge * self.charge;
        z2 * ALPHA_EM / (PI * PI) * self.form_factor(k) * self.form_factor(k_prime)
            / (k * k * k_prime * k_prime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lead_defaults() {
        let lead = Nucleus::lead();
        assert_eq!(lead.charge(), 82.0);
        assert_eq!(lead.radius_fm(), 6.62);
        assert_relative_eq!(lead.yukawa_range_fm(), 0.707_106_781, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_nucleus() {
        assert!(matches!(
            Nucleus::new(0.0, 6.62, 0.7),
            Err(CoreError::InvalidNucleus { name: "charge", .. })
        ));
        assert!(Nucleus::new(82.0, f64::NAN, 0.7).is_err());
        assert!(Nucleus::new(79.0, 6.38, 0.7).is_ok());
    }

    #[test]
    fn test_form_factor_decreases_at_small_k() {
        let lead = Nucleus::lead();
        let f1 = lead.form_factor(0.005);
        let f2 = lead.form_factor(0.02);
        assert!(f1 < 1.0);
        assert!(f2 < f1);
    }

    #[test]
    fn test_flux_vetoes_non_positive_momenta() {
        let lead = Nucleus::lead();
        assert_eq!(lead.photon_flux(-0.1, 0.1), 0.0);
        assert_eq!(lead.photon_flux(0.1, 0.0), 0.0);
    }

    #[test]
    fn test_flux_symmetric_and_scales_with_z_squared() {
        let lead = Nucleus::lead();
        assert_relative_eq!(
            lead.photon_flux(0.01, 0.03),
            lead.photon_flux(0.03, 0.01),
            max_relative = 1e-14
        );
        let half = Nucleus::new(41.0, LEAD_RADIUS_FM, YUKAWA_RANGE_FM).unwrap();
        assert_relative_eq!(
            lead.photon_flux(0.01, 0.02),
            4.0 * half.photon_flux(0.01, 0.02),
            max_relative = 1e-12
        );
    }
}
