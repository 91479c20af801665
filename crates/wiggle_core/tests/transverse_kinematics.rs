//! Integration tests for transverse-plane kinematics.
//!
//! Rebuilds the pair/imbalance decomposition used by the dilepton integrand
//! and checks it through the public API only.

use approx::assert_relative_eq;
use std::f64::consts::PI;
use wiggle_core::kinematics::KinematicVector;
use wiggle_core::math::bessel_j0;
use wiggle_core::physics::constants::{fm_to_inverse_gev, PROTON_MASS_SQ};
use wiggle_core::physics::Nucleus;

/// p1 = q/2 + P and p2 = q/2 − P must sum to q and differ by 2P.
#[test]
fn test_pair_decomposition_round_trip() {
    let pair = KinematicVector::from_polar(12.0, 0.7);
    let imbalance = KinematicVector::from_polar(0.08, -2.1);

    let p1 = &(&imbalance * 0.5) + &pair;
    let p2 = &(&imbalance * 0.5) - &pair;

    let sum = &p1 + &p2;
    assert_relative_eq!(sum.x(), imbalance.x(), epsilon = 1e-12);
    assert_relative_eq!(sum.y(), imbalance.y(), epsilon = 1e-12);

    let diff = &p1 - &p2;
    assert_relative_eq!(diff.r(), 2.0 * pair.r(), epsilon = 1e-12);
    assert_relative_eq!(diff.phi(), pair.phi(), epsilon = 1e-12);
}

/// Photon momenta k2 = q − k1 close the momentum balance.
#[test]
fn test_momentum_balance() {
    let q = KinematicVector::from_polar(0.05, 1.0);
    let k1 = KinematicVector::from_polar(0.02, -0.4);
    let k2 = &q - &k1;
    let total = &k1 + &k2;
    assert_relative_eq!(total.r(), q.r(), epsilon = 1e-14);
    assert_relative_eq!(total.phi(), q.phi(), epsilon = 1e-12);
}

/// Angle combinations used in interference terms stay well defined.
#[test]
fn test_phase_combination_periodic() {
    let a = KinematicVector::from_polar(1.0, PI - 0.01);
    let b = KinematicVector::from_polar(1.0, -PI + 0.01);
    let phase = a.phi() - b.phi();
    assert_relative_eq!(phase.cos(), (-0.02_f64).cos(), epsilon = 1e-12);
}

/// The ingredients of the photon flux combine into finite, positive values
/// across the typical momentum range.
#[test]
fn test_flux_ingredients_finite() {
    let lead = Nucleus::lead();
    for k in [1e-4, 1e-3, 1e-2, 5e-2] {
        let x = 1e-3;
        let virtuality = (x * x * PROTON_MASS_SQ + k * k).sqrt();
        let flux = lead.photon_flux(virtuality, virtuality);
        assert!(flux.is_finite() && flux > 0.0, "flux at k={k} was {flux}");
    }
}

/// The impact-parameter kernel oscillates but stays bounded.
#[test]
fn test_bessel_kernel_bounded() {
    let b = fm_to_inverse_gev(20.0);
    for i in 0..100 {
        let dt = i as f64 * 0.01;
        let kernel = b / (2.0 * PI) * bessel_j0(b * dt);
        assert!(kernel.abs() <= b / (2.0 * PI) * (1.0 + 1e-6));
    }
}
