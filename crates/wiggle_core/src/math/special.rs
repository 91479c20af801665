//! Special functions used by the cross-section integrands.
//!
//! ## Functions
//!
//! - [`bessel_j0`]: Bessel function of the first kind, order zero
//! - [`spherical_kernel`]: `3 (sin x − x cos x) / x³`, the Fourier transform
//!   of a uniformly charged sphere
//!
//! ## Accuracy
//!
//! `bessel_j0` uses rational approximations for `|x| < 8` and the standard
//! asymptotic expansion with polynomial corrections above. Absolute error is
//! below `1e-8` over the whole real line.

/// Below this argument the spherical kernel switches to its Taylor series.
const SPHERICAL_SERIES_CUTOFF: f64 = 1.0e-3;

/// Bessel function of the first kind, order zero.
///
/// # Examples
///
/// ```rust
/// use wiggle_core::math::bessel_j0;
///
/// assert!((bessel_j0(0.0) - 1.0).abs() < 1e-12);
/// assert!(bessel_j0(2.404_825_557_695_773).abs() < 1e-7);
/// ```
pub fn bessel_j0(x: f64) -> f64 {
    let ax = x.abs();
    if ax < 8.0 {
        let y = x * x;
        let num = 57_568_490_574.0
            + y * (-13_362_590_354.0
                + y * (651_619_640.7 + y * (-11_214_424.18 + y * (77_392.330_17 + y * (-184.905_245_6)))));
        let den = 57_568_490_411.0
            + y * (1_029_532_985.0
                + y * (9_494_680.718 + y * (59_272.648_53 + y * (267.853_271_2 + y))));
        num / den
    } else {
        let z = 8.0 / ax;
        let y = z * z;
        let xx = ax - 0.785_398_164;
        let p = 1.0
            + y * (-0.109_862_862_7e-2
                + y * (0.273_451_040_7e-4 + y * (-0.207_337_063_9e-5 + y * 0.209_388_721_1e-6)));
        let q = -0.156_249_999_5e-1
            + y * (0.143_048_876_5e-3
                + y * (-0.691_114_765_1e-5 + y * (0.762_109_516_1e-6 - y * 0.934_935_152e-7)));
        (0.636_619_772 / ax).sqrt() * (xx.cos() * p - z * xx.sin() * q)
    }
}

/// Form factor of a uniformly charged sphere, `3 (sin x − x cos x) / x³`.
///
/// Normalised to 1 at `x = 0`; small arguments use `1 − x²/10 + x⁴/280`
/// to avoid cancellation.
///
/// # Arguments
///
/// * `x` - Dimensionless product of momentum transfer and radius
#[inline]
pub fn spherical_kernel(x: f64) -> f64 {
    let ax = x.abs();
    if ax < SPHERICAL_SERIES_CUTOFF {
        let x2 = ax * ax;
        return 1.0 - x2 / 10.0 + x2 * x2 / 280.0;
    }
    let (sin, cos) = ax.sin_cos();
    3.0 * (sin - ax * cos) / (ax * ax * ax)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Reference values from Abramowitz & Stegun, Table 9.1.
    const J0_TABLE: [(f64, f64); 6] = [
        (0.5, 0.938_469_807_240_813),
        (1.0, 0.765_197_686_557_966_6),
        (3.0, -0.260_051_954_901_933_4),
        (5.0, -0.177_596_771_314_338_3),
        (10.0, -0.245_935_764_451_348_3),
        (25.0, 0.096_266_783_275_958_17),
    ];

    #[test]
    fn test_bessel_j0_reference_values() {
        for (x, expected) in J0_TABLE.iter() {
            assert_relative_eq!(bessel_j0(*x), *expected, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_bessel_j0_is_even() {
        for x in [0.3, 2.0, 7.9, 8.1, 40.0] {
            assert_eq!(bessel_j0(x), bessel_j0(-x));
        }
    }

    #[test]
    fn test_bessel_j0_first_zero() {
        assert!(bessel_j0(2.404_825_557_695_773).abs() < 1e-7);
    }

    #[test]
    fn test_bessel_j0_continuous_at_switch() {
        assert_relative_eq!(bessel_j0(8.0 - 1e-9), bessel_j0(8.0 + 1e-9), epsilon = 1e-7);
    }

    #[test]
    fn test_spherical_kernel_limit() {
        assert_relative_eq!(spherical_kernel(0.0), 1.0, epsilon = 1e-15);
        assert_relative_eq!(
            spherical_kernel(SPHERICAL_SERIES_CUTOFF * 0.999),
            spherical_kernel(SPHERICAL_SERIES_CUTOFF * 1.001),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_spherical_kernel_first_zero() {
        // tan x = x at x ≈ 4.493409
        assert!(spherical_kernel(4.493_409_457_909_064).abs() < 1e-9);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_bessel_j0_bounded(x in -500.0_f64..500.0) {
                prop_assert!(bessel_j0(x).abs() <= 1.0 + 1e-8);
            }

            #[test]
            fn test_spherical_kernel_bounded(x in 0.0_f64..200.0) {
                prop_assert!(spherical_kernel(x).abs() <= 1.0 + 1e-12);
            }
        }
    }
}
