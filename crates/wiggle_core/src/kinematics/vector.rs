//! Dual-representation transverse vector.
//!
//! A [`KinematicVector`] can be authored either in Cartesian `(x, y)` or
//! polar `(r, φ)` form. Exactly one representation is authoritative after a
//! write; the other is recomputed on first read and cached until the next
//! write. Reads only touch the cache, so accessors take `&self`.
//!
//! Arithmetic follows the representation that keeps the operation exact:
//! - addition and subtraction act on Cartesian components
//! - scalar multiplication and negation act on the polar form

use num_traits::{Float, FloatConst};
use std::cell::Cell;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Maps an angle into the half-open interval (−π, π].
///
/// Non-finite input is returned unchanged.
///
/// # Examples
///
/// ```rust
/// use wiggle_core::kinematics::normalise_angle;
/// use std::f64::consts::PI;
///
/// assert!((normalise_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
/// assert_eq!(normalise_angle(-PI), PI);
/// ```
#[inline]
pub fn normalise_angle<T: Float + FloatConst>(phi: T) -> T {
    if !phi.is_finite() {
        return phi;
    }
    let pi = T::PI();
    let two_pi = pi + pi;
    let mut wrapped = phi % two_pi;
    if wrapped > pi {
        wrapped = wrapped - two_pi;
    } else if wrapped <= -pi {
        wrapped = wrapped + two_pi;
    }
    wrapped
}

/// Brings a polar pair into canonical form: non-negative radius, angle in
/// (−π, π].
#[inline]
fn canonical_polar<T: Float + FloatConst>(r: T, phi: T) -> (T, T) {
    if r < T::zero() {
        (-r, normalise_angle(phi + T::PI()))
    } else {
        (r, normalise_angle(phi))
    }
}

/// Two-dimensional vector in the transverse plane.
///
/// # Type Parameters
///
/// * `T` - Floating-point type (defaults to `f64`)
///
/// # Examples
///
/// ```rust
/// use wiggle_core::kinematics::KinematicVector;
/// use std::f64::consts::FRAC_PI_2;
///
/// let v = KinematicVector::from_polar(2.0, FRAC_PI_2);
/// assert!(v.x().abs() < 1e-12);
/// assert!((v.y() - 2.0).abs() < 1e-12);
///
/// let w = KinematicVector::from_cartesian(1.0, 0.0);
/// let sum = &v + &w;
/// assert!((sum.x() - 1.0).abs() < 1e-12);
/// ```
#[derive(Clone)]
pub struct KinematicVector<T: Float + FloatConst = f64> {
    x: Cell<T>,
    y: Cell<T>,
    r: Cell<T>,
    phi: Cell<T>,
    cartesian_valid: Cell<bool>,
    polar_valid: Cell<bool>,
}

impl<T: Float + FloatConst> KinematicVector<T> {
    /// Returns the zero vector (both representations valid).
    #[inline]
    pub fn zero() -> Self {
        Self {
            x: Cell::new(T::zero()),
            y: Cell::new(T::zero()),
            r: Cell::new(T::zero()),
            phi: Cell::new(T::zero()),
            cartesian_valid: Cell::new(true),
            polar_valid: Cell::new(true),
        }
    }

    /// Creates a vector from Cartesian components.
    #[inline]
    pub fn from_cartesian(x: T, y: T) -> Self {
        Self {
            x: Cell::new(x),
            y: Cell::new(y),
            r: Cell::new(T::zero()),
            phi: Cell::new(T::zero()),
            cartesian_valid: Cell::new(true),
            polar_valid: Cell::new(false),
        }
    }

    /// Creates a vector from magnitude and angle.
    ///
    /// A negative magnitude is folded into the angle, and the angle is
    /// normalised into (−π, π].
    ///
    /// # Arguments
    ///
    /// * `r` - Magnitude
    /// * `phi` - Azimuthal angle in radians
    #[inline]
    pub fn from_polar(r: T, phi: T) -> Self {
        let (r, phi) = canonical_polar(r, phi);
        Self {
            x: Cell::new(T::zero()),
            y: Cell::new(T::zero()),
            r: Cell::new(r),
            phi: Cell::new(phi),
            cartesian_valid: Cell::new(false),
            polar_valid: Cell::new(true),
        }
    }

    /// Overwrites the vector with Cartesian components.
    ///
    /// The polar cache is invalidated.
    #[inline]
    pub fn set_cartesian(&mut self, x: T, y: T) {
        self.x.set(x);
        self.y.set(y);
        self.cartesian_valid.set(true);
        self.polar_valid.set(false);
    }

    /// Overwrites the vector with a magnitude and angle.
    ///
    /// The Cartesian cache is invalidated.
    #[inline]
    pub fn set_polar(&mut self, r: T, phi: T) {
        let (r, phi) = canonical_polar(r, phi);
        self.r.set(r);
        self.phi.set(phi);
        self.polar_valid.set(true);
        self.cartesian_valid.set(false);
    }

    #[inline]
    fn sync_cartesian(&self) {
        if !self.cartesian_valid.get() {
            let r = self.r.get();
            let (sin, cos) = self.phi.get().sin_cos();
            self.x.set(r * cos);
            self.y.set(r * sin);
            self.cartesian_valid.set(true);
        }
    }

    #[inline]
    fn sync_polar(&self) {
        if !self.polar_valid.get() {
            let x = self.x.get();
            let y = self.y.get();
            self.r.set(x.hypot(y));
            self.phi.set(normalise_angle(y.atan2(x)));
            self.polar_valid.set(true);
        }
    }

    /// Cartesian x component.
    #[inline]
    pub fn x(&self) -> T {
        self.sync_cartesian();
        self.x.get()
    }

    /// Cartesian y component.
    #[inline]
    pub fn y(&self) -> T {
        self.sync_cartesian();
        self.y.get()
    }

    /// Magnitude.
    #[inline]
    pub fn r(&self) -> T {
        self.sync_polar();
        self.r.get()
    }

    /// Azimuthal angle in (−π, π].
    #[inline]
    pub fn phi(&self) -> T {
        self.sync_polar();
        self.phi.get()
    }

    /// Magnitude; alias for [`r`](Self::r).
    #[inline]
    pub fn magnitude(&self) -> T {
        self.r()
    }

    /// Squared magnitude, computed from whichever representation is valid.
    #[inline]
    pub fn magnitude_squared(&self) -> T {
        if self.polar_valid.get() {
            let r = self.r.get();
            r * r
        } else {
            let x = self.x.get();
            let y = self.y.get();
            x * x + y * y
        }
    }

    /// Scalar product.
    #[inline]
    pub fn dot(&self, other: &Self) -> T {
        self.x() * other.x() + self.y() * other.y()
    }

    /// z component of the three-dimensional cross product.
    #[inline]
    pub fn cross(&self, other: &Self) -> T {
        self.x() * other.y() - self.y() * other.x()
    }
}

impl<T: Float + FloatConst> Default for KinematicVector<T> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Float + FloatConst + fmt::Debug> fmt::Debug for KinematicVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KinematicVector")
            .field("x", &self.x())
            .field("y", &self.y())
            .field("r", &self.r())
            .field("phi", &self.phi())
            .finish()
    }
}

// ================================================================
// Arithmetic
// ================================================================

impl<'a, 'b, T: Float + FloatConst> Add<&'b KinematicVector<T>> for &'a KinematicVector<T> {
    type Output = KinematicVector<T>;

    #[inline]
    fn add(self, rhs: &'b KinematicVector<T>) -> KinematicVector<T> {
        KinematicVector::from_cartesian(self.x() + rhs.x(), self.y() + rhs.y())
    }
}

impl<T: Float + FloatConst> Add for KinematicVector<T> {
    type Output = KinematicVector<T>;

    #[inline]
    fn add(self, rhs: KinematicVector<T>) -> KinematicVector<T> {
        &self + &rhs
    }
}

impl<'a, 'b, T: Float + FloatConst> Sub<&'b KinematicVector<T>> for &'a KinematicVector<T> {
    type Output = KinematicVector<T>;

    #[inline]
    fn sub(self, rhs: &'b KinematicVector<T>) -> KinematicVector<T> {
        KinematicVector::from_cartesian(self.x() - rhs.x(), self.y() - rhs.y())
    }
}

impl<T: Float + FloatConst> Sub for KinematicVector<T> {
    type Output = KinematicVector<T>;

    #[inline]
    fn sub(self, rhs: KinematicVector<T>) -> KinematicVector<T> {
        &self - &rhs
    }
}

impl<'a, T: Float + FloatConst> Mul<T> for &'a KinematicVector<T> {
    type Output = KinematicVector<T>;

    #[inline]
    fn mul(self, scale: T) -> KinematicVector<T> {
        KinematicVector::from_polar(self.r() * scale, self.phi())
    }
}

impl<T: Float + FloatConst> Mul<T> for KinematicVector<T> {
    type Output = KinematicVector<T>;

    #[inline]
    fn mul(self, scale: T) -> KinematicVector<T> {
        &self * scale
    }
}

impl<'a> Mul<&'a KinematicVector<f64>> for f64 {
    type Output = KinematicVector<f64>;

    #[inline]
    fn mul(self, v: &'a KinematicVector<f64>) -> KinematicVector<f64> {
        v * self
    }
}

impl Mul<KinematicVector<f64>> for f64 {
    type Output = KinematicVector<f64>;

    #[inline]
    fn mul(self, v: KinematicVector<f64>) -> KinematicVector<f64> {
        &v * self
    }
}

impl<'a, T: Float + FloatConst> Neg for &'a KinematicVector<T> {
    type Output = KinematicVector<T>;

    #[inline]
    fn neg(self) -> KinematicVector<T> {
        KinematicVector::from_polar(self.r(), self.phi() + T::PI())
    }
}

impl<T: Float + FloatConst> Neg for KinematicVector<T> {
    type Output = KinematicVector<T>;

    #[inline]
    fn neg(self) -> KinematicVector<T> {
        -&self
    }
}

impl<'a, T: Float + FloatConst> AddAssign<&'a KinematicVector<T>> for KinematicVector<T> {
    #[inline]
    fn add_assign(&mut self, rhs: &'a KinematicVector<T>) {
        let (x, y) = (self.x() + rhs.x(), self.y() + rhs.y());
        self.set_cartesian(x, y);
    }
}

impl<'a, T: Float + FloatConst> SubAssign<&'a KinematicVector<T>> for KinematicVector<T> {
    #[inline]
    fn sub_assign(&mut self, rhs: &'a KinematicVector<T>) {
        let (x, y) = (self.x() - rhs.x(), self.y() - rhs.y());
        self.set_cartesian(x, y);
    }
}

impl<T: Float + FloatConst> MulAssign<T> for KinematicVector<T> {
    #[inline]
    fn mul_assign(&mut self, scale: T) {
        let (r, phi) = (self.r() * scale, self.phi());
        self.set_polar(r, phi);
    }
}
