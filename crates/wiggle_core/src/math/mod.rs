//! Mathematical utilities.
//!
//! This module provides:
//! - `special`: Bessel J0 and the spherical form-factor kernel

pub mod special;

pub use special::{bessel_j0, spherical_kernel};
