//! Transverse-plane kinematics.
//!
//! This module provides:
//! - [`KinematicVector`]: 2-D vector with lazily synchronised Cartesian and
//!   polar representations
//! - [`normalise_angle`]: maps any finite angle into (−π, π]

mod vector;

pub use vector::{normalise_angle, KinematicVector};
