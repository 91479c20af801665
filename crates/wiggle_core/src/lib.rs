//! # wiggle_core: Physics Foundation for Photon-Induced Cross Sections
//!
//! ## Layer 1 (Foundation) Role
//!
//! wiggle_core is the bottom layer of the workspace, providing:
//! - Two-dimensional transverse vectors with cached polar/Cartesian forms
//!   (`kinematics`)
//! - Special functions: Bessel J0 (`math::special`)
//! - Physical constants, nuclear form factors, lepton species and parton
//!   densities (`physics`)
//! - Error types: `CoreError` (`types::error`)
//!
//! ## Dependencies
//!
//! Layer 1 has no dependencies on other wiggle_* crates:
//! - num-traits: Traits for generic numerical computation
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use wiggle_core::kinematics::KinematicVector;
//! use wiggle_core::physics::Nucleus;
//!
//! let k1 = KinematicVector::from_polar(0.05, 0.3);
//! let ka = KinematicVector::from_polar(0.04, -1.2);
//! let dt = &k1 - &ka;
//! assert!(dt.r() > 0.0);
//!
//! let lead = Nucleus::lead();
//! let flux = lead.photon_flux(k1.r(), ka.r());
//! assert!(flux > 0.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for `Lepton`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod kinematics;
pub mod math;
pub mod physics;
pub mod types;
