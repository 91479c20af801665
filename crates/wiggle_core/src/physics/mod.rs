//! Physics inputs shared by all processes.
//!
//! This module provides:
//! - `constants`: particle masses, couplings and unit conversions
//! - `form_factor`: nuclear charge form factor and photon flux ([`Nucleus`])
//! - `lepton`: final-state lepton species ([`Lepton`])
//! - `pdf`: parton densities and α_s ([`PartonDistribution`])

pub mod constants;
pub mod form_factor;
pub mod lepton;
pub mod pdf;

pub use form_factor::Nucleus;
pub use lepton::Lepton;
pub use pdf::{PartonDistribution, ToyPartonDistribution};
