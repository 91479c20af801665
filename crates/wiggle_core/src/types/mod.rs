//! Shared types.
//!
//! This module provides:
//! - `CoreError`: errors raised while constructing physics inputs

pub mod error;

pub use error::CoreError;
