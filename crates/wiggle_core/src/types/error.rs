//! Error types for structured error handling.

use thiserror::Error;

/// Errors raised while constructing physics inputs.
///
/// # Examples
/// ```
/// use wiggle_core::types::CoreError;
///
/// let err = CoreError::UnknownLepton("quark".to_string());
/// assert_eq!(format!("{}", err), "Unknown lepton species: quark");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Lepton name not recognised.
    #[error("Unknown lepton species: {0}")]
    UnknownLepton(String),

    /// Nucleus parameter is not a positive finite number.
    #[error("Invalid nucleus parameter '{name}': {value}")]
    InvalidNucleus {
        /// Parameter name
        name: &'static str,
        /// Rejected value
        value: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = CoreError::InvalidNucleus {
            name: "radius_fm",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "Invalid nucleus parameter 'radius_fm': -1");
    }
}
