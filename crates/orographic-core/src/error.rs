//! Error taxonomy for the precipitation kernel.
//!
//! Every variant is raised before the forward transform starts; the kernel
//! never returns a partially computed field.

use thiserror::Error;

/// Errors reported for malformed kernel input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrecipError {
    /// Elevation (or base-rate) grid is empty, non-rectangular or non-finite.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// Grid spacing is not strictly positive.
    #[error("invalid grid spacing: dx={dx}, dy={dy} (both must be positive and finite)")]
    InvalidSpacing { dx: f64, dy: f64 },

    /// A parameter is missing, non-finite, out of range or of the wrong shape.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PrecipError {
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub fn missing(name: &'static str) -> Self {
        Self::invalid_parameter(name, "missing")
    }
}

impl From<serde_json::Error> for PrecipError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PrecipError>;
