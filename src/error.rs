//! Crate-level error types.

use std::fmt;

/// Errors produced by the camkit crate.
///
/// Numerical degeneracies never surface here; the algebra falls back to
/// identity or zero values and reports through the `log` facade instead.
#[derive(Debug)]
pub enum KernelError {
    /// `set_controller` was called without a navigator.
    MissingNavigator,
    /// Projection parameters rejected by the camera.
    InvalidProjection(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Options that parsed but hold unusable values.
    InvalidOptions(String),
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingNavigator => {
                write!(f, "no camera navigator supplied")
            }
            Self::InvalidProjection(msg) => {
                write!(f, "invalid projection: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::InvalidOptions(msg) => {
                write!(f, "invalid options: {msg}")
            }
        }
    }
}

impl std::error::Error for KernelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for KernelError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
