//! Crate-level error types.

use std::fmt;

use crate::transform::TransformError;

/// Errors produced by the vantage crate.
#[derive(Debug)]
pub enum VantageError {
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// A transform-tree operation was given a dead handle.
    Transform(TransformError),
}

impl fmt::Display for VantageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Transform(e) => write!(f, "transform error: {e}"),
        }
    }
}

impl std::error::Error for VantageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transform(e) => Some(e),
            Self::OptionsParse(_) => None,
        }
    }
}

impl From<TransformError> for VantageError {
    fn from(e: TransformError) -> Self {
        Self::Transform(e)
    }
}
