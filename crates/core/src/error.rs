//! Engine error model.

use thiserror::Error;

/// Result type used across the analytics engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine-level error.
///
/// Only caller-supplied configuration can fail (zero-length window,
/// non-positive trial count, non-finite multiplier). Data-quality problems
/// never error: analyzers substitute the documented sentinel values instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// An analysis parameter failed validation.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl EngineError {
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}
