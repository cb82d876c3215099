//! Error types for marga-gen.

use thiserror::Error;

/// Trajectory generation error type.
///
/// `Infeasible` is recoverable: the caller may relax limits and retry.
/// Logic defects (an empty acceleration interval, NaN from a constraint,
/// an out-of-range index) panic instead of surfacing here.
#[derive(Error, Debug)]
pub enum MargaError {
    /// The requested distance/velocity/acceleration/jerk combination has
    /// no valid motion profile.
    #[error("Infeasible profile: {0}")]
    Infeasible(String),

    /// Invalid configuration or tessellation tolerances.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed input document.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for MargaError {
    fn from(e: serde_json::Error) -> Self {
        MargaError::Parse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MargaError>;
