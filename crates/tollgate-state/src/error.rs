//! Error types for release loading and validation.

use thiserror::Error;

/// Result type alias for state operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur while loading or validating a release.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to read release file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse release: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid ready threshold {0}%: must be between 0 and 100")]
    InvalidThreshold(u32),

    #[error("invalid release: {0}")]
    Invalid(String),
}
