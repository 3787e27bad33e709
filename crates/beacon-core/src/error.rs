//! Shared error type across beacon crates.

use thiserror::Error;

/// Stable error categories, safe to surface in logs and test assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value was rejected by an instrument (e.g. negative counter delta).
    InvalidValue,
    /// Histogram bucket descriptors are malformed or overlap.
    InvalidBucket,
    /// Configuration failed to parse or validate.
    InvalidConfig,
    /// Unsupported configuration version.
    UnsupportedVersion,
    /// Internal failure (I/O and the like).
    Internal,
}

impl ErrorKind {
    /// String representation used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidValue => "INVALID_VALUE",
            ErrorKind::InvalidBucket => "INVALID_BUCKET",
            ErrorKind::InvalidConfig => "INVALID_CONFIG",
            ErrorKind::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, BeaconError>;

/// Unified error type used by core and observer.
#[derive(Debug, Error)]
pub enum BeaconError {
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error("invalid histogram bucket: {0}")]
    InvalidBucket(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl BeaconError {
    /// Map the error to its stable category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BeaconError::InvalidValue(_) => ErrorKind::InvalidValue,
            BeaconError::InvalidBucket(_) => ErrorKind::InvalidBucket,
            BeaconError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            BeaconError::UnsupportedVersion => ErrorKind::UnsupportedVersion,
            BeaconError::Internal(_) => ErrorKind::Internal,
        }
    }
}
