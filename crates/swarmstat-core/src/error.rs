//! Shared error type across swarmstat crates.

use thiserror::Error;

/// Stable error codes (used in ingest API responses).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Counter update with a negative or NaN delta.
    InvalidDelta,
    /// Metric family used with a kind other than the registered one.
    KindMismatch,
    /// Malformed metric or label name.
    InvalidName,
    /// Optional configuration is absent; the service degrades instead of failing.
    ConfigurationMissing,
    /// Invalid input / malformed payload or config.
    BadRequest,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ErrorCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidDelta => "INVALID_DELTA",
            ErrorCode::KindMismatch => "KIND_MISMATCH",
            ErrorCode::InvalidName => "INVALID_NAME",
            ErrorCode::ConfigurationMissing => "CONFIGURATION_MISSING",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, SwarmStatError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum SwarmStatError {
    #[error("invalid counter delta {delta} for {name}")]
    InvalidDelta { name: String, delta: f64 },
    #[error("metric {name} is already registered as a {registered}")]
    KindMismatch { name: String, registered: &'static str },
    #[error("invalid name: {0}")]
    InvalidName(String),
    #[error("configuration missing: {0}")]
    ConfigurationMissing(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl SwarmStatError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            SwarmStatError::InvalidDelta { .. } => ErrorCode::InvalidDelta,
            SwarmStatError::KindMismatch { .. } => ErrorCode::KindMismatch,
            SwarmStatError::InvalidName(_) => ErrorCode::InvalidName,
            SwarmStatError::ConfigurationMissing(_) => ErrorCode::ConfigurationMissing,
            SwarmStatError::BadRequest(_) => ErrorCode::BadRequest,
            SwarmStatError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            SwarmStatError::Internal(_) => ErrorCode::Internal,
        }
    }
}
