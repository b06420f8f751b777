//! Error handling module
//!
//! Local failures (bad configuration, invalid input, signing failures) are
//! raised as [`GatewayError`]. Anything that happens after a request leaves
//! the process is folded into a [`crate::domain::GatewayResult`] instead.

use thiserror::Error;

/// Errors raised before any network call is attempted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Malformed or incomplete configuration, unreadable key material
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller-supplied field is missing or malformed
    #[error("{field} {reason}")]
    Validation { field: String, reason: String },

    /// Cryptographic failure while producing a signature
    #[error("Signing error: {0}")]
    Signing(String),
}

impl GatewayError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        GatewayError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Numeric code reported alongside the error, matching the provider client's conventions
    pub fn code(&self) -> u16 {
        match self {
            GatewayError::Config(_) => 500,
            GatewayError::Validation { .. } => 402,
            GatewayError::Signing(_) => 501,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, GatewayError::Validation { .. })
    }
}

/// Application result type
pub type AppResult<T> = Result<T, GatewayError>;

impl From<config::ConfigError> for GatewayError {
    fn from(err: config::ConfigError) -> Self {
        GatewayError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for GatewayError {
    fn from(err: validator::ValidationErrors) -> Self {
        GatewayError::Config(format!("Configuration validation failed: {}", err))
    }
}

impl From<openssl::error::ErrorStack> for GatewayError {
    fn from(err: openssl::error::ErrorStack) -> Self {
        GatewayError::Signing(format!("[openssl] {}", err))
    }
}
