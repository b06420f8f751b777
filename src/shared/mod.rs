//! Shared utilities and common functionality
//!
//! This module contains error handling, logging and input validation
//! used across the crate.

pub mod error;
pub mod logging;
pub mod validation;

pub use error::{AppResult, GatewayError};
pub use logging::LoggingUtils;
pub use validation::ValidationUtils;
