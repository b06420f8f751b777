//! 99bill Gateway Client - a protocol adapter for the 99bill payment gateway
//!
//! This library builds the provider's canonical parameter sets, signs them
//! (RSA-SHA1 for payments and notifications, MD5 digests for queries and
//! refunds), delivers them over the matching channel and normalizes every
//! answer into a [`GatewayResult`].

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

#[cfg(test)]
mod tests;

pub use application::Gateway;
pub use config::{CredentialProvider, Environment, GatewayConfig, GatewayCredentials};
pub use domain::{
    ErrorCodeTable, FailureCode, GatewayResult, OperationRequest, PaymentNotification, Record,
    RefundReceipt,
};
pub use infrastructure::transport::PaymentForm;
pub use shared::error::{AppResult, GatewayError};
pub use shared::logging::LoggingUtils;
