//! Configuration management module
//!
//! This module handles loading and validating gateway settings and exposes
//! the credential capability interface consumed by the core.

pub mod app_config;
pub mod credentials;
pub mod validation;

pub use app_config::{GatewayConfig, LoggingConfig, MerchantConfig, TransportConfig};
pub use credentials::{CredentialProvider, Environment, GatewayCredentials, ServiceEndpoint};
pub use validation::ConfigValidator;
