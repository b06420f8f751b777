//! Configuration validation module
//!
//! Cross-field checks that the `validator` derives cannot express.

use std::path::Path;

use crate::config::app_config::{GatewayConfig, MerchantConfig, TransportConfig};
use crate::shared::error::{AppResult, GatewayError};

/// Configuration validator for additional validation logic
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the complete configuration
    pub fn validate_config(config: &GatewayConfig) -> AppResult<()> {
        config.validate_config()?;

        Self::validate_merchant(&config.merchant)?;
        Self::validate_transport(&config.transport)?;

        Ok(())
    }

    /// Key files must exist before credentials are built from them
    fn validate_merchant(merchant: &MerchantConfig) -> AppResult<()> {
        if !merchant.merchant_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(GatewayError::Config(
                "merchant ID must be alphanumeric".to_string()
            ));
        }

        for (path, kind) in [
            (&merchant.private_key_path, "Private"),
            (&merchant.public_key_path, "Public"),
        ] {
            if !Path::new(path).exists() {
                return Err(GatewayError::Config(format!("{} Key file not found.", kind)));
            }
        }

        if let Some(url) = &merchant.base_url {
            if !merchant.sandbox && !url.starts_with("https://") {
                tracing::warn!(base_url = %url, "Production endpoint override is not using HTTPS");
            }
        }

        if merchant.query_key.is_none() {
            tracing::warn!("No query key configured - order and refund queries will be rejected");
        }

        if merchant.refund_key.is_none() {
            tracing::warn!("No refund key configured - refunds will be rejected");
        }

        Ok(())
    }

    fn validate_transport(transport: &TransportConfig) -> AppResult<()> {
        if let Some(namespace) = &transport.soap_namespace {
            if namespace.trim().is_empty() {
                return Err(GatewayError::Config(
                    "SOAP namespace cannot be blank".to_string()
                ));
            }
        }

        Ok(())
    }
}
