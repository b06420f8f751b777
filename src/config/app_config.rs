//! Gateway configuration structures
//!
//! This module contains the configuration structures for the gateway client.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Merchant account configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MerchantConfig {
    /// Merchant identifier issued by the provider
    #[validate(length(min = 1))]
    pub merchant_id: String,

    /// RMB account (adds the `01` suffix to `merchantAcctId`)
    #[serde(default)]
    pub rmb_account: bool,

    /// Use the sandbox endpoints
    #[serde(default)]
    pub sandbox: bool,

    /// Path to the merchant's RSA private key (PEM or bare base64)
    #[validate(length(min = 1))]
    pub private_key_path: String,

    /// Path to the provider's public key or certificate
    #[validate(length(min = 1))]
    pub public_key_path: String,

    /// Shared secret for order and refund queries
    #[serde(default)]
    pub query_key: Option<String>,

    /// Shared secret for refunds
    #[serde(default)]
    pub refund_key: Option<String>,

    /// Endpoint root override, e.g. for a local stub
    #[serde(default)]
    #[validate(url)]
    pub base_url: Option<String>,
}

/// Transport configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TransportConfig {
    /// Timeout for refund HTTP GET calls, in seconds
    #[validate(range(min = 1, max = 300))]
    pub http_timeout_seconds: u64,

    /// Timeout for SOAP query calls, in seconds
    #[validate(range(min = 1, max = 300))]
    pub soap_timeout_seconds: u64,

    /// Namespace of the SOAP operation element; defaults to the service URL
    #[serde(default)]
    pub soap_namespace: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            http_timeout_seconds: 60,
            soap_timeout_seconds: 60,
            soap_namespace: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggingConfig {
    /// Log level
    #[validate(length(min = 1))]
    pub level: String,

    /// Log format ("json" or "text")
    #[validate(length(min = 1))]
    pub format: String,

    /// Enable structured logging
    pub structured: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
            structured: true,
        }
    }
}

/// Gateway client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Merchant account configuration
    pub merchant: MerchantConfig,

    /// Transport configuration
    #[serde(default)]
    pub transport: TransportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> crate::AppResult<Self> {
        Self::load_from("Gateway")
    }

    /// Load configuration from the named file (any format `config` understands)
    /// and `BILL99__*` variables
    pub fn load_from(name: &str) -> crate::AppResult<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(name).required(false))
            .add_source(config::Environment::with_prefix("BILL99").separator("__"))
            .build()
            .map_err(|e| {
                crate::GatewayError::Config(format!("Failed to build configuration: {}", e))
            })?;

        let config: GatewayConfig = config
            .try_deserialize()
            .map_err(|e| {
                crate::GatewayError::Config(format!("Failed to deserialize configuration: {}", e))
            })?;

        config.validate_config()?;

        Ok(config)
    }

    /// Validate every section
    pub fn validate_config(&self) -> Result<(), validator::ValidationErrors> {
        self.merchant.validate()?;
        self.transport.validate()?;
        self.logging.validate()?;

        Ok(())
    }
}
