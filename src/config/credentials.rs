//! Merchant credentials
//!
//! [`CredentialProvider`] is the only view of configuration the gateway
//! core needs. [`GatewayCredentials`] is the stock implementation; callers
//! with their own secret store can implement the trait instead.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::app_config::MerchantConfig;
use crate::shared::error::{AppResult, GatewayError};

/// Suffix appended to the merchant id for RMB accounts
pub const RMB_ACCOUNT_SUFFIX: &str = "01";

/// Provider environment, selecting the endpoint root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Sandbox,
    Production,
}

impl Environment {
    pub fn from_sandbox_flag(sandbox: bool) -> Self {
        if sandbox {
            Environment::Sandbox
        } else {
            Environment::Production
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Sandbox => "https://sandbox.99bill.com",
            Environment::Production => "https://www.99bill.com",
        }
    }
}

/// Remote services, one per operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceEndpoint {
    Pay,
    OrderQuery,
    Refund,
    RefundQuery,
}

impl ServiceEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            ServiceEndpoint::Pay => "gateway/recvMerchantInfoAction.htm",
            ServiceEndpoint::OrderQuery => "apipay/services/gatewayOrderQuery?wsdl",
            ServiceEndpoint::Refund => "webapp/receiveDrawbackAction.do",
            ServiceEndpoint::RefundQuery => "gatewayapi/services/gatewayRefundQuery?wsdl",
        }
    }
}

/// Capability interface over merchant settings and key material
pub trait CredentialProvider: Send + Sync {
    fn merchant_id(&self) -> &str;

    fn is_rmb_account(&self) -> bool;

    fn environment(&self) -> Environment;

    /// PEM-encoded RSA private key used for payment signing
    fn private_key_pem(&self) -> &[u8];

    /// PEM-encoded provider public key (or X.509 certificate) used for notification verification
    fn public_key_pem(&self) -> &[u8];

    /// Shared secret for server-to-server queries
    fn query_key(&self) -> Option<&str>;

    /// Shared secret for the refund channel
    fn refund_key(&self) -> Option<&str>;

    /// Merchant id as sent in `merchantAcctId`
    fn merchant_account_id(&self) -> String {
        if self.is_rmb_account() {
            format!("{}{}", self.merchant_id(), RMB_ACCOUNT_SUFFIX)
        } else {
            self.merchant_id().to_string()
        }
    }

    fn base_url(&self) -> String {
        self.environment().base_url().to_string()
    }

    fn endpoint(&self, service: ServiceEndpoint) -> String {
        format!("{}/{}", self.base_url().trim_end_matches('/'), service.path())
    }
}

/// Immutable merchant credentials
#[derive(Clone)]
pub struct GatewayCredentials {
    merchant_id: String,
    rmb_account: bool,
    environment: Environment,
    private_key_pem: Vec<u8>,
    public_key_pem: Vec<u8>,
    query_key: Option<String>,
    refund_key: Option<String>,
    base_url_override: Option<String>,
}

impl GatewayCredentials {
    /// Build credentials from already-loaded key material
    pub fn from_pem(
        merchant_id: &str,
        private_key_pem: impl AsRef<[u8]>,
        public_key_pem: impl AsRef<[u8]>,
        rmb_account: bool,
        environment: Environment,
    ) -> AppResult<Self> {
        let merchant_id = merchant_id.trim();
        if merchant_id.is_empty() {
            return Err(GatewayError::Config("merchant ID must be valid string".to_string()));
        }

        Ok(Self {
            merchant_id: merchant_id.to_string(),
            rmb_account,
            environment,
            private_key_pem: normalize_pem(private_key_pem.as_ref(), "RSA PRIVATE KEY", "Private")?,
            public_key_pem: normalize_pem(public_key_pem.as_ref(), "PUBLIC KEY", "Public")?,
            query_key: None,
            refund_key: None,
            base_url_override: None,
        })
    }

    /// Load credentials, reading key files from disk
    pub fn from_config(config: &MerchantConfig) -> AppResult<Self> {
        let private_key = read_key_file(&config.private_key_path, "Private")?;
        let public_key = read_key_file(&config.public_key_path, "Public")?;

        let credentials = Self::from_pem(
            &config.merchant_id,
            private_key,
            public_key,
            config.rmb_account,
            Environment::from_sandbox_flag(config.sandbox),
        )?
        .with_query_key(config.query_key.clone())
        .with_refund_key(config.refund_key.clone());

        Ok(match &config.base_url {
            Some(url) => credentials.with_base_url(url.clone()),
            None => credentials,
        })
    }

    pub fn with_query_key(mut self, key: Option<String>) -> Self {
        self.query_key = key.filter(|k| !k.is_empty());
        self
    }

    pub fn with_refund_key(mut self, key: Option<String>) -> Self {
        self.refund_key = key.filter(|k| !k.is_empty());
        self
    }

    /// Point every endpoint at a different root, e.g. a local stub
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url_override = Some(url.into());
        self
    }
}

impl CredentialProvider for GatewayCredentials {
    fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    fn is_rmb_account(&self) -> bool {
        self.rmb_account
    }

    fn environment(&self) -> Environment {
        self.environment
    }

    fn private_key_pem(&self) -> &[u8] {
        &self.private_key_pem
    }

    fn public_key_pem(&self) -> &[u8] {
        &self.public_key_pem
    }

    fn query_key(&self) -> Option<&str> {
        self.query_key.as_deref()
    }

    fn refund_key(&self) -> Option<&str> {
        self.refund_key.as_deref()
    }

    fn base_url(&self) -> String {
        self.base_url_override
            .clone()
            .unwrap_or_else(|| self.environment.base_url().to_string())
    }
}

impl fmt::Debug for GatewayCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayCredentials")
            .field("merchant_id", &self.merchant_id)
            .field("rmb_account", &self.rmb_account)
            .field("environment", &self.environment)
            .field("private_key_pem", &"<redacted>")
            .field("public_key_pem", &"<redacted>")
            .field("query_key", &self.query_key.as_ref().map(|_| "<redacted>"))
            .field("refund_key", &self.refund_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn read_key_file(path: &str, kind: &str) -> AppResult<Vec<u8>> {
    if path.trim().is_empty() {
        return Err(GatewayError::Config(format!("Invalid {} key path", kind.to_lowercase())));
    }

    if !Path::new(path).exists() {
        return Err(GatewayError::Config(format!("{} Key file not found.", kind)));
    }

    std::fs::read(path).map_err(|e| {
        GatewayError::Config(format!("Failed to read {} key file: {}", kind.to_lowercase(), e))
    })
}

/// Wrap bare base64 key material into PEM armor, 64 characters per line
fn normalize_pem(content: &[u8], label: &str, kind: &str) -> AppResult<Vec<u8>> {
    let text = String::from_utf8_lossy(content);
    let body = text.trim();
    if body.is_empty() {
        return Err(GatewayError::Config(format!("{} key content is empty", kind)));
    }

    if body.contains("-----") {
        return Ok(content.to_vec());
    }

    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    let mut lines = vec![format!("-----BEGIN {}-----", label)];
    lines.extend(
        compact
            .as_bytes()
            .chunks(64)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned()),
    );
    lines.push(format!("-----END {}-----", label));

    Ok(lines.join("\n").into_bytes())
}
