//! reqwest-backed HTTP GET transport for the refund channel

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::TransportConfig;
use crate::infrastructure::transport::{HttpTransport, TransportError};
use crate::shared::error::{AppResult, GatewayError};

/// Build a client with a request timeout, certificate verification on and TLS 1.2 or newer
pub(crate) fn build_client(timeout: Duration) -> AppResult<Client> {
    Client::builder()
        .timeout(timeout)
        .min_tls_version(reqwest::tls::Version::TLS_1_2)
        .build()
        .map_err(|e| GatewayError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Adapter performing plain GET requests
#[derive(Clone)]
pub struct ReqwestHttpTransport {
    client: Client,
}

impl ReqwestHttpTransport {
    pub fn new(timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            client: build_client(timeout)?,
        })
    }

    pub fn from_config(config: &TransportConfig) -> AppResult<Self> {
        Self::new(Duration::from_secs(config.http_timeout_seconds))
    }
}

#[async_trait]
impl HttpTransport for ReqwestHttpTransport {
    async fn get(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<String, TransportError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| TransportError::NoResponse(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::NoResponse(format!("Failed to read response: {}", e)))?;

        if body.trim().is_empty() {
            return Err(TransportError::NoResponse("empty body".to_string()));
        }

        debug!(bytes = body.len(), "Received HTTP response body");
        Ok(body)
    }
}
