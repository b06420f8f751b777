//! reqwest-backed SOAP 1.1 transport for the query services
//!
//! The services are RPC-style: one operation element whose single argument
//! `in0` carries the signed parameters as child elements.

use std::time::Duration;

use async_trait::async_trait;
use quick_xml::escape::escape;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::TransportConfig;
use crate::domain::CanonicalParameterSet;
use crate::infrastructure::adapters::http_client::build_client;
use crate::infrastructure::transport::{SoapTransport, TransportError};
use crate::infrastructure::xml;
use crate::shared::error::AppResult;

const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const WSDL_SUFFIX: &str = "?wsdl";

/// Adapter posting SOAP envelopes
#[derive(Clone)]
pub struct ReqwestSoapTransport {
    client: Client,
    namespace: Option<String>,
}

impl ReqwestSoapTransport {
    pub fn new(timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            namespace: None,
        })
    }

    pub fn from_config(config: &TransportConfig) -> AppResult<Self> {
        let client = Self::new(Duration::from_secs(config.soap_timeout_seconds))?;
        Ok(client.with_namespace(config.soap_namespace.clone()))
    }

    /// Namespace of the operation element. Defaults to the service URL.
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }
}

/// Service address for a WSDL location
pub fn service_url(endpoint: &str) -> &str {
    endpoint.strip_suffix(WSDL_SUFFIX).unwrap_or(endpoint)
}

pub fn build_envelope(namespace: &str, operation: &str, params: &CanonicalParameterSet) -> String {
    let fields: String = params
        .iter()
        .map(|(name, value)| format!("<{0}>{1}</{0}>", name, escape(value)))
        .collect();

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<soapenv:Envelope xmlns:soapenv="{}" xmlns:ns1="{}"><soapenv:Body>"#,
            r#"<ns1:{2}><in0>{3}</in0></ns1:{2}>"#,
            r#"</soapenv:Body></soapenv:Envelope>"#
        ),
        SOAP_ENVELOPE_NS,
        escape(namespace),
        operation,
        fields
    )
}

/// Extract the operation result from a response envelope.
///
/// `Body/<operation>Response/<out>` is unwrapped to the result object; a
/// `Fault` becomes [`TransportError::Fault`].
pub fn decode_response(body: &str) -> Result<Value, TransportError> {
    let (root, envelope) = xml::parse_tree(body)?;
    if root != "Envelope" {
        return Err(TransportError::Malformed(format!("unexpected root element {}", root)));
    }

    let body = envelope
        .get("Body")
        .and_then(Value::as_object)
        .ok_or_else(|| TransportError::Malformed("missing SOAP body".to_string()))?;

    if let Some(fault) = body.get("Fault") {
        let reason = fault
            .get("faultstring")
            .and_then(Value::as_str)
            .unwrap_or("unknown fault");
        return Err(TransportError::Fault(reason.to_string()));
    }

    let response = body
        .values()
        .next()
        .ok_or_else(|| TransportError::Malformed("empty SOAP body".to_string()))?;

    match response {
        Value::Object(wrapper) if wrapper.len() == 1 => match wrapper.values().next() {
            Some(result @ Value::Object(_)) => Ok(result.clone()),
            _ => Ok(response.clone()),
        },
        Value::Object(_) => Ok(response.clone()),
        _ => Err(TransportError::Malformed("SOAP result is not an object".to_string())),
    }
}

#[async_trait]
impl SoapTransport for ReqwestSoapTransport {
    async fn call(
        &self,
        endpoint: &str,
        operation: &str,
        params: &CanonicalParameterSet,
    ) -> Result<Value, TransportError> {
        let url = service_url(endpoint);
        let namespace = self.namespace.as_deref().unwrap_or(url);
        let envelope = build_envelope(namespace, operation, params);

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", "\"\"")
            .body(envelope)
            .send()
            .await
            .map_err(|e| TransportError::NoResponse(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::NoResponse(format!("Failed to read response: {}", e)))?;

        debug!(
            status = %status,
            bytes = body.len(),
            operation = %operation,
            "Received SOAP response"
        );

        // Faults arrive with a 500 status, so decode before looking at it
        match decode_response(&body) {
            Err(TransportError::Malformed(_)) if !status.is_success() => {
                Err(TransportError::HttpStatus(status.as_u16()))
            }
            other => other,
        }
    }
}
