//! Transport dispatch
//!
//! Payments are rendered as a browser form, queries go over SOAP and
//! refunds over a plain HTTP GET. [`Dispatcher`] has one entry point per
//! route; whatever goes wrong on the wire leaves it as the uniform
//! "no response" failure.

pub mod form;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::result::NO_RESPONSE_MESSAGE;
use crate::domain::{CanonicalParameterSet, FailureCode, GatewayResult, OperationKind};
use crate::shared::logging::LoggingUtils;

pub use form::PaymentForm;

/// Failures between sending a request and holding a decodable answer
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("no response: {0}")]
    NoResponse(String),

    #[error("[SOAPFault] {0}")]
    Fault(String),

    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<crate::infrastructure::xml::XmlError> for TransportError {
    fn from(err: crate::infrastructure::xml::XmlError) -> Self {
        TransportError::Malformed(err.to_string())
    }
}

/// HTTP GET primitive
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// GET `url` with `query` appended and return the response body
    async fn get(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<String, TransportError>;
}

/// SOAP RPC primitive
#[async_trait]
pub trait SoapTransport: Send + Sync {
    /// Invoke `operation` at `endpoint` with `params` as its single argument
    /// and return the decoded result object
    async fn call(
        &self,
        endpoint: &str,
        operation: &str,
        params: &CanonicalParameterSet,
    ) -> Result<Value, TransportError>;
}

/// Routes signed parameter sets to the transport primitives
#[derive(Clone)]
pub struct Dispatcher {
    http: Arc<dyn HttpTransport>,
    soap: Arc<dyn SoapTransport>,
}

impl Dispatcher {
    pub fn new(http: Arc<dyn HttpTransport>, soap: Arc<dyn SoapTransport>) -> Self {
        Self { http, soap }
    }

    /// Payment route: the browser carries the form, nothing is sent from here
    pub fn form_redirect(
        &self,
        request_id: &str,
        action: &str,
        params: CanonicalParameterSet,
    ) -> PaymentForm {
        debug!(
            request_id = %request_id,
            action = %action,
            fields = params.len(),
            "Rendering payment form"
        );
        PaymentForm::new(action, params)
    }

    /// Query route: one SOAP call returning the decoded result object
    pub async fn soap_call(
        &self,
        request_id: &str,
        operation: OperationKind,
        endpoint: &str,
        rpc: &str,
        params: CanonicalParameterSet,
    ) -> GatewayResult<Value> {
        LoggingUtils::log_dispatch(request_id, operation.as_str(), endpoint);
        let started = Instant::now();
        let outcome = self.soap.call(endpoint, rpc, &params).await;
        settle(request_id, operation, endpoint, started, outcome)
    }

    /// Refund route: every field sent as a query parameter
    pub async fn http_get(
        &self,
        request_id: &str,
        operation: OperationKind,
        endpoint: &str,
        params: CanonicalParameterSet,
    ) -> GatewayResult<String> {
        LoggingUtils::log_dispatch(request_id, operation.as_str(), endpoint);
        let started = Instant::now();
        let outcome = self.http.get(endpoint, &params.to_pairs()).await;
        settle(request_id, operation, endpoint, started, outcome)
    }
}

fn settle<T>(
    request_id: &str,
    operation: OperationKind,
    endpoint: &str,
    started: Instant,
    outcome: Result<T, TransportError>,
) -> GatewayResult<T> {
    let duration_ms = started.elapsed().as_millis() as u64;
    match outcome {
        Ok(answer) => {
            debug!(
                request_id = %request_id,
                duration_ms = %duration_ms,
                "Transport returned a response"
            );
            GatewayResult::Success(answer)
        }
        Err(err) => {
            warn!(
                request_id = %request_id,
                operation = %operation,
                endpoint = %endpoint,
                error = %err,
                "Transport failure"
            );
            LoggingUtils::log_failure(
                request_id,
                operation.as_str(),
                &FailureCode::NoResponse,
                NO_RESPONSE_MESSAGE,
                duration_ms,
            );
            GatewayResult::no_response()
        }
    }
}
