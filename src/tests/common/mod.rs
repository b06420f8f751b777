//! Common test utilities and mock implementations
//!
//! This module provides shared key material, credentials and in-memory
//! transports used across all test modules.

use std::sync::Mutex;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use openssl::rsa::Rsa;
use serde_json::Value;

use crate::config::{Environment, GatewayCredentials};
use crate::domain::CanonicalParameterSet;
use crate::infrastructure::transport::{HttpTransport, SoapTransport, TransportError};

pub const MERCHANT_ID: &str = "1001234567";
pub const QUERY_KEY: &str = "QUERYKEY";
pub const REFUND_KEY: &str = "K";

/// RSA key pair shared by every test. The same pair stands in for both the
/// merchant key and the provider key so signatures made here verify.
pub struct TestKeys {
    pub private_pem: Vec<u8>,
    pub public_pem: Vec<u8>,
}

pub static KEYS: Lazy<TestKeys> = Lazy::new(|| {
    let rsa = Rsa::generate(1024).expect("generate test key");
    TestKeys {
        private_pem: rsa.private_key_to_pem().expect("encode private key"),
        public_pem: rsa.public_key_to_pem().expect("encode public key"),
    }
});

/// Sandbox credentials with both shared secrets set
pub fn credentials(rmb_account: bool) -> GatewayCredentials {
    GatewayCredentials::from_pem(
        MERCHANT_ID,
        &KEYS.private_pem,
        &KEYS.public_pem,
        rmb_account,
        Environment::Sandbox,
    )
    .expect("test credentials")
    .with_query_key(Some(QUERY_KEY.to_string()))
        .with_refund_key(Some(REFUND_KEY.to_string()))
}

/// One recorded outbound call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub endpoint: String,
    pub operation: Option<String>,
    pub params: Vec<(String, String)>,
}

impl RecordedCall {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> Vec<&str> {
        self.params.iter().map(|(k, _)| k.as_str()).collect()
    }
}

/// Mock HTTP GET transport. Without a configured body every call fails
/// with "no response".
#[derive(Default)]
pub struct MockHttp {
    body: Option<String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockHttp {
    pub fn responding(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            calls: Mutex::default(),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for MockHttp {
    async fn get(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<String, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            endpoint: url.to_string(),
            operation: None,
            params: query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        });

        self.body
            .clone()
            .ok_or_else(|| TransportError::NoResponse("connection refused".to_string()))
    }
}

/// Mock SOAP transport
#[derive(Default)]
pub struct MockSoap {
    outcome: Option<Result<Value, String>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockSoap {
    pub fn returning(result: Value) -> Self {
        Self {
            outcome: Some(Ok(result)),
            calls: Mutex::default(),
        }
    }

    pub fn faulting(reason: impl Into<String>) -> Self {
        Self {
            outcome: Some(Err(reason.into())),
            calls: Mutex::default(),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SoapTransport for MockSoap {
    async fn call(
        &self,
        endpoint: &str,
        operation: &str,
        params: &CanonicalParameterSet,
    ) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            endpoint: endpoint.to_string(),
            operation: Some(operation.to_string()),
            params: params.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        });

        match &self.outcome {
            Some(Ok(result)) => Ok(result.clone()),
            Some(Err(reason)) => Err(TransportError::Fault(reason.clone())),
            None => Err(TransportError::NoResponse("connection refused".to_string())),
        }
    }
}

/// Assertion helpers
pub mod assertions {
    use crate::domain::{FailureCode, GatewayResult};

    pub fn assert_failure<T: std::fmt::Debug>(
        result: &GatewayResult<T>,
        code: &str,
        message: &str,
    ) {
        match result {
            GatewayResult::Failure { code: actual, message: actual_message } => {
                assert_eq!(actual.as_str(), code);
                assert_eq!(actual_message, message);
            }
            other => panic!("expected failure {}, got {:?}", code, other),
        }
    }

    pub fn assert_no_response<T: std::fmt::Debug>(result: &GatewayResult<T>) {
        let code = FailureCode::NoResponse.as_str();
        assert_failure(result, code, "Failed to get response from API.");
    }
}
