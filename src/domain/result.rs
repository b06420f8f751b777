//! Uniform outcome of every gateway call

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde::Deserialize;

/// One flattened row of a query result
pub type Record = serde_json::Map<String, serde_json::Value>;

pub const NO_RESPONSE_MESSAGE: &str = "Failed to get response from API.";
pub const SIGNATURE_MISMATCH_MESSAGE: &str = "Sign doesn't verified.";

/// Failure codes carried by [`GatewayResult::Failure`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailureCode {
    /// Transport failure: no answer, connection error, remote fault, unreadable payload
    NoResponse,
    /// Inbound notification whose signature did not verify
    SignatureMismatch,
    /// Refund endpoint answered with `RESULT != Y`
    RefundRejected,
    /// Business-level rejection reported by the provider with its own code
    Provider(String),
}

impl FailureCode {
    pub fn as_str(&self) -> &str {
        match self {
            FailureCode::NoResponse => "304",
            FailureCode::SignatureMismatch => "402",
            FailureCode::RefundRejected => "500",
            FailureCode::Provider(code) => code,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, FailureCode::NoResponse)
    }
}

impl std::fmt::Display for FailureCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FailureCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Tagged outcome: either a payload or a code/message pair, never both
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayResult<T> {
    Success(T),
    Failure { code: FailureCode, message: String },
}

impl<T> GatewayResult<T> {
    pub fn failure(code: FailureCode, message: impl Into<String>) -> Self {
        GatewayResult::Failure { code, message: message.into() }
    }

    /// The uniform "no answer" outcome
    pub fn no_response() -> Self {
        Self::failure(FailureCode::NoResponse, NO_RESPONSE_MESSAGE)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GatewayResult::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            GatewayResult::Success(data) => Some(data),
            GatewayResult::Failure { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            GatewayResult::Success(data) => Some(data),
            GatewayResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<(&FailureCode, &str)> {
        match self {
            GatewayResult::Success(_) => None,
            GatewayResult::Failure { code, message } => Some((code, message.as_str())),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> GatewayResult<U> {
        match self {
            GatewayResult::Success(data) => GatewayResult::Success(f(data)),
            GatewayResult::Failure { code, message } => GatewayResult::Failure { code, message },
        }
    }

    /// Chain a step that may itself fail with a gateway outcome
    pub fn and_then<U, F: FnOnce(T) -> GatewayResult<U>>(self, f: F) -> GatewayResult<U> {
        match self {
            GatewayResult::Success(data) => f(data),
            GatewayResult::Failure { code, message } => GatewayResult::Failure { code, message },
        }
    }
}

#[derive(serde::Serialize)]
struct ErrorBody<'a> {
    code: &'a FailureCode,
    message: &'a str,
}

impl<T: Serialize> Serialize for GatewayResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("GatewayResult", 2)?;
        match self {
            GatewayResult::Success(data) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            GatewayResult::Failure { code, message } => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", &ErrorBody { code, message })?;
            }
        }
        state.end()
    }
}

/// Successful refund acknowledgement
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundReceipt {
    pub order_id: Option<String>,
    /// Provider's `TXORDER`, the refund reference
    pub refund_reference: Option<String>,
    pub amount: String,
}
