//! Response normalization
//!
//! Turns raw transport output into [`GatewayResult`] values: SOAP result
//! objects into record lists, flat refund XML into a receipt, and
//! verification verdicts into notification outcomes.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::domain::result::SIGNATURE_MISMATCH_MESSAGE;
use crate::domain::{
    ErrorCodeTable, FailureCode, GatewayResult, OperationRequest, PaymentNotification, Record,
    RefundReceipt, UNKNOWN_ERROR_CODE,
};
use crate::infrastructure::xml;

const ERR_CODE_FIELD: &str = "errCode";
const REFUND_ACCEPTED: &str = "Y";

pub struct ResponseNormalizer {
    codes: Arc<ErrorCodeTable>,
}

impl ResponseNormalizer {
    pub fn new(codes: Arc<ErrorCodeTable>) -> Self {
        Self { codes }
    }

    pub fn codes(&self) -> &ErrorCodeTable {
        &self.codes
    }

    /// Records under `list_key` when the provider reports no error code.
    ///
    /// A blank or all-zero `errCode` means no error. A non-zero code, or a
    /// missing list, fails with the provider code and its table message.
    pub fn soap_records(&self, result: &Value, list_key: &str) -> GatewayResult<Vec<Record>> {
        let code = scalar_text(result.get(ERR_CODE_FIELD));

        if is_success_code(&code) {
            if let Some(records) = result.get(list_key).and_then(as_record_list) {
                return GatewayResult::Success(records);
            }
        }

        let code = if code.is_empty() { UNKNOWN_ERROR_CODE.to_string() } else { code };
        let message = self.codes.message(&code).to_string();
        GatewayResult::failure(FailureCode::Provider(code), message)
    }

    /// Receipt from the refund channel's flat XML body
    pub fn refund_receipt(&self, body: &str) -> GatewayResult<RefundReceipt> {
        let values = match xml::parse_flat(body) {
            Ok(values) if !values.is_empty() => values,
            Ok(_) => return GatewayResult::no_response(),
            Err(err) => {
                warn!(error = %err, "Unreadable refund response");
                return GatewayResult::no_response();
            }
        };

        if values.get("RESULT").map(String::as_str) == Some(REFUND_ACCEPTED) {
            GatewayResult::Success(RefundReceipt {
                order_id: values.get("ORDERID").cloned(),
                refund_reference: values.get("TXORDER").cloned(),
                amount: values.get("AMOUNT").cloned().unwrap_or_else(|| "0".to_string()),
            })
        } else {
            let code = values.get("CODE").cloned().unwrap_or_default();
            GatewayResult::failure(FailureCode::RefundRejected, code)
        }
    }

    /// Outcome of an inbound notification after signature verification
    pub fn notification(
        &self,
        verified: bool,
        params: OperationRequest,
    ) -> GatewayResult<PaymentNotification> {
        if verified {
            GatewayResult::Success(PaymentNotification::new(params.into_map()))
        } else {
            GatewayResult::failure(FailureCode::SignatureMismatch, SIGNATURE_MISMATCH_MESSAGE)
        }
    }
}

impl Default for ResponseNormalizer {
    fn default() -> Self {
        Self::new(Arc::new(ErrorCodeTable::standard()))
    }
}

fn is_success_code(code: &str) -> bool {
    code.chars().all(|c| c == '0')
}

fn scalar_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// A SOAP list arrives as an array, as a single object, or wrapped in one
/// element per item (`<orders><detail/>…</orders>`)
fn as_record_list(value: &Value) -> Option<Vec<Record>> {
    match value {
        Value::Array(items) => {
            Some(items.iter().filter_map(|item| item.as_object().cloned()).collect())
        }
        Value::Object(map) if map.len() == 1 => match map.values().next() {
            Some(inner @ Value::Array(_)) => as_record_list(inner),
            Some(Value::Object(record)) => Some(vec![record.clone()]),
            _ => Some(vec![map.clone()]),
        },
        Value::Object(map) => Some(vec![map.clone()]),
        _ => None,
    }
}
