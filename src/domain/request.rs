//! Caller-supplied operation input

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::error::{AppResult, GatewayError};

/// Operation kinds understood by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Payment,
    Query,
    Refund,
    RefundQuery,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Payment => "payment",
            OperationKind::Query => "query",
            OperationKind::Refund => "refund",
            OperationKind::RefundQuery => "refund_query",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw field/value mapping supplied by the caller for one operation.
///
/// Values are kept as their string rendering; numbers passed through
/// [`OperationRequest::from_json`] are rendered the way they were written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationRequest {
    fields: BTreeMap<String, String>,
}

impl OperationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.fields.insert(key.into(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Value of `key`, or `default` when the caller did not set it
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.fields
    }

    /// Build a request from a JSON object of scalar values.
    ///
    /// `null` entries are treated as unset. Nested arrays and objects are rejected.
    pub fn from_json(value: &Value) -> AppResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| GatewayError::validation("request", "must be an object."))?;

        let mut request = Self::new();
        for (key, value) in object {
            match value {
                Value::Null => {}
                Value::String(s) => request.insert(key.clone(), s),
                Value::Number(n) => request.insert(key.clone(), n),
                Value::Bool(b) => request.insert(key.clone(), if *b { "1" } else { "" }),
                Value::Array(_) | Value::Object(_) => {
                    return Err(GatewayError::validation(key.clone(), "must be a scalar value."));
                }
            }
        }

        Ok(request)
    }
}

impl<K, V> FromIterator<(K, V)> for OperationRequest
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut request = Self::new();
        for (k, v) in iter {
            request.insert(k, v);
        }
        request
    }
}

impl From<BTreeMap<String, String>> for OperationRequest {
    fn from(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }
}

impl From<std::collections::HashMap<String, String>> for OperationRequest {
    fn from(fields: std::collections::HashMap<String, String>) -> Self {
        fields.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        let request = OperationRequest::from_json(&json!({
            "orderId": "ORD1",
            "orderAmount": 19.99,
            "quantity": 2,
            "ext2": null
        }))
        .unwrap();

        assert_eq!(request.get("orderId"), Some("ORD1"));
        assert_eq!(request.get("orderAmount"), Some("19.99"));
        assert_eq!(request.get("quantity"), Some("2"));
        assert!(!request.contains("ext2"));
    }

    #[test]
    fn test_from_json_rejects_nested_values() {
        let err = OperationRequest::from_json(&json!({"orders": [1, 2]})).unwrap_err();
        assert!(err.is_validation());
        assert!(OperationRequest::from_json(&json!("ORD1")).is_err());
    }

    #[test]
    fn test_get_or_defaults() {
        let request: OperationRequest = [("language", "2")].into_iter().collect();
        assert_eq!(request.get_or("language", "1"), "2");
        assert_eq!(request.get_or("version", "v2.0"), "v2.0");
    }
}
