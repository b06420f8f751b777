//! Inbound payment notifications

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

use crate::domain::schema::PAY_RESULT_SUCCESS;

const PAID_KEY: &str = "paid";

/// A notification whose signature verified.
///
/// Serializes as one flat object: `paid` followed by the echoed fields. An
/// inbound parameter that is itself named `paid` stays in `fields` but is
/// left out of the serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentNotification {
    /// `true` only when `payResult == "10"`
    pub paid: bool,
    /// Every inbound parameter, echoed as received
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl PaymentNotification {
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        let paid = fields.get("payResult").map(String::as_str) == Some(PAY_RESULT_SUCCESS);
        Self { paid, fields }
    }

    pub fn order_id(&self) -> Option<&str> {
        self.fields.get("orderId").map(String::as_str)
    }

    pub fn deal_id(&self) -> Option<&str> {
        self.fields.get("dealId").map(String::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

impl Serialize for PaymentNotification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let echoed = self.fields.iter().filter(|(key, _)| key.as_str() != PAID_KEY);
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(PAID_KEY, &self.paid)?;
        for (key, value) in echoed {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Body the merchant answers a notification with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyAck {
    pub received: bool,
    pub redirect_url: String,
}

impl NotifyAck {
    pub fn new(received: bool, redirect_url: impl Into<String>) -> Self {
        Self {
            received,
            redirect_url: redirect_url.into(),
        }
    }

    /// `<result>{0|1}</result><redirecturl>{url}</redirecturl>`, URL written verbatim
    pub fn render(&self) -> String {
        format!(
            "<result>{}</result><redirecturl>{}</redirecturl>",
            if self.received { 1 } else { 0 },
            self.redirect_url
        )
    }
}

impl std::fmt::Display for NotifyAck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
