//! Validation utilities module
//!
//! Field checks applied to caller input before any parameter set is signed.
//! The rule for a field is chosen from its name: names containing `url`
//! must look like a URL, names containing `amount`, `price` or `cost` must
//! be a positive decimal.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::OperationRequest;
use crate::shared::error::{AppResult, GatewayError};

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:(?:https?|ftp)://|www\.)[-a-z0-9+&@#/%?=~_|!:,.;]*[-a-z0-9+&@#/%=~_|]")
        .expect("URL pattern is a valid regex")
});

/// Validation utilities for operation requests
pub struct ValidationUtils;

impl ValidationUtils {
    /// Validate every listed field of the request, in order, stopping at the first failure
    pub fn validate_fields(request: &OperationRequest, fields: &[&str]) -> AppResult<()> {
        for field in fields {
            let value = request.get(field).unwrap_or_default();
            Self::validate_field(field, value)?;
        }

        Ok(())
    }

    /// Validate a single named value
    pub fn validate_field(field: &str, value: &str) -> AppResult<()> {
        if Self::is_blank(value) {
            return Err(GatewayError::validation(field, "is Required."));
        }

        let name = field.to_lowercase();
        if name.contains("url") && !Self::is_url(value) {
            return Err(GatewayError::validation(field, "is not valid URL."));
        }

        if ["amount", "price", "cost"].iter().any(|k| name.contains(k)) {
            Self::parse_positive_decimal(field, value)?;
        }

        Ok(())
    }

    /// Parse a positive, finite decimal
    pub fn parse_positive_decimal(field: &str, value: &str) -> AppResult<f64> {
        let amount: f64 = value
            .trim()
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite())
            .ok_or_else(|| GatewayError::validation(field, "is not valid."))?;

        if amount <= 0.0 {
            return Err(GatewayError::validation(field, "must be greater than 0"));
        }

        Ok(amount)
    }

    pub fn is_url(value: &str) -> bool {
        URL_PATTERN.is_match(value)
    }

    /// Empty strings and a bare "0" count as absent
    pub fn is_blank(value: &str) -> bool {
        value.is_empty() || value == "0"
    }
}
