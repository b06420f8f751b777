//! Provider code tables

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Code used when the provider returns a code this table does not know
pub const UNKNOWN_ERROR_CODE: &str = "00000";

const STANDARD_ERROR_CODES: &[(&str, &str)] = &[
    ("00000", "Non-Identified Problem"),
    ("10001", "The gateway version is incorrect or does not exist"),
    ("10002", "Signature type is incorrect or does not exist"),
    ("10003", "The CNY account format is incorrect"),
    ("10004", "The query method is incorrect or does not exist"),
    ("10005", "The query mode is incorrect or does not exist"),
    ("10006", "The query start time is incorrect"),
    ("10007", "The query end time is incorrect"),
    ("10008", "The merchant order number is not in the correct format"),
    (
        "10009",
        "The contact information of the payer is incorrect. Please enter the legal contact address.",
    ),
    ("10010", "Character set input is incorrect"),
    ("10011", "Order date is incorrect, Please enter correct date yyyyMMdd"),
    ("10012", "Order time is incorrect, please enter the time in yyyyMMddhhmmss format"),
    ("10017", "Extended parameter one is incorrect"),
    ("10018", "Extended parameter two is incorrect"),
    ("10019", "The specified payment method is incorrect"),
    (
        "10022",
        "Unsupported language type, the language supported by the system is 1. [Chinese], 2. [English]",
    ),
    ("10023", "Unsupported signature type, the system supports a signature type of 1. [MD5]"),
    ("10024", "The merchant has not opened RMB gateway."),
    ("10025", "The merchant has not opened the international card RMB gateway."),
    ("10026", "The merchant has not opened a telephone to pay the RMB gateway."),
    ("11001", "Start time cannot be after the end time"),
    ("11002", "Allow a query for a period of up to 30 days"),
    ("11003", "Signature string does not match"),
    ("11004", "The query end time is later than the current time"),
    ("20001", "The account does not exist or has been logged out"),
    ("20002", "Signature string does not match, you have no right to query"),
    ("30001", "The system is busy, please check again later"),
    ("30002", "The query process is abnormal, please try again later"),
    ("31001", "No transaction record during this time period"),
    ("31002", "No successful transaction record during this time period"),
    ("31003", "The merchant order number does not exist"),
    ("31004", "The query result exceeds the allowable file range"),
    ("31005", "The transaction payment corresponding to the order number was not successful"),
    ("31006", "The current record set page number does not exist"),
];

/// Read-only mapping from provider error code to a human-readable message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCodeTable {
    messages: HashMap<String, String>,
}

impl ErrorCodeTable {
    /// The provider's published table
    pub fn standard() -> Self {
        STANDARD_ERROR_CODES.iter().copied().collect()
    }

    /// Message for `code`, falling back to the unknown-code entry
    pub fn message(&self, code: &str) -> &str {
        self.messages
            .get(code.trim())
            .or_else(|| self.messages.get(UNKNOWN_ERROR_CODE))
            .map(String::as_str)
            .unwrap_or("Non-Identified Problem")
    }

    pub fn contains(&self, code: &str) -> bool {
        self.messages.contains_key(code.trim())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Add or replace entries, e.g. localized messages
    pub fn extend<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.messages
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl Default for ErrorCodeTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ErrorCodeTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Payment method selector sent as `payType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayType {
    #[serde(rename = "00")]
    All,
    #[serde(rename = "10")]
    OnlineBanking,
    #[serde(rename = "11")]
    PhoneWallet,
    #[serde(rename = "12")]
    QuickCny,
    #[serde(rename = "13")]
    Offline,
    #[serde(rename = "14")]
    B2b,
    #[serde(rename = "21")]
    Quick,
}

impl PayType {
    pub fn code(&self) -> &'static str {
        match self {
            PayType::All => "00",
            PayType::OnlineBanking => "10",
            PayType::PhoneWallet => "11",
            PayType::QuickCny => "12",
            PayType::Offline => "13",
            PayType::B2b => "14",
            PayType::Quick => "21",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PayType::All => "All Payments",
            PayType::OnlineBanking => "Online Banking Payment",
            PayType::PhoneWallet => "Phone wallet Payment",
            PayType::QuickCny => "Quick Payment [CNY Account]",
            PayType::Offline => "Offline Payments",
            PayType::B2b => "B2B Payments",
            PayType::Quick => "Quick Payment",
        }
    }
}

impl std::str::FromStr for PayType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "00" => Ok(PayType::All),
            "10" => Ok(PayType::OnlineBanking),
            "11" => Ok(PayType::PhoneWallet),
            "12" => Ok(PayType::QuickCny),
            "13" => Ok(PayType::Offline),
            "14" => Ok(PayType::B2b),
            "21" => Ok(PayType::Quick),
            _ => Err(format!("unsupported pay type: {}", s)),
        }
    }
}

/// Bank identifiers accepted in `bankId`
pub const SUPPORTED_BANKS: &[&str] = &[
    "CMB", "ICBC", "ABC", "CCB", "BOC", "SPDB", "BCOM", "CMBC", "SRCB", "BOB", "NBCB", "HSB", "CZB",
    "PAB", "GDB", "CITIC", "HXB", "CIB", "CBHB", "BJRCB", "NJCB", "CEB", "HZB", "SHB", "PSBC",
];

/// The listed spelling of `bank_id`, matched case-insensitively
pub fn canonical_bank_id(bank_id: &str) -> Option<&'static str> {
    SUPPORTED_BANKS
        .iter()
        .copied()
        .find(|bank| bank.eq_ignore_ascii_case(bank_id.trim()))
}

pub fn is_supported_bank(bank_id: &str) -> bool {
    canonical_bank_id(bank_id).is_some()
}
