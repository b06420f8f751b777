//! Domain layer - provider schemas and outcome types
//!
//! Everything here is pure: no key material, no network, no clock reads.

pub mod builder;
pub mod error_codes;
pub mod notification;
pub mod params;
pub mod request;
pub mod result;
pub mod schema;

pub use builder::ParameterBuilder;
pub use error_codes::{
    canonical_bank_id, is_supported_bank, ErrorCodeTable, PayType, SUPPORTED_BANKS,
    UNKNOWN_ERROR_CODE,
};
pub use notification::{NotifyAck, PaymentNotification};
pub use params::CanonicalParameterSet;
pub use request::{OperationKind, OperationRequest};
pub use result::{FailureCode, GatewayResult, Record, RefundReceipt};
pub use schema::{NotifyFields, OrderQueryFields, PaymentFields, RefundFields, RefundQueryFields};
