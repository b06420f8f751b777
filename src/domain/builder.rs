//! Canonical parameter builder
//!
//! Turns a caller's [`OperationRequest`] into the fixed schema of one
//! operation, applying defaults and validation. Nothing here touches key
//! material or the network.

use chrono::NaiveDateTime;
use tracing::warn;

use crate::config::CredentialProvider;
use crate::domain::error_codes::{canonical_bank_id, PayType};
use crate::domain::request::OperationRequest;
use crate::domain::schema::{
    NotifyFields, OrderQueryFields, PaymentFields, RefundFields, RefundQueryFields,
    GATEWAY_VERSION, INPUT_CHARSET_UTF8, LANGUAGE_CHINESE, REFUND_API_VERSION,
    REFUND_COMMAND_TYPE, SIGN_TYPE_MD5, SIGN_TYPE_RSA,
};
use crate::shared::error::{AppResult, GatewayError};
use crate::shared::validation::ValidationUtils;

const PAYMENT_REQUIRED: &[&str] =
    &["returnUrl", "orderAmount", "orderId", "productId", "productName"];
const REFUND_REQUIRED: &[&str] = &["amount", "orderId"];

const DEFAULT_PAY_TYPE: &str = "00";
const DEFAULT_REDO_FLAG: &str = "0";
const DEFAULT_PRODUCT_NUM: &str = "1";
const DEFAULT_PAGE: &str = "1";

/// Builds operation schemas for one merchant
pub struct ParameterBuilder<'a> {
    credentials: &'a dyn CredentialProvider,
    now: NaiveDateTime,
}

impl<'a> ParameterBuilder<'a> {
    /// `now` is the local wall-clock time used for every timestamp default
    pub fn new(credentials: &'a dyn CredentialProvider, now: NaiveDateTime) -> Self {
        Self { credentials, now }
    }

    pub fn payment(&self, request: &OperationRequest) -> AppResult<PaymentFields> {
        ValidationUtils::validate_fields(request, PAYMENT_REQUIRED)?;
        if let Some(url) = request.get("notifyUrl").filter(|v| !v.is_empty()) {
            ValidationUtils::validate_field("notifyUrl", url)?;
        }

        let amount = ValidationUtils::parse_positive_decimal(
            "orderAmount",
            request.get_or("orderAmount", "").as_str(),
        )?;
        let product_name = request.get_or("productName", "");

        Ok(PaymentFields {
            input_charset: request.get_or("inputCharset", INPUT_CHARSET_UTF8),
            page_url: request.get_or("returnUrl", ""),
            bg_url: request.get_or("notifyUrl", ""),
            version: request.get_or("version", GATEWAY_VERSION),
            language: request.get_or("language", LANGUAGE_CHINESE),
            sign_type: request.get_or("signType", SIGN_TYPE_RSA),
            merchant_acct_id: self.credentials.merchant_account_id(),
            payer_name: request.get_or("payerName", ""),
            payer_contact_type: request.get_or("payerContactType", ""),
            payer_contact: request.get_or("payerContact", ""),
            payer_id_type: request.get_or("payerIdType", ""),
            payer_id: request.get_or("payerId", ""),
            payer_ip: request.get_or("payerIP", ""),
            order_id: request.get_or("orderId", ""),
            order_amount: to_minor_units(amount)?,
            order_time: request
                .get("orderTime")
                .map(str::to_string)
                .unwrap_or_else(|| self.now.format("%Y-%m-%d %H:%M:%S").to_string()),
            order_timestamp: request
                .get("orderTimestamp")
                .map(str::to_string)
                .unwrap_or_else(|| self.compact_timestamp()),
            ext1: request.get("ext1").map(str::to_string).unwrap_or_else(|| product_name.clone()),
            product_name,
            product_num: request.get_or("quantity", DEFAULT_PRODUCT_NUM),
            product_id: request.get_or("productId", ""),
            product_desc: request.get_or("description", ""),
            ext2: request.get_or("ext2", ""),
            pay_type: pay_type(request),
            bank_id: bank_id(request),
            card_issuer: request.get_or("cardIssuer", ""),
            card_num: request.get_or("cardNum", ""),
            remit_type: request.get_or("remitType", ""),
            remit_code: request.get_or("remitCode", ""),
            redo_flag: request.get_or("redoFlag", DEFAULT_REDO_FLAG),
            pid: request.get_or("pid", ""),
            submit_type: request.get_or("submitType", ""),
            order_time_out: request.get_or("orderTimeOut", ""),
            ext_data_type: request.get_or("extDataType", ""),
            ext_data_content: request.get_or("extDataContent", ""),
        })
    }

    /// Notification fields as covered by the provider's signature.
    ///
    /// `merchantAcctId` always comes from the credentials so a notification
    /// for another merchant can never verify.
    pub fn notification(&self, params: &OperationRequest) -> NotifyFields {
        NotifyFields {
            merchant_acct_id: self.credentials.merchant_account_id(),
            version: params.get_or("version", ""),
            language: params.get_or("language", ""),
            sign_type: params.get_or("signType", ""),
            pay_type: params.get_or("payType", ""),
            bank_id: params.get_or("bankId", ""),
            order_id: params.get_or("orderId", ""),
            order_time: params.get_or("orderTime", ""),
            order_amount: params.get_or("orderAmount", ""),
            bind_card: params.get_or("bindCard", ""),
            bind_mobile: params.get_or("bindMobile", ""),
            deal_id: params.get_or("dealId", ""),
            bank_deal_id: params.get_or("bankDealId", ""),
            deal_time: params.get_or("dealTime", ""),
            pay_amount: params.get_or("payAmount", ""),
            fee: params.get_or("fee", ""),
            ext1: params.get_or("ext1", ""),
            ext2: params.get_or("ext2", ""),
            pay_result: params.get_or("payResult", ""),
            err_code: params.get_or("errCode", ""),
        }
    }

    pub fn order_query(&self, request: &OperationRequest) -> OrderQueryFields {
        OrderQueryFields {
            input_charset: request.get_or("inputCharset", INPUT_CHARSET_UTF8),
            version: request.get_or("version", GATEWAY_VERSION),
            sign_type: SIGN_TYPE_MD5.to_string(),
            merchant_acct_id: self.credentials.merchant_account_id(),
            query_type: request.get_or("queryType", "1"),
            query_mode: request.get_or("queryMode", "1"),
            start_time: request.get_or("startTime", ""),
            end_time: request.get_or("endTime", ""),
            request_page: request_page(request),
            order_id: request.get_or("orderId", ""),
        }
    }

    pub fn refund_query(&self, request: &OperationRequest) -> RefundQueryFields {
        RefundQueryFields {
            version: request.get_or("version", GATEWAY_VERSION),
            sign_type: SIGN_TYPE_MD5.to_string(),
            merchant_acct_id: self.credentials.merchant_account_id(),
            start_date: request.get_or("startDate", ""),
            end_date: request.get_or("endDate", ""),
            last_update_start_date: request.get_or("lastUpdateStartDate", ""),
            last_update_end_date: request.get_or("lastUpdateEndDate", ""),
            customer_batch_id: request.get_or("customerBatchId", ""),
            order_id: request.get_or("orderId", ""),
            request_page: request_page(request),
            r_order_id: request.get_or("rOrderId", ""),
            seq_id: request.get_or("seqId", ""),
            extra_output_column: request.get_or("extra_output_column", ""),
            status: request.get_or("status", ""),
        }
    }

    pub fn refund(&self, request: &OperationRequest) -> AppResult<RefundFields> {
        ValidationUtils::validate_fields(request, REFUND_REQUIRED)?;
        for optional in ["refundDate", "refundReference"] {
            if let Some(value) = request.get(optional) {
                ValidationUtils::validate_field(optional, value)?;
            }
        }

        let amount = request.get_or("amount", "");
        let amount = ValidationUtils::parse_positive_decimal("amount", amount.as_str())?;

        Ok(RefundFields {
            merchant_id: self.credentials.merchant_id().to_string(),
            version: REFUND_API_VERSION.to_string(),
            command_type: REFUND_COMMAND_TYPE.to_string(),
            order_id: request.get_or("orderId", ""),
            amount: amount.to_string(),
            post_date: request
                .get("refundDate")
                .map(str::to_string)
                .unwrap_or_else(|| self.compact_timestamp()),
            tx_order: request
                .get("refundReference")
                .map(str::to_string)
                .unwrap_or_else(|| self.compact_timestamp()),
        })
    }

    fn compact_timestamp(&self) -> String {
        self.now.format("%Y%m%d%H%M%S").to_string()
    }
}

/// Amount in integer minor units (fen). Values that do not fit an `i64` are rejected.
fn to_minor_units(amount: f64) -> AppResult<String> {
    let minor = (amount * 100.0).round();
    if !minor.is_finite() || minor >= i64::MAX as f64 {
        return Err(GatewayError::validation("orderAmount", "is not valid."));
    }
    Ok((minor as i64).to_string())
}

/// `payType` as written; codes outside [`PayType`] are forwarded with a warning
fn pay_type(request: &OperationRequest) -> String {
    let pay_type = request.get_or("payType", DEFAULT_PAY_TYPE);
    if !pay_type.is_empty() && pay_type.parse::<PayType>().is_err() {
        warn!(pay_type = %pay_type, "Unrecognised payType forwarded to the gateway");
    }
    pay_type
}

/// Known banks are sent in their canonical upper-case form, others as written
fn bank_id(request: &OperationRequest) -> String {
    let bank_id = request.get_or("bankId", "");
    if bank_id.is_empty() {
        return bank_id;
    }
    match canonical_bank_id(&bank_id) {
        Some(canonical) => canonical.to_string(),
        None => {
            warn!(bank_id = %bank_id, "Unrecognised bankId forwarded to the gateway");
            bank_id
        }
    }
}

/// Positive page numbers pass through as written; anything else becomes "1"
fn request_page(request: &OperationRequest) -> String {
    match request.get("requestPage") {
        Some(page) if page.trim().parse::<f64>().is_ok_and(|p| p > 0.0) => page.to_string(),
        _ => DEFAULT_PAGE.to_string(),
    }
}
