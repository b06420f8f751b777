//! Fixed field schemas, one struct per operation
//!
//! Each struct's `canonical()` is the single place where the provider's
//! field order is written down. Signatures are computed over that order.

use crate::domain::params::CanonicalParameterSet;

pub const INPUT_CHARSET_UTF8: &str = "1";
pub const GATEWAY_VERSION: &str = "v2.0";
pub const LANGUAGE_CHINESE: &str = "1";
pub const SIGN_TYPE_RSA: &str = "4";
pub const SIGN_TYPE_MD5: &str = "1";
pub const REFUND_API_VERSION: &str = "bill_drawback_api_2";
pub const REFUND_COMMAND_TYPE: &str = "001";
pub const PAY_RESULT_SUCCESS: &str = "10";

/// Payment initiation form fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentFields {
    pub input_charset: String,
    pub page_url: String,
    pub bg_url: String,
    pub version: String,
    pub language: String,
    pub sign_type: String,
    pub merchant_acct_id: String,
    pub payer_name: String,
    pub payer_contact_type: String,
    pub payer_contact: String,
    pub payer_id_type: String,
    pub payer_id: String,
    pub payer_ip: String,
    pub order_id: String,
    /// Minor units (amount × 100)
    pub order_amount: String,
    pub order_time: String,
    pub order_timestamp: String,
    pub product_name: String,
    pub product_num: String,
    pub product_id: String,
    pub product_desc: String,
    pub ext1: String,
    pub ext2: String,
    pub pay_type: String,
    pub bank_id: String,
    pub card_issuer: String,
    pub card_num: String,
    pub remit_type: String,
    pub remit_code: String,
    pub redo_flag: String,
    pub pid: String,
    pub submit_type: String,
    pub order_time_out: String,
    pub ext_data_type: String,
    pub ext_data_content: String,
}

impl PaymentFields {
    pub fn canonical(&self) -> CanonicalParameterSet {
        let mut p = CanonicalParameterSet::with_capacity(36);
        p.push("inputCharset", &self.input_charset);
        p.push("pageUrl", &self.page_url);
        p.push("bgUrl", &self.bg_url);
        p.push("version", &self.version);
        p.push("language", &self.language);
        p.push("signType", &self.sign_type);
        p.push("merchantAcctId", &self.merchant_acct_id);
        p.push("payerName", &self.payer_name);
        p.push("payerContactType", &self.payer_contact_type);
        p.push("payerContact", &self.payer_contact);
        p.push("payerIdType", &self.payer_id_type);
        p.push("payerId", &self.payer_id);
        p.push("payerIP", &self.payer_ip);
        p.push("orderId", &self.order_id);
        p.push("orderAmount", &self.order_amount);
        p.push("orderTime", &self.order_time);
        p.push("orderTimestamp", &self.order_timestamp);
        p.push("productName", &self.product_name);
        p.push("productNum", &self.product_num);
        p.push("productId", &self.product_id);
        p.push("productDesc", &self.product_desc);
        p.push("ext1", &self.ext1);
        p.push("ext2", &self.ext2);
        p.push("payType", &self.pay_type);
        p.push("bankId", &self.bank_id);
        p.push("cardIssuer", &self.card_issuer);
        p.push("cardNum", &self.card_num);
        p.push("remitType", &self.remit_type);
        p.push("remitCode", &self.remit_code);
        p.push("redoFlag", &self.redo_flag);
        p.push("pid", &self.pid);
        p.push("submitType", &self.submit_type);
        p.push("orderTimeOut", &self.order_time_out);
        p.push("extDataType", &self.ext_data_type);
        p.push("extDataContent", &self.ext_data_content);
        p
    }
}

/// Fields of an asynchronous payment notification covered by its signature
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyFields {
    pub merchant_acct_id: String,
    pub version: String,
    pub language: String,
    pub sign_type: String,
    pub pay_type: String,
    pub bank_id: String,
    pub order_id: String,
    pub order_time: String,
    pub order_amount: String,
    pub bind_card: String,
    pub bind_mobile: String,
    pub deal_id: String,
    pub bank_deal_id: String,
    pub deal_time: String,
    pub pay_amount: String,
    pub fee: String,
    pub ext1: String,
    pub ext2: String,
    pub pay_result: String,
    pub err_code: String,
}

impl NotifyFields {
    pub fn canonical(&self) -> CanonicalParameterSet {
        let mut p = CanonicalParameterSet::with_capacity(20);
        p.push("merchantAcctId", &self.merchant_acct_id);
        p.push("version", &self.version);
        p.push("language", &self.language);
        p.push("signType", &self.sign_type);
        p.push("payType", &self.pay_type);
        p.push("bankId", &self.bank_id);
        p.push("orderId", &self.order_id);
        p.push("orderTime", &self.order_time);
        p.push("orderAmount", &self.order_amount);
        p.push("bindCard", &self.bind_card);
        p.push("bindMobile", &self.bind_mobile);
        p.push("dealId", &self.deal_id);
        p.push("bankDealId", &self.bank_deal_id);
        p.push("dealTime", &self.deal_time);
        p.push("payAmount", &self.pay_amount);
        p.push("fee", &self.fee);
        p.push("ext1", &self.ext1);
        p.push("ext2", &self.ext2);
        p.push("payResult", &self.pay_result);
        p.push("errCode", &self.err_code);
        p
    }

    pub fn is_paid(&self) -> bool {
        self.pay_result == PAY_RESULT_SUCCESS
    }
}

/// `gatewayOrderQuery` argument fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQueryFields {
    pub input_charset: String,
    pub version: String,
    pub sign_type: String,
    pub merchant_acct_id: String,
    pub query_type: String,
    pub query_mode: String,
    pub start_time: String,
    pub end_time: String,
    pub request_page: String,
    pub order_id: String,
}

impl OrderQueryFields {
    pub fn canonical(&self) -> CanonicalParameterSet {
        let mut p = CanonicalParameterSet::with_capacity(11);
        p.push("inputCharset", &self.input_charset);
        p.push("version", &self.version);
        p.push("signType", &self.sign_type);
        p.push("merchantAcctId", &self.merchant_acct_id);
        p.push("queryType", &self.query_type);
        p.push("queryMode", &self.query_mode);
        p.push("startTime", &self.start_time);
        p.push("endTime", &self.end_time);
        p.push("requestPage", &self.request_page);
        p.push("orderId", &self.order_id);
        p
    }
}

/// Refund query (`query`) argument fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefundQueryFields {
    pub version: String,
    pub sign_type: String,
    pub merchant_acct_id: String,
    pub start_date: String,
    pub end_date: String,
    pub last_update_start_date: String,
    pub last_update_end_date: String,
    pub customer_batch_id: String,
    pub order_id: String,
    pub request_page: String,
    pub r_order_id: String,
    pub seq_id: String,
    pub extra_output_column: String,
    pub status: String,
}

impl RefundQueryFields {
    pub fn canonical(&self) -> CanonicalParameterSet {
        let mut p = CanonicalParameterSet::with_capacity(15);
        p.push("version", &self.version);
        p.push("signType", &self.sign_type);
        p.push("merchantAcctId", &self.merchant_acct_id);
        p.push("startDate", &self.start_date);
        p.push("endDate", &self.end_date);
        p.push("lastUpdateStartDate", &self.last_update_start_date);
        p.push("lastUpdateEndDate", &self.last_update_end_date);
        p.push("customerBatchId", &self.customer_batch_id);
        p.push("orderId", &self.order_id);
        p.push("requestPage", &self.request_page);
        p.push("rOrderId", &self.r_order_id);
        p.push("seqId", &self.seq_id);
        p.push("extra_output_column", &self.extra_output_column);
        p.push("status", &self.status);
        p
    }
}

/// Legacy refund (drawback) fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefundFields {
    pub merchant_id: String,
    pub version: String,
    pub command_type: String,
    pub order_id: String,
    pub amount: String,
    pub post_date: String,
    pub tx_order: String,
}

impl RefundFields {
    pub fn canonical(&self) -> CanonicalParameterSet {
        let mut p = CanonicalParameterSet::with_capacity(8);
        p.push("merchant_id", &self.merchant_id);
        p.push("version", &self.version);
        p.push("command_type", &self.command_type);
        p.push("orderid", &self.order_id);
        p.push("amount", &self.amount);
        p.push("postdate", &self.post_date);
        p.push("txOrder", &self.tx_order);
        p
    }
}
