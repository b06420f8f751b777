//! Test fixtures: sample requests, provider payloads and signed notifications

use serde_json::{json, Value};

use crate::domain::{OperationRequest, ParameterBuilder};
use crate::infrastructure::signing::{RsaSha1Signer, SigningStrategy};
use crate::tests::common::{credentials, KEYS};

pub fn payment_request() -> OperationRequest {
    OperationRequest::new()
        .with("orderId", "ORD1")
        .with("orderAmount", "19.99")
        .with("productId", "P1")
        .with("productName", "Widget")
        .with("returnUrl", "https://example.com/return")
}

pub fn refund_request() -> OperationRequest {
    OperationRequest::new()
        .with("orderId", "A1")
        .with("amount", "10.50")
        .with("refundDate", "20240101000000")
        .with("refundReference", "20240101000000")
}

pub fn order_query_result() -> Value {
    json!({
        "errCode": "0000",
        "currentPage": "1",
        "pageCount": "1",
        "orders": {
            "GatewayOrderDetail": [
                {"orderId": "ORD1", "orderAmount": "1999", "payResult": "10", "dealId": "D1"},
                {"orderId": "ORD2", "orderAmount": "500", "payResult": "10", "dealId": "D2"}
            ]
        }
    })
}

pub fn refund_query_result() -> Value {
    json!({
        "errCode": "",
        "results": {
            "GatewayRefundQueryResultDto": {"orderId": "ORD1", "rOrderId": "R1", "status": "Y"}
        }
    })
}

pub const REFUND_ACCEPTED_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
<response><MERCHANT>1001234567</MERCHANT><ORDERID>ORD1</ORDERID><TXORDER>TX1</TXORDER>\
<AMOUNT>19.99</AMOUNT><RESULT>Y</RESULT><CODE></CODE></response>";

pub const REFUND_REJECTED_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
<response><ORDERID>ORD1</ORDERID><RESULT>N</RESULT><CODE>ERR1</CODE></response>";

/// A notification as the provider would post it, signed with the test key
/// over the merchant's own account id
pub fn signed_notification(rmb_account: bool, pay_result: &str) -> OperationRequest {
    let mut params = OperationRequest::new()
        .with("merchantAcctId", if rmb_account { "100123456701" } else { "1001234567" })
        .with("version", "v2.0")
        .with("language", "1")
        .with("signType", "4")
        .with("payType", "10")
        .with("bankId", "ICBC")
        .with("orderId", "ORD1")
        .with("orderTime", "20240101083005")
        .with("orderAmount", "1999")
        .with("dealId", "D1")
        .with("bankDealId", "B1")
        .with("dealTime", "20240101083510")
        .with("payAmount", "1999")
        .with("fee", "10")
        .with("ext1", "Widget")
        .with("payResult", pay_result);

    let creds = credentials(rmb_account);
    let canonical = ParameterBuilder::new(&creds, chrono::Local::now().naive_local())
        .notification(&params)
        .canonical();
    let signature = RsaSha1Signer::from_pem(&KEYS.private_pem)
        .and_then(|signer| signer.sign(&canonical))
        .expect("sign notification");

    params.insert("signMsg", signature.value);
    params
}
