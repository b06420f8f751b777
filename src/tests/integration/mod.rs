//! Integration tests for the gateway
//!
//! End-to-end scenarios through [`Gateway`], first against in-memory
//! transports, then against a `wiremock` server with the real `reqwest`
//! transports.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::application::Gateway;
use crate::config::TransportConfig;
use crate::domain::{GatewayResult, OperationRequest};
use crate::infrastructure::signing::{RsaSha1Verifier, SIGN_MSG_FIELD};
use crate::shared::error::GatewayError;
use crate::tests::common::assertions::{assert_failure, assert_no_response};
use crate::tests::common::{credentials, MockHttp, MockSoap, KEYS};
use crate::tests::{config, fixtures};

fn gateway(http: Arc<MockHttp>, soap: Arc<MockSoap>) -> Gateway {
    config::init();
    Gateway::with_transports(Arc::new(credentials(false)), http, soap).unwrap()
}

fn offline_gateway() -> Gateway {
    gateway(Arc::new(MockHttp::default()), Arc::new(MockSoap::default()))
}

mod payment {
    use super::*;

    #[tokio::test]
    async fn test_payment_form_scenario() {
        let form = offline_gateway().payment_form(&fixtures::payment_request()).await.unwrap();

        assert_eq!(form.action, "https://sandbox.99bill.com/gateway/recvMerchantInfoAction.htm");
        assert_eq!(form.field("orderAmount"), Some("1999"));
        assert_eq!(form.field("ext1"), Some("Widget"));
        assert_eq!(form.field("pageUrl"), Some("https://example.com/return"));
        assert_eq!(form.fields.keys().last(), Some(SIGN_MSG_FIELD));
        assert_eq!(form.fields.len(), 36);
    }

    #[tokio::test]
    async fn test_payment_signature_verifies() {
        let form = offline_gateway().payment_form(&fixtures::payment_request()).await.unwrap();

        let signature = form.field(SIGN_MSG_FIELD).unwrap().to_string();
        let mut signed = crate::domain::CanonicalParameterSet::new();
        for (key, value) in form.fields.iter().filter(|(k, _)| *k != SIGN_MSG_FIELD) {
            signed.push(key, value);
        }

        let verifier = RsaSha1Verifier::from_pem(&KEYS.public_pem).unwrap();
        assert!(verifier.verify(&signed, &signature));
    }

    #[tokio::test]
    async fn test_english_page_request_is_signed() {
        let request = fixtures::payment_request().with("language", "2");
        let form = offline_gateway().payment_form(&request).await.unwrap();
        assert_eq!(form.field("language"), Some("2"));

        let signature = form.field(SIGN_MSG_FIELD).unwrap().to_string();
        let mut signed = crate::domain::CanonicalParameterSet::new();
        for (key, value) in form.fields.iter().filter(|(k, _)| *k != SIGN_MSG_FIELD) {
            signed.push(key, value);
        }
        assert!(signed.to_canonical_string(true).contains("&language=2&"));

        let verifier = RsaSha1Verifier::from_pem(&KEYS.public_pem).unwrap();
        assert!(verifier.verify(&signed, &signature));
    }

    #[tokio::test]
    async fn test_oversized_amount_rejected() {
        let request = fixtures::payment_request().with("orderAmount", "100000000000000000");
        let err = offline_gateway().pay(&request).await.unwrap_err();
        assert_eq!(err, GatewayError::validation("orderAmount", "is not valid."));
    }

    #[tokio::test]
    async fn test_pay_renders_auto_submit_page() {
        let html = offline_gateway().pay(&fixtures::payment_request()).await.unwrap();
        assert!(html.contains("document.forms[0].submit();"));
        assert!(html.contains(r#"<input type="hidden" name="orderAmount" value="1999" />"#));
        assert!(html.contains(r#"<input type="hidden" name="bgUrl" value="" />"#));
    }

    #[tokio::test]
    async fn test_payment_validation_precedes_signing() {
        let request = fixtures::payment_request().with("orderAmount", "abc");
        let err = offline_gateway().pay(&request).await.unwrap_err();
        assert_eq!(err, GatewayError::validation("orderAmount", "is not valid."));
    }

    #[tokio::test]
    async fn test_rmb_account_suffix_in_form() {
        config::init();
        let gateway = Gateway::with_transports(
            Arc::new(credentials(true)),
            Arc::new(MockHttp::default()),
            Arc::new(MockSoap::default()),
        )
        .unwrap();

        let form = gateway.payment_form(&fixtures::payment_request()).await.unwrap();
        assert_eq!(form.field("merchantAcctId"), Some("100123456701"));
    }
}

mod notification {
    use super::*;

    #[test]
    fn test_paid_notification() {
        let params = fixtures::signed_notification(false, "10");
        let gateway = offline_gateway();

        assert!(gateway.verify_notification(&params));
        let notification = gateway.pay_complete(params).unwrap().into_data().unwrap();
        assert!(notification.paid);
        assert_eq!(notification.order_id(), Some("ORD1"));
        assert_eq!(notification.deal_id(), Some("D1"));
        assert!(notification.get(SIGN_MSG_FIELD).is_some());
    }

    #[test]
    fn test_unpaid_notification_still_verifies() {
        let params = fixtures::signed_notification(false, "11");
        let notification = offline_gateway().pay_return(params).unwrap().into_data().unwrap();
        assert!(!notification.paid);
    }

    #[test]
    fn test_tampered_notification_rejected() {
        let params = fixtures::signed_notification(false, "10").with("orderAmount", "1");
        let gateway = offline_gateway();

        assert!(!gateway.verify_notification(&params));
        let result = gateway.pay_complete(params).unwrap();
        assert_failure(&result, "402", "Sign doesn't verified.");
    }

    #[test]
    fn test_notification_for_other_account_rejected() {
        // Signed over the RMB account id, checked against the plain one
        let params = fixtures::signed_notification(true, "10");
        assert!(!offline_gateway().verify_notification(&params));
    }

    #[test]
    fn test_missing_signature_is_false() {
        let mut params = fixtures::signed_notification(false, "10").into_map();
        params.remove(SIGN_MSG_FIELD);
        assert!(!offline_gateway().verify_notification(&OperationRequest::from(params)));
        assert!(!offline_gateway().verify_notification(&OperationRequest::new()));
    }

    #[test]
    fn test_result_serialization() {
        let params = fixtures::signed_notification(false, "10");
        let json = serde_json::to_value(offline_gateway().pay_complete(params).unwrap()).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["paid"], true);
        assert_eq!(json["data"]["orderId"], "ORD1");
    }
}

mod queries {
    use super::*;

    #[tokio::test]
    async fn test_payment_query_success() {
        let soap = Arc::new(MockSoap::returning(fixtures::order_query_result()));
        let gateway = gateway(Arc::new(MockHttp::default()), soap.clone());

        let request = OperationRequest::new().with("orderId", "ORD1");
        let records = gateway.payment_query(&request).await.unwrap().into_data().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["orderId"], "ORD1");

        let calls = soap.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].operation.as_deref(), Some("gatewayOrderQuery"));
        assert_eq!(
            calls[0].endpoint,
            "https://sandbox.99bill.com/apipay/services/gatewayOrderQuery?wsdl"
        );
        assert_eq!(calls[0].param("requestPage"), Some("1"));
        assert_eq!(calls[0].param("signType"), Some("1"));
        assert_eq!(calls[0].param("signMsg"), Some("0ED6B89742A7BB9EDD240041ABB9326E"));
        assert_eq!(calls[0].keys().len(), 11);
    }

    #[tokio::test]
    async fn test_payment_query_provider_error() {
        let soap = Arc::new(MockSoap::returning(json!({"errCode": "31003"})));
        let result = gateway(Arc::new(MockHttp::default()), soap)
            .payment_query(&OperationRequest::new().with("orderId", "NOPE"))
            .await
            .unwrap();

        assert_failure(&result, "31003", "The merchant order number does not exist");
    }

    #[tokio::test]
    async fn test_query_page_forwarded() {
        let soap = Arc::new(MockSoap::returning(fixtures::refund_query_result()));
        let gateway = gateway(Arc::new(MockHttp::default()), soap.clone());

        let records = gateway
            .refund_query(&OperationRequest::new().with("requestPage", 3))
            .await
            .unwrap()
            .into_data()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["rOrderId"], "R1");

        let call = &soap.calls()[0];
        assert_eq!(call.operation.as_deref(), Some("query"));
        assert_eq!(call.param("requestPage"), Some("3"));
        assert_eq!(call.keys().first(), Some(&"version"));
        assert_eq!(call.keys().last(), Some(&"signMsg"));
    }

    #[tokio::test]
    async fn test_fault_and_silence_are_no_response() {
        let faulting =
            gateway(Arc::new(MockHttp::default()), Arc::new(MockSoap::faulting("Server busy")));
        assert_no_response(&faulting.payment_query(&OperationRequest::new()).await.unwrap());

        let silent = offline_gateway();
        assert_no_response(&silent.refund_query(&OperationRequest::new()).await.unwrap());
    }
}

mod refunds {
    use super::*;

    #[tokio::test]
    async fn test_refund_accepted() {
        let http = Arc::new(MockHttp::responding(fixtures::REFUND_ACCEPTED_XML));
        let gateway = gateway(http.clone(), Arc::new(MockSoap::default()));

        let result = gateway.refund(&fixtures::refund_request()).await.unwrap();
        let receipt = result.into_data().unwrap();
        assert_eq!(receipt.order_id.as_deref(), Some("ORD1"));
        assert_eq!(receipt.refund_reference.as_deref(), Some("TX1"));
        assert_eq!(receipt.amount, "19.99");

        let call = &http.calls()[0];
        assert_eq!(call.endpoint, "https://sandbox.99bill.com/webapp/receiveDrawbackAction.do");
        assert_eq!(
            call.keys(),
            vec![
                "merchant_id",
                "version",
                "command_type",
                "orderid",
                "amount",
                "postdate",
                "txOrder",
                "mac",
            ]
        );
        assert_eq!(call.param("amount"), Some("10.5"));
    }

    #[tokio::test]
    async fn test_refund_mac_vector() {
        let http = Arc::new(MockHttp::responding(fixtures::REFUND_ACCEPTED_XML));
        let gateway = gateway(http.clone(), Arc::new(MockSoap::default()));
        gateway.refund(&fixtures::refund_request()).await.unwrap();

        // md5("merchant_id=1001234567version=bill_drawback_api_2command_type=001orderid=A1
        //      amount=10.5postdate=20240101000000txOrder=20240101000000merchant_key=K")
        assert_eq!(http.calls()[0].param("mac"), Some("D609A3867A7CD7B59C69E3776007CEB9"));
    }

    #[tokio::test]
    async fn test_refund_rejected() {
        let http = Arc::new(MockHttp::responding(fixtures::REFUND_REJECTED_XML));
        let result = gateway(http, Arc::new(MockSoap::default()))
            .refund(&fixtures::refund_request())
            .await
            .unwrap();
        assert_failure(&result, "500", "ERR1");
    }

    #[tokio::test]
    async fn test_refund_amount_validation_blocks_network() {
        let http = Arc::new(MockHttp::responding(fixtures::REFUND_ACCEPTED_XML));
        let gateway = gateway(http.clone(), Arc::new(MockSoap::default()));

        for amount in ["0", "-5", "ten"] {
            let request = fixtures::refund_request().with("amount", amount);
            let err = gateway.refund(&request).await.unwrap_err();
            assert!(err.is_validation(), "amount {}", amount);
        }
        assert!(http.calls().is_empty());
    }

    #[tokio::test]
    async fn test_refund_without_response() {
        let result = offline_gateway().refund(&fixtures::refund_request()).await.unwrap();
        assert_no_response(&result);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            json!({
                "success": false,
                "error": {"code": "304", "message": "Failed to get response from API."}
            })
        );
    }
}

mod wire {
    use super::*;

    fn live_gateway(server: &MockServer) -> Gateway {
        config::init();
        let creds = credentials(false).with_base_url(server.uri());
        let transport = TransportConfig {
            http_timeout_seconds: 5,
            soap_timeout_seconds: 5,
            soap_namespace: Some("http://www.99bill.com".to_string()),
        };
        Gateway::new(Arc::new(creds), &transport).unwrap()
    }

    #[tokio::test]
    async fn test_soap_round_trip() {
        let server = MockServer::start().await;
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <ns1:gatewayOrderQueryResponse xmlns:ns1="http://www.99bill.com">
      <ns1:out>
        <errCode>0000</errCode>
        <orders>
          <GatewayOrderDetail><orderId>ORD1</orderId><payResult>10</payResult></GatewayOrderDetail>
        </orders>
      </ns1:out>
    </ns1:gatewayOrderQueryResponse>
  </soap:Body>
</soap:Envelope>"#;

        Mock::given(method("POST"))
            .and(path("/apipay/services/gatewayOrderQuery"))
            .and(body_string_contains("<orderId>ORD1</orderId>"))
            .and(body_string_contains("<signMsg>"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let result = live_gateway(&server)
            .payment_query(&OperationRequest::new().with("orderId", "ORD1"))
            .await
            .unwrap();

        match result {
            GatewayResult::Success(records) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0]["payResult"], "10");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_refund_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/webapp/receiveDrawbackAction.do"))
            .and(query_param("orderid", "A1"))
            .and(query_param("command_type", "001"))
            .and(query_param("mac", "D609A3867A7CD7B59C69E3776007CEB9"))
            .respond_with(ResponseTemplate::new(200).set_body_string(fixtures::REFUND_ACCEPTED_XML))
            .expect(1)
            .mount(&server)
            .await;

        let result = live_gateway(&server).refund(&fixtures::refund_request()).await.unwrap();
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_no_response() {
        let server = MockServer::start().await;
        let gateway = live_gateway(&server);
        drop(server);

        assert_no_response(&gateway.refund(&fixtures::refund_request()).await.unwrap());
        assert_no_response(&gateway.refund_query(&OperationRequest::new()).await.unwrap());
    }
}
