//! Gateway facade orchestrating build, sign, dispatch and normalize

use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use tracing::{info, instrument, Span};

use crate::config::{
    ConfigValidator, CredentialProvider, GatewayConfig, GatewayCredentials, ServiceEndpoint,
    TransportConfig,
};
use crate::domain::{
    CanonicalParameterSet, ErrorCodeTable, GatewayResult, NotifyAck, OperationKind,
    OperationRequest, ParameterBuilder, PaymentNotification, Record, RefundReceipt,
};
use crate::infrastructure::adapters::{ReqwestHttpTransport, ReqwestSoapTransport};
use crate::infrastructure::normalizer::ResponseNormalizer;
use crate::infrastructure::signing::{
    QueryDigestSigner, RefundMacSigner, RsaSha1Signer, RsaSha1Verifier, SigningStrategy,
    SIGN_MSG_FIELD,
};
use crate::infrastructure::transport::{Dispatcher, HttpTransport, PaymentForm, SoapTransport};
use crate::shared::error::{AppResult, GatewayError};
use crate::shared::logging::LoggingUtils;

pub const ORDER_QUERY_OPERATION: &str = "gatewayOrderQuery";
pub const REFUND_QUERY_OPERATION: &str = "query";
const ORDER_LIST_KEY: &str = "orders";
const REFUND_LIST_KEY: &str = "results";

/// Client for the 99bill gateway.
///
/// Key material is parsed once at construction. Every call builds and
/// signs a fresh parameter set, so a `Gateway` can be shared freely
/// between tasks.
pub struct Gateway {
    credentials: Arc<dyn CredentialProvider>,
    signer: RsaSha1Signer,
    verifier: RsaSha1Verifier,
    dispatcher: Dispatcher,
    normalizer: ResponseNormalizer,
}

/// One SOAP query service
struct SoapQuery {
    kind: OperationKind,
    service: ServiceEndpoint,
    operation: &'static str,
    list_key: &'static str,
}

impl Gateway {
    /// Create a gateway using the `reqwest` transports
    pub fn new(
        credentials: Arc<dyn CredentialProvider>,
        transport: &TransportConfig,
    ) -> AppResult<Self> {
        let http = Arc::new(ReqwestHttpTransport::from_config(transport)?);
        let soap = Arc::new(ReqwestSoapTransport::from_config(transport)?);
        Self::with_transports(credentials, http, soap)
    }

    /// Create a gateway with injected transports (for testing/DI)
    pub fn with_transports(
        credentials: Arc<dyn CredentialProvider>,
        http: Arc<dyn HttpTransport>,
        soap: Arc<dyn SoapTransport>,
    ) -> AppResult<Self> {
        let signer = RsaSha1Signer::from_pem(credentials.private_key_pem())?;
        let verifier = RsaSha1Verifier::from_pem(credentials.public_key_pem())?;

        Ok(Self {
            credentials,
            signer,
            verifier,
            dispatcher: Dispatcher::new(http, soap),
            normalizer: ResponseNormalizer::default(),
        })
    }

    /// Load credentials and transports from a validated configuration
    pub fn from_config(config: &GatewayConfig) -> AppResult<Self> {
        ConfigValidator::validate_config(config)?;
        let credentials = GatewayCredentials::from_config(&config.merchant)?;
        Self::new(Arc::new(credentials), &config.transport)
    }

    /// Replace the provider error table, e.g. with localized messages
    pub fn with_error_codes(mut self, codes: ErrorCodeTable) -> Self {
        self.normalizer = ResponseNormalizer::new(Arc::new(codes));
        self
    }

    pub fn credentials(&self) -> &dyn CredentialProvider {
        self.credentials.as_ref()
    }

    fn builder(&self) -> ParameterBuilder<'_> {
        ParameterBuilder::new(self.credentials.as_ref(), Local::now().naive_local())
    }

    /// Signed payment form for callers that render their own page
    #[instrument(skip_all, fields(operation = "payment", request_id = tracing::field::Empty))]
    pub async fn payment_form(&self, request: &OperationRequest) -> AppResult<PaymentForm> {
        let request_id = LoggingUtils::generate_request_id();
        Span::current().record("request_id", request_id.as_str());

        let mut params = self.builder().payment(request)?.canonical();
        self.signer.sign_into(&mut params)?;

        let action = self.credentials.endpoint(ServiceEndpoint::Pay);
        let form = self.dispatcher.form_redirect(&request_id, &action, params);

        info!(request_id = %request_id, order_id = ?form.field("orderId"), "Payment form prepared");
        Ok(form)
    }

    /// Self-submitting HTML page that sends the browser to the payment page
    pub async fn pay(&self, request: &OperationRequest) -> AppResult<String> {
        Ok(self.payment_form(request).await?.render_html())
    }

    /// `true` when the notification's `signMsg` matches its fields. Never errors.
    pub fn verify_notification(&self, params: &OperationRequest) -> bool {
        let canonical = self.builder().notification(params).canonical();
        let signature = params.get(SIGN_MSG_FIELD).unwrap_or_default();
        self.verifier.verify(&canonical, signature)
    }

    /// Handle the provider's asynchronous payment notification
    #[instrument(skip_all, fields(operation = "pay_complete"))]
    pub fn pay_complete(
        &self,
        params: OperationRequest,
    ) -> AppResult<GatewayResult<PaymentNotification>> {
        let verified = self.verify_notification(&params);
        if !verified {
            LoggingUtils::log_signature_mismatch(params.get("orderId").unwrap_or_default());
        }

        let outcome = self.normalizer.notification(verified, params);
        if let GatewayResult::Success(notification) = &outcome {
            info!(
                order_id = ?notification.order_id(),
                paid = notification.paid,
                "Payment notification verified"
            );
        }

        Ok(outcome)
    }

    /// Handle the browser's synchronous return; verified the same way as a notification
    pub fn pay_return(
        &self,
        params: OperationRequest,
    ) -> AppResult<GatewayResult<PaymentNotification>> {
        self.pay_complete(params)
    }

    /// Query payment transactions over SOAP (`gatewayOrderQuery`)
    #[instrument(skip_all, fields(operation = "payment_query", request_id = tracing::field::Empty))]
    pub async fn payment_query(
        &self,
        request: &OperationRequest,
    ) -> AppResult<GatewayResult<Vec<Record>>> {
        let params = self.builder().order_query(request).canonical();
        let query = SoapQuery {
            kind: OperationKind::Query,
            service: ServiceEndpoint::OrderQuery,
            operation: ORDER_QUERY_OPERATION,
            list_key: ORDER_LIST_KEY,
        };
        self.soap_query(query, params).await
    }

    /// Query refunds over SOAP (`query`)
    #[instrument(skip_all, fields(operation = "refund_query", request_id = tracing::field::Empty))]
    pub async fn refund_query(
        &self,
        request: &OperationRequest,
    ) -> AppResult<GatewayResult<Vec<Record>>> {
        let params = self.builder().refund_query(request).canonical();
        let query = SoapQuery {
            kind: OperationKind::RefundQuery,
            service: ServiceEndpoint::RefundQuery,
            operation: REFUND_QUERY_OPERATION,
            list_key: REFUND_LIST_KEY,
        };
        self.soap_query(query, params).await
    }

    /// Refund a payment over the legacy HTTP GET channel
    #[instrument(skip_all, fields(operation = "refund", request_id = tracing::field::Empty))]
    pub async fn refund(
        &self,
        request: &OperationRequest,
    ) -> AppResult<GatewayResult<RefundReceipt>> {
        let request_id = LoggingUtils::generate_request_id();
        Span::current().record("request_id", request_id.as_str());
        let started = Instant::now();

        let key = self
            .credentials
            .refund_key()
            .ok_or_else(|| GatewayError::Config("Refund key is not configured".to_string()))?;

        let mut params = self.builder().refund(request)?.canonical();
        RefundMacSigner::new(key).sign_into(&mut params)?;

        let endpoint = self.credentials.endpoint(ServiceEndpoint::Refund);
        let outcome = self
            .dispatcher
            .http_get(&request_id, OperationKind::Refund, &endpoint, params)
            .await
            .and_then(|body| self.normalizer.refund_receipt(&body));

        log_outcome(&request_id, OperationKind::Refund, started, &outcome);
        Ok(outcome)
    }

    /// Body to answer a notification with
    pub fn finish_notify(&self, received: bool, redirect_url: &str) -> String {
        NotifyAck::new(received, redirect_url).render()
    }

    async fn soap_query(
        &self,
        query: SoapQuery,
        mut params: CanonicalParameterSet,
    ) -> AppResult<GatewayResult<Vec<Record>>> {
        let request_id = LoggingUtils::generate_request_id();
        Span::current().record("request_id", request_id.as_str());
        let started = Instant::now();

        let key = self
            .credentials
            .query_key()
            .ok_or_else(|| GatewayError::Config("Query key is not configured".to_string()))?;
        QueryDigestSigner::new(key).sign_into(&mut params)?;

        let endpoint = self.credentials.endpoint(query.service);
        let outcome = self
            .dispatcher
            .soap_call(&request_id, query.kind, &endpoint, query.operation, params)
            .await
            .and_then(|result| self.normalizer.soap_records(&result, query.list_key));

        log_outcome(&request_id, query.kind, started, &outcome);
        Ok(outcome)
    }
}

fn log_outcome<T>(
    request_id: &str,
    kind: OperationKind,
    started: Instant,
    outcome: &GatewayResult<T>,
) {
    let duration_ms = started.elapsed().as_millis() as u64;
    match outcome.error() {
        None => LoggingUtils::log_success(request_id, kind.as_str(), duration_ms),
        // Transport failures were already reported by the dispatcher
        Some((code, _)) if code.is_transport() => {}
        Some((code, message)) => {
            LoggingUtils::log_failure(request_id, kind.as_str(), code, message, duration_ms)
        }
    }
}
