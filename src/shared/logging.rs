//! Logging utilities module
//!
//! This module provides centralized logging functionality and utilities.

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::FailureCode;
use crate::shared::error::{AppResult, GatewayError};

/// Logging utilities for the gateway client
pub struct LoggingUtils;

impl LoggingUtils {
    /// Initialize logging with the specified configuration
    pub fn initialize(level: &str, format: &str, structured: bool) -> AppResult<()> {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level));

        let builder = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false);

        let result = if structured && format.eq_ignore_ascii_case("json") {
            tracing::subscriber::set_global_default(builder.json().finish())
        } else {
            tracing::subscriber::set_global_default(builder.finish())
        };

        result.map_err(|e| GatewayError::Config(format!("Failed to initialize logging: {}", e)))
    }

    /// Log an outbound call before it is handed to the transport
    pub fn log_dispatch(request_id: &str, operation: &str, endpoint: &str) {
        info!(
            request_id = %request_id,
            operation = %operation,
            endpoint = %endpoint,
            "Dispatching gateway request"
        );
    }

    /// Log a call the provider answered successfully
    pub fn log_success(request_id: &str, operation: &str, duration_ms: u64) {
        info!(
            request_id = %request_id,
            operation = %operation,
            duration_ms = %duration_ms,
            "Gateway request completed successfully"
        );
    }

    /// Log a failure outcome (transport or provider rejection)
    pub fn log_failure(
        request_id: &str,
        operation: &str,
        code: &FailureCode,
        message: &str,
        duration_ms: u64,
    ) {
        warn!(
            request_id = %request_id,
            operation = %operation,
            code = %code,
            message = %message,
            duration_ms = %duration_ms,
            "Gateway request failed"
        );
    }

    /// Log a notification whose signature did not verify
    pub fn log_signature_mismatch(order_id: &str) {
        warn!(
            order_id = %order_id,
            "Notification signature verification failed"
        );
    }

    /// Generate a unique request ID
    pub fn generate_request_id() -> String {
        format!("req_{}", Uuid::new_v4().simple())
    }
}
