//! Test suite for the gateway client
//!
//! - `common`: key material, credentials and in-memory transports
//! - `fixtures`: sample requests and provider payloads
//! - `integration`: end-to-end scenarios through the gateway facade

pub mod common;
pub mod fixtures;
pub mod integration;

/// Test configuration and utilities
pub mod config {
    use std::sync::Once;

    static INIT: Once = Once::new();

    /// Initialize test environment
    pub fn init() {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter("debug")
                .with_test_writer()
                .try_init();
        });
    }
}
