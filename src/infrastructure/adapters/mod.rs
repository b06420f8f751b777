//! Infrastructure adapters module
//!
//! Concrete transport primitives backed by `reqwest`.

pub mod http_client;
pub mod soap_client;

pub use http_client::ReqwestHttpTransport;
pub use soap_client::ReqwestSoapTransport;
