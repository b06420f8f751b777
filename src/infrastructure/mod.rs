//! Infrastructure layer - cryptography, wire formats and transports
//!
//! This module contains the signing strategies, XML decoding, the transport
//! dispatcher with its `reqwest` adapters, and response normalization.

pub mod adapters;
pub mod normalizer;
pub mod signing;
pub mod transport;
pub mod xml;

pub use adapters::{ReqwestHttpTransport, ReqwestSoapTransport};
pub use normalizer::ResponseNormalizer;
pub use signing::{
    QueryDigestSigner, RefundMacSigner, RsaSha1Signer, RsaSha1Verifier, SignatureEncoding,
    SignatureEnvelope, SigningStrategy,
};
pub use transport::{Dispatcher, HttpTransport, PaymentForm, SoapTransport, TransportError};
