//! Signing strategies
//!
//! Two schemes coexist and must not be unified: RSA-SHA1 over the canonical
//! string for payments and notifications, and keyed MD5 digests for the
//! server-to-server query and refund channels. Each strategy owns its own
//! rule for turning a [`CanonicalParameterSet`] into signature input.

use std::fmt;

use base64::{engine::general_purpose, Engine as _};
use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Private, Public};
use openssl::rsa::Rsa;
use openssl::sign::{Signer, Verifier};
use openssl::x509::X509;

use crate::domain::CanonicalParameterSet;
use crate::shared::error::{AppResult, GatewayError};

pub const SIGN_MSG_FIELD: &str = "signMsg";
pub const MAC_FIELD: &str = "mac";

/// How a signature is written on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureEncoding {
    Base64,
    UpperHex,
}

/// A computed signature and the field it is transmitted in
#[derive(Clone, PartialEq, Eq)]
pub struct SignatureEnvelope {
    pub field: &'static str,
    pub value: String,
    pub encoding: SignatureEncoding,
}

impl SignatureEnvelope {
    /// Append the signature as the last field of the set
    pub fn attach(self, params: &mut CanonicalParameterSet) {
        params.push(self.field, self.value);
    }
}

impl fmt::Debug for SignatureEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureEnvelope")
            .field("field", &self.field)
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}

/// One signature scheme
pub trait SigningStrategy: Send + Sync {
    /// Exact bytes the signature is computed over
    fn signature_input(&self, params: &CanonicalParameterSet) -> String;

    fn sign(&self, params: &CanonicalParameterSet) -> AppResult<SignatureEnvelope>;

    /// Sign and append the signature field
    fn sign_into(&self, params: &mut CanonicalParameterSet) -> AppResult<()> {
        let envelope = self.sign(params)?;
        envelope.attach(params);
        Ok(())
    }
}

/// RSA-SHA1 with the merchant's private key, base64 encoded, sent as `signMsg`
pub struct RsaSha1Signer {
    key: PKey<Private>,
}

impl RsaSha1Signer {
    /// Parse the private key. A malformed key is a configuration error.
    pub fn from_pem(pem: &[u8]) -> AppResult<Self> {
        let key = PKey::private_key_from_pem(pem)
            .map_err(|e| GatewayError::Config(format!("Invalid merchant private key: {}", e)))?;
        Ok(Self { key })
    }
}

impl SigningStrategy for RsaSha1Signer {
    fn signature_input(&self, params: &CanonicalParameterSet) -> String {
        params.to_canonical_string(true)
    }

    fn sign(&self, params: &CanonicalParameterSet) -> AppResult<SignatureEnvelope> {
        let mut signer = Signer::new(MessageDigest::sha1(), &self.key)?;
        signer.update(self.signature_input(params).as_bytes())?;
        let signature = signer.sign_to_vec()?;

        Ok(SignatureEnvelope {
            field: SIGN_MSG_FIELD,
            value: general_purpose::STANDARD.encode(signature),
            encoding: SignatureEncoding::Base64,
        })
    }
}

/// Verifies provider signatures with the provider's public key
pub struct RsaSha1Verifier {
    key: PKey<Public>,
}

impl RsaSha1Verifier {
    /// Accepts an X.509 certificate, a SubjectPublicKeyInfo key or a PKCS#1 RSA key
    pub fn from_pem(pem: &[u8]) -> AppResult<Self> {
        let key = X509::from_pem(pem)
            .and_then(|cert| cert.public_key())
            .or_else(|_| PKey::public_key_from_pem(pem))
            .or_else(|_| Rsa::public_key_from_pem_pkcs1(pem).and_then(PKey::from_rsa))
            .map_err(|e| GatewayError::Config(format!("Invalid provider public key: {}", e)))?;
        Ok(Self { key })
    }

    /// `true` when `signature` (base64) matches. Every failure, including
    /// undecodable input, is a plain `false`.
    pub fn verify(&self, params: &CanonicalParameterSet, signature: &str) -> bool {
        let Ok(signature) = general_purpose::STANDARD.decode(signature.trim()) else {
            return false;
        };

        let input = params.to_canonical_string(true);
        Verifier::new(MessageDigest::sha1(), &self.key)
            .and_then(|mut verifier| {
                verifier.update(input.as_bytes())?;
                verifier.verify(&signature)
            })
            .unwrap_or(false)
    }
}

/// MD5 over the canonical string plus `&key=<queryKey>`, upper-case hex, sent as `signMsg`
pub struct QueryDigestSigner {
    key: String,
}

impl QueryDigestSigner {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl SigningStrategy for QueryDigestSigner {
    fn signature_input(&self, params: &CanonicalParameterSet) -> String {
        format!("{}&key={}", params.to_canonical_string(true), self.key)
    }

    fn sign(&self, params: &CanonicalParameterSet) -> AppResult<SignatureEnvelope> {
        Ok(SignatureEnvelope {
            field: SIGN_MSG_FIELD,
            value: upper_md5(&self.signature_input(params)),
            encoding: SignatureEncoding::UpperHex,
        })
    }
}

/// Legacy refund MAC, sent as `mac`.
///
/// The input is the canonical string plus `&merchant_key=<refundKey>` with
/// every `&` removed, so values containing `&` are ambiguous on both sides.
pub struct RefundMacSigner {
    key: String,
}

impl RefundMacSigner {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl SigningStrategy for RefundMacSigner {
    fn signature_input(&self, params: &CanonicalParameterSet) -> String {
        format!("{}&merchant_key={}", params.to_canonical_string(true), self.key).replace('&', "")
    }

    fn sign(&self, params: &CanonicalParameterSet) -> AppResult<SignatureEnvelope> {
        Ok(SignatureEnvelope {
            field: MAC_FIELD,
            value: upper_md5(&self.signature_input(params)),
            encoding: SignatureEncoding::UpperHex,
        })
    }
}

fn upper_md5(input: &str) -> String {
    hex::encode_upper(md5::compute(input.as_bytes()).0)
}
