//! Error types for key records and certificate import

use thiserror::Error;

/// Result type for key record and import operations
pub type JwkResult<T> = Result<T, JwkError>;

/// Errors raised while building a key record or importing one from a certificate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwkError {
    /// Input is not a key mapping, lacks `kty`, or carries an undecodable parameter
    #[error("Malformed key: {0}")]
    MalformedKey(String),

    /// Certificate bytes are neither PEM nor DER, or the ASN.1 structure is broken
    #[error("Certificate parse error: {0}")]
    CertificateParse(String),

    /// Certificate is well formed but carries a key family we do not import
    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),
}

impl JwkError {
    /// Create a malformed key error
    #[inline]
    #[must_use]
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedKey(msg.into())
    }

    /// Create a certificate parse error
    #[inline]
    #[must_use]
    pub fn certificate_parse(msg: impl Into<String>) -> Self {
        Self::CertificateParse(msg.into())
    }

    /// Create an unsupported key type error
    #[inline]
    #[must_use]
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedKeyType(msg.into())
    }
}
