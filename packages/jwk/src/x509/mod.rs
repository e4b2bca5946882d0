//! X.509 certificate to key record import
//!
//! Reads a certificate, PEM or DER framed, and turns the public key in its
//! SubjectPublicKeyInfo into a [`KeyRecord`]. PEM input may carry text before
//! the certificate and further certificates after it, as chain files and
//! `openssl x509 -text` output do; only the first certificate is imported.
//! The importer only looks at bytes already in memory; reading files is up to
//! the caller.

pub mod oid;
mod spki;

use der::Decode;
use log::debug;
use serde_json::{Map, Value};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use x509_cert::ext::pkix::KeyUsage;
use x509_cert::Certificate;

use crate::encoding::{encode_standard, encode_url};
use crate::error::{JwkError, JwkResult};
use crate::record::KeyRecord;

const PEM_PREAMBLE: &[u8] = b"-----BEGIN";
const PEM_LABEL: &str = "CERTIFICATE";
const CERTIFICATE_BEGIN: &[u8] = b"-----BEGIN CERTIFICATE-----";
const CERTIFICATE_END: &[u8] = b"-----END CERTIFICATE-----";
const DER_SEQUENCE_TAG: u8 = 0x30;

/// Caller intent applied on top of whatever the certificate implies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOverrides {
    /// Value for the `use` parameter
    pub key_use: Option<String>,
    /// Value for the `alg` parameter
    pub alg: Option<String>,
}

impl ImportOverrides {
    /// No overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `use` parameter
    #[must_use]
    pub fn with_use(mut self, key_use: impl Into<String>) -> Self {
        self.key_use = Some(key_use.into());
        self
    }

    /// Set the `alg` parameter
    #[must_use]
    pub fn with_alg(mut self, alg: impl Into<String>) -> Self {
        self.alg = Some(alg.into());
        self
    }

    fn apply(&self, params: &mut Map<String, Value>) {
        if let Some(key_use) = &self.key_use {
            params.insert("use".into(), key_use.clone().into());
        }
        if let Some(alg) = &self.alg {
            params.insert("alg".into(), alg.clone().into());
        }
    }
}

/// Builds key records from X.509 certificates
pub struct CertificateImporter;

impl CertificateImporter {
    /// Import the public key of a PEM or DER certificate.
    ///
    /// DER input must start with the certificate SEQUENCE. PEM input is
    /// searched for its first `CERTIFICATE` block; text before it and blocks
    /// after it are ignored.
    ///
    /// The record carries the key parameters, `x5c`, `x5t` and `x5t#256`, a
    /// `use` derived from the KeyUsage extension when it is unambiguous, and
    /// finally the caller's overrides.
    ///
    /// # Errors
    /// - [`JwkError::CertificateParse`] when the bytes are neither PEM nor DER
    ///   or the certificate structure is malformed
    /// - [`JwkError::UnsupportedKeyType`] when the key algorithm, curve or
    ///   point encoding is not one we import
    pub fn import_from_bytes(input: &[u8], overrides: &ImportOverrides) -> JwkResult<KeyRecord> {
        let start = input
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(input.len());
        let body = &input[start..];

        if is_der_framed(body) {
            debug!("Certificate input framed as DER ({} bytes)", body.len());
            return Self::import_der(body, overrides);
        }
        if let Some(block) = first_certificate_block(body) {
            debug!(
                "Certificate input framed as PEM ({} of {} bytes)",
                block.len(),
                body.len()
            );
            return Self::import_pem(block, overrides);
        }
        // Some other PEM document; decoding it reports the wrong label.
        if let Some(position) = find(body, PEM_PREAMBLE) {
            return Self::import_pem(&body[position..], overrides);
        }
        Err(JwkError::certificate_parse(
            "input is neither a PEM nor a DER encoded certificate",
        ))
    }

    /// Import the public key of a PEM `CERTIFICATE` document.
    ///
    /// # Errors
    /// See [`CertificateImporter::import_from_bytes`].
    pub fn import_pem(pem: &[u8], overrides: &ImportOverrides) -> JwkResult<KeyRecord> {
        let (label, der) = der::pem::decode_vec(pem)
            .map_err(|e| JwkError::certificate_parse(format!("invalid PEM: {e}")))?;
        if label != PEM_LABEL {
            return Err(JwkError::certificate_parse(format!(
                "expected a {PEM_LABEL} PEM document, found {label}"
            )));
        }
        Self::import_der(&der, overrides)
    }

    /// Import the public key of a DER certificate.
    ///
    /// # Errors
    /// See [`CertificateImporter::import_from_bytes`].
    pub fn import_der(der: &[u8], overrides: &ImportOverrides) -> JwkResult<KeyRecord> {
        let certificate = Certificate::from_der(der)
            .map_err(|e| JwkError::certificate_parse(format!("invalid certificate: {e}")))?;

        let mut params = spki::decompose(&certificate.tbs_certificate.subject_public_key_info)?;

        params.insert(
            "x5c".into(),
            Value::Array(vec![encode_standard(der).into()]),
        );
        params.insert("x5t".into(), encode_url(&Sha1::digest(der)).into());
        params.insert("x5t#256".into(), encode_url(&Sha256::digest(der)).into());

        if let Some(key_use) = usage_from_key_usage(&certificate)? {
            debug!("KeyUsage extension implies use={key_use}");
            params.insert("use".into(), key_use.into());
        }

        overrides.apply(&mut params);
        KeyRecord::from_map(params)
    }
}

/// DER certificates open with a SEQUENCE whose length never fits the short form
fn is_der_framed(body: &[u8]) -> bool {
    matches!(body, [DER_SEQUENCE_TAG, 0x81..=0x84, ..])
}

/// First `CERTIFICATE` block in `input`, from its BEGIN line through its END line
fn first_certificate_block(input: &[u8]) -> Option<&[u8]> {
    let start = find(input, CERTIFICATE_BEGIN)?;
    let block = &input[start..];
    let end = find(block, CERTIFICATE_END)? + CERTIFICATE_END.len();
    Some(&block[..end])
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// `sig` or `enc` when the KeyUsage extension grants only one kind of use
fn usage_from_key_usage(certificate: &Certificate) -> JwkResult<Option<&'static str>> {
    let Some(extensions) = certificate.tbs_certificate.extensions.as_ref() else {
        return Ok(None);
    };
    let Some(extension) = extensions.iter().find(|ext| ext.extn_id == oid::KEY_USAGE) else {
        return Ok(None);
    };

    let usage = KeyUsage::from_der(extension.extn_value.as_bytes())
        .map_err(|e| JwkError::certificate_parse(format!("invalid KeyUsage extension: {e}")))?;

    let signs = usage.digital_signature()
        || usage.non_repudiation()
        || usage.key_cert_sign()
        || usage.crl_sign();
    let encrypts = usage.key_encipherment() || usage.data_encipherment() || usage.key_agreement();

    Ok(match (signs, encrypts) {
        (true, false) => Some("sig"),
        (false, true) => Some("enc"),
        _ => None,
    })
}
