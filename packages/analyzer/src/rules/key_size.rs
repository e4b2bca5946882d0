//! Minimum key sizes for RSA moduli and symmetric secrets

use keyprobe_jwk::{KeyRecord, KeyType};

use super::AnalyzerRule;
use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::message::{DiagnosticMessage, Severity};

/// Reports RSA moduli and `oct` secrets below the configured minimum, and
/// HMAC secrets shorter than their digest
#[derive(Debug, Clone)]
pub struct KeySizeRule {
    min_rsa_bits: usize,
    min_oct_bytes: usize,
}

impl KeySizeRule {
    /// Rule identifier
    pub const ID: &'static str = "key_size";

    /// Rule with explicit thresholds
    #[must_use]
    pub fn new(min_rsa_bits: usize, min_oct_bytes: usize) -> Self {
        Self {
            min_rsa_bits,
            min_oct_bytes,
        }
    }

    /// Rule using the configuration thresholds
    #[must_use]
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(config.min_rsa_bits, config.min_oct_bytes)
    }

    fn check_rsa(&self, key: &KeyRecord) -> AnalyzerResult<Vec<DiagnosticMessage>> {
        let modulus = key
            .decode_param("n")?
            .ok_or_else(|| AnalyzerError::evaluation(Self::ID, "RSA key has no modulus \"n\""))?;

        let bits = bit_length(&modulus);
        if bits >= self.min_rsa_bits {
            return Ok(vec![]);
        }
        Ok(vec![DiagnosticMessage::new(
            Severity::High,
            Self::ID,
            format!(
                "RSA modulus is {bits} bits, below the {} bit minimum",
                self.min_rsa_bits
            ),
        )])
    }

    fn check_oct(&self, key: &KeyRecord) -> AnalyzerResult<Vec<DiagnosticMessage>> {
        let secret = key
            .decode_param("k")?
            .ok_or_else(|| AnalyzerError::evaluation(Self::ID, "oct key has no secret \"k\""))?;

        let mut messages = Vec::new();
        let len = secret.len();
        if len < self.min_oct_bytes {
            messages.push(DiagnosticMessage::new(
                Severity::High,
                Self::ID,
                format!(
                    "Symmetric key is {len} bytes ({} bits), below the {} byte minimum",
                    len * 8,
                    self.min_oct_bytes
                ),
            ));
        }

        let hmac = key
            .get_str("alg")
            .and_then(|alg| Some((alg, hmac_digest_len(alg)?)));
        if let Some((alg, digest_len)) = hmac {
            if len < digest_len {
                messages.push(DiagnosticMessage::new(
                    Severity::High,
                    Self::ID,
                    format!("{alg} key is {len} bytes, shorter than its {digest_len} byte digest"),
                ));
            }
        }
        Ok(messages)
    }
}

impl Default for KeySizeRule {
    fn default() -> Self {
        Self::from_config(&AnalyzerConfig::default())
    }
}

impl AnalyzerRule for KeySizeRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn evaluate(&self, key: &KeyRecord) -> AnalyzerResult<Vec<DiagnosticMessage>> {
        match key.key_type() {
            KeyType::Rsa => self.check_rsa(key),
            KeyType::Oct => self.check_oct(key),
            _ => Ok(vec![]),
        }
    }
}

/// Significant bits of a big-endian unsigned integer
fn bit_length(bytes: &[u8]) -> usize {
    match bytes.iter().position(|&b| b != 0) {
        Some(first) => (bytes.len() - first) * 8 - bytes[first].leading_zeros() as usize,
        None => 0,
    }
}

/// Minimum HMAC secret length: the digest size
fn hmac_digest_len(alg: &str) -> Option<usize> {
    match alg {
        "HS256" => Some(32),
        "HS384" => Some(48),
        "HS512" => Some(64),
        _ => None,
    }
}
