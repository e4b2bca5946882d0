//! Approved curves for EC and OKP keys, plus an on-curve check for P-256 and P-384

use keyprobe_jwk::{KeyRecord, KeyType};

use super::AnalyzerRule;
use crate::config::AnalyzerConfig;
use crate::error::AnalyzerResult;
use crate::message::{DiagnosticMessage, Severity};

/// Reports EC and OKP keys on unapproved or undeclared curves, and EC public
/// points that do not lie on their curve
#[derive(Debug, Clone)]
pub struct CurveSafetyRule {
    approved: Vec<String>,
}

impl CurveSafetyRule {
    /// Rule identifier
    pub const ID: &'static str = "curve_safety";

    /// Rule with an explicit approved-curve list
    #[must_use]
    pub fn new(approved: Vec<String>) -> Self {
        Self { approved }
    }

    /// Rule using the configured approved curves
    #[must_use]
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(config.approved_curves.clone())
    }

    fn message(&self, severity: Severity, text: String) -> DiagnosticMessage {
        DiagnosticMessage::new(severity, Self::ID, text)
    }
}

impl Default for CurveSafetyRule {
    fn default() -> Self {
        Self::from_config(&AnalyzerConfig::default())
    }
}

impl AnalyzerRule for CurveSafetyRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn evaluate(&self, key: &KeyRecord) -> AnalyzerResult<Vec<DiagnosticMessage>> {
        let key_type = key.key_type();
        if !matches!(key_type, KeyType::Ec | KeyType::Okp) {
            return Ok(vec![]);
        }

        let Some(crv) = key.get_str("crv") else {
            return Ok(vec![self.message(
                Severity::Medium,
                format!("{key_type} key does not declare its curve in \"crv\""),
            )]);
        };

        let mut messages = Vec::new();
        if !self.approved.iter().any(|approved| approved == crv) {
            messages.push(self.message(
                Severity::Medium,
                format!("Curve {crv} is not on the approved curve list"),
            ));
        }

        if key_type == KeyType::Ec {
            if let (Some(x), Some(y)) = (key.decode_param("x")?, key.decode_param("y")?) {
                if let Some(false) = point_on_curve(crv, &x, &y) {
                    messages.push(self.message(
                        Severity::High,
                        format!("Public point is not a valid {crv} point"),
                    ));
                }
            }
        }

        Ok(messages)
    }
}

/// `Some(valid)` for curves we can check, `None` otherwise
fn point_on_curve(crv: &str, x: &[u8], y: &[u8]) -> Option<bool> {
    let mut sec1 = Vec::with_capacity(1 + x.len() + y.len());
    sec1.push(0x04);
    sec1.extend_from_slice(x);
    sec1.extend_from_slice(y);

    match crv {
        "P-256" => Some(p256::PublicKey::from_sec1_bytes(&sec1).is_ok()),
        "P-384" => Some(p384::PublicKey::from_sec1_bytes(&sec1).is_ok()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{key, severities};
    use serde_json::json;

    // Public point of the P-256 certificate fixture.
    const P256_X: &str = "VJyr287KufZNa9XBM7vvEbaHW0E0iQYC2i222G4kqk4";
    const P256_Y: &str = "I9EtpUwQekkqVlhNngCCJisU1ql4GTq8Do8gkPjkAy0";

    #[test]
    fn test_valid_p256_key() {
        let key = key(json!({"kty": "EC", "crv": "P-256", "x": P256_X, "y": P256_Y}));
        assert!(CurveSafetyRule::default().evaluate(&key).unwrap().is_empty());
    }

    #[test]
    fn test_point_off_curve() {
        let key = key(json!({"kty": "EC", "crv": "P-256", "x": P256_X, "y": P256_X}));
        let messages = CurveSafetyRule::default().evaluate(&key).unwrap();
        assert_eq!(severities(&messages), [Severity::High]);
    }

    #[test]
    fn test_unapproved_curve() {
        let key = key(json!({"kty": "EC", "crv": "secp256k1", "x": P256_X, "y": P256_Y}));
        let messages = CurveSafetyRule::default().evaluate(&key).unwrap();
        assert_eq!(severities(&messages), [Severity::Medium]);
        assert!(messages[0].text().contains("secp256k1"));
    }

    #[test]
    fn test_missing_curve() {
        let key = key(json!({"kty": "OKP", "x": "AAAA"}));
        let messages = CurveSafetyRule::default().evaluate(&key).unwrap();
        assert_eq!(severities(&messages), [Severity::Medium]);
    }

    #[test]
    fn test_okp_curves() {
        let rule = CurveSafetyRule::default();
        assert!(rule
            .evaluate(&key(json!({"kty": "OKP", "crv": "Ed25519", "x": "AAAA"})))
            .unwrap()
            .is_empty());
        assert_eq!(
            rule.evaluate(&key(json!({"kty": "OKP", "crv": "Curve1174"})))
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_rsa_is_ignored() {
        let key = key(json!({"kty": "RSA", "crv": "P-192"}));
        assert!(CurveSafetyRule::default().evaluate(&key).unwrap().is_empty());
    }

    #[test]
    fn test_strict_list_rejects_p256() {
        let rule = CurveSafetyRule::from_config(&AnalyzerConfig::strict());
        let key = key(json!({"kty": "EC", "crv": "P-256", "x": P256_X, "y": P256_Y}));
        assert_eq!(severities(&rule.evaluate(&key).unwrap()), [Severity::Medium]);
    }
}
