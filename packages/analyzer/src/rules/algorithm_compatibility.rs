//! `alg` must fit the key type and, for ECDSA, the curve

use keyprobe_jwk::{KeyRecord, KeyType};

use super::AnalyzerRule;
use crate::error::AnalyzerResult;
use crate::message::{DiagnosticMessage, Severity};

const OCT: &[&str] = &["oct"];
const RSA: &[&str] = &["RSA"];
const EC: &[&str] = &["EC"];
const OKP: &[&str] = &["OKP"];
const ECDH: &[&str] = &["EC", "OKP"];

/// Reports an `alg` that cannot be used with the key's `kty` or curve
#[derive(Debug, Clone, Copy, Default)]
pub struct AlgorithmCompatibilityRule;

impl AlgorithmCompatibilityRule {
    /// Rule identifier
    pub const ID: &'static str = "algorithm_compatibility";
}

impl AnalyzerRule for AlgorithmCompatibilityRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn evaluate(&self, key: &KeyRecord) -> AnalyzerResult<Vec<DiagnosticMessage>> {
        let Some(alg) = key.get_str("alg") else {
            return Ok(vec![]);
        };
        let Some(expected) = expected_key_types(alg) else {
            return Ok(vec![]);
        };

        let kty = key.kty();
        if !expected.iter().any(|candidate| *candidate == kty) {
            return Ok(vec![DiagnosticMessage::new(
                Severity::Medium,
                Self::ID,
                format!(
                    "Algorithm {alg} needs a {} key, but the key type is {kty}",
                    expected.join(" or ")
                ),
            )]);
        }

        if key.key_type() == KeyType::Ec {
            if let (Some(wanted), Some(crv)) = (ecdsa_curve(alg), key.get_str("crv")) {
                if crv != wanted {
                    return Ok(vec![DiagnosticMessage::new(
                        Severity::Medium,
                        Self::ID,
                        format!("Algorithm {alg} is defined for curve {wanted}, not {crv}"),
                    )]);
                }
            }
        }

        Ok(vec![])
    }
}

/// Key types an algorithm works with; `None` for `none` and unknown names
fn expected_key_types(alg: &str) -> Option<&'static [&'static str]> {
    let kinds = match alg {
        "HS1" | "HS256" | "HS384" | "HS512" | "dir" | "A128KW" | "A192KW" | "A256KW"
        | "A128GCMKW" | "A192GCMKW" | "A256GCMKW" | "PBES2-HS256+A128KW"
        | "PBES2-HS384+A192KW" | "PBES2-HS512+A256KW" => OCT,
        "RS1" | "RS256" | "RS384" | "RS512" | "PS256" | "PS384" | "PS512" | "RSA1_5"
        | "RSA-OAEP" | "RSA-OAEP-256" | "RSA-OAEP-384" | "RSA-OAEP-512" => RSA,
        "ES256" | "ES384" | "ES512" | "ES256K" => EC,
        "EdDSA" | "Ed25519" | "Ed448" => OKP,
        "ECDH-ES" | "ECDH-ES+A128KW" | "ECDH-ES+A192KW" | "ECDH-ES+A256KW" => ECDH,
        _ => return None,
    };
    Some(kinds)
}

fn ecdsa_curve(alg: &str) -> Option<&'static str> {
    match alg {
        "ES256" => Some("P-256"),
        "ES384" => Some("P-384"),
        "ES512" => Some("P-521"),
        "ES256K" => Some("secp256k1"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::key;
    use serde_json::json;

    #[test]
    fn test_wrong_key_type() {
        let messages = AlgorithmCompatibilityRule
            .evaluate(&key(json!({"kty": "EC", "crv": "P-256", "alg": "RS256"})))
            .unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].severity(), Severity::Medium);
        assert!(messages[0].text().contains("needs a RSA key"));
    }

    #[test]
    fn test_ecdh_accepts_ec_and_okp() {
        for kty in ["EC", "OKP"] {
            let messages = AlgorithmCompatibilityRule
                .evaluate(&key(json!({"kty": kty, "alg": "ECDH-ES"})))
                .unwrap();
            assert!(messages.is_empty());
        }
        let messages = AlgorithmCompatibilityRule
            .evaluate(&key(json!({"kty": "RSA", "alg": "ECDH-ES"})))
            .unwrap();
        assert!(messages[0].text().contains("EC or OKP"));
    }

    #[test]
    fn test_ecdsa_curve_mismatch() {
        let messages = AlgorithmCompatibilityRule
            .evaluate(&key(json!({"kty": "EC", "crv": "P-384", "alg": "ES256"})))
            .unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].text().contains("P-256"));

        let messages = AlgorithmCompatibilityRule
            .evaluate(&key(json!({"kty": "EC", "crv": "P-521", "alg": "ES512"})))
            .unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn test_unknown_or_none_alg_is_left_alone() {
        for alg in ["none", "XYZ"] {
            let messages = AlgorithmCompatibilityRule
                .evaluate(&key(json!({"kty": "RSA", "alg": alg})))
                .unwrap();
            assert!(messages.is_empty());
        }
    }
}
