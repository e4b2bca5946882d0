//! Keys should carry a usable `kid`

use keyprobe_jwk::KeyRecord;
use serde_json::Value;

use super::AnalyzerRule;
use crate::error::AnalyzerResult;
use crate::message::{DiagnosticMessage, Severity};

/// Reports a missing, blank or non-string `kid`.
///
/// When the key has no `kid` and its RFC 7638 thumbprint can be computed, the
/// thumbprint is suggested as a value.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierPresenceRule;

impl IdentifierPresenceRule {
    /// Rule identifier
    pub const ID: &'static str = "identifier_presence";
}

impl AnalyzerRule for IdentifierPresenceRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn evaluate(&self, key: &KeyRecord) -> AnalyzerResult<Vec<DiagnosticMessage>> {
        let text = match key.get("kid") {
            None => match key.thumbprint() {
                Ok(thumbprint) => format!(
                    "Parameter \"kid\" should be added, for example the key thumbprint \"{thumbprint}\""
                ),
                Err(_) => "Parameter \"kid\" should be added".to_string(),
            },
            Some(Value::String(kid)) if kid.trim().is_empty() => {
                "Parameter \"kid\" is blank".to_string()
            }
            Some(Value::String(_)) => return Ok(vec![]),
            Some(_) => "Parameter \"kid\" should be a string".to_string(),
        };
        Ok(vec![DiagnosticMessage::new(Severity::Info, Self::ID, text)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{key, severities};
    use serde_json::json;

    #[test]
    fn test_missing_kid_suggests_thumbprint() {
        let messages = IdentifierPresenceRule
            .evaluate(&key(json!({"kty": "oct", "k": "AAAA"})))
            .unwrap();
        assert_eq!(severities(&messages), [Severity::Info]);
        assert!(messages[0].text().contains("thumbprint"));
    }

    #[test]
    fn test_missing_kid_without_thumbprint() {
        let messages = IdentifierPresenceRule
            .evaluate(&key(json!({"kty": "RSA", "e": "AQAB"})))
            .unwrap();
        assert_eq!(messages[0].text(), "Parameter \"kid\" should be added");
    }

    #[test]
    fn test_blank_and_non_string_kid() {
        for kid in [json!("  "), json!(7)] {
            let messages = IdentifierPresenceRule
                .evaluate(&key(json!({"kty": "oct", "k": "AAAA", "kid": kid})))
                .unwrap();
            assert_eq!(severities(&messages), [Severity::Info]);
        }
    }

    #[test]
    fn test_present_kid() {
        let messages = IdentifierPresenceRule
            .evaluate(&key(json!({"kty": "oct", "k": "AAAA", "kid": "k1"})))
            .unwrap();
        assert!(messages.is_empty());
    }
}
