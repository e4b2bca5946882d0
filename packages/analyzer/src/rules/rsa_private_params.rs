//! Private RSA keys should carry their CRT parameters

use keyprobe_jwk::{KeyRecord, KeyType};

use super::AnalyzerRule;
use crate::error::AnalyzerResult;
use crate::message::{DiagnosticMessage, Severity};

const CRT_PARAMS: [&str; 5] = ["p", "q", "dp", "dq", "qi"];

/// Reports private RSA keys missing any of `p`, `q`, `dp`, `dq` or `qi`
#[derive(Debug, Clone, Copy, Default)]
pub struct RsaPrivateParamsRule;

impl RsaPrivateParamsRule {
    /// Rule identifier
    pub const ID: &'static str = "rsa_private_params";
}

impl AnalyzerRule for RsaPrivateParamsRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn evaluate(&self, key: &KeyRecord) -> AnalyzerResult<Vec<DiagnosticMessage>> {
        if key.key_type() != KeyType::Rsa || !key.has("d") {
            return Ok(vec![]);
        }

        let missing: Vec<&str> = CRT_PARAMS
            .into_iter()
            .filter(|param| !key.has(param))
            .collect();
        if missing.is_empty() {
            return Ok(vec![]);
        }

        Ok(vec![DiagnosticMessage::new(
            Severity::Low,
            Self::ID,
            format!(
                "Private RSA key is missing CRT parameters {}; they should be added for faster and safer operations",
                missing.join(", ")
            ),
        )])
    }
}
