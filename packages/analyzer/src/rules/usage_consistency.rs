//! `use` and `key_ops` must be present, known and agree with each other

use keyprobe_jwk::KeyRecord;
use serde_json::Value;

use super::AnalyzerRule;
use crate::error::AnalyzerResult;
use crate::message::{DiagnosticMessage, Severity};

const SIGNATURE_OPS: &[&str] = &["sign", "verify"];
const ENCRYPTION_OPS: &[&str] = &[
    "encrypt",
    "decrypt",
    "wrapKey",
    "unwrapKey",
    "deriveKey",
    "deriveBits",
];

/// Reports a missing or unknown `use`, malformed `key_ops`, and
/// `use`/`key_ops` combinations that contradict each other
#[derive(Debug, Clone, Copy, Default)]
pub struct UsageConsistencyRule;

impl UsageConsistencyRule {
    /// Rule identifier
    pub const ID: &'static str = "usage_consistency";

    fn low(text: impl Into<String>) -> DiagnosticMessage {
        DiagnosticMessage::new(Severity::Low, Self::ID, text)
    }
}

impl AnalyzerRule for UsageConsistencyRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn evaluate(&self, key: &KeyRecord) -> AnalyzerResult<Vec<DiagnosticMessage>> {
        let mut messages = Vec::new();

        let key_use = match key.get("use") {
            None => {
                messages.push(Self::low("Parameter \"use\" should be added"));
                None
            }
            Some(Value::String(value)) if value == "sig" || value == "enc" => Some(value.as_str()),
            Some(other) => {
                messages.push(Self::low(format!(
                    "Parameter \"use\" has an unsupported value {other}"
                )));
                None
            }
        };

        if !key.has("key_ops") {
            return Ok(messages);
        }
        let Some(ops) = key.key_ops() else {
            messages.push(Self::low("Parameter \"key_ops\" must be an array of strings"));
            return Ok(messages);
        };

        for (index, op) in ops.iter().enumerate() {
            if !is_op(SIGNATURE_OPS, op) && !is_op(ENCRYPTION_OPS, op) {
                messages.push(Self::low(format!("Unknown key operation \"{op}\"")));
            }
            if ops[..index].contains(op) {
                messages.push(Self::low(format!(
                    "Key operation \"{op}\" is listed more than once"
                )));
            }
        }

        let signs = ops.iter().any(|op| is_op(SIGNATURE_OPS, op));
        let encrypts = ops.iter().any(|op| is_op(ENCRYPTION_OPS, op));
        match key_use {
            Some("sig") if encrypts => messages.push(Self::low(
                "Parameter \"use\" is \"sig\" but \"key_ops\" allows encryption operations",
            )),
            Some("enc") if signs => messages.push(Self::low(
                "Parameter \"use\" is \"enc\" but \"key_ops\" allows signature operations",
            )),
            None if signs && encrypts => messages.push(Self::low(
                "Parameter \"key_ops\" mixes signature and encryption operations",
            )),
            _ => {}
        }

        Ok(messages)
    }
}

fn is_op(family: &[&str], op: &str) -> bool {
    family.iter().any(|known| *known == op)
}
