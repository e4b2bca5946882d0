//! Keys should name the one algorithm they are used with

use keyprobe_jwk::KeyRecord;

use super::AnalyzerRule;
use crate::error::AnalyzerResult;
use crate::message::{DiagnosticMessage, Severity};

/// Reports keys without an `alg` parameter
#[derive(Debug, Clone, Copy, Default)]
pub struct AlgorithmPresenceRule;

impl AlgorithmPresenceRule {
    /// Rule identifier
    pub const ID: &'static str = "algorithm_presence";
}

impl AnalyzerRule for AlgorithmPresenceRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn evaluate(&self, key: &KeyRecord) -> AnalyzerResult<Vec<DiagnosticMessage>> {
        if key.has("alg") {
            return Ok(vec![]);
        }
        Ok(vec![DiagnosticMessage::new(
            Severity::Low,
            Self::ID,
            "Parameter \"alg\" should be added to bind the key to a single algorithm",
        )])
    }
}
