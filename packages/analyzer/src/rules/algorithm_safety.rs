//! Detection of the `none` algorithm and known-broken algorithms

use keyprobe_jwk::KeyRecord;
use serde_json::Value;

use super::AnalyzerRule;
use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::message::{DiagnosticMessage, Severity};

/// Reports keys bound to `none` or to an algorithm on the broken list
#[derive(Debug, Clone)]
pub struct AlgorithmSafetyRule {
    broken: Vec<String>,
}

impl AlgorithmSafetyRule {
    /// Rule identifier
    pub const ID: &'static str = "algorithm_safety";

    /// Rule with an explicit broken-algorithm list
    #[must_use]
    pub fn new(broken: Vec<String>) -> Self {
        Self { broken }
    }

    /// Rule using the configured broken-algorithm list
    #[must_use]
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(config.broken_algorithms.clone())
    }
}

impl Default for AlgorithmSafetyRule {
    fn default() -> Self {
        Self::from_config(&AnalyzerConfig::default())
    }
}

impl AnalyzerRule for AlgorithmSafetyRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn evaluate(&self, key: &KeyRecord) -> AnalyzerResult<Vec<DiagnosticMessage>> {
        let alg = match key.get("alg") {
            None => return Ok(vec![]),
            Some(Value::String(alg)) => alg.as_str(),
            Some(_) => {
                return Err(AnalyzerError::evaluation(
                    Self::ID,
                    "parameter \"alg\" is not a string",
                ))
            }
        };

        // "None" and "NONE" slip past case-sensitive checks in some libraries.
        if alg.eq_ignore_ascii_case("none") {
            return Ok(vec![DiagnosticMessage::new(
                Severity::Critical,
                Self::ID,
                format!("Key is meant for the \"{alg}\" algorithm, which provides no protection"),
            )]);
        }

        if self.broken.iter().any(|broken| broken == alg) {
            return Ok(vec![DiagnosticMessage::new(
                Severity::Critical,
                Self::ID,
                format!("Algorithm \"{alg}\" is known to be broken"),
            )]);
        }

        Ok(vec![])
    }
}
