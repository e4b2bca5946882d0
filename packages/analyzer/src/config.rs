//! Analyzer thresholds and rule selection

use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, AnalyzerResult};

/// Curves accepted by the curve safety rule by default
pub const DEFAULT_APPROVED_CURVES: &[&str] =
    &["P-256", "P-384", "P-521", "Ed25519", "Ed448", "X25519", "X448"];

/// Algorithms reported as broken by default
pub const DEFAULT_BROKEN_ALGORITHMS: &[&str] = &["RSA1_5", "RS1", "HS1"];

/// Analyzer configuration.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust,ignore
/// let config = AnalyzerConfig::from_json(r#"{"min_rsa_bits": 3072}"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Smallest acceptable RSA modulus, in bits
    pub min_rsa_bits: usize,
    /// Smallest acceptable symmetric key, in bytes
    pub min_oct_bytes: usize,
    /// EC and OKP curves considered safe
    pub approved_curves: Vec<String>,
    /// `alg` values reported as broken
    pub broken_algorithms: Vec<String>,
    /// Rule identifiers left out of the default rule set
    pub disabled_rules: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_rsa_bits: 2048,
            min_oct_bytes: 16,
            approved_curves: to_strings(DEFAULT_APPROVED_CURVES),
            broken_algorithms: to_strings(DEFAULT_BROKEN_ALGORITHMS),
            disabled_rules: vec![],
        }
    }
}

impl AnalyzerConfig {
    /// Stricter thresholds: 3072-bit RSA, 256-bit secrets, no P-256.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            min_rsa_bits: 3072,
            min_oct_bytes: 32,
            approved_curves: to_strings(&["P-384", "P-521", "Ed25519", "Ed448", "X25519", "X448"]),
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON; missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns [`AnalyzerError::Config`] for invalid JSON, unknown fields, or
    /// zero thresholds.
    pub fn from_json(json: &str) -> AnalyzerResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AnalyzerError::Config(format!("invalid analyzer configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the thresholds.
    ///
    /// # Errors
    /// Returns [`AnalyzerError::Config`] when a threshold is zero.
    pub fn validate(&self) -> AnalyzerResult<()> {
        if self.min_rsa_bits == 0 {
            return Err(AnalyzerError::Config("min_rsa_bits must be positive".into()));
        }
        if self.min_oct_bytes == 0 {
            return Err(AnalyzerError::Config("min_oct_bytes must be positive".into()));
        }
        Ok(())
    }

    /// Set the minimum RSA modulus size
    #[must_use]
    pub fn with_min_rsa_bits(mut self, bits: usize) -> Self {
        self.min_rsa_bits = bits;
        self
    }

    /// Set the minimum symmetric key size
    #[must_use]
    pub fn with_min_oct_bytes(mut self, bytes: usize) -> Self {
        self.min_oct_bytes = bytes;
        self
    }

    /// Replace the approved curve list
    #[must_use]
    pub fn with_approved_curves(mut self, curves: Vec<String>) -> Self {
        self.approved_curves = curves;
        self
    }

    /// Add an algorithm to the broken list
    #[must_use]
    pub fn with_broken_algorithm(mut self, alg: impl Into<String>) -> Self {
        self.broken_algorithms.push(alg.into());
        self
    }

    /// Leave a rule out of the default rule set
    #[must_use]
    pub fn disable_rule(mut self, id: impl Into<String>) -> Self {
        self.disabled_rules.push(id.into());
        self
    }

    /// Whether a rule is left out
    #[must_use]
    pub fn is_disabled(&self, id: &str) -> bool {
        self.disabled_rules.iter().any(|disabled| disabled == id)
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}
