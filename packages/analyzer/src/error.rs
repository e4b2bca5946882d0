//! Analyzer error types

use keyprobe_jwk::JwkError;
use thiserror::Error;

/// Result type for analyzer operations
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

/// Analyzer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyzerError {
    /// A rule with the same identifier is already registered
    #[error("Duplicate rule: {id} is already registered")]
    DuplicateRule {
        /// Identifier of the rejected rule
        id: String,
    },

    /// A rule could not evaluate the key
    #[error("Rule {rule} failed: {reason}")]
    Evaluation {
        /// Identifier of the failing rule
        rule: String,
        /// What went wrong
        reason: String,
    },

    /// A key parameter the rule needs could not be read
    #[error(transparent)]
    Key(#[from] JwkError),

    /// Invalid analyzer configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AnalyzerError {
    /// Create a duplicate rule error
    pub fn duplicate_rule(id: impl Into<String>) -> Self {
        Self::DuplicateRule { id: id.into() }
    }

    /// Create an evaluation error for `rule`
    pub fn evaluation(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Evaluation {
            rule: rule.into(),
            reason: reason.into(),
        }
    }
}
