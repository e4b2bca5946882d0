//! Severity-tagged findings produced by analyzer rules

use std::fmt;

use serde::{Deserialize, Serialize};

/// How serious a finding is, from `Info` up to `Critical`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth knowing, not a weakness
    Info,
    /// Hygiene issue
    Low,
    /// Weakness that depends on context
    Medium,
    /// Key should not be trusted as is
    High,
    /// Key is unsafe to use
    Critical,
}

impl Severity {
    /// Uppercase label used in rendered messages
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a message came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Emitted by a rule about the key
    Finding,
    /// The rule itself failed; the manager reported it in its place
    AnalyzerError,
}

/// One finding about a key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    severity: Severity,
    rule: String,
    text: String,
    kind: MessageKind,
}

impl DiagnosticMessage {
    /// A finding from `rule`
    pub fn new(severity: Severity, rule: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            severity,
            rule: rule.into(),
            text: text.into(),
            kind: MessageKind::Finding,
        }
    }

    /// The critical message standing in for a rule that failed
    pub fn analyzer_error(rule: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            severity: Severity::Critical,
            rule: rule.into(),
            text: format!("AnalyzerError: rule could not evaluate the key: {reason}"),
            kind: MessageKind::AnalyzerError,
        }
    }

    /// Severity
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Identifier of the originating rule
    #[must_use]
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Human-readable text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Finding or analyzer error
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Whether this message reports a failed rule rather than a key weakness
    #[must_use]
    pub fn is_analyzer_error(&self) -> bool {
        self.kind == MessageKind::AnalyzerError
    }
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.rule, self.text)
    }
}
