//! Rule registry and the analysis loop

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use keyprobe_jwk::KeyRecord;

use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::message::DiagnosticMessage;
use crate::rules::{self, AnalyzerRule};

/// Ordered registry of analyzer rules.
///
/// Rules are registered through `&mut self` and keys are analyzed through
/// `&self`, so once a manager is shared it can no longer change. Messages come
/// back in registration order, and within one rule in the order that rule
/// produced them.
#[derive(Default)]
pub struct AnalyzerManager {
    rules: Vec<Box<dyn AnalyzerRule>>,
}

impl AnalyzerManager {
    /// Empty manager
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Manager holding the built-in rules configured by `config`
    ///
    /// # Errors
    /// Returns [`AnalyzerError::Config`] when `config` is inconsistent.
    pub fn with_default_rules(config: &AnalyzerConfig) -> AnalyzerResult<Self> {
        config.validate()?;
        let mut manager = Self::new();
        for rule in rules::default_rules(config) {
            manager.register_boxed(rule)?;
        }
        Ok(manager)
    }

    /// Append `rule` to the registry.
    ///
    /// # Errors
    /// Returns [`AnalyzerError::DuplicateRule`] when a rule with the same id
    /// is already registered; the registry is left unchanged.
    pub fn register<R: AnalyzerRule + 'static>(&mut self, rule: R) -> AnalyzerResult<()> {
        self.register_boxed(Box::new(rule))
    }

    /// Append an already boxed rule.
    ///
    /// # Errors
    /// Same as [`register`](Self::register).
    pub fn register_boxed(&mut self, rule: Box<dyn AnalyzerRule>) -> AnalyzerResult<()> {
        let id = rule.id();
        if self.rules.iter().any(|existing| existing.id() == id) {
            return Err(AnalyzerError::duplicate_rule(id));
        }
        log::debug!("Registered analyzer rule {id}");
        self.rules.push(rule);
        Ok(())
    }

    /// Builder form of [`register`](Self::register)
    ///
    /// # Errors
    /// Returns [`AnalyzerError::DuplicateRule`] for an id already present.
    pub fn with_rule<R: AnalyzerRule + 'static>(mut self, rule: R) -> AnalyzerResult<Self> {
        self.register(rule)?;
        Ok(self)
    }

    /// Registered rule ids in report order
    #[must_use]
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.id()).collect()
    }

    /// Number of registered rules
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule against `key` and collect what they report.
    ///
    /// A rule that returns an error or panics is replaced in the output by a
    /// single critical [`DiagnosticMessage::analyzer_error`] and the remaining
    /// rules still run.
    #[must_use]
    pub fn analyze(&self, key: &KeyRecord) -> Vec<DiagnosticMessage> {
        let mut messages = Vec::new();
        for rule in &self.rules {
            let id = rule.id();
            match panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(key))) {
                Ok(Ok(found)) => {
                    log::debug!("Rule {id} reported {} message(s)", found.len());
                    messages.extend(found);
                }
                Ok(Err(error)) => {
                    log::warn!("Rule {id} failed: {error}");
                    messages.push(DiagnosticMessage::analyzer_error(id, error));
                }
                Err(payload) => {
                    let reason = panic_reason(payload.as_ref());
                    log::warn!("Rule {id} panicked: {reason}");
                    messages.push(DiagnosticMessage::analyzer_error(id, reason));
                }
            }
        }
        messages
    }
}

impl fmt::Debug for AnalyzerManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerManager")
            .field("rules", &self.rule_ids())
            .finish()
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        format!("panicked: {text}")
    } else if let Some(text) = payload.downcast_ref::<String>() {
        format!("panicked: {text}")
    } else {
        "panicked".to_string()
    }
}
