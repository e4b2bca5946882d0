//! Analyzer rules.
//!
//! A rule inspects one [`KeyRecord`] and returns the findings it has about
//! it. Rules are pure: they never change the key and never depend on what
//! other rules reported. A rule that does not apply to the key's `kty`
//! returns an empty list.

mod algorithm_compatibility;
mod algorithm_presence;
mod algorithm_safety;
mod curve_safety;
mod identifier_presence;
mod key_size;
mod rsa_private_params;
mod usage_consistency;

pub use algorithm_compatibility::AlgorithmCompatibilityRule;
pub use algorithm_presence::AlgorithmPresenceRule;
pub use algorithm_safety::AlgorithmSafetyRule;
pub use curve_safety::CurveSafetyRule;
pub use identifier_presence::IdentifierPresenceRule;
pub use key_size::KeySizeRule;
pub use rsa_private_params::RsaPrivateParamsRule;
pub use usage_consistency::UsageConsistencyRule;

use keyprobe_jwk::KeyRecord;

use crate::config::AnalyzerConfig;
use crate::error::AnalyzerResult;
use crate::message::DiagnosticMessage;

/// A unit of security judgment over a key record.
///
/// Implementations must be thread-safe (Send + Sync) so a finished
/// [`AnalyzerManager`](crate::AnalyzerManager) can be shared between threads.
pub trait AnalyzerRule: Send + Sync {
    /// Stable identifier, unique within a manager
    fn id(&self) -> &'static str;

    /// Findings about `key`, in the order the rule wants them reported.
    ///
    /// # Errors
    /// Returns an error when the key is too damaged for the rule to judge it,
    /// for example a binary parameter that is not base64url.
    fn evaluate(&self, key: &KeyRecord) -> AnalyzerResult<Vec<DiagnosticMessage>>;
}

/// Implementation of `AnalyzerRule` for `Arc<T>` to allow shared ownership.
impl<T: AnalyzerRule + ?Sized> AnalyzerRule for std::sync::Arc<T> {
    fn id(&self) -> &'static str {
        (**self).id()
    }

    fn evaluate(&self, key: &KeyRecord) -> AnalyzerResult<Vec<DiagnosticMessage>> {
        (**self).evaluate(key)
    }
}

/// The built-in rules in report order, minus any the configuration disables
#[must_use]
pub fn default_rules(config: &AnalyzerConfig) -> Vec<Box<dyn AnalyzerRule>> {
    let rules: Vec<Box<dyn AnalyzerRule>> = vec![
        Box::new(KeySizeRule::from_config(config)),
        Box::new(AlgorithmSafetyRule::from_config(config)),
        Box::new(AlgorithmPresenceRule),
        Box::new(AlgorithmCompatibilityRule),
        Box::new(CurveSafetyRule::from_config(config)),
        Box::new(UsageConsistencyRule),
        Box::new(RsaPrivateParamsRule),
        Box::new(IdentifierPresenceRule),
    ];
    rules
        .into_iter()
        .filter(|rule| !config.is_disabled(rule.id()))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let ids: Vec<&str> = default_rules(&AnalyzerConfig::default())
            .iter()
            .map(|rule| rule.id())
            .collect();
        assert_eq!(
            ids,
            [
                "key_size",
                "algorithm_safety",
                "algorithm_presence",
                "algorithm_compatibility",
                "curve_safety",
                "usage_consistency",
                "rsa_private_params",
                "identifier_presence",
            ]
        );
    }

    #[test]
    fn test_disabled_rules_are_skipped() {
        let config = AnalyzerConfig::default()
            .disable_rule("algorithm_presence")
            .disable_rule("identifier_presence");
        let ids: Vec<&str> = default_rules(&config).iter().map(|rule| rule.id()).collect();
        assert!(!ids.contains(&"algorithm_presence"));
        assert!(!ids.contains(&"identifier_presence"));
        assert_eq!(ids.len(), 6);
    }
}
