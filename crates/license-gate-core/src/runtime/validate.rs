// license-gate-core/src/runtime/validate.rs
// ============================================================================
// Module: Rule Set Validation
// Description: Rule-set policy evaluation and unknown-license disposition.
// Purpose: Produce admission decisions from module identity and license.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Rule evaluation encodes the policy precedence: identity-based overrides
//! dominate license rules, and deny lists dominate allow lists within their
//! tier. When no rule matches, the outcome is unknown and the disposition
//! wrapper converts it according to the configured operator action. The
//! wrapper refuses the unimplemented `warn` action at construction time so
//! operator intent is never silently misrepresented at request time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::Decision;
use crate::core::License;
use crate::core::ModuleId;
use crate::core::RuleSet;
use crate::core::UnknownLicenseAction;

// ============================================================================
// SECTION: Decision Reasons
// ============================================================================

/// Reason attached when a blacklist matcher applies.
const REASON_MODULE_BLACKLISTED: &str = "module blacklisted";
/// Reason attached when a whitelist matcher applies.
const REASON_MODULE_WHITELISTED: &str = "module whitelisted";
/// Reason attached when the license matches a denied entry.
const REASON_LICENSE_DENIED: &str = "license denied";
/// Reason attached when the license matches an allowed entry.
const REASON_LICENSE_ALLOWED: &str = "license allowed";
/// Reason attached when no rule matches and policy allows.
const REASON_UNKNOWN_ALLOWED: &str = "unknown license allowed by policy";
/// Reason attached when no rule matches and policy denies.
const REASON_UNKNOWN_DENIED: &str = "unknown license denied by policy";

// ============================================================================
// SECTION: Rule Outcome
// ============================================================================

/// Outcome of rule-set evaluation before disposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// A rule admitted the module.
    Allow(String),
    /// A rule rejected the module.
    Deny(String),
    /// No rule matched; deferred to the unknown-license disposition.
    Unknown,
}

// ============================================================================
// SECTION: Rule Set Validator
// ============================================================================

/// Applies module-identity and license allow/deny rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSetValidator {
    /// Compiled operator policy.
    rules: RuleSet,
}

impl RuleSetValidator {
    /// Creates a validator over the compiled rule set.
    #[must_use]
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
        }
    }

    /// Evaluates the rule set; the first applicable rule terminates
    /// evaluation.
    ///
    /// Blacklist, then whitelist, then denied licenses, then allowed
    /// licenses. Identity rules always dominate license rules and deny
    /// entries dominate allow entries within the license tier.
    #[must_use]
    pub fn evaluate(&self, module: &ModuleId, license: &License) -> RuleOutcome {
        if self.rules.is_blacklisted(module) {
            return RuleOutcome::Deny(REASON_MODULE_BLACKLISTED.to_string());
        }
        if self.rules.is_whitelisted(module) {
            return RuleOutcome::Allow(REASON_MODULE_WHITELISTED.to_string());
        }
        if self.rules.is_license_denied(license) {
            return RuleOutcome::Deny(REASON_LICENSE_DENIED.to_string());
        }
        if self.rules.is_license_allowed(license) {
            return RuleOutcome::Allow(REASON_LICENSE_ALLOWED.to_string());
        }
        RuleOutcome::Unknown
    }
}

// ============================================================================
// SECTION: Disposition Validator
// ============================================================================

/// Policy construction errors.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The configured unknown-license action is not implemented.
    #[error("unknown license action `{0}` is not supported")]
    UnsupportedAction(UnknownLicenseAction),
}

/// Wraps rule-set evaluation with the unknown-license disposition.
#[derive(Debug, Clone)]
pub struct DispositionValidator {
    /// Underlying rule-set validator.
    rules: RuleSetValidator,
    /// Operator action for unmatched licenses.
    action: UnknownLicenseAction,
}

impl DispositionValidator {
    /// Creates the disposition wrapper.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::UnsupportedAction`] for
    /// [`UnknownLicenseAction::Warn`], which is accepted in configuration
    /// but not implemented; failing here keeps the error at startup rather
    /// than at request time.
    pub fn new(rules: RuleSetValidator, action: UnknownLicenseAction) -> Result<Self, PolicyError> {
        if action == UnknownLicenseAction::Warn {
            return Err(PolicyError::UnsupportedAction(action));
        }
        Ok(Self {
            rules,
            action,
        })
    }

    /// Produces the final decision for a module and its resolved license.
    #[must_use]
    pub fn decide(&self, module: &ModuleId, license: &License) -> Decision {
        match self.rules.evaluate(module, license) {
            RuleOutcome::Allow(reason) => Decision::allow(reason),
            RuleOutcome::Deny(reason) => Decision::deny(reason),
            RuleOutcome::Unknown => match self.action {
                UnknownLicenseAction::Allow => Decision::allow(REASON_UNKNOWN_ALLOWED),
                // `Warn` is rejected in the constructor.
                UnknownLicenseAction::Warn | UnknownLicenseAction::Deny => {
                    Decision::deny(REASON_UNKNOWN_DENIED)
                }
            },
        }
    }
}
