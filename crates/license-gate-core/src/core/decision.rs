// license-gate-core/src/core/decision.rs
// ============================================================================
// Module: Admission Decision Types
// Description: Final policy outcome and unknown-license operator actions.
// Purpose: Represent decisions with a mandatory human-readable reason.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`Decision`] is the final admission outcome: allow or deny plus a
//! justification. Denials always carry a non-empty reason; the gate never
//! returns an ambiguous denial. [`UnknownLicenseAction`] is the operator
//! policy applied when no rule matches a resolved license.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Final admission outcome for one module request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Whether the module may be served.
    pub allow: bool,
    /// Human-readable justification for the outcome.
    pub reason: String,
}

impl Decision {
    /// Creates an allow decision.
    #[must_use]
    pub fn allow(reason: impl Into<String>) -> Self {
        Self {
            allow: true,
            reason: reason.into(),
        }
    }

    /// Creates a deny decision.
    #[must_use]
    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allow: false,
            reason: reason.into(),
        }
    }
}

// ============================================================================
// SECTION: Unknown-License Action
// ============================================================================

/// Operator policy for licenses no rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownLicenseAction {
    /// Admit modules with unknown licenses.
    Allow,
    /// Admit but report; accepted in configuration, not implemented.
    Warn,
    /// Reject modules with unknown licenses.
    Deny,
}

impl UnknownLicenseAction {
    /// Returns the stable configuration label for the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Warn => "warn",
            Self::Deny => "deny",
        }
    }
}

impl fmt::Display for UnknownLicenseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
