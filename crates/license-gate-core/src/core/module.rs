// license-gate-core/src/core/module.rs
// ============================================================================
// Module: Module Identity Types
// Description: Module identity and module-identity matchers.
// Purpose: Identify a dependency module and match it against policy rules.
// Dependencies: regex, semver, serde
// ============================================================================

//! ## Overview
//! A [`ModuleId`] is the `(path, version)` pair identifying one dependency
//! module. It is immutable once resolved and uniquely keys a cache entry.
//! A [`ModuleMatcher`] matches identities against a compiled name pattern and
//! an optional semantic-version constraint.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use regex::Regex;
use semver::Version;
use semver::VersionReq;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Module Identity
// ============================================================================

/// Identity of a dependency module requested through the proxy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleId {
    /// Hierarchical namespace path, e.g. a hosting-qualified name.
    pub path: String,
    /// Semantic-version string, usually `v`-prefixed.
    pub version: String,
}

impl ModuleId {
    /// Creates a new module identity.
    #[must_use]
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
        }
    }

    /// Returns a copy of this identity with a different path.
    ///
    /// Used by the translator pipeline, which rewrites paths while the
    /// version stays untouched.
    #[must_use]
    pub fn with_path(&self, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: self.version.clone(),
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.path, self.version)
    }
}

// ============================================================================
// SECTION: Module Matcher
// ============================================================================

/// Matches module identities by path pattern and optional version range.
#[derive(Debug, Clone)]
pub struct ModuleMatcher {
    /// Compiled pattern applied to the module path.
    pub name: Regex,
    /// Optional semantic-version constraint applied to the module version.
    pub version: Option<VersionReq>,
}

impl ModuleMatcher {
    /// Returns true when the matcher applies to the given identity.
    ///
    /// The path pattern must match, and when a version constraint is present
    /// the module version must parse as a semantic version and satisfy it.
    /// Unparseable versions never satisfy a constraint.
    #[must_use]
    pub fn matches(&self, module: &ModuleId) -> bool {
        if !self.name.is_match(&module.path) {
            return false;
        }
        match &self.version {
            None => true,
            Some(constraint) => {
                let raw = module.version.trim_start_matches('v');
                Version::parse(raw).is_ok_and(|version| constraint.matches(&version))
            }
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Tests use unwrap on fixed patterns."
    )]

    use super::ModuleId;
    use super::ModuleMatcher;
    use regex::Regex;
    use semver::VersionReq;

    #[test]
    fn matcher_without_constraint_matches_on_path_alone() {
        let matcher = ModuleMatcher {
            name: Regex::new(r"^github\.com/acme/.*$").unwrap(),
            version: None,
        };
        assert!(matcher.matches(&ModuleId::new("github.com/acme/tool", "v1.2.3")));
        assert!(!matcher.matches(&ModuleId::new("github.com/other/tool", "v1.2.3")));
    }

    #[test]
    fn matcher_applies_version_constraint() {
        let matcher = ModuleMatcher {
            name: Regex::new(r"^example\.com/pkg$").unwrap(),
            version: Some(VersionReq::parse(">=2.0.0").unwrap()),
        };
        assert!(matcher.matches(&ModuleId::new("example.com/pkg", "v2.1.0")));
        assert!(!matcher.matches(&ModuleId::new("example.com/pkg", "v1.9.0")));
    }

    #[test]
    fn unparseable_version_never_satisfies_constraint() {
        let matcher = ModuleMatcher {
            name: Regex::new(r"^example\.com/pkg$").unwrap(),
            version: Some(VersionReq::parse(">=1.0.0").unwrap()),
        };
        assert!(!matcher.matches(&ModuleId::new("example.com/pkg", "not-a-version")));
    }
}
