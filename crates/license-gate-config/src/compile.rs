// license-gate-config/src/compile.rs
// ============================================================================
// Module: Policy Compilation
// Description: Compiles raw configuration entries into core policy types.
// Purpose: Surface every rule defect at startup, never at request time.
// Dependencies: license-gate-core, regex, semver, spdx
// ============================================================================

//! ## Overview
//! Compilation turns operator-written strings into the core's validated
//! types: regex patterns, semantic-version constraints, and licenses whose
//! SPDX identifiers are resolved to canonical names against the license
//! registry. Any defect aborts startup with a [`ConfigError`]; the runtime
//! path only ever sees compiled rules.

// ============================================================================
// SECTION: Imports
// ============================================================================

use license_gate_core::Confidence;
use license_gate_core::License;
use license_gate_core::ModuleMatcher;
use license_gate_core::PathOverride;
use license_gate_core::RuleSet;
use license_gate_core::UnknownLicenseAction;
use regex::Regex;
use semver::VersionReq;

use crate::config::ConfigError;
use crate::config::GateConfig;
use crate::config::RawLicense;
use crate::config::RawModuleMatcher;
use crate::config::RawPathOverride;

// ============================================================================
// SECTION: Compiled Policy
// ============================================================================

/// Everything the admission pipeline needs, compiled once at startup.
#[derive(Debug)]
pub struct CompiledPolicy {
    /// Compiled allow/deny rule set.
    pub rule_set: RuleSet,
    /// Compiled operator path-rewrite rules.
    pub path_overrides: Vec<PathOverride>,
    /// Operator action for unmatched licenses.
    pub unknown_license_action: UnknownLicenseAction,
    /// Global fallback confidence threshold for resolvers.
    pub confidence_threshold: Confidence,
}

/// Compiles the raw configuration into runtime policy types.
///
/// # Errors
///
/// Returns [`ConfigError`] for invalid patterns, version constraints,
/// license entries, or an out-of-range confidence threshold.
pub fn compile_policy(config: &GateConfig) -> Result<CompiledPolicy, ConfigError> {
    config.validate()?;
    let rules = &config.validation.rule_set;
    let rule_set = RuleSet {
        whitelisted_modules: compile_matchers(&rules.whitelisted_modules)?,
        blacklisted_modules: compile_matchers(&rules.blacklisted_modules)?,
        allowed_licenses: compile_licenses(&rules.allowed_licenses)?,
        denied_licenses: compile_licenses(&rules.denied_licenses)?,
    };
    Ok(CompiledPolicy {
        rule_set,
        path_overrides: compile_overrides(&config.path_overrides)?,
        unknown_license_action: config.validation.unknown_license_action,
        confidence_threshold: Confidence::new(config.validation.confidence_threshold),
    })
}

// ============================================================================
// SECTION: Matcher Compilation
// ============================================================================

/// Compiles raw module matchers, preserving insertion order.
fn compile_matchers(raw: &[RawModuleMatcher]) -> Result<Vec<ModuleMatcher>, ConfigError> {
    raw.iter()
        .map(|entry| {
            if entry.name.is_empty() {
                return Err(ConfigError::InvalidMatcher(
                    "module matcher requires a non-empty name pattern".to_string(),
                ));
            }
            let name = Regex::new(&entry.name).map_err(|err| {
                ConfigError::InvalidMatcher(format!("pattern {}: {err}", entry.name))
            })?;
            let version = entry
                .version_constraint
                .as_deref()
                .map(|constraint| {
                    VersionReq::parse(constraint).map_err(|err| {
                        ConfigError::InvalidMatcher(format!(
                            "constraint {constraint} for module {}: {err}",
                            entry.name
                        ))
                    })
                })
                .transpose()?;
            Ok(ModuleMatcher {
                name,
                version,
            })
        })
        .collect()
}

// ============================================================================
// SECTION: License Compilation
// ============================================================================

/// Compiles raw license entries, resolving SPDX identifiers to canonical
/// names.
fn compile_licenses(raw: &[RawLicense]) -> Result<Vec<License>, ConfigError> {
    raw.iter()
        .map(|entry| match (&entry.spdx_id, &entry.name) {
            (Some(id), _) => {
                let known = spdx::license_id(id).ok_or_else(|| {
                    ConfigError::InvalidLicense(format!("license {id} not found in SPDX registry"))
                })?;
                Ok(License::with_spdx_id(known.full_name, id.clone()))
            }
            (None, Some(name)) if !name.is_empty() => Ok(License::by_name(name.clone())),
            _ => Err(ConfigError::InvalidLicense(
                "license rule requires a name or an SPDX identifier".to_string(),
            )),
        })
        .collect()
}

// ============================================================================
// SECTION: Override Compilation
// ============================================================================

/// Compiles raw path overrides, preserving insertion order.
fn compile_overrides(raw: &[RawPathOverride]) -> Result<Vec<PathOverride>, ConfigError> {
    raw.iter()
        .map(|entry| {
            let pattern = Regex::new(&entry.pattern).map_err(|err| {
                ConfigError::InvalidOverride(format!("match {}: {err}", entry.pattern))
            })?;
            Ok(PathOverride {
                pattern,
                replace: entry.replace.clone(),
            })
        })
        .collect()
}
