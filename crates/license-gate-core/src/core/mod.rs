// license-gate-core/src/core/mod.rs
// ============================================================================
// Module: License Gate Core Types
// Description: Canonical module-identity, license, and policy rule structures.
// Purpose: Provide stable types shared by resolvers, cache, and validation.
// Dependencies: regex, semver, serde
// ============================================================================

//! ## Overview
//! Core types define module identities, licenses with confidence scores, and
//! the operator rule set used for admission decisions. These types are the
//! canonical source of truth for any derived surfaces (HTTP handlers or
//! configuration loaders).

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod decision;
pub mod license;
pub mod module;
pub mod rules;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use decision::Decision;
pub use decision::UnknownLicenseAction;
pub use license::Confidence;
pub use license::License;
pub use module::ModuleId;
pub use module::ModuleMatcher;
pub use rules::RuleSet;
