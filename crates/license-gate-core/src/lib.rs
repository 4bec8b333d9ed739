// license-gate-core/src/lib.rs
// ============================================================================
// Module: License Gate Core Library
// Description: Public API surface for the License Gate core.
// Purpose: Expose core types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! License Gate core provides the resolution-and-decision engine for module
//! license admission: a confidence-ranked resolver chain, a path translator
//! pipeline, a single-flight resolution cache, and a rule-set policy
//! validator. It is transport-agnostic and integrates through explicit
//! interfaces rather than embedding into a particular proxy or server.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::LicenseResolver;
pub use interfaces::PathTranslator;
pub use interfaces::ResolveError;
pub use interfaces::ResolvedLicense;
pub use runtime::ChainedResolver;
pub use runtime::ChainedTranslator;
pub use runtime::DispositionValidator;
pub use runtime::GopkgTranslator;
pub use runtime::MemoryLicenseCache;
pub use runtime::OverrideTranslator;
pub use runtime::PassthroughCache;
pub use runtime::PathOverride;
pub use runtime::PolicyError;
pub use runtime::RuleOutcome;
pub use runtime::RuleSetValidator;
pub use runtime::StdAliasTranslator;
pub use runtime::TranslatingResolver;
