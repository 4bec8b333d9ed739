// license-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: License Gate Runtime
// Description: Resolver chain, translator pipeline, cache, and validation.
// Purpose: Execute license resolution and policy evaluation for admissions.
// Dependencies: crate::{core, interfaces}, tokio
// ============================================================================

//! ## Overview
//! Runtime modules implement the resolution-and-decision engine: chained
//! license resolution with confidence fallback, path translation, the
//! single-flight memory cache, and rule-set validation wrapped by the
//! unknown-license disposition. The admission handler composes these pieces
//! at construction time and calls into the same engine logic for every
//! request.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod cache;
pub mod chain;
pub mod translate;
pub mod validate;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use cache::MemoryLicenseCache;
pub use cache::PassthroughCache;
pub use chain::ChainedResolver;
pub use chain::TranslatingResolver;
pub use translate::ChainedTranslator;
pub use translate::GopkgTranslator;
pub use translate::OverrideTranslator;
pub use translate::PathOverride;
pub use translate::StdAliasTranslator;
pub use validate::DispositionValidator;
pub use validate::PolicyError;
pub use validate::RuleOutcome;
pub use validate::RuleSetValidator;
