// license-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: License Gate Interfaces
// Description: Backend-agnostic interfaces for license lookup and translation.
// Purpose: Define the contract surfaces used by the License Gate runtime.
// Dependencies: crate::core, async-trait
// ============================================================================

//! ## Overview
//! Interfaces define how License Gate integrates with external license
//! metadata sources without embedding source-specific details. Resolution is
//! asynchronous because every concrete resolver performs network I/O;
//! translation is pure and synchronous. Implementations must fail closed on
//! missing or invalid data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use thiserror::Error;

use crate::core::Confidence;
use crate::core::License;
use crate::core::ModuleId;

// ============================================================================
// SECTION: License Resolver
// ============================================================================

/// Successful license resolution for one module identity.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLicense {
    /// The license reported by the source.
    pub license: License,
    /// The source's certainty in the reported license.
    pub confidence: Confidence,
}

/// License resolution errors.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No resolver in the chain produced any answer.
    #[error("no license source produced an answer")]
    NoAnswer,
    /// A single source failed; absorbed inside the chain.
    #[error("license source error: {0}")]
    Source(String),
}

/// A collaborator capable of reporting a license for a module identity from
/// one external metadata source.
#[async_trait]
pub trait LicenseResolver: Send + Sync {
    /// Resolves the license for a module identity.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the source cannot produce an answer.
    async fn resolve(&self, module: &ModuleId) -> Result<ResolvedLicense, ResolveError>;

    /// Confidence below which this resolver's answer is not trusted
    /// outright and the chain keeps consulting later resolvers.
    fn fallback_threshold(&self) -> Confidence;
}

// ============================================================================
// SECTION: Path Translator
// ============================================================================

/// A single stage of the path translation pipeline.
///
/// Translators normalize module paths into the identity used for license
/// lookup, e.g. rewriting vanity import paths to their canonical hosting
/// location. A stage that does not recognize the input abstains by
/// returning `None`; normalization is best-effort and never errors.
pub trait PathTranslator: Send + Sync {
    /// Returns the rewritten path, or `None` when the input is not
    /// recognized by this stage.
    fn translate(&self, path: &str) -> Option<String>;
}
