// license-gate-core/src/runtime/chain.rs
// ============================================================================
// Module: License Resolver Chain
// Description: Ordered resolver composition with confidence-based fallback.
// Purpose: Merge uncertain answers from several metadata sources.
// Dependencies: crate::{core, interfaces}, async-trait, tracing
// ============================================================================

//! ## Overview
//! The chain tries resolvers strictly in configured order. An answer at or
//! above its own resolver's fallback threshold short-circuits; weaker
//! answers are retained and the best one is returned if no resolver clears
//! its threshold. Transport errors from one source are absorbed and the
//! chain moves on. License metadata quality varies by source, so a cheap
//! reliable source short-circuits and an expensive authoritative one is
//! consulted only when needed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::Confidence;
use crate::core::ModuleId;
use crate::interfaces::LicenseResolver;
use crate::interfaces::ResolveError;
use crate::interfaces::ResolvedLicense;
use crate::runtime::translate::ChainedTranslator;

// ============================================================================
// SECTION: Chained Resolver
// ============================================================================

/// Ordered collection of license resolvers with confidence fallback.
pub struct ChainedResolver {
    /// Resolvers in configured priority order.
    resolvers: Vec<Arc<dyn LicenseResolver>>,
}

impl ChainedResolver {
    /// Creates a chain over the given resolvers.
    #[must_use]
    pub fn new(resolvers: Vec<Arc<dyn LicenseResolver>>) -> Self {
        Self {
            resolvers,
        }
    }
}

#[async_trait]
impl LicenseResolver for ChainedResolver {
    async fn resolve(&self, module: &ModuleId) -> Result<ResolvedLicense, ResolveError> {
        let mut best: Option<ResolvedLicense> = None;
        for resolver in &self.resolvers {
            match resolver.resolve(module).await {
                Ok(answer) => {
                    if answer.confidence.is_zero() {
                        continue;
                    }
                    if answer.confidence >= resolver.fallback_threshold() {
                        return Ok(answer);
                    }
                    tracing::debug!(
                        module = %module,
                        license = %answer.license,
                        confidence = %answer.confidence,
                        "license answer below source threshold, consulting next source"
                    );
                    if best.as_ref().is_none_or(|kept| answer.confidence > kept.confidence) {
                        best = Some(answer);
                    }
                }
                Err(err) => {
                    tracing::debug!(module = %module, error = %err, "license source failed");
                }
            }
        }
        best.ok_or(ResolveError::NoAnswer)
    }

    fn fallback_threshold(&self) -> Confidence {
        // The chain's own answer is already the merged best effort.
        Confidence::certain()
    }
}

// ============================================================================
// SECTION: Translating Resolver
// ============================================================================

/// Applies the translator pipeline before delegating resolution.
///
/// Callers pass the original module identity; the canonical hosting path is
/// an implementation detail of resolution, which keeps cache keys stable on
/// the untranslated identity.
pub struct TranslatingResolver {
    /// Pipeline normalizing the module path for lookup.
    translator: ChainedTranslator,
    /// Resolver receiving the translated identity.
    inner: Arc<dyn LicenseResolver>,
}

impl TranslatingResolver {
    /// Creates a translating resolver over the given pipeline and inner
    /// resolver.
    #[must_use]
    pub fn new(translator: ChainedTranslator, inner: Arc<dyn LicenseResolver>) -> Self {
        Self {
            translator,
            inner,
        }
    }

    /// Returns the translated path for a module, mainly for diagnostics.
    #[must_use]
    pub fn translated_path(&self, module: &ModuleId) -> String {
        self.translator.translate(&module.path)
    }
}

#[async_trait]
impl LicenseResolver for TranslatingResolver {
    async fn resolve(&self, module: &ModuleId) -> Result<ResolvedLicense, ResolveError> {
        let translated = module.with_path(self.translator.translate(&module.path));
        if translated.path != module.path {
            tracing::debug!(original = %module.path, translated = %translated.path, "module path translated");
        }
        self.inner.resolve(&translated).await
    }

    fn fallback_threshold(&self) -> Confidence {
        self.inner.fallback_threshold()
    }
}
