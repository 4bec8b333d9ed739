// license-gate-core/src/runtime/cache.rs
// ============================================================================
// Module: Resolution Cache
// Description: Single-flight memoization of license resolution results.
// Purpose: De-duplicate concurrent and repeated lookups per module identity.
// Dependencies: crate::{core, interfaces}, time, tokio
// ============================================================================

//! ## Overview
//! The memory cache decorates any [`LicenseResolver`] and memoizes results
//! keyed by the untranslated module identity. Population of a given key is
//! serialized: concurrent requests for the same uncached key share one
//! in-flight resolution and late arrivals wait for its result, while
//! unrelated keys resolve fully in parallel. Entries are created whole and
//! never mutated in place. There is no eviction or expiry; entries live for
//! the process lifetime, a documented limitation of this cache.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::OnceCell;

use crate::core::Confidence;
use crate::core::License;
use crate::core::ModuleId;
use crate::interfaces::LicenseResolver;
use crate::interfaces::ResolveError;
use crate::interfaces::ResolvedLicense;

// ============================================================================
// SECTION: Cache Entry
// ============================================================================

/// One memoized resolution, owned exclusively by the cache.
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Resolved license.
    license: License,
    /// Confidence reported at resolution time.
    confidence: Confidence,
    /// Instant the entry was populated.
    resolved_at: OffsetDateTime,
}

// ============================================================================
// SECTION: Memory Cache
// ============================================================================

/// Shared handle to a per-key single-flight cell.
type EntryCell = Arc<OnceCell<CacheEntry>>;

/// Single-flight in-memory resolution cache.
pub struct MemoryLicenseCache {
    /// Resolver consulted on cache misses.
    inner: Arc<dyn LicenseResolver>,
    /// Per-key cells; the map lock is held only to look up or insert a
    /// cell, never across resolution.
    entries: Mutex<BTreeMap<ModuleId, EntryCell>>,
}

impl MemoryLicenseCache {
    /// Creates a cache over the given resolver.
    #[must_use]
    pub fn new(inner: Arc<dyn LicenseResolver>) -> Self {
        Self {
            inner,
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// Returns the single-flight cell for a key, creating it if absent.
    fn cell_for(&self, module: &ModuleId) -> Result<EntryCell, ResolveError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| ResolveError::Source("license cache mutex poisoned".to_string()))?;
        Ok(Arc::clone(guard.entry(module.clone()).or_default()))
    }

    /// Returns the population instant for a cached key, if resolved.
    #[must_use]
    pub fn resolved_at(&self, module: &ModuleId) -> Option<OffsetDateTime> {
        let guard = self.entries.lock().ok()?;
        guard.get(module).and_then(|cell| cell.get()).map(|entry| entry.resolved_at)
    }
}

#[async_trait]
impl LicenseResolver for MemoryLicenseCache {
    async fn resolve(&self, module: &ModuleId) -> Result<ResolvedLicense, ResolveError> {
        let cell = self.cell_for(module)?;
        let entry = cell
            .get_or_try_init(|| async {
                let resolved = self.inner.resolve(module).await?;
                Ok::<CacheEntry, ResolveError>(CacheEntry {
                    license: resolved.license,
                    confidence: resolved.confidence,
                    resolved_at: OffsetDateTime::now_utc(),
                })
            })
            .await?;
        Ok(ResolvedLicense {
            license: entry.license.clone(),
            confidence: entry.confidence,
        })
    }

    fn fallback_threshold(&self) -> Confidence {
        self.inner.fallback_threshold()
    }
}

// ============================================================================
// SECTION: Passthrough Cache
// ============================================================================

/// No-op cache variant for operators who disable caching.
pub struct PassthroughCache {
    /// Resolver consulted on every request.
    inner: Arc<dyn LicenseResolver>,
}

impl PassthroughCache {
    /// Creates a passthrough over the given resolver.
    #[must_use]
    pub fn new(inner: Arc<dyn LicenseResolver>) -> Self {
        Self {
            inner,
        }
    }
}

#[async_trait]
impl LicenseResolver for PassthroughCache {
    async fn resolve(&self, module: &ModuleId) -> Result<ResolvedLicense, ResolveError> {
        self.inner.resolve(module).await
    }

    fn fallback_threshold(&self) -> Confidence {
        self.inner.fallback_threshold()
    }
}
