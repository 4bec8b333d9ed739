// license-gate-core/tests/cache.rs
// ============================================================================
// Module: Resolution Cache Tests
// Description: Tests for single-flight memoization of license resolution.
// ============================================================================
//! ## Overview
//! Validates cache idempotence, collapse of concurrent lookups for one key
//! into a single upstream invocation, independence of unrelated keys, and
//! retry after failed population.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]
#![allow(clippy::expect_used, reason = "Tests use expect for explicit failure messages.")]

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use license_gate_core::Confidence;
use license_gate_core::License;
use license_gate_core::LicenseResolver;
use license_gate_core::MemoryLicenseCache;
use license_gate_core::ModuleId;
use license_gate_core::PassthroughCache;
use license_gate_core::ResolveError;
use license_gate_core::ResolvedLicense;
use tokio::sync::Barrier;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Counting resolver with optional artificial latency and scripted initial
/// failures.
struct CountingResolver {
    /// Number of times `resolve` was invoked.
    calls: AtomicUsize,
    /// Invocations that fail before the first success.
    failures_before_success: usize,
    /// Artificial latency simulating an upstream round-trip.
    delay: Duration,
}

impl CountingResolver {
    /// Creates a resolver that always succeeds immediately.
    fn immediate() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            failures_before_success: 0,
            delay: Duration::ZERO,
        })
    }

    /// Creates a resolver with artificial latency.
    fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            failures_before_success: 0,
            delay,
        })
    }

    /// Creates a resolver that fails the first `failures` invocations.
    fn flaky(failures: usize) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            failures_before_success: failures,
            delay: Duration::ZERO,
        })
    }

    /// Returns the number of invocations so far.
    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LicenseResolver for CountingResolver {
    async fn resolve(&self, module: &ModuleId) -> Result<ResolvedLicense, ResolveError> {
        let invocation = self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if invocation < self.failures_before_success {
            return Err(ResolveError::Source("scripted failure".to_string()));
        }
        Ok(ResolvedLicense {
            license: License::with_spdx_id(format!("license of {}", module.path), "MIT"),
            confidence: Confidence::new(0.9),
        })
    }

    fn fallback_threshold(&self) -> Confidence {
        Confidence::new(0.8)
    }
}

/// Module identity used throughout the suite.
fn module() -> ModuleId {
    ModuleId::new("github.com/acme/widget", "v1.0.0")
}

// ============================================================================
// SECTION: Idempotence
// ============================================================================

#[tokio::test]
async fn repeated_resolution_hits_upstream_once() {
    let upstream = CountingResolver::immediate();
    let cache = MemoryLicenseCache::new(upstream.clone());

    let first = cache.resolve(&module()).await.expect("first resolution");
    let second = cache.resolve(&module()).await.expect("second resolution");

    assert_eq!(upstream.call_count(), 1);
    assert_eq!(first, second);
    assert!(cache.resolved_at(&module()).is_some());
}

#[tokio::test]
async fn distinct_keys_resolve_independently() {
    let upstream = CountingResolver::immediate();
    let cache = MemoryLicenseCache::new(upstream.clone());

    cache.resolve(&module()).await.expect("first key");
    cache
        .resolve(&ModuleId::new("github.com/acme/widget", "v2.0.0"))
        .await
        .expect("second key");

    assert_eq!(upstream.call_count(), 2);
}

// ============================================================================
// SECTION: Single Flight
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_lookups_collapse_into_one_upstream_call() {
    const WAITERS: usize = 8;

    let upstream = CountingResolver::slow(Duration::from_millis(50));
    let cache = Arc::new(MemoryLicenseCache::new(upstream.clone()));
    let barrier = Arc::new(Barrier::new(WAITERS));

    let mut handles = Vec::with_capacity(WAITERS);
    for _ in 0..WAITERS {
        let cache = Arc::clone(&cache);
        let barrier = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            cache.resolve(&module()).await
        }));
    }

    let mut answers = Vec::with_capacity(WAITERS);
    for handle in handles {
        answers.push(handle.await.expect("task join").expect("resolution"));
    }

    assert_eq!(upstream.call_count(), 1);
    assert!(answers.windows(2).all(|pair| pair[0] == pair[1]));
}

// ============================================================================
// SECTION: Failure Handling
// ============================================================================

#[tokio::test]
async fn failed_population_is_not_cached() {
    let upstream = CountingResolver::flaky(1);
    let cache = MemoryLicenseCache::new(upstream.clone());

    let err = cache.resolve(&module()).await.expect_err("scripted failure");
    assert!(matches!(err, ResolveError::Source(_)));

    cache.resolve(&module()).await.expect("retry succeeds");
    assert_eq!(upstream.call_count(), 2);
}

// ============================================================================
// SECTION: Passthrough Variant
// ============================================================================

#[tokio::test]
async fn passthrough_consults_upstream_every_time() {
    let upstream = CountingResolver::immediate();
    let cache = PassthroughCache::new(upstream.clone());

    cache.resolve(&module()).await.expect("first resolution");
    cache.resolve(&module()).await.expect("second resolution");

    assert_eq!(upstream.call_count(), 2);
}
