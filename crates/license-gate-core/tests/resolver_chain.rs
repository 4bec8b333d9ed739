// license-gate-core/tests/resolver_chain.rs
// ============================================================================
// Module: Resolver Chain Tests
// Description: Tests for confidence-based fallback across chained resolvers.
// ============================================================================
//! ## Overview
//! Validates short-circuiting at source thresholds, retention of the best
//! below-threshold answer, and absorption of individual source failures.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]
#![allow(clippy::expect_used, reason = "Tests use expect for explicit failure messages.")]

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use license_gate_core::ChainedResolver;
use license_gate_core::ChainedTranslator;
use license_gate_core::Confidence;
use license_gate_core::License;
use license_gate_core::LicenseResolver;
use license_gate_core::ModuleId;
use license_gate_core::ResolveError;
use license_gate_core::ResolvedLicense;
use license_gate_core::TranslatingResolver;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Scripted resolver returning a fixed answer or failure.
struct ScriptedResolver {
    /// Answer returned on success, or `None` to fail.
    answer: Option<ResolvedLicense>,
    /// Threshold reported to the chain.
    threshold: Confidence,
    /// Number of times `resolve` was invoked.
    calls: AtomicUsize,
    /// Last path this resolver was asked about.
    last_path: std::sync::Mutex<Option<String>>,
}

impl ScriptedResolver {
    /// Creates a resolver that succeeds with the given license name and
    /// confidence.
    fn answering(name: &str, confidence: f64, threshold: f64) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(ResolvedLicense {
                license: License::by_name(name),
                confidence: Confidence::new(confidence),
            }),
            threshold: Confidence::new(threshold),
            calls: AtomicUsize::new(0),
            last_path: std::sync::Mutex::new(None),
        })
    }

    /// Creates a resolver that always fails.
    fn failing(threshold: f64) -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            threshold: Confidence::new(threshold),
            calls: AtomicUsize::new(0),
            last_path: std::sync::Mutex::new(None),
        })
    }

    /// Returns the number of invocations so far.
    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LicenseResolver for ScriptedResolver {
    async fn resolve(&self, module: &ModuleId) -> Result<ResolvedLicense, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_path.lock().unwrap() = Some(module.path.clone());
        self.answer
            .clone()
            .ok_or_else(|| ResolveError::Source("scripted failure".to_string()))
    }

    fn fallback_threshold(&self) -> Confidence {
        self.threshold
    }
}

/// Module identity used throughout the suite.
fn module() -> ModuleId {
    ModuleId::new("github.com/acme/widget", "v1.0.0")
}

// ============================================================================
// SECTION: Threshold Short-Circuit
// ============================================================================

#[tokio::test]
async fn answer_meeting_threshold_short_circuits() {
    let first = ScriptedResolver::answering("MIT", 0.9, 0.8);
    let second = ScriptedResolver::answering("Apache-2.0", 0.5, 0.3);
    let chain = ChainedResolver::new(vec![first.clone(), second.clone()]);

    let resolved = chain.resolve(&module()).await.expect("chain answer");

    assert_eq!(resolved.license, License::by_name("MIT"));
    assert_eq!(first.call_count(), 1);
    assert_eq!(second.call_count(), 0);
}

#[tokio::test]
async fn below_threshold_answer_defers_to_later_resolver() {
    let first = ScriptedResolver::answering("MIT", 0.2, 0.8);
    let second = ScriptedResolver::answering("Apache-2.0", 0.5, 0.3);
    let chain = ChainedResolver::new(vec![first, second]);

    let resolved = chain.resolve(&module()).await.expect("chain answer");

    assert_eq!(resolved.license, License::by_name("Apache-2.0"));
}

// ============================================================================
// SECTION: Best-Effort Fallback
// ============================================================================

#[tokio::test]
async fn best_retained_answer_wins_when_no_threshold_is_met() {
    let first = ScriptedResolver::answering("MIT", 0.1, 0.8);
    let second = ScriptedResolver::answering("Apache-2.0", 0.2, 0.3);
    let chain = ChainedResolver::new(vec![first, second]);

    let resolved = chain.resolve(&module()).await.expect("chain answer");

    assert_eq!(resolved.license, License::by_name("Apache-2.0"));
    assert!((resolved.confidence.value() - 0.2).abs() < f64::EPSILON);
}

#[tokio::test]
async fn source_failures_are_absorbed() {
    let first = ScriptedResolver::failing(0.8);
    let second = ScriptedResolver::answering("BSD-3-Clause", 0.9, 0.3);
    let chain = ChainedResolver::new(vec![first.clone(), second]);

    let resolved = chain.resolve(&module()).await.expect("chain answer");

    assert_eq!(resolved.license, License::by_name("BSD-3-Clause"));
    assert_eq!(first.call_count(), 1);
}

#[tokio::test]
async fn chain_fails_only_when_no_source_answers() {
    let first = ScriptedResolver::failing(0.8);
    let second = ScriptedResolver::failing(0.3);
    let chain = ChainedResolver::new(vec![first, second]);

    let err = chain.resolve(&module()).await.expect_err("chain failure");

    assert!(matches!(err, ResolveError::NoAnswer));
}

#[tokio::test]
async fn zero_confidence_answers_count_as_no_answer() {
    let first = ScriptedResolver::answering("MIT", 0.0, 0.0);
    let second = ScriptedResolver::failing(0.3);
    let chain = ChainedResolver::new(vec![first, second]);

    let err = chain.resolve(&module()).await.expect_err("chain failure");

    assert!(matches!(err, ResolveError::NoAnswer));
}

// ============================================================================
// SECTION: Translation Composition
// ============================================================================

#[tokio::test]
async fn translating_resolver_passes_canonical_path_downstream() {
    let inner = ScriptedResolver::answering("MIT", 1.0, 0.8);
    let resolver =
        TranslatingResolver::new(ChainedTranslator::standard(Vec::new()), inner.clone());

    let requested = ModuleId::new("golang.org/x/tools", "v0.4.0");
    resolver.resolve(&requested).await.expect("chain answer");

    let seen = inner.last_path.lock().unwrap().clone();
    assert_eq!(seen.as_deref(), Some("github.com/golang/tools"));
}
