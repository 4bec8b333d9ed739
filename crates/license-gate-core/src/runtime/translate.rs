// license-gate-core/src/runtime/translate.rs
// ============================================================================
// Module: Path Translator Pipeline
// Description: Module path normalization stages and their composition.
// Purpose: Rewrite vanity import paths to their canonical hosting location.
// Dependencies: crate::interfaces, regex
// ============================================================================

//! ## Overview
//! Translation runs a fixed-priority sequence of stages, each receiving the
//! output of the previous one: operator-supplied regex overrides first, then
//! the standard-namespace alias rewrite, then the versioned-indirection
//! hosting rewrite. Stages abstain on unrecognized input, so unmatched paths
//! pass through unchanged. The whole pipeline is a pure function of
//! configuration and input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;

use crate::interfaces::PathTranslator;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix rewritten by the standard-namespace alias stage.
const STD_ALIAS_PREFIX: &str = "golang.org/x/";
/// Canonical hosting prefix for standard-namespace modules.
const STD_ALIAS_TARGET: &str = "github.com/golang/";
/// Prefix recognized by the versioned-indirection hosting stage.
const GOPKG_PREFIX: &str = "gopkg.in/";
/// Canonical hosting prefix for versioned-indirection modules.
const GOPKG_TARGET: &str = "github.com/";

// ============================================================================
// SECTION: Override Translator
// ============================================================================

/// One operator-supplied path rewrite rule.
#[derive(Debug, Clone)]
pub struct PathOverride {
    /// Pattern matched against the module path.
    pub pattern: Regex,
    /// Replacement template; capture groups from the pattern may be used.
    pub replace: String,
}

/// Applies operator-supplied overrides, first matching rule wins.
#[derive(Debug, Clone, Default)]
pub struct OverrideTranslator {
    /// Rewrite rules in configuration order.
    overrides: Vec<PathOverride>,
}

impl OverrideTranslator {
    /// Creates an override translator from configured rules.
    #[must_use]
    pub fn new(overrides: Vec<PathOverride>) -> Self {
        Self {
            overrides,
        }
    }
}

impl PathTranslator for OverrideTranslator {
    fn translate(&self, path: &str) -> Option<String> {
        self.overrides
            .iter()
            .find(|rule| rule.pattern.is_match(path))
            .map(|rule| rule.pattern.replace(path, rule.replace.as_str()).into_owned())
    }
}

// ============================================================================
// SECTION: Standard-Namespace Alias Translator
// ============================================================================

/// Rewrites standard-namespace aliases to their hosting location.
///
/// `golang.org/x/<name>[/...]` becomes `github.com/golang/<name>[/...]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdAliasTranslator;

impl PathTranslator for StdAliasTranslator {
    fn translate(&self, path: &str) -> Option<String> {
        path.strip_prefix(STD_ALIAS_PREFIX).map(|rest| format!("{STD_ALIAS_TARGET}{rest}"))
    }
}

// ============================================================================
// SECTION: Versioned-Indirection Translator
// ============================================================================

/// Rewrites the well-known versioned-indirection hosting convention.
///
/// `gopkg.in/<user>/<pkg>.v<N>[/...]` becomes `github.com/<user>/<pkg>[/...]`
/// and the single-segment form `gopkg.in/<pkg>.v<N>[/...]` becomes
/// `github.com/go-<pkg>/<pkg>[/...]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GopkgTranslator;

impl PathTranslator for GopkgTranslator {
    fn translate(&self, path: &str) -> Option<String> {
        let rest = path.strip_prefix(GOPKG_PREFIX)?;
        let segments: Vec<&str> = rest.split('/').collect();
        let first = segments.first()?;
        if let Some(pkg) = strip_version_suffix(first) {
            let tail = join_tail(&segments[1..]);
            return Some(format!("{GOPKG_TARGET}go-{pkg}/{pkg}{tail}"));
        }
        let second = segments.get(1)?;
        let pkg = strip_version_suffix(second)?;
        let user = first;
        let tail = join_tail(&segments[2..]);
        Some(format!("{GOPKG_TARGET}{user}/{pkg}{tail}"))
    }
}

/// Strips a trailing `.v<digits>` version marker from a path segment.
fn strip_version_suffix(segment: &str) -> Option<&str> {
    let (name, version) = segment.rsplit_once(".v")?;
    if name.is_empty() || version.is_empty() || !version.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(name)
}

/// Joins remaining path segments back into a `/`-prefixed tail.
fn join_tail(segments: &[&str]) -> String {
    if segments.is_empty() {
        String::new()
    } else {
        format!("/{}", segments.join("/"))
    }
}

// ============================================================================
// SECTION: Chained Translator
// ============================================================================

/// Fixed-priority translation pipeline.
pub struct ChainedTranslator {
    /// Pipeline stages in priority order.
    stages: Vec<Box<dyn PathTranslator>>,
}

impl ChainedTranslator {
    /// Creates a pipeline from explicit stages.
    #[must_use]
    pub fn new(stages: Vec<Box<dyn PathTranslator>>) -> Self {
        Self {
            stages,
        }
    }

    /// Creates the standard pipeline: operator overrides, then the
    /// standard-namespace alias stage, then the versioned-indirection stage.
    #[must_use]
    pub fn standard(overrides: Vec<PathOverride>) -> Self {
        Self::new(vec![
            Box::new(OverrideTranslator::new(overrides)),
            Box::new(StdAliasTranslator),
            Box::new(GopkgTranslator),
        ])
    }

    /// Runs every stage in order, feeding each the previous output.
    #[must_use]
    pub fn translate(&self, path: &str) -> String {
        self.stages.iter().fold(path.to_string(), |current, stage| {
            stage.translate(&current).unwrap_or(current)
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
