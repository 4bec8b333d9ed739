// license-gate-core/src/core/license.rs
// ============================================================================
// Module: License Types
// Description: License identity and resolver confidence score.
// Purpose: Represent resolved licenses and the certainty of their source.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`License`] pairs a free-form name with an optional normalized SPDX
//! identifier. Policy matching prefers identifiers and falls back to
//! case-sensitive name comparison. [`Confidence`] is a resolver's
//! self-reported certainty in `[0, 1]`, clamped at construction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: License
// ============================================================================

/// A resolved or configured software license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// Free-form license name, used when no identifier is known.
    pub name: String,
    /// Normalized SPDX identifier when known.
    pub spdx_id: Option<String>,
}

impl License {
    /// Creates a license known only by name.
    #[must_use]
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spdx_id: None,
        }
    }

    /// Creates a license with a normalized SPDX identifier.
    #[must_use]
    pub fn with_spdx_id(name: impl Into<String>, spdx_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spdx_id: Some(spdx_id.into()),
        }
    }

    /// Returns true when two licenses denote the same license for policy
    /// purposes.
    ///
    /// Identifiers are compared when both sides carry one; otherwise names
    /// are compared case-sensitively. This is an equivalence weaker than
    /// structural equality, so it is a named method rather than `PartialEq`.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        match (&self.spdx_id, &other.spdx_id) {
            (Some(own), Some(theirs)) => own == theirs,
            _ => self.name == other.name,
        }
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.spdx_id {
            Some(id) => write!(f, "{} ({id})", self.name),
            None => self.name.fmt(f),
        }
    }
}

// ============================================================================
// SECTION: Confidence
// ============================================================================

/// A resolver's certainty in its reported license, in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// Creates a confidence score, clamping the value into `[0, 1]`.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Full certainty.
    #[must_use]
    pub const fn certain() -> Self {
        Self(1.0)
    }

    /// No certainty at all.
    #[must_use]
    pub const fn none() -> Self {
        Self(0.0)
    }

    /// Returns the raw score.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Returns true when the score carries no certainty.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 <= f64::EPSILON
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
