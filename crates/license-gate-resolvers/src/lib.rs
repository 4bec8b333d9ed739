// license-gate-resolvers/src/lib.rs
// ============================================================================
// Module: License Gate Resolvers
// Description: HTTP license-metadata clients implementing the resolver seam.
// Purpose: Report licenses from external sources with confidence scores.
// Dependencies: license-gate-core, reqwest
// ============================================================================

//! ## Overview
//! This crate ships the concrete license resolvers consulted by the chain: a
//! source-hosting ("forge") API client and a module-proxy catalog client.
//! Both are metadata clients only; the gate never fetches or parses source
//! code to detect licenses itself. Each client carries its own fallback
//! confidence threshold and enforces request timeouts so a slow source
//! cannot stall admissions.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod forge;
pub mod proxy;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use forge::ForgeClientConfig;
pub use forge::ForgeLicenseClient;
pub use proxy::ProxyClientConfig;
pub use proxy::ProxyLicenseClient;
pub use proxy::escape_module_path;
