// license-gate-config/src/lib.rs
// ============================================================================
// Module: License Gate Configuration Library
// Description: Configuration model, loading, and policy compilation.
// Purpose: Expose strict, fail-closed configuration for the gate.
// Dependencies: crate::{compile, config}
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file and validated fail-closed at
//! startup: invalid patterns, version constraints, license identifiers, or
//! limits abort initialization before the server accepts a single request.
//! The raw model is compiled into the core policy types exactly once.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod compile;
pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use compile::CompiledPolicy;
pub use compile::compile_policy;
pub use config::CacheBackend;
pub use config::CacheConfig;
pub use config::ConfigError;
pub use config::ForgeConfig;
pub use config::GateConfig;
pub use config::ProxyConfig;
pub use config::RawLicense;
pub use config::RawModuleMatcher;
pub use config::RawPathOverride;
pub use config::RawRuleSet;
pub use config::ServerConfig;
pub use config::ValidationConfig;
