// license-gate-config/src/config.rs
// ============================================================================
// Module: License Gate Configuration
// Description: Configuration loading and validation for License Gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: license-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size limits and
//! unknown-field rejection. Missing or invalid configuration fails closed to
//! preserve the gate's security posture; nothing here is re-read after
//! startup.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use license_gate_core::UnknownLicenseAction;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "license-gate.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "LICENSE_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Default listen address for the admission server.
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8181";
/// Default upstream module proxy base URL.
const DEFAULT_PROXY_BASE_URL: &str = "https://proxy.golang.org";
/// Default source-hosting API base URL.
const DEFAULT_FORGE_API_BASE: &str = "https://api.github.com";
/// Default global confidence threshold handed to resolvers.
const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.8;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors, all fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("config io error: {0}")]
    Io(String),
    /// The configuration file exceeds the size limit.
    #[error("config file too large: {0} bytes (max {MAX_CONFIG_FILE_SIZE})")]
    TooLarge(usize),
    /// The configuration file is not valid TOML for this model.
    #[error("config parse error: {0}")]
    Parse(String),
    /// The listen address cannot be parsed.
    #[error("invalid listen address {0}")]
    InvalidListenAddr(String),
    /// The upstream proxy base URL cannot be parsed.
    #[error("invalid proxy base url {0}")]
    InvalidProxyUrl(String),
    /// The forge API base URL cannot be parsed.
    #[error("invalid forge api base url {0}")]
    InvalidForgeUrl(String),
    /// The confidence threshold is outside `[0, 1]`.
    #[error("confidence threshold {0} outside [0, 1]")]
    InvalidThreshold(f64),
    /// A module matcher entry is invalid.
    #[error("invalid module matcher: {0}")]
    InvalidMatcher(String),
    /// A license rule entry is invalid.
    #[error("invalid license rule: {0}")]
    InvalidLicense(String),
    /// A path override entry is invalid.
    #[error("invalid path override: {0}")]
    InvalidOverride(String),
}

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Root configuration for the gate process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    /// Admission server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream module proxy settings.
    #[serde(default)]
    pub proxy: ProxyConfig,
    /// Source-hosting API settings.
    #[serde(default)]
    pub forge: ForgeConfig,
    /// Validation policy settings.
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Operator path-rewrite rules consulted before built-in translators.
    #[serde(default)]
    pub path_overrides: Vec<RawPathOverride>,
    /// Resolution cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Admission server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address the admission endpoint binds to.
    #[serde(default = "default_listen_addr")]
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

/// Upstream module proxy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProxyConfig {
    /// Base URL of the proxy whose admission hook calls this gate.
    #[serde(default = "default_proxy_base_url")]
    pub base_url: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            base_url: default_proxy_base_url(),
        }
    }
}

/// Source-hosting ("forge") API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForgeConfig {
    /// Base URL of the hosting API queried for repository licenses.
    #[serde(default = "default_forge_api_base")]
    pub api_base: String,
    /// Optional access token for authenticated API quota.
    #[serde(default)]
    pub access_token: Option<String>,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            api_base: default_forge_api_base(),
            access_token: None,
        }
    }
}

/// Validation policy settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Global confidence threshold used to initialize resolvers.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
    /// Operator action when no rule matches a resolved license.
    #[serde(default = "default_unknown_license_action")]
    pub unknown_license_action: UnknownLicenseAction,
    /// Raw rule-set entries compiled at startup.
    #[serde(default)]
    pub rule_set: RawRuleSet,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            unknown_license_action: default_unknown_license_action(),
            rule_set: RawRuleSet::default(),
        }
    }
}

/// Raw rule-set entries as written by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawRuleSet {
    /// Module matchers that force an allow decision.
    #[serde(default)]
    pub whitelisted_modules: Vec<RawModuleMatcher>,
    /// Module matchers that force a deny decision.
    #[serde(default)]
    pub blacklisted_modules: Vec<RawModuleMatcher>,
    /// Licenses accepted by policy, by name or SPDX identifier.
    #[serde(default)]
    pub allowed_licenses: Vec<RawLicense>,
    /// Licenses rejected by policy, by name or SPDX identifier.
    #[serde(default)]
    pub denied_licenses: Vec<RawLicense>,
}

/// One raw module matcher entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawModuleMatcher {
    /// Pattern applied to the module path; must not be empty.
    pub name: String,
    /// Optional semantic-version range limiting the matcher.
    #[serde(default)]
    pub version_constraint: Option<String>,
}

/// One raw license entry, by SPDX identifier or free-form name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawLicense {
    /// Free-form license name.
    #[serde(default)]
    pub name: Option<String>,
    /// SPDX identifier resolved against the license registry.
    #[serde(default)]
    pub spdx_id: Option<String>,
}

/// One raw operator path-rewrite rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawPathOverride {
    /// Pattern matched against the module path.
    #[serde(rename = "match")]
    pub pattern: String,
    /// Replacement template applied on match.
    pub replace: String,
}

/// Resolution cache settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Selected cache backend.
    #[serde(default)]
    pub backend: CacheBackend,
}

/// Cache backend selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    /// Resolve on every request; no memoization.
    None,
    /// Process-local single-flight memoization.
    #[default]
    Memory,
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default listen address.
fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

/// Default upstream proxy base URL.
fn default_proxy_base_url() -> String {
    DEFAULT_PROXY_BASE_URL.to_string()
}

/// Default forge API base URL.
fn default_forge_api_base() -> String {
    DEFAULT_FORGE_API_BASE.to_string()
}

/// Default global confidence threshold.
const fn default_confidence_threshold() -> f64 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

/// Default unknown-license action.
const fn default_unknown_license_action() -> UnknownLicenseAction {
    UnknownLicenseAction::Deny
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl GateConfig {
    /// Loads configuration from an explicit path, the environment override,
    /// or the default filename, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, exceeds the
    /// size limit, or does not parse into this model.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map_or_else(default_config_path, Path::to_path_buf);
        let metadata = fs::metadata(&path)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
        let size = usize::try_from(metadata.len())
            .map_err(|_| ConfigError::TooLarge(usize::MAX))?;
        if size > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::TooLarge(size));
        }
        let raw = fs::read_to_string(&path)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
        Self::from_toml(&raw)
    }

    /// Parses configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document does not match the
    /// model; unknown fields are rejected.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Validates structural settings that are not part of rule compilation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unparseable listen address or base
    /// URL, or a confidence threshold outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server
            .listen
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidListenAddr(self.server.listen.clone()))?;
        Url::parse(&self.proxy.base_url)
            .map_err(|_| ConfigError::InvalidProxyUrl(self.proxy.base_url.clone()))?;
        Url::parse(&self.forge.api_base)
            .map_err(|_| ConfigError::InvalidForgeUrl(self.forge.api_base.clone()))?;
        let threshold = self.validation.confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        Ok(())
    }
}

/// Returns the config path from the environment override or the default
/// filename in the working directory.
fn default_config_path() -> PathBuf {
    env::var_os(CONFIG_ENV_VAR).map_or_else(|| PathBuf::from(DEFAULT_CONFIG_NAME), PathBuf::from)
}
