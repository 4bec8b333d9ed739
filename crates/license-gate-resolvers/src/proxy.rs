// license-gate-resolvers/src/proxy.rs
// ============================================================================
// Module: Proxy License Client
// Description: License resolver backed by the module proxy's catalog.
// Purpose: Report proxy-declared license metadata for exact module versions.
// Dependencies: license-gate-core, reqwest, serde
// ============================================================================

//! ## Overview
//! The proxy client queries the upstream module proxy's license catalog at
//! `{base}/{module}/@v/{version}.license`. The catalog reports the license
//! declared in the published module along with the proxy's own confidence in
//! that declaration, so this source answers for any host the proxy serves.
//! Module paths and versions are case-encoded the way the proxy protocol
//! requires before they appear in a request URL.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use license_gate_core::Confidence;
use license_gate_core::License;
use license_gate_core::LicenseResolver;
use license_gate_core::ModuleId;
use license_gate_core::ResolveError;
use license_gate_core::ResolvedLicense;
use serde::Deserialize;
use url::Url;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the proxy license client.
#[derive(Debug, Clone)]
pub struct ProxyClientConfig {
    /// Base URL of the module proxy.
    pub base_url: Url,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User agent string for outbound requests.
    pub user_agent: String,
    /// Confidence below which this client's answer is not trusted outright.
    pub fallback_threshold: Confidence,
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// License catalog payload returned by the proxy.
#[derive(Debug, Deserialize)]
struct CatalogLicenseResponse {
    /// Declared license name.
    name: String,
    /// Normalized SPDX identifier when the proxy could classify it.
    #[serde(default)]
    spdx_id: Option<String>,
    /// The proxy's confidence in the declaration.
    confidence: f64,
}

// ============================================================================
// SECTION: Client Implementation
// ============================================================================

/// License resolver backed by the module proxy's license catalog.
pub struct ProxyLicenseClient {
    /// Client configuration.
    config: ProxyClientConfig,
    /// HTTP client used for outbound requests.
    client: reqwest::Client,
}

impl ProxyLicenseClient {
    /// Creates a new proxy client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Source`] when the HTTP client cannot be
    /// created.
    pub fn new(config: ProxyClientConfig) -> Result<Self, ResolveError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|_| ResolveError::Source("proxy http client build failed".to_string()))?;
        Ok(Self {
            config,
            client,
        })
    }

    /// Builds the catalog URL for a module version.
    fn catalog_url(&self, module: &ModuleId) -> Result<Url, ResolveError> {
        let path = escape_module_path(&module.path);
        let version = escape_module_path(&module.version);
        self.config
            .base_url
            .join(&format!("{path}/@v/{version}.license"))
            .map_err(|_| ResolveError::Source("proxy catalog url build failed".to_string()))
    }
}

#[async_trait]
impl LicenseResolver for ProxyLicenseClient {
    async fn resolve(&self, module: &ModuleId) -> Result<ResolvedLicense, ResolveError> {
        let url = self.catalog_url(module)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| ResolveError::Source(format!("proxy request failed: {err}")))?;
        if !response.status().is_success() {
            return Err(ResolveError::Source(format!(
                "proxy license lookup for {module} returned {}",
                response.status()
            )));
        }
        let payload: CatalogLicenseResponse = response
            .json()
            .await
            .map_err(|_| ResolveError::Source("proxy license response malformed".to_string()))?;

        let license = match payload.spdx_id.filter(|id| !id.is_empty()) {
            Some(id) => License::with_spdx_id(payload.name, id),
            None => License::by_name(payload.name),
        };
        let resolved = ResolvedLicense {
            license,
            confidence: Confidence::new(payload.confidence),
        };
        tracing::debug!(
            module = %module,
            license = %resolved.license,
            confidence = %resolved.confidence,
            "proxy license resolved"
        );
        Ok(resolved)
    }

    fn fallback_threshold(&self) -> Confidence {
        self.config.fallback_threshold
    }
}

// ============================================================================
// SECTION: Path Encoding
// ============================================================================

/// Case-encodes a module path or version for use in a proxy request URL.
///
/// The proxy protocol stores paths case-insensitively, so every uppercase
/// letter is replaced by `!` followed by its lowercase form.
#[must_use]
pub fn escape_module_path(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_ascii_uppercase() {
            out.push('!');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

// ============================================================================
// SECTION: Tests
// ============================================================================
