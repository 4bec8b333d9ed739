// license-gate-resolvers/src/forge.rs
// ============================================================================
// Module: Forge License Client
// Description: License resolver backed by a source-hosting API.
// Purpose: Report repository licenses detected by the hosting platform.
// Dependencies: license-gate-core, reqwest, serde
// ============================================================================

//! ## Overview
//! The forge client resolves licenses for modules hosted on the well-known
//! source forge by querying its repository license endpoint. The platform
//! runs its own license classifier, so an answer with a usable SPDX
//! identifier is treated as certain while a name-only answer gets a reduced
//! confidence and usually falls through to the next source in the chain.
//! Modules on other hosts are not this client's business and resolve to a
//! source error the chain absorbs.

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
// SECTION: Constants
// ============================================================================

/// Host prefix this client is responsible for.
const FORGE_HOST_PREFIX: &str = "github.com/";
/// Confidence assigned when the platform reports a usable SPDX identifier.
const SPDX_CONFIDENCE: f64 = 1.0;
/// Confidence assigned when only a free-form license name is reported.
const NAME_ONLY_CONFIDENCE: f64 = 0.5;
/// Identifier placeholder the platform uses for unclassifiable licenses.
const NO_ASSERTION: &str = "NOASSERTION";

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the forge license client.
#[derive(Debug, Clone)]
pub struct ForgeClientConfig {
    /// Base URL of the hosting API.
    pub api_base: Url,
    /// Optional access token for authenticated quota.
    pub access_token: Option<String>,
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

/// Repository license payload returned by the hosting API.
#[derive(Debug, Deserialize)]
struct RepoLicenseResponse {
    /// Detected license description.
    license: RepoLicense,
}

/// Detected license description.
#[derive(Debug, Deserialize)]
struct RepoLicense {
    /// Human-readable license name.
    name: String,
    /// SPDX identifier, possibly a no-assertion placeholder.
    spdx_id: Option<String>,
}

// ============================================================================
// SECTION: Client Implementation
// ============================================================================

/// License resolver backed by the source-hosting API.
pub struct ForgeLicenseClient {
    /// Client configuration.
    config: ForgeClientConfig,
    /// HTTP client used for outbound requests.
    client: reqwest::Client,
}

impl ForgeLicenseClient {
    /// Creates a new forge client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Source`] when the HTTP client cannot be
    /// created.
    pub fn new(config: ForgeClientConfig) -> Result<Self, ResolveError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|_| ResolveError::Source("forge http client build failed".to_string()))?;
        Ok(Self {
            config,
            client,
        })
    }

    /// Builds the license endpoint URL for a repository.
    fn license_url(&self, owner: &str, repo: &str) -> Result<Url, ResolveError> {
        self.config
            .api_base
            .join(&format!("repos/{owner}/{repo}/license"))
            .map_err(|_| ResolveError::Source("forge license url build failed".to_string()))
    }
}

#[async_trait]
impl LicenseResolver for ForgeLicenseClient {
    async fn resolve(&self, module: &ModuleId) -> Result<ResolvedLicense, ResolveError> {
        let (owner, repo) = split_repo_path(&module.path)?;
        let url = self.license_url(owner, repo)?;

        let mut request = self.client.get(url).header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.config.access_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        let response = request
            .send()
            .await
            .map_err(|err| ResolveError::Source(format!("forge request failed: {err}")))?;
        if !response.status().is_success() {
            return Err(ResolveError::Source(format!(
                "forge license lookup for {owner}/{repo} returned {}",
                response.status()
            )));
        }
        let payload: RepoLicenseResponse = response
            .json()
            .await
            .map_err(|_| ResolveError::Source("forge license response malformed".to_string()))?;

        let resolved = into_resolved(payload.license);
        tracing::debug!(
            module = %module,
            license = %resolved.license,
            confidence = %resolved.confidence,
            "forge license resolved"
        );
        Ok(resolved)
    }

    fn fallback_threshold(&self) -> Confidence {
        self.config.fallback_threshold
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Splits a forge-hosted module path into owner and repository.
fn split_repo_path(path: &str) -> Result<(&str, &str), ResolveError> {
    let rest = path
        .strip_prefix(FORGE_HOST_PREFIX)
        .ok_or_else(|| ResolveError::Source(format!("module {path} is not forge-hosted")))?;
    let mut segments = rest.split('/');
    match (segments.next(), segments.next()) {
        (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => Ok((owner, repo)),
        _ => Err(ResolveError::Source(format!("module {path} lacks owner/repository segments"))),
    }
}

/// Converts the wire license into a resolved answer with confidence.
fn into_resolved(license: RepoLicense) -> ResolvedLicense {
    match license.spdx_id.filter(|id| !id.is_empty() && id != NO_ASSERTION) {
        Some(id) => ResolvedLicense {
            license: License::with_spdx_id(license.name, id),
            confidence: Confidence::new(SPDX_CONFIDENCE),
        },
        None => ResolvedLicense {
            license: License::by_name(license.name),
            confidence: Confidence::new(NAME_ONLY_CONFIDENCE),
        },
    }
}
