// license-gate-server/src/trust.rs
// ============================================================================
// Module: Trusted Source Guard
// Description: Pre-resolved address set of the upstream module proxy.
// Purpose: Reject admission requests from anything but the proxy itself.
// Dependencies: axum, tokio, url
// ============================================================================

//! ## Overview
//! The admission endpoint is otherwise unauthenticated, so it only accepts
//! requests whose network origin belongs to the configured upstream proxy.
//! The proxy's DNS addresses are resolved once at startup and held read-only
//! for the process lifetime; DNS changes to the proxy after startup are not
//! observed, a documented staleness window. Origins are taken from the
//! reverse-proxy headers when present, falling back to the peer address.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::net::SocketAddr;

use axum::http::HeaderMap;
use thiserror::Error;
use tokio::net::lookup_host;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header set by reverse proxies carrying the original client address.
const REAL_IP_HEADER: &str = "x-real-ip";
/// Fallback header carrying the forwarding chain; first entry is the client.
const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Trusted-source initialization errors.
#[derive(Debug, Error)]
pub enum TrustError {
    /// The proxy base URL does not contain a usable host.
    #[error("proxy base url {0} lacks a host")]
    MissingHost(String),
    /// DNS resolution of the proxy host failed.
    #[error("proxy address lookup failed: {0}")]
    Lookup(String),
}

// ============================================================================
// SECTION: Trusted Sources
// ============================================================================

/// Read-only set of origins allowed to call the admission endpoint.
#[derive(Debug, Clone, Default)]
pub struct TrustedSources {
    /// Accepted origin strings: resolved addresses, hostname, host:port.
    entries: BTreeSet<String>,
}

impl TrustedSources {
    /// Builds a trusted set from explicit entries, mainly for tests.
    #[must_use]
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolves the proxy's addresses once and builds the trusted set.
    ///
    /// The set contains every resolved IP address plus the hostname and its
    /// `host:port` form, mirroring the shapes an origin string can take.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError`] when the URL lacks a host or DNS resolution
    /// fails.
    pub async fn resolve(proxy_base: &Url) -> Result<Self, TrustError> {
        let host = proxy_base
            .host_str()
            .ok_or_else(|| TrustError::MissingHost(proxy_base.to_string()))?;
        let port = proxy_base
            .port_or_known_default()
            .ok_or_else(|| TrustError::MissingHost(proxy_base.to_string()))?;

        let mut entries = BTreeSet::new();
        let resolved = lookup_host((host, port))
            .await
            .map_err(|err| TrustError::Lookup(format!("{host}: {err}")))?;
        for addr in resolved {
            entries.insert(addr.ip().to_string());
        }
        entries.insert(host.to_string());
        entries.insert(format!("{host}:{port}"));
        Ok(Self {
            entries,
        })
    }

    /// Returns true when the origin belongs to the upstream proxy.
    #[must_use]
    pub fn contains(&self, origin: &str) -> bool {
        self.entries.contains(origin)
    }

    /// Returns the accepted origin strings, for startup logging.
    #[must_use]
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

// ============================================================================
// SECTION: Origin Extraction
// ============================================================================

/// Determines the request origin the trust check runs against.
///
/// Reverse-proxy headers take precedence over the transport peer: first
/// `X-Real-Ip`, then the first entry of `X-Forwarded-For`, then the peer IP.
#[must_use]
pub fn client_origin(peer: SocketAddr, headers: &HeaderMap) -> String {
    if let Some(real_ip) = header_value(headers, REAL_IP_HEADER) {
        return real_ip;
    }
    if let Some(forwarded) = header_value(headers, FORWARDED_FOR_HEADER) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    peer.ip().to_string()
}

/// Reads a non-empty header value as a trimmed string.
fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Tests use unwrap on fixed header fixtures."
    )]

    use std::net::SocketAddr;

    use axum::http::HeaderMap;
    use axum::http::HeaderValue;

    use super::TrustedSources;
    use super::client_origin;

    /// Peer address used throughout the suite.
    fn peer() -> SocketAddr {
        "192.0.2.10:41000".parse().unwrap()
    }

    #[test]
    fn peer_address_is_the_default_origin() {
        assert_eq!(client_origin(peer(), &HeaderMap::new()), "192.0.2.10");
    }

    #[test]
    fn real_ip_header_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("203.0.113.9"));
        headers.insert("x-forwarded-for", HeaderValue::from_static("198.51.100.1"));
        assert_eq!(client_origin(peer(), &headers), "203.0.113.9");
    }

    #[test]
    fn forwarded_for_uses_first_chain_entry() {
        let mut headers = HeaderMap::new();
        headers
            .insert("x-forwarded-for", HeaderValue::from_static("198.51.100.1, 10.0.0.1"));
        assert_eq!(client_origin(peer(), &headers), "198.51.100.1");
    }

    #[test]
    fn trusted_set_matches_exact_entries() {
        let trusted = TrustedSources::from_entries(["127.0.0.1", "proxy.internal:3000"]);
        assert!(trusted.contains("127.0.0.1"));
        assert!(trusted.contains("proxy.internal:3000"));
        assert!(!trusted.contains("127.0.0.2"));
    }
}
