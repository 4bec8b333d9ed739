// license-gate-resolvers/tests/proxy_client.rs
// ============================================================================
// Module: Proxy Client Tests
// Description: Tests for the module-proxy license catalog client.
// Dependencies: license-gate-resolvers, license-gate-core, tiny_http
// ============================================================================

//! ## Overview
//! Tests the proxy catalog client against a local server: declared-license
//! answers with self-reported confidence, case-encoded request paths, and
//! error statuses.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

use std::thread;

use license_gate_core::Confidence;
use license_gate_core::License;
use license_gate_core::LicenseResolver;
use license_gate_core::ModuleId;
use license_gate_core::ResolveError;
use license_gate_resolvers::ProxyClientConfig;
use license_gate_resolvers::ProxyLicenseClient;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;
use url::Url;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// Spawns a local server answering one request with the given body and
/// status; the join handle yields the request path that was seen.
fn spawn_server(body: &'static str, status: u16) -> (Url, thread::JoinHandle<String>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let url = Url::parse(&format!("http://{addr}")).unwrap();

    let handle = thread::spawn(move || {
        let request = server.recv().unwrap();
        let path = request.url().to_string();
        let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
        let response = Response::from_string(body).with_status_code(status).with_header(header);
        request.respond(response).unwrap();
        path
    });

    (url, handle)
}

/// Creates a client pointed at the local server.
fn local_client(base_url: Url) -> ProxyLicenseClient {
    ProxyLicenseClient::new(ProxyClientConfig {
        base_url,
        timeout_ms: 5_000,
        user_agent: "license-gate-tests".to_string(),
        fallback_threshold: Confidence::new(0.3),
    })
    .unwrap()
}

// ============================================================================
// SECTION: Happy Path
// ============================================================================

#[tokio::test]
async fn declared_license_carries_proxy_confidence() {
    let (url, handle) = spawn_server(
        r#"{"name": "Apache License 2.0", "spdx_id": "Apache-2.0", "confidence": 0.85}"#,
        200,
    );
    let client = local_client(url);

    let resolved = client
        .resolve(&ModuleId::new("github.com/acme/widget", "v1.2.3"))
        .await
        .expect("resolution");

    assert_eq!(resolved.license, License::with_spdx_id("Apache License 2.0", "Apache-2.0"));
    assert!((resolved.confidence.value() - 0.85).abs() < f64::EPSILON);
    assert_eq!(handle.join().unwrap(), "/github.com/acme/widget/@v/v1.2.3.license");
}

#[tokio::test]
async fn request_path_is_case_encoded() {
    let (url, handle) = spawn_server(r#"{"name": "MIT", "confidence": 0.9}"#, 200);
    let client = local_client(url);

    client
        .resolve(&ModuleId::new("github.com/Acme/Widget", "v1.0.0"))
        .await
        .expect("resolution");

    assert_eq!(handle.join().unwrap(), "/github.com/!acme/!widget/@v/v1.0.0.license");
}

#[tokio::test]
async fn missing_identifier_yields_name_only_license() {
    let (url, handle) = spawn_server(r#"{"name": "Custom-1.0", "confidence": 0.4}"#, 200);
    let client = local_client(url);

    let resolved = client
        .resolve(&ModuleId::new("example.com/pkg", "v1.0.0"))
        .await
        .expect("resolution");

    assert_eq!(resolved.license, License::by_name("Custom-1.0"));
    handle.join().unwrap();
}

// ============================================================================
// SECTION: Failures
// ============================================================================

#[tokio::test]
async fn error_status_becomes_source_error() {
    let (url, handle) = spawn_server("gone", 410);
    let client = local_client(url);

    let err = client
        .resolve(&ModuleId::new("github.com/acme/widget", "v9.9.9"))
        .await
        .expect_err("source error");

    assert!(matches!(err, ResolveError::Source(_)));
    handle.join().unwrap();
}

#[tokio::test]
async fn malformed_payload_becomes_source_error() {
    let (url, handle) = spawn_server("not json", 200);
    let client = local_client(url);

    let err = client
        .resolve(&ModuleId::new("github.com/acme/widget", "v1.0.0"))
        .await
        .expect_err("source error");

    assert!(matches!(err, ResolveError::Source(_)));
    handle.join().unwrap();
}
