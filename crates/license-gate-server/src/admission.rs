// license-gate-server/src/admission.rs
// ============================================================================
// Module: Admission Decision Handler
// Description: HTTP handler for the proxy's admission-hook callout.
// Purpose: Authenticate the caller, drive resolution, render the decision.
// Dependencies: license-gate-core, axum, serde
// ============================================================================

//! ## Overview
//! The admission handler implements the upstream proxy's hook convention: a
//! POST with the module path and version, answered with 200 when the module
//! may be served or 403 with a `Msg` body giving the denial reason. The
//! caller is authenticated against the trusted source set before anything
//! else; malformed bodies answer 400 without touching the resolution path.
//! Resolution failures are converted into deny decisions, never into silent
//! allows.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::ConnectInfo;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::post;
use license_gate_core::Decision;
use license_gate_core::DispositionValidator;
use license_gate_core::LicenseResolver;
use license_gate_core::ModuleId;
use serde::Deserialize;
use serde::Serialize;

use crate::trust::TrustedSources;
use crate::trust::client_origin;

// ============================================================================
// SECTION: Admission State
// ============================================================================

/// Shared state for the admission endpoint.
pub struct AdmissionState {
    /// Origins allowed to call the endpoint.
    pub trusted: TrustedSources,
    /// Cache-wrapped resolution pipeline, keyed on the original identity.
    pub resolver: Arc<dyn LicenseResolver>,
    /// Disposition-wrapped rule-set validator.
    pub validator: DispositionValidator,
}

/// Builds the admission router over the shared state.
#[must_use]
pub fn admission_router(state: Arc<AdmissionState>) -> Router {
    Router::new().route("/admission", post(handle_admission)).with_state(state)
}

// ============================================================================
// SECTION: Protocol Types
// ============================================================================

/// Admission request payload sent by the proxy.
#[derive(Debug, Deserialize)]
struct AdmissionRequest {
    /// Module path being served.
    #[serde(rename = "Module")]
    module: String,
    /// Module version being served.
    #[serde(rename = "Version")]
    version: String,
}

/// Denial payload returned with a 403.
#[derive(Debug, Serialize)]
struct DenialBody {
    /// Human-readable denial reason.
    #[serde(rename = "Msg")]
    msg: String,
}

// ============================================================================
// SECTION: Handler
// ============================================================================

/// Handles one admission request from the upstream proxy.
async fn handle_admission(
    State(state): State<Arc<AdmissionState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let origin = client_origin(peer, &headers);
    if !state.trusted.contains(&origin) {
        tracing::warn!(origin = %origin, "admission request from untrusted origin");
        return deny_response("request origin is not the configured module proxy".to_string());
    }

    let Ok(request) = serde_json::from_slice::<AdmissionRequest>(&body) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let module = ModuleId::new(request.module, request.version);

    let decision = match state.resolver.resolve(&module).await {
        Ok(resolved) => {
            let decision = state.validator.decide(&module, &resolved.license);
            tracing::info!(
                module = %module,
                license = %resolved.license,
                allow = decision.allow,
                reason = %decision.reason,
                "admission decided"
            );
            decision
        }
        // Fail closed: an unresolvable license is never silently admitted.
        Err(err) => {
            tracing::warn!(module = %module, error = %err, "license resolution failed");
            Decision::deny(format!("license resolution failed: {err}"))
        }
    };

    if decision.allow {
        StatusCode::OK.into_response()
    } else {
        deny_response(decision.reason)
    }
}

/// Renders a 403 with the protocol's denial body.
fn deny_response(msg: String) -> Response {
    (
        StatusCode::FORBIDDEN,
        axum::Json(DenialBody {
            msg,
        }),
    )
        .into_response()
}
