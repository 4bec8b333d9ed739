// license-gate-server/src/app.rs
// ============================================================================
// Module: Application Wiring
// Description: Builds the resolution pipeline and serves the admission hook.
// Purpose: Compose translator, resolvers, cache, and validator from config.
// Dependencies: license-gate-{config, core, resolvers}, axum, tokio
// ============================================================================

//! ## Overview
//! The application composes the engine at construction time: operator
//! overrides feed the translator pipeline, the forge and proxy clients form
//! the resolver chain, the selected cache backend wraps the translating
//! resolver, and the disposition validator wraps the rule set. Everything
//! that can fail does so here, before the listener accepts a request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use license_gate_config::CacheBackend;
use license_gate_config::GateConfig;
use license_gate_config::compile_policy;
use license_gate_core::ChainedResolver;
use license_gate_core::ChainedTranslator;
use license_gate_core::DispositionValidator;
use license_gate_core::LicenseResolver;
use license_gate_core::MemoryLicenseCache;
use license_gate_core::PassthroughCache;
use license_gate_core::RuleSetValidator;
use license_gate_core::TranslatingResolver;
use license_gate_resolvers::ForgeClientConfig;
use license_gate_resolvers::ForgeLicenseClient;
use license_gate_resolvers::ProxyClientConfig;
use license_gate_resolvers::ProxyLicenseClient;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use url::Url;

use crate::admission::AdmissionState;
use crate::admission::admission_router;
use crate::trust::TrustedSources;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Timeout for outbound resolver requests in milliseconds.
const RESOLVER_TIMEOUT_MS: u64 = 10_000;
/// User agent for outbound resolver requests.
const USER_AGENT: &str = "license-gate/0.1";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Application lifecycle errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Application
// ============================================================================

/// The admission gate application, wired and ready to serve.
pub struct App {
    /// Address the admission endpoint binds to.
    listen: SocketAddr,
    /// Router serving the admission hook.
    router: Router,
}

impl App {
    /// Builds the application from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] when policy compilation, resolver construction,
    /// or proxy address resolution fails.
    pub async fn from_config(config: GateConfig) -> Result<Self, AppError> {
        let policy = compile_policy(&config).map_err(|err| AppError::Config(err.to_string()))?;
        let listen: SocketAddr = config
            .server
            .listen
            .parse()
            .map_err(|_| AppError::Config(format!("invalid listen address {}", config.server.listen)))?;
        let proxy_base = Url::parse(&config.proxy.base_url)
            .map_err(|_| AppError::Config(format!("invalid proxy base url {}", config.proxy.base_url)))?;
        let forge_base = Url::parse(&config.forge.api_base)
            .map_err(|_| AppError::Config(format!("invalid forge api base {}", config.forge.api_base)))?;

        let validator = DispositionValidator::new(
            RuleSetValidator::new(policy.rule_set),
            policy.unknown_license_action,
        )
        .map_err(|err| AppError::Config(err.to_string()))?;

        let forge = ForgeLicenseClient::new(ForgeClientConfig {
            api_base: forge_base,
            access_token: config.forge.access_token.clone(),
            timeout_ms: RESOLVER_TIMEOUT_MS,
            user_agent: USER_AGENT.to_string(),
            fallback_threshold: policy.confidence_threshold,
        })
        .map_err(|err| AppError::Init(err.to_string()))?;
        let proxy_client = ProxyLicenseClient::new(ProxyClientConfig {
            base_url: proxy_base.clone(),
            timeout_ms: RESOLVER_TIMEOUT_MS,
            user_agent: USER_AGENT.to_string(),
            fallback_threshold: policy.confidence_threshold,
        })
        .map_err(|err| AppError::Init(err.to_string()))?;

        let chain = ChainedResolver::new(vec![Arc::new(forge), Arc::new(proxy_client)]);
        let translating = TranslatingResolver::new(
            ChainedTranslator::standard(policy.path_overrides),
            Arc::new(chain),
        );
        let resolver: Arc<dyn LicenseResolver> = match config.cache.backend {
            CacheBackend::Memory => Arc::new(MemoryLicenseCache::new(Arc::new(translating))),
            CacheBackend::None => Arc::new(PassthroughCache::new(Arc::new(translating))),
        };

        tracing::info!(proxy = %proxy_base, "resolving trusted admission sources");
        let trusted = TrustedSources::resolve(&proxy_base)
            .await
            .map_err(|err| AppError::Init(err.to_string()))?;
        let sources = trusted.entries().collect::<Vec<_>>().join(", ");
        tracing::info!(sources = %sources, "admission restricted to proxy addresses");

        let state = Arc::new(AdmissionState {
            trusted,
            resolver,
            validator,
        });
        let router = admission_router(state).layer(TraceLayer::new_for_http());
        Ok(Self {
            listen,
            router,
        })
    }

    /// Serves admission requests until the process receives a shutdown
    /// signal.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Transport`] when binding or serving fails.
    pub async fn run(self) -> Result<(), AppError> {
        let listener = tokio::net::TcpListener::bind(self.listen)
            .await
            .map_err(|err| AppError::Transport(format!("bind {} failed: {err}", self.listen)))?;
        tracing::info!(listen = %self.listen, "serving admission requests");
        axum::serve(
            listener,
            self.router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Transport(format!("server failed: {err}")))
    }
}

/// Completes when the process receives an interrupt signal.
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("interrupt signal handler unavailable; serving until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
