use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, http::HeaderValue, middleware, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use casetrack_auth::{AuthState, TokenVerifier, authentication_middleware};

use crate::{
    config::AppConfig,
    handlers,
    middleware as app_middleware,
    storage::{AuditSink, CaseStore, InMemoryAuditStore, InMemoryCaseStore},
};

/// Shared handler state: the injected store instances.
///
/// Stores are owned here and passed by handle into every
/// request-handling context; nothing reaches them through globals.
#[derive(Clone)]
pub struct AppState {
    pub cases: Arc<dyn CaseStore>,
    pub audit: Arc<dyn AuditSink>,
}

/// Builds the application router with fresh in-memory stores.
pub fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let cases: Arc<dyn CaseStore> = Arc::new(InMemoryCaseStore::with_seed_data());
    let audit: Arc<dyn AuditSink> = Arc::new(InMemoryAuditStore::new());
    build_app_with_stores(cfg, cases, audit)
}

/// Builds the application router around the given store instances.
pub fn build_app_with_stores(
    cfg: &AppConfig,
    cases: Arc<dyn CaseStore>,
    audit: Arc<dyn AuditSink>,
) -> anyhow::Result<Router> {
    let verifier = TokenVerifier::new(&cfg.auth)?;
    let auth_state = AuthState::new(Arc::new(verifier));
    let audit_state = app_middleware::AuditState::new(audit.clone());
    let panic_state = app_middleware::PanicRecoveryState {
        development: cfg.development,
    };
    let state = AppState { cases, audit };

    let cors = CorsLayer::new()
        .allow_origin(cfg.cors.allowed_origin.parse::<HeaderValue>()?)
        .allow_methods(Any)
        .allow_headers(Any);

    // Middleware stack, outermost first: trace -> cors -> request id ->
    // authentication -> audit capture -> authorization -> panic
    // recovery -> handler. Audit sits inside authentication (principal
    // known) and outside authorization and panic recovery (401/403 and
    // 500 outcomes captured).
    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/me", get(handlers::me))
        .route(
            "/cases",
            get(handlers::list_cases).post(handlers::create_case),
        )
        .route(
            "/cases/{id}",
            get(handlers::get_case).delete(handlers::delete_case),
        )
        .route("/audit", get(handlers::get_audit))
        .with_state(state)
        .layer(middleware::from_fn_with_state(
            panic_state,
            app_middleware::recover_panics,
        ))
        .layer(middleware::from_fn(
            app_middleware::authorization_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            audit_state,
            app_middleware::audit_capture,
        ))
        .layer(middleware::from_fn_with_state(
            auth_state,
            authentication_middleware,
        ))
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http.request",
                    http.method = %req.method(),
                    http.target = %req.uri(),
                )
            }),
        );

    Ok(app)
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub fn build(self) -> anyhow::Result<CasetrackServer> {
        let app = build_app(&self.config)?;

        Ok(CasetrackServer {
            addr: self.addr,
            app,
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct CasetrackServer {
    addr: SocketAddr,
    app: Router,
}

impl CasetrackServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
