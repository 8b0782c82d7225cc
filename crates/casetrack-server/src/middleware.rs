use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{HeaderName, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures_util::FutureExt;
use time::OffsetDateTime;
use uuid::Uuid;

use casetrack_auth::{Authentication, Policy, authorize};
use casetrack_core::{AuditEvent, Problem, RoleSet};

use crate::storage::AuditSink;

// =============================================================================
// Correlation Id Middleware
// =============================================================================

/// Correlation identifier of one request, unique per request.
#[derive(Debug, Clone)]
pub struct CorrelationId(pub String);

// Ensures each request has an x-request-id and mirrors it on the response
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let header_name = HeaderName::from_static("x-request-id");

    // If the incoming request already carries an id, preserve it; otherwise generate one
    let id = req
        .headers()
        .get(&header_name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(CorrelationId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(header_name, value);
    }

    res
}

// =============================================================================
// Audit Capture Middleware
// =============================================================================

/// State required for audit capture.
#[derive(Clone)]
pub struct AuditState {
    /// Sink receiving one event per request.
    pub sink: Arc<dyn AuditSink>,
}

impl AuditState {
    /// Creates a new audit state.
    #[must_use]
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }
}

/// Records one audit event per request, after the inner pipeline has
/// produced the final response.
///
/// Sits inside authentication (so the principal is known) and outside
/// authorization and panic recovery (so 401/403 short-circuits and
/// recovered panics are captured with their real status codes).
pub async fn audit_capture(
    State(state): State<AuditState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let correlation_id = req
        .extensions()
        .get::<CorrelationId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    let principal = req
        .extensions()
        .get::<Authentication>()
        .and_then(Authentication::principal)
        .cloned();

    let response = next.run(req).await;

    let (user_object_id, username, roles) = match &principal {
        Some(ctx) => (
            ctx.object_id().map(str::to_string),
            ctx.username().map(str::to_string),
            ctx.roles.clone(),
        ),
        None => (None, None, RoleSet::new()),
    };

    state
        .sink
        .add(AuditEvent {
            timestamp_utc: OffsetDateTime::now_utc(),
            user_object_id,
            username,
            roles,
            method,
            path,
            status_code: response.status().as_u16(),
            correlation_id,
        })
        .await;

    response
}

// =============================================================================
// Authorization Middleware
// =============================================================================

/// Enforces the matched endpoint's policy.
///
/// Endpoints without a declared policy pass through (public routes and
/// unknown paths, which fall to the router's 404). On allow, the
/// validated [`casetrack_auth::AuthContext`] is inserted into the
/// request extensions for handlers.
pub async fn authorization_middleware(mut req: Request<Body>, next: Next) -> Response {
    let Some(policy) = route_policy(req.method(), req.uri().path()) else {
        return next.run(req).await;
    };

    match authorize(&policy, req.extensions().get::<Authentication>()) {
        Ok(ctx) => {
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

/// Declared per-endpoint policy requirements.
fn route_policy(method: &Method, path: &str) -> Option<Policy> {
    if *method == Method::GET {
        return match path {
            "/health" => None,
            "/me" | "/cases" => Some(Policy::admin_or_attorney()),
            "/audit" => Some(Policy::admin_only()),
            _ if path.starts_with("/cases/") => Some(Policy::admin_or_attorney()),
            _ => None,
        };
    }
    if *method == Method::POST && path == "/cases" {
        return Some(Policy::admin_only());
    }
    if *method == Method::DELETE && path.starts_with("/cases/") {
        return Some(Policy::admin_only());
    }
    None
}

// =============================================================================
// Panic Recovery Middleware
// =============================================================================

/// State for panic recovery.
#[derive(Debug, Clone, Copy)]
pub struct PanicRecoveryState {
    /// Include the panic message in the 500 body.
    pub development: bool,
}

/// Converts handler panics into 500 problem responses.
///
/// Runs inside the audit layer so a panicked request still produces
/// its audit event with status 500. The panic message is exposed only
/// in development mode.
pub async fn recover_panics(
    State(state): State<PanicRecoveryState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            let detail = panic_message(panic);
            tracing::error!(detail = %detail, "Request handler panicked");

            let mut problem = Problem::unexpected();
            if state.development {
                problem = problem.with_detail(detail);
            }
            (StatusCode::INTERNAL_SERVER_ERROR, Json(problem)).into_response()
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================
