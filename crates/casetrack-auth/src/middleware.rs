//! Authentication middleware and policy evaluation.
//!
//! Authentication runs for every request and never short-circuits: it
//! resolves a principal from the bearer token (or records that a
//! presented token failed validation) and stashes the outcome in the
//! request extensions. Public routes therefore work with or without a
//! token. [`authorize`] is consumed by the server's authorization
//! middleware to turn the outcome plus the matched endpoint's policy
//! into an allow, a 401, or a 403.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use casetrack_core::{AccessTokenClaims, RoleSet, extract_roles};

use crate::error::AuthError;
use crate::policy::Policy;
use crate::verifier::TokenVerifier;

// =============================================================================
// Auth State
// =============================================================================

/// State required for bearer token authentication.
#[derive(Clone)]
pub struct AuthState {
    /// Verifier for inbound access tokens.
    pub verifier: Arc<TokenVerifier>,
}

impl AuthState {
    /// Creates a new auth state.
    #[must_use]
    pub fn new(verifier: Arc<TokenVerifier>) -> Self {
        Self { verifier }
    }
}

// =============================================================================
// Auth Context
// =============================================================================

/// Authenticated request context.
///
/// Claims are wrapped in `Arc` so the context clones cheaply into the
/// audit layer and handlers.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Validated access token claims.
    pub claims: Arc<AccessTokenClaims>,

    /// Normalized role set derived from the claims.
    pub roles: RoleSet,
}

impl AuthContext {
    /// Builds a context from validated claims, deriving the role set.
    #[must_use]
    pub fn from_claims(claims: AccessTokenClaims) -> Self {
        let roles = extract_roles(&claims);
        Self {
            claims: Arc::new(claims),
            roles,
        }
    }

    /// Stable directory object id of the caller.
    #[must_use]
    pub fn object_id(&self) -> Option<&str> {
        self.claims.object_id()
    }

    /// Display username of the caller.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.claims.username()
    }

    /// Subject identifier from the token.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.claims.sub
    }
}

/// Outcome of the authentication pass, stored in request extensions.
///
/// Absent entirely when no credential was presented.
#[derive(Debug, Clone)]
pub enum Authentication {
    /// A valid token was presented.
    Principal(AuthContext),

    /// A token was presented but failed validation.
    Failed(String),
}

impl Authentication {
    /// The principal, when authentication succeeded.
    #[must_use]
    pub fn principal(&self) -> Option<&AuthContext> {
        match self {
            Self::Principal(ctx) => Some(ctx),
            Self::Failed(_) => None,
        }
    }
}

// =============================================================================
// Authentication Middleware
// =============================================================================

/// Resolves the caller's principal from the `Authorization` header.
///
/// Never rejects the request itself; the authorization layer downstream
/// turns a missing or failed authentication into a 401 where one is
/// required.
pub async fn authentication_middleware(
    State(state): State<AuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    if let Some(header) = header {
        let outcome = match header.strip_prefix("Bearer ").filter(|t| !t.is_empty()) {
            Some(token) => match state.verifier.verify(token) {
                Ok(claims) => {
                    let ctx = AuthContext::from_claims(claims);
                    tracing::debug!(
                        subject = %ctx.subject(),
                        roles = ?ctx.roles,
                        "Token validated"
                    );
                    Authentication::Principal(ctx)
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Token validation failed");
                    Authentication::Failed(e.to_string())
                }
            },
            None => Authentication::Failed("Invalid Authorization header format".to_string()),
        };
        req.extensions_mut().insert(outcome);
    }

    next.run(req).await
}

// =============================================================================
// Policy Evaluation
// =============================================================================

/// Evaluates an endpoint's policy against the authentication outcome.
///
/// This is where the deny paths become distinguishable: no valid
/// credential yields 401 (`Unauthorized`/`InvalidToken`), a valid
/// principal without an acceptable role yields 403 (`Forbidden`).
pub fn authorize(
    policy: &Policy,
    authentication: Option<&Authentication>,
) -> Result<AuthContext, AuthError> {
    match authentication {
        Some(Authentication::Principal(ctx)) => {
            if policy.allows(&ctx.roles) {
                Ok(ctx.clone())
            } else {
                tracing::info!(
                    subject = %ctx.subject(),
                    policy = %policy.name(),
                    "Access denied"
                );
                Err(AuthError::forbidden(format!(
                    "Requires one of roles: {}",
                    policy.acceptable_roles().join(", ")
                )))
            }
        }
        Some(Authentication::Failed(reason)) => Err(AuthError::invalid_token(reason.clone())),
        None => Err(AuthError::unauthorized("Authentication required")),
    }
}

// =============================================================================
// Tests
// =============================================================================
