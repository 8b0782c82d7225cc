//! # casetrack-auth
//!
//! Authentication and authorization for the Casetrack API.
//!
//! This crate provides:
//! - Bearer token verification against the external identity provider
//! - Role extraction from token claims (with the dual claim-key
//!   convention providers use)
//! - Role-based authorization policies
//! - Axum middleware wiring authentication and policy enforcement into
//!   the request pipeline
//!
//! ## Modules
//!
//! - [`verifier`] - JWT validation
//! - [`policy`] - Role-based authorization policies
//! - [`middleware`] - HTTP middleware for authentication/authorization
//! - [`config`] - Token verification configuration
//! - [`error`] - Error types and problem responses
//!
//! Claim types and role extraction live in `casetrack-core` (they are
//! consumed by the client crate as well) and are re-exported here.

pub mod config;
pub mod error;
pub mod middleware;
pub mod policy;
pub mod verifier;

pub use casetrack_core::claims::{AccessTokenClaims, extract_roles};
pub use config::AuthConfig;
pub use error::AuthError;
pub use middleware::{
    AuthContext, AuthState, Authentication, authentication_middleware, authorize,
};
pub use policy::Policy;
pub use verifier::TokenVerifier;

/// Type alias for authentication/authorization results.
pub type AuthResult<T> = Result<T, AuthError>;
