//! # casetrack-core
//!
//! Core domain types shared by the Casetrack server and client crates.
//!
//! This crate provides:
//! - The case and audit event domain models
//! - The normalized role set used for authorization decisions
//! - The core error taxonomy and RFC 7807-style problem bodies
//!
//! ## Modules
//!
//! - [`case`] - Case records and creation requests
//! - [`audit`] - Immutable audit events
//! - [`roles`] - Case-insensitive role sets
//! - [`claims`] - Access token claims and role extraction
//! - [`error`] - Core error taxonomy
//! - [`problem`] - Structured problem response bodies

pub mod audit;
pub mod case;
pub mod claims;
pub mod error;
pub mod problem;
pub mod roles;

pub use audit::AuditEvent;
pub use case::{CaseItem, CreateCaseRequest};
pub use claims::{AccessTokenClaims, MeResponse, extract_roles};
pub use error::CoreError;
pub use problem::Problem;
pub use roles::RoleSet;

/// Type alias for core results.
pub type Result<T> = std::result::Result<T, CoreError>;
