//! Structured problem response bodies.
//!
//! Every error surfaced over HTTP uses the same shape:
//! `{title, detail, statusCode}`. Handlers build these directly for
//! locally-handled failures (validation, not-found); the middleware
//! layers build them for 401/403/500.

use serde::{Deserialize, Serialize};

/// RFC 7807-style problem body.
///
/// `detail` is optional so that production 500 responses can omit
/// internal information entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    /// Short, human-readable summary of the problem type.
    pub title: String,

    /// Human-readable explanation specific to this occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// HTTP status code of the response carrying this body.
    pub status_code: u16,
}

impl Problem {
    /// Creates a problem body with no detail.
    #[must_use]
    pub fn new(status_code: u16, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: None,
            status_code,
        }
    }

    /// Attaches a detail message.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Validation problem (400).
    #[must_use]
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::new(400, "Validation").with_detail(detail)
    }

    /// Not-found problem (404).
    #[must_use]
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not found").with_detail(detail)
    }

    /// Unauthenticated problem (401).
    #[must_use]
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(401, "Unauthorized").with_detail(detail)
    }

    /// Insufficient-role problem (403).
    #[must_use]
    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(403, "Forbidden").with_detail(detail)
    }

    /// Unexpected-error problem (500). Detail is attached by the caller
    /// only in development mode.
    #[must_use]
    pub fn unexpected() -> Self {
        Self::new(500, "An unexpected error occurred.")
    }
}
