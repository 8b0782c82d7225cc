//! Immutable audit events.
//!
//! One [`AuditEvent`] is recorded for every inbound request after the
//! handler completes, so the captured status code reflects the real
//! outcome. Events are never mutated once constructed; they leave the
//! store only through bounded-capacity eviction or process restart.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::roles::RoleSet;

/// Record of one completed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    /// Request-completion instant.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp_utc: OffsetDateTime,

    /// Stable subject identifier of the caller, absent for
    /// unauthenticated requests.
    pub user_object_id: Option<String>,

    /// Display username of the caller, absent for unauthenticated
    /// requests.
    pub username: Option<String>,

    /// Role set attached to the request at the time it was handled.
    pub roles: RoleSet,

    /// HTTP method.
    pub method: String,

    /// Request path.
    pub path: String,

    /// Final response status code, including error outcomes.
    pub status_code: u16,

    /// Correlation identifier unique to this request.
    pub correlation_id: String,
}
