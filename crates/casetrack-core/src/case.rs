//! Case records.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::CoreError;

/// A tracked case as stored and returned over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseItem {
    /// Caller-assigned case identifier, e.g. `CASE-1001`.
    pub id: String,

    /// Short case title.
    pub title: String,

    /// Workflow status, e.g. `Open`, `InReview`, `Closed`.
    pub status: String,

    /// Server-assigned creation instant.
    #[serde(with = "time::serde::rfc3339")]
    pub created_utc: OffsetDateTime,
}

/// Body of a case creation request.
///
/// `created_utc` is optional; when absent the store stamps the current
/// instant at insertion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCaseRequest {
    pub id: String,
    pub title: String,
    pub status: String,

    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_utc: Option<OffsetDateTime>,
}

impl CreateCaseRequest {
    /// Validates the request and converts it into a [`CaseItem`],
    /// stamping `now` as the creation instant when the caller did not
    /// supply one.
    pub fn into_case(self, now: OffsetDateTime) -> Result<CaseItem, CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::validation("Id is required."));
        }

        Ok(CaseItem {
            id: self.id,
            title: self.title,
            status: self.status,
            created_utc: self.created_utc.unwrap_or(now),
        })
    }
}
