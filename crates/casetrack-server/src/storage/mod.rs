//! In-memory storage backends.
//!
//! The traits are the drop-in seam for a future durable store: the
//! pipeline and handlers only ever see `Arc<dyn CaseStore>` and
//! `Arc<dyn AuditSink>`. The in-memory implementations uphold the same
//! guarantees a durable one must (bounded audit retention, snapshot
//! reads, concurrent-append safety).

mod audit;
mod cases;

pub use audit::{InMemoryAuditStore, MAX_AUDIT_EVENTS};
pub use cases::InMemoryCaseStore;

use async_trait::async_trait;
use casetrack_core::{AuditEvent, CaseItem};

/// Storage contract for cases.
#[async_trait]
pub trait CaseStore: Send + Sync {
    /// All cases, newest first by creation time.
    async fn get_all(&self) -> Vec<CaseItem>;

    /// One case by id.
    async fn get(&self, id: &str) -> Option<CaseItem>;

    /// Creates or replaces a case, returning the stored record.
    async fn upsert(&self, case: CaseItem) -> CaseItem;

    /// Deletes a case by id. Returns `false` if it did not exist.
    async fn delete(&self, id: &str) -> bool;
}

/// Storage contract for the audit trail.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Appends an event, evicting the oldest beyond capacity.
    async fn add(&self, event: AuditEvent);

    /// Snapshot of retained events, newest first by timestamp.
    async fn get_all(&self) -> Vec<AuditEvent>;
}
