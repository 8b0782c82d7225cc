//! Bounded in-memory audit trail.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use casetrack_core::AuditEvent;

use super::AuditSink;

/// Maximum number of retained audit events.
pub const MAX_AUDIT_EVENTS: usize = 500;

/// In-memory audit store.
///
/// A mutex-guarded ring: append and evict are O(1), and eviction order
/// is strictly insertion order regardless of event timestamps. The
/// critical section never spans an await point, so concurrent appends
/// serialize briefly but never block a handler on another handler's
/// work.
#[derive(Debug)]
pub struct InMemoryAuditStore {
    events: Mutex<VecDeque<AuditEvent>>,
    capacity: usize,
}

impl Default for InMemoryAuditStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAuditStore {
    /// Creates a store retaining up to [`MAX_AUDIT_EVENTS`] events.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MAX_AUDIT_EVENTS)
    }

    /// Creates a store with a custom capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditStore {
    async fn add(&self, event: AuditEvent) {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        events.push_back(event);
        while events.len() > self.capacity {
            events.pop_front();
        }
    }

    async fn get_all(&self) -> Vec<AuditEvent> {
        let snapshot: Vec<AuditEvent> = {
            let events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
            events.iter().cloned().collect()
        };

        // Newest-first is a view concern; storage order stays insertion
        // order. Stable sort keeps equal timestamps in insertion order
        // within one snapshot.
        let mut snapshot = snapshot;
        snapshot.sort_by(|a, b| b.timestamp_utc.cmp(&a.timestamp_utc));
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use casetrack_core::RoleSet;
    use time::OffsetDateTime;

    fn event(n: i64) -> AuditEvent {
        AuditEvent {
            timestamp_utc: OffsetDateTime::from_unix_timestamp(1_700_000_000 + n)
                .expect("valid timestamp"),
            user_object_id: Some(format!("oid-{n}")),
            username: Some(format!("user-{n}@example.com")),
            roles: RoleSet::new(),
            method: "GET".to_string(),
            path: "/cases".to_string(),
            status_code: 200,
            correlation_id: format!("req-{n}"),
        }
    }

    #[tokio::test]
    async fn test_capacity_is_bounded_with_fifo_eviction() {
        let store = InMemoryAuditStore::new();
        for n in 0..600 {
            store.add(event(n)).await;
        }

        let events = store.get_all().await;
        assert_eq!(events.len(), MAX_AUDIT_EVENTS);

        // The 500 most recently added survive: 100..600.
        let ids: Vec<&str> = events
            .iter()
            .map(|e| e.correlation_id.as_str())
            .collect();
        assert!(ids.contains(&"req-100"));
        assert!(ids.contains(&"req-599"));
        assert!(!ids.contains(&"req-99"));
    }

    #[tokio::test]
    async fn test_eviction_follows_insertion_order_not_timestamps() {
        let store = InMemoryAuditStore::with_capacity(2);
        // Inserted newest-timestamp first: eviction must still drop the
        // first-inserted event.
        store.add(event(30)).await;
        store.add(event(20)).await;
        store.add(event(10)).await;

        let ids: Vec<String> = store
            .get_all()
            .await
            .into_iter()
            .map(|e| e.correlation_id)
            .collect();
        assert_eq!(ids, vec!["req-20".to_string(), "req-10".to_string()]);
    }

    #[tokio::test]
    async fn test_get_all_is_sorted_newest_first() {
        let store = InMemoryAuditStore::new();
        store.add(event(5)).await;
        store.add(event(50)).await;
        store.add(event(25)).await;

        let events = store.get_all().await;
        let timestamps: Vec<_> = events.iter().map(|e| e.timestamp_utc).collect();
        let mut sorted = timestamps.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(timestamps, sorted);
        assert_eq!(events[0].correlation_id, "req-50");
    }

    #[tokio::test]
    async fn test_snapshot_is_not_a_live_view() {
        let store = InMemoryAuditStore::new();
        store.add(event(1)).await;

        let snapshot = store.get_all().await;
        store.add(event(2)).await;

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.get_all().await.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_appends_lose_nothing() {
        let store = Arc::new(InMemoryAuditStore::new());
        let mut handles = Vec::new();

        for task in 0..16i64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                for n in 0..100 {
                    store.add(event(task * 1_000 + n)).await;
                }
            }));
        }
        for handle in handles {
            handle.await.expect("append task");
        }

        // 1600 appends against capacity 500: full, and every retained
        // event intact.
        let events = store.get_all().await;
        assert_eq!(events.len(), MAX_AUDIT_EVENTS);

        let unique: std::collections::HashSet<&str> = events
            .iter()
            .map(|e| e.correlation_id.as_str())
            .collect();
        assert_eq!(unique.len(), MAX_AUDIT_EVENTS);
        for e in &events {
            assert_eq!(e.method, "GET");
            assert_eq!(e.status_code, 200);
        }
    }
}
