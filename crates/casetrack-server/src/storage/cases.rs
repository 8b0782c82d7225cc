//! In-memory case storage using a papaya lock-free map.

use async_trait::async_trait;
use papaya::HashMap as PapayaHashMap;
use time::OffsetDateTime;

use casetrack_core::CaseItem;

use super::CaseStore;

/// In-memory case store.
///
/// Lock-free concurrent access; reads during writes see either the old
/// or the new record, never a torn one.
pub struct InMemoryCaseStore {
    cases: PapayaHashMap<String, CaseItem>,
}

impl Default for InMemoryCaseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCaseStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cases: PapayaHashMap::new(),
        }
    }

    /// Creates a store seeded with development data.
    #[must_use]
    pub fn with_seed_data() -> Self {
        let store = Self::new();
        let now = OffsetDateTime::now_utc();
        let seed = [
            ("CASE-1001", "Initial intake", "Open", now - time::Duration::days(2)),
            ("CASE-1002", "Follow-up review", "InReview", now - time::Duration::days(1)),
            ("CASE-1003", "Closed example", "Closed", now - time::Duration::hours(12)),
        ];

        let guard = store.cases.pin();
        for (id, title, status, created_utc) in seed {
            guard.insert(
                id.to_string(),
                CaseItem {
                    id: id.to_string(),
                    title: title.to_string(),
                    status: status.to_string(),
                    created_utc,
                },
            );
        }
        drop(guard);
        store
    }
}

#[async_trait]
impl CaseStore for InMemoryCaseStore {
    async fn get_all(&self) -> Vec<CaseItem> {
        let guard = self.cases.pin();
        let mut cases: Vec<CaseItem> = guard.iter().map(|(_, case)| case.clone()).collect();
        cases.sort_by(|a, b| b.created_utc.cmp(&a.created_utc));
        cases
    }

    async fn get(&self, id: &str) -> Option<CaseItem> {
        let guard = self.cases.pin();
        guard.get(id).cloned()
    }

    async fn upsert(&self, case: CaseItem) -> CaseItem {
        let guard = self.cases.pin();
        guard.insert(case.id.clone(), case.clone());
        case
    }

    async fn delete(&self, id: &str) -> bool {
        let guard = self.cases.pin();
        guard.remove(id).is_some()
    }
}
