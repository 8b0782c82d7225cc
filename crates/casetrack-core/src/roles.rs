//! Case-insensitive role sets.
//!
//! A [`RoleSet`] is derived per request from token claims and never
//! stored. Role strings are normalized to lowercase on insertion so
//! membership checks and audit records use one canonical form.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// A normalized set of role names attached to one validated principal.
///
/// Roles compare case-insensitively; `"Admin"` and `"ADMIN"` collapse
/// into the single entry `"admin"`. Deserialization re-normalizes, so
/// a set read back off the wire behaves like one built locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<String>);

impl<'de> Deserialize<'de> for RoleSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let roles = Vec::<String>::deserialize(deserializer)?;
        Ok(roles.into_iter().collect())
    }
}

impl RoleSet {
    /// Creates an empty role set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no roles are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct roles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Inserts a role, normalizing to lowercase.
    pub fn insert(&mut self, role: impl AsRef<str>) {
        let normalized = role.as_ref().trim().to_lowercase();
        if !normalized.is_empty() {
            self.0.insert(normalized);
        }
    }

    /// Case-insensitive membership check.
    #[must_use]
    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(&role.to_lowercase())
    }

    /// Returns `true` if any of the given roles is present.
    #[must_use]
    pub fn contains_any(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.contains(role))
    }

    /// Iterates the normalized role names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Collects the normalized role names into a vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for role in iter {
            set.insert(role);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_dedup() {
        let roles: RoleSet = ["Admin", "ADMIN", "admin"].into_iter().collect();

        assert_eq!(roles.len(), 1);
        assert!(roles.contains("admin"));
        assert!(roles.contains("Admin"));
        assert_eq!(roles.to_vec(), vec!["admin".to_string()]);
    }

    #[test]
    fn test_contains_any() {
        let roles: RoleSet = ["Attorney"].into_iter().collect();

        assert!(roles.contains_any(&["admin", "attorney"]));
        assert!(!roles.contains_any(&["admin"]));
        assert!(!RoleSet::new().contains_any(&["admin", "attorney"]));
    }

    #[test]
    fn test_blank_entries_ignored() {
        let roles: RoleSet = ["", "  ", "Admin"].into_iter().collect();

        assert_eq!(roles.len(), 1);
        assert!(roles.contains("admin"));
    }

    #[test]
    fn test_serializes_as_array() {
        let roles: RoleSet = ["Attorney", "Admin"].into_iter().collect();
        let json = serde_json::to_value(&roles).unwrap();

        assert_eq!(json, serde_json::json!(["admin", "attorney"]));
    }

    #[test]
    fn test_deserialization_normalizes() {
        let roles: RoleSet = serde_json::from_value(serde_json::json!(["Admin", "ADMIN"])).unwrap();

        assert_eq!(roles.len(), 1);
        assert!(roles.contains("admin"));
    }
}
