//! Role-based authorization policies.
//!
//! A policy answers exactly one question: does this role set contain
//! an acceptable role? Whether a failing request gets a 401 or a 403
//! is the pipeline's concern, not the policy's.

use casetrack_core::RoleSet;

/// A named rule mapping to a set of acceptable roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    name: &'static str,
    any_of: &'static [&'static str],
}

impl Policy {
    /// Creates a policy accepting any of the given roles.
    #[must_use]
    pub const fn new(name: &'static str, any_of: &'static [&'static str]) -> Self {
        Self { name, any_of }
    }

    /// Policy requiring the `admin` role.
    #[must_use]
    pub const fn admin_only() -> Self {
        Self::new("admin-only", &["admin"])
    }

    /// Policy requiring the `admin` or `attorney` role.
    #[must_use]
    pub const fn admin_or_attorney() -> Self {
        Self::new("admin-or-attorney", &["admin", "attorney"])
    }

    /// Policy name, for logging and deny messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Roles this policy accepts.
    #[must_use]
    pub fn acceptable_roles(&self) -> &'static [&'static str] {
        self.any_of
    }

    /// Returns `true` if the role set intersects the acceptable roles.
    #[must_use]
    pub fn allows(&self, roles: &RoleSet) -> bool {
        roles.contains_any(self.any_of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_only_denies_attorney() {
        let roles: RoleSet = ["attorney"].into_iter().collect();
        assert!(!Policy::admin_only().allows(&roles));
    }

    #[test]
    fn test_admin_or_attorney_allows_attorney() {
        let roles: RoleSet = ["attorney"].into_iter().collect();
        assert!(Policy::admin_or_attorney().allows(&roles));
    }

    #[test]
    fn test_admin_allowed_by_both() {
        let roles: RoleSet = ["Admin"].into_iter().collect();
        assert!(Policy::admin_only().allows(&roles));
        assert!(Policy::admin_or_attorney().allows(&roles));
    }

    #[test]
    fn test_empty_role_set_denied() {
        let roles = RoleSet::new();
        assert!(!Policy::admin_only().allows(&roles));
        assert!(!Policy::admin_or_attorney().allows(&roles));
    }

    #[test]
    fn test_unrelated_role_denied() {
        let roles: RoleSet = ["paralegal"].into_iter().collect();
        assert!(!Policy::admin_or_attorney().allows(&roles));
    }
}
