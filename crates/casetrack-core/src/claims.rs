//! Access token claims and role extraction.
//!
//! Identity providers attach role membership under one of two claim
//! keys: the provider-specific `roles` array, or the generic `role`
//! claim. [`extract_roles`] is the single shared reading of that
//! convention; every place that needs a caller's roles goes through it,
//! whether the token was fully validated (server) or only decoded for a
//! pre-flight check (client).

use serde::{Deserialize, Deserializer, Serialize};

use crate::roles::RoleSet;

/// Claims carried by an API access token.
///
/// Only the claims this system reads are modeled; unknown claims are
/// ignored on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject identifier.
    pub sub: String,

    /// Stable object id of the user in the identity provider's
    /// directory.
    #[serde(default)]
    pub oid: Option<String>,

    /// Login name, e.g. `jordan@example.com`.
    #[serde(default)]
    pub preferred_username: Option<String>,

    /// Display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Provider-specific roles claim (primary key).
    #[serde(default, deserialize_with = "string_or_seq")]
    pub roles: Vec<String>,

    /// Generic role claim (fallback key).
    #[serde(default, deserialize_with = "string_or_seq")]
    pub role: Vec<String>,

    /// Granted scopes, space-separated.
    #[serde(default)]
    pub scp: Option<String>,

    /// Expiry as Unix seconds.
    pub exp: i64,

    /// Issued-at as Unix seconds.
    #[serde(default)]
    pub iat: Option<i64>,
}

impl AccessTokenClaims {
    /// Best-available display username: `preferred_username`, else the
    /// `name` claim.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.preferred_username.as_deref().or(self.name.as_deref())
    }

    /// Stable directory object id, when present.
    #[must_use]
    pub fn object_id(&self) -> Option<&str> {
        self.oid.as_deref()
    }
}

/// Derives the normalized role set for a principal.
///
/// Reads the primary `roles` claim; only when that yields zero entries
/// does it fall back to the generic `role` claim. The two keys are
/// never merged. Duplicates collapse case-insensitively.
#[must_use]
pub fn extract_roles(claims: &AccessTokenClaims) -> RoleSet {
    let primary: RoleSet = claims.roles.iter().collect();
    if !primary.is_empty() {
        return primary;
    }
    claims.role.iter().collect()
}

/// The `/me` endpoint response: the caller's identity as the server
/// resolved it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeResponse {
    pub oid: Option<String>,
    pub username: Option<String>,
    pub roles: RoleSet,
}

/// Accepts a claim that providers emit as either a single string or an
/// array of strings.
fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrSeq {
        One(String),
        Many(Vec<String>),
    }

    match StringOrSeq::deserialize(deserializer)? {
        StringOrSeq::One(value) => Ok(vec![value]),
        StringOrSeq::Many(values) => Ok(values),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with(roles: &[&str], role: &[&str]) -> AccessTokenClaims {
        AccessTokenClaims {
            sub: "user-1".to_string(),
            oid: Some("oid-1".to_string()),
            preferred_username: Some("jordan@example.com".to_string()),
            name: Some("Jordan".to_string()),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            role: role.iter().map(|r| r.to_string()).collect(),
            scp: None,
            exp: 9_999_999_999,
            iat: None,
        }
    }

    #[test]
    fn test_fallback_used_only_when_primary_empty() {
        let roles = extract_roles(&claims_with(&[], &["Admin"]));
        assert_eq!(roles.to_vec(), vec!["admin".to_string()]);
    }

    #[test]
    fn test_primary_wins_and_fallback_ignored() {
        let roles = extract_roles(&claims_with(&["Admin", "ADMIN"], &["Attorney"]));
        assert_eq!(roles.to_vec(), vec!["admin".to_string()]);
        assert!(!roles.contains("attorney"));
    }

    #[test]
    fn test_both_empty_yields_empty_set() {
        assert!(extract_roles(&claims_with(&[], &[])).is_empty());
    }

    #[test]
    fn test_role_claim_accepts_single_string() {
        let json = serde_json::json!({
            "sub": "user-1",
            "role": "Attorney",
            "exp": 9_999_999_999i64,
        });

        let claims: AccessTokenClaims = serde_json::from_value(json).unwrap();
        assert_eq!(claims.role, vec!["Attorney".to_string()]);
        assert!(claims.roles.is_empty());
        assert!(extract_roles(&claims).contains("attorney"));
    }

    #[test]
    fn test_unknown_claims_ignored() {
        let json = serde_json::json!({
            "sub": "user-1",
            "roles": ["Admin"],
            "exp": 9_999_999_999i64,
            "aud": "api://casetrack",
            "iss": "https://login.example.com/tenant/v2.0",
            "tid": "tenant-1",
        });

        let claims: AccessTokenClaims = serde_json::from_value(json).unwrap();
        assert_eq!(claims.roles, vec!["Admin".to_string()]);
    }

    #[test]
    fn test_username_prefers_preferred_username() {
        let claims = claims_with(&[], &[]);
        assert_eq!(claims.username(), Some("jordan@example.com"));

        let mut claims = claims_with(&[], &[]);
        claims.preferred_username = None;
        assert_eq!(claims.username(), Some("Jordan"));
    }
}
