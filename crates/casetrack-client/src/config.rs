//! Client environment configuration.
//!
//! Identity-provider endpoint, client identifiers, requested scope, and
//! redirect URIs, resolved from `CASETRACK_*` environment variables
//! with compiled-in development defaults.

use serde::{Deserialize, Serialize};

/// Configuration for the admin client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Identity provider tenant id.
    pub tenant_id: String,

    /// Application (client) id registered for the admin UI.
    pub client_id: String,

    /// API scope requested for access tokens.
    pub api_scope: String,

    /// Base URL of the Casetrack API.
    pub api_base_url: String,

    /// Redirect URI registered for the interactive flow.
    pub redirect_uri: String,

    /// Redirect URI used after sign-out.
    pub post_logout_redirect_uri: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            tenant_id: "09131022-b785-4e6d-8d42-916975e51262".to_string(),
            client_id: "471a2896-5785-4789-9c05-20077c08f75d".to_string(),
            api_scope: "api://754ec9b6-b889-44bf-a6fe-2034a37647d4/access_as_user".to_string(),
            api_base_url: "http://localhost:5179".to_string(),
            redirect_uri: "http://localhost:3000/admin/".to_string(),
            post_logout_redirect_uri: "http://localhost:3000/admin/".to_string(),
        }
    }
}

impl ClientConfig {
    /// Builds the configuration from `CASETRACK_*` environment
    /// variables, falling back to the compiled-in defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tenant_id: env_or("CASETRACK_TENANT_ID", defaults.tenant_id),
            client_id: env_or("CASETRACK_CLIENT_ID", defaults.client_id),
            api_scope: env_or("CASETRACK_API_SCOPE", defaults.api_scope),
            api_base_url: env_or("CASETRACK_API_BASE_URL", defaults.api_base_url),
            redirect_uri: env_or("CASETRACK_REDIRECT_URI", defaults.redirect_uri),
            post_logout_redirect_uri: env_or(
                "CASETRACK_POST_LOGOUT_REDIRECT_URI",
                defaults.post_logout_redirect_uri,
            ),
        }
    }

    /// Authority URL for the configured tenant.
    #[must_use]
    pub fn authority(&self) -> String {
        format!("https://login.microsoftonline.com/{}", self.tenant_id)
    }

    /// Scopes requested on every acquisition.
    #[must_use]
    pub fn scopes(&self) -> Vec<String> {
        vec![self.api_scope.clone()]
    }
}

fn env_or(key: &str, default: String) -> String {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_complete() {
        let config = ClientConfig::default();
        assert!(!config.tenant_id.is_empty());
        assert!(config.api_scope.starts_with("api://"));
        assert!(config.api_base_url.starts_with("http"));
    }

    #[test]
    fn test_authority_includes_tenant() {
        let config = ClientConfig::default();
        assert!(config.authority().contains(&config.tenant_id));
    }

    #[test]
    fn test_scopes_request_the_api_scope() {
        let config = ClientConfig::default();
        assert_eq!(config.scopes(), vec![config.api_scope.clone()]);
    }
}
