//! Token verification configuration.

use serde::{Deserialize, Serialize};

/// Configuration for validating inbound bearer tokens.
///
/// Defaults target the development tenant; production deployments
/// override via `CASETRACK_AUTH_*` environment variables.
///
/// Exactly one key source must be configured: an HS256 shared secret
/// (development and tests) or the provider's RSA public key in PEM form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Expected token issuer (`iss` claim).
    pub issuer: String,

    /// Expected token audience (`aud` claim).
    pub audience: String,

    /// HS256 shared secret for symmetric validation.
    pub hs256_secret: Option<String>,

    /// RSA public key (PEM) for RS256 validation.
    pub rsa_public_key_pem: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: "https://login.microsoftonline.com/09131022-b785-4e6d-8d42-916975e51262/v2.0"
                .to_string(),
            audience: "api://754ec9b6-b889-44bf-a6fe-2034a37647d4".to_string(),
            hs256_secret: None,
            rsa_public_key_pem: None,
        }
    }
}

impl AuthConfig {
    /// Builds the configuration from `CASETRACK_AUTH_*` environment
    /// variables, falling back to the compiled-in defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            issuer: env_or("CASETRACK_AUTH_ISSUER", defaults.issuer),
            audience: env_or("CASETRACK_AUTH_AUDIENCE", defaults.audience),
            hs256_secret: non_empty_env("CASETRACK_AUTH_HS256_SECRET"),
            rsa_public_key_pem: non_empty_env("CASETRACK_AUTH_RSA_PUBLIC_KEY_PEM"),
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.issuer.is_empty() {
            return Err("auth.issuer must not be empty".into());
        }
        if self.audience.is_empty() {
            return Err("auth.audience must not be empty".into());
        }
        match (&self.hs256_secret, &self.rsa_public_key_pem) {
            (None, None) => Err(
                "auth requires either hs256_secret or rsa_public_key_pem to validate tokens"
                    .into(),
            ),
            (Some(_), Some(_)) => {
                Err("auth.hs256_secret and auth.rsa_public_key_pem are mutually exclusive".into())
            }
            _ => Ok(()),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default,
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}
