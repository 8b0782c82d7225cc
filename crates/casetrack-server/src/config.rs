use std::net::SocketAddr;

use casetrack_auth::AuthConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    /// Development mode: unhandled-error responses include detail.
    pub development: bool,
    /// Token validation configuration.
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5179,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origin of the admin UI allowed to call the API from a browser.
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl AppConfig {
    /// Builds the configuration from `CASETRACK_*` environment
    /// variables, falling back to the compiled-in defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server: ServerConfig {
                host: env_or("CASETRACK_HOST", defaults.server.host),
                port: env_parse_or("CASETRACK_PORT", defaults.server.port),
            },
            cors: CorsConfig {
                allowed_origin: env_or("CASETRACK_CORS_ORIGIN", defaults.cors.allowed_origin),
            },
            development: env_parse_or("CASETRACK_DEVELOPMENT", false),
            auth: AuthConfig::from_env(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.server.host.is_empty() {
            return Err("server.host must not be empty".into());
        }
        if self.addr_checked().is_none() {
            return Err(format!(
                "server address '{}:{}' is not a valid socket address",
                self.server.host, self.server.port
            ));
        }
        if self.cors.allowed_origin.is_empty() {
            return Err("cors.allowed_origin must not be empty".into());
        }
        self.auth.validate()
    }

    /// Socket address to bind.
    ///
    /// Falls back to the loopback default when the configured host is
    /// unparseable; `validate` rejects that configuration first.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr_checked()
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], self.server.port)))
    }

    fn addr_checked(&self) -> Option<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .ok()
    }
}

fn env_or(key: &str, default: String) -> String {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default,
    }
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        AppConfig {
            auth: AuthConfig {
                hs256_secret: Some("test-secret".to_string()),
                ..AuthConfig::default()
            },
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5179);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(!config.development);
        assert_eq!(config.cors.allowed_origin, "http://localhost:3000");
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_missing_key_material_rejected() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut config = valid_config();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_host_rejected() {
        let mut config = valid_config();
        config.server.host = "not a host".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_addr() {
        let config = valid_config();
        assert_eq!(config.addr(), SocketAddr::from(([127, 0, 0, 1], 5179)));
    }
}
