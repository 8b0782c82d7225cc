//! Bearer-authenticated calls to the Casetrack API.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use casetrack_core::{AuditEvent, CaseItem, CreateCaseRequest, MeResponse};

use crate::config::ClientConfig;
use crate::error::AuthFlowError;

/// Typed HTTP client for the protected API surface.
///
/// Every call attaches the caller-supplied access token as a bearer
/// credential; tokens are re-requested per call by the orchestrator
/// rather than cached here.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client against the given API base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Creates a client from the environment configuration.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_base_url.clone())
    }

    fn url(&self, path: &str) -> String {
        let separator = if path.starts_with('/') { "" } else { "/" };
        format!("{}{}{}", self.base_url, separator, path)
    }

    /// GET `/me`.
    pub async fn fetch_me(&self, access_token: &str) -> Result<MeResponse, AuthFlowError> {
        self.get_json("/me", access_token).await
    }

    /// GET `/cases`.
    pub async fn fetch_cases(&self, access_token: &str) -> Result<Vec<CaseItem>, AuthFlowError> {
        self.get_json("/cases", access_token).await
    }

    /// GET `/cases/{id}`.
    pub async fn fetch_case(
        &self,
        id: &str,
        access_token: &str,
    ) -> Result<CaseItem, AuthFlowError> {
        self.get_json(&format!("/cases/{id}"), access_token).await
    }

    /// POST `/cases`.
    pub async fn create_case(
        &self,
        request: &CreateCaseRequest,
        access_token: &str,
    ) -> Result<CaseItem, AuthFlowError> {
        let response = self
            .http
            .post(self.url("/cases"))
            .bearer_auth(access_token)
            .json(request)
            .send()
            .await?;

        Ok(checked(response).await?.json().await?)
    }

    /// DELETE `/cases/{id}`.
    pub async fn delete_case(&self, id: &str, access_token: &str) -> Result<(), AuthFlowError> {
        let response = self
            .http
            .delete(self.url(&format!("/cases/{id}")))
            .bearer_auth(access_token)
            .send()
            .await?;

        checked(response).await?;
        Ok(())
    }

    /// GET `/audit`.
    pub async fn fetch_audit(
        &self,
        access_token: &str,
    ) -> Result<Vec<AuditEvent>, AuthFlowError> {
        self.get_json("/audit", access_token).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        access_token: &str,
    ) -> Result<T, AuthFlowError> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(access_token)
            .send()
            .await?;

        Ok(checked(response).await?.json().await?)
    }
}

/// Surfaces non-success responses as [`AuthFlowError::Api`] with the
/// body text preserved for display.
async fn checked(response: Response) -> Result<Response, AuthFlowError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::FORBIDDEN || status == StatusCode::UNAUTHORIZED {
        tracing::debug!(status = %status, "API rejected credentials");
    }
    Err(AuthFlowError::Api {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new("http://localhost:5179/");
        assert_eq!(client.url("/me"), "http://localhost:5179/me");
        assert_eq!(client.url("cases"), "http://localhost:5179/cases");
    }

    #[test]
    fn test_from_config_uses_base_url() {
        let config = ClientConfig {
            api_base_url: "http://api.test:9000/".to_string(),
            ..ClientConfig::default()
        };
        let client = ApiClient::from_config(&config);
        assert_eq!(client.url("/health"), "http://api.test:9000/health");
    }
}
