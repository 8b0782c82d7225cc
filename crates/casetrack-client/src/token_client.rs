//! Token acquisition state machine.
//!
//! Silent-first, redirect-as-fallback: interactive navigation only
//! happens when the provider signals it is unavoidable, and never twice
//! concurrently. Firing two interactive redirects corrupts browser
//! navigation state, so every redirect trigger is guarded by the
//! provider's interaction-in-progress flag.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::error::AuthFlowError;
use crate::provider::{Account, IdentityProvider, ProviderError, TokenResult};

/// Single source of truth for "are we signed in, and what is the
/// current bearer token".
pub struct TokenClient {
    provider: Arc<dyn IdentityProvider>,
    scopes: Vec<String>,
    init: OnceCell<Result<(), ProviderError>>,
}

impl TokenClient {
    /// Creates a token client requesting the given scopes.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>, scopes: Vec<String>) -> Self {
        Self {
            provider,
            scopes,
            init: OnceCell::new(),
        }
    }

    /// Runs provider initialization and the redirect-response handling
    /// pass exactly once per process.
    ///
    /// All concurrent and subsequent callers share the one in-flight
    /// outcome, success or failure; the provider is never initialized
    /// twice. An account carried back by a redirect response becomes
    /// the active account.
    pub async fn initialize_once(&self) -> Result<(), AuthFlowError> {
        let outcome = self
            .init
            .get_or_init(|| async {
                self.provider.initialize().await?;
                if let Some(account) = self.provider.handle_redirect_response().await? {
                    tracing::debug!(username = %account.username, "Redirect response established session");
                    self.provider.set_active_account(&account);
                }
                Ok(())
            })
            .await;

        outcome.clone().map_err(AuthFlowError::Provider)
    }

    /// The account to operate on: the explicitly-marked active account
    /// if set, else the first known account, else none.
    #[must_use]
    pub fn active_account(&self) -> Option<Account> {
        self.provider
            .active_account()
            .or_else(|| self.provider.all_accounts().into_iter().next())
    }

    /// Returns `true` while an interactive flow is under way.
    #[must_use]
    pub fn is_interaction_in_progress(&self) -> bool {
        self.provider.is_interaction_in_progress()
    }

    /// Ensures a signed-in session, starting an interactive sign-in
    /// redirect when no session exists.
    ///
    /// # Errors
    ///
    /// Returns [`AuthFlowError::RedirectInProgress`] when a redirect
    /// was started (or one is already pending) - the page is about to
    /// navigate away and the caller must stop.
    pub async fn ensure_signed_in(&self) -> Result<Account, AuthFlowError> {
        self.initialize_once().await?;

        if let Some(account) = self.active_account() {
            self.provider.set_active_account(&account);
            return Ok(account);
        }

        if self.provider.is_interaction_in_progress() {
            tracing::debug!("Sign-in already pending; not starting another redirect");
            return Err(AuthFlowError::RedirectInProgress);
        }

        match self.provider.login_redirect(&self.scopes).await {
            // The provider refusing because a flow raced in counts as
            // the same pending navigation.
            Ok(()) | Err(ProviderError::InteractionInProgress) => {
                Err(AuthFlowError::RedirectInProgress)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Acquires an API access token for the account, silently when
    /// possible.
    ///
    /// On a provider-signaled "interaction required" condition this
    /// starts an interactive acquisition redirect (unless one is
    /// already pending) and fails with
    /// [`AuthFlowError::RedirectInProgress`]. Any other provider
    /// failure propagates unchanged.
    pub async fn acquire_api_token(
        &self,
        account: &Account,
    ) -> Result<TokenResult, AuthFlowError> {
        self.initialize_once().await?;

        match self
            .provider
            .acquire_token_silent(&self.scopes, account)
            .await
        {
            Ok(token) => Ok(token),
            Err(ProviderError::InteractionRequired { reason }) => {
                if self.provider.is_interaction_in_progress() {
                    return Err(AuthFlowError::RedirectInProgress);
                }
                tracing::debug!(%reason, "Silent acquisition needs interaction; redirecting");
                match self.provider.acquire_token_redirect(&self.scopes, account).await {
                    Ok(()) | Err(ProviderError::InteractionInProgress) => {
                        Err(AuthFlowError::RedirectInProgress)
                    }
                    Err(e) => Err(e.into()),
                }
            }
            Err(ProviderError::InteractionInProgress) => Err(AuthFlowError::RedirectInProgress),
            Err(e) => Err(e.into()),
        }
    }

    /// Starts a sign-out redirect. On success the page is about to
    /// navigate away.
    pub async fn sign_out(&self) -> Result<(), AuthFlowError> {
        self.initialize_once().await?;
        self.provider.logout_redirect().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{MockProvider, SilentBehavior};

    fn scopes() -> Vec<String> {
        vec!["api://casetrack/access_as_user".to_string()]
    }

    fn account(id: &str) -> Account {
        Account {
            home_account_id: id.to_string(),
            username: format!("{id}@example.com"),
        }
    }

    #[tokio::test]
    async fn test_initialize_runs_once_across_concurrent_callers() {
        let provider = Arc::new(MockProvider::new());
        let client = TokenClient::new(provider.clone(), scopes());

        let (a, b, c) = tokio::join!(
            client.initialize_once(),
            client.initialize_once(),
            client.initialize_once()
        );
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(provider.init_calls(), 1);
        assert_eq!(provider.redirect_handling_passes(), 1);
    }

    #[tokio::test]
    async fn test_initialization_failure_is_memoized() {
        let provider = Arc::new(MockProvider::new().with_init_failure("startup failed"));
        let client = TokenClient::new(provider.clone(), scopes());

        assert!(client.initialize_once().await.is_err());
        assert!(client.initialize_once().await.is_err());
        assert_eq!(provider.init_calls(), 1);
    }

    #[tokio::test]
    async fn test_redirect_account_becomes_active() {
        let provider =
            Arc::new(MockProvider::new().with_redirect_account(account("from-redirect")));
        let client = TokenClient::new(provider.clone(), scopes());

        let signed_in = client.ensure_signed_in().await.unwrap();
        assert_eq!(signed_in, account("from-redirect"));
        assert_eq!(provider.login_redirects(), 0);
    }

    #[tokio::test]
    async fn test_existing_account_returned_without_redirect() {
        let provider = Arc::new(MockProvider::new().with_account(account("existing")));
        let client = TokenClient::new(provider.clone(), scopes());

        let signed_in = client.ensure_signed_in().await.unwrap();
        assert_eq!(signed_in, account("existing"));
        assert_eq!(provider.login_redirects(), 0);
    }

    #[tokio::test]
    async fn test_first_known_account_used_when_none_active() {
        let provider = Arc::new(
            MockProvider::new()
                .with_known_accounts(vec![account("first"), account("second")]),
        );
        let client = TokenClient::new(provider.clone(), scopes());

        let signed_in = client.ensure_signed_in().await.unwrap();
        assert_eq!(signed_in, account("first"));
        // The pick is promoted to active.
        assert_eq!(provider.active(), Some(account("first")));
    }

    #[tokio::test]
    async fn test_no_session_starts_exactly_one_redirect() {
        let provider = Arc::new(MockProvider::new());
        let client = TokenClient::new(provider.clone(), scopes());

        let err = client.ensure_signed_in().await.unwrap_err();
        assert!(err.is_redirect());
        assert_eq!(provider.login_redirects(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_sign_ins_share_one_redirect() {
        let provider = Arc::new(MockProvider::new());
        let client = TokenClient::new(provider.clone(), scopes());

        let (a, b) = tokio::join!(client.ensure_signed_in(), client.ensure_signed_in());
        assert!(a.unwrap_err().is_redirect());
        assert!(b.unwrap_err().is_redirect());
        assert_eq!(provider.login_redirects(), 1);
    }

    #[tokio::test]
    async fn test_pending_interaction_blocks_new_redirect() {
        let provider = Arc::new(MockProvider::new().with_interaction_in_progress());
        let client = TokenClient::new(provider.clone(), scopes());

        let err = client.ensure_signed_in().await.unwrap_err();
        assert!(err.is_redirect());
        assert_eq!(provider.login_redirects(), 0);
    }

    #[tokio::test]
    async fn test_silent_acquisition_succeeds() {
        let provider = Arc::new(
            MockProvider::new()
                .with_account(account("existing"))
                .with_silent_behavior(SilentBehavior::Token("token-123".to_string())),
        );
        let client = TokenClient::new(provider.clone(), scopes());

        let token = client.acquire_api_token(&account("existing")).await.unwrap();
        assert_eq!(token.access_token, "token-123");
        assert_eq!(provider.token_redirects(), 0);
    }

    #[tokio::test]
    async fn test_interaction_required_falls_back_to_redirect() {
        let provider = Arc::new(
            MockProvider::new()
                .with_account(account("existing"))
                .with_silent_behavior(SilentBehavior::InteractionRequired),
        );
        let client = TokenClient::new(provider.clone(), scopes());

        let err = client
            .acquire_api_token(&account("existing"))
            .await
            .unwrap_err();
        assert!(err.is_redirect());
        assert_eq!(provider.token_redirects(), 1);
    }

    #[tokio::test]
    async fn test_interaction_required_with_pending_flow_starts_nothing() {
        let provider = Arc::new(
            MockProvider::new()
                .with_account(account("existing"))
                .with_silent_behavior(SilentBehavior::InteractionRequired)
                .with_interaction_in_progress(),
        );
        let client = TokenClient::new(provider.clone(), scopes());

        let err = client
            .acquire_api_token(&account("existing"))
            .await
            .unwrap_err();
        assert!(err.is_redirect());
        assert_eq!(provider.token_redirects(), 0);
    }

    #[tokio::test]
    async fn test_provider_in_progress_signal_maps_to_redirect() {
        let provider = Arc::new(
            MockProvider::new()
                .with_account(account("existing"))
                .with_silent_behavior(SilentBehavior::InProgress),
        );
        let client = TokenClient::new(provider.clone(), scopes());

        let err = client
            .acquire_api_token(&account("existing"))
            .await
            .unwrap_err();
        assert!(err.is_redirect());
        assert_eq!(provider.token_redirects(), 0);
    }

    #[tokio::test]
    async fn test_other_silent_failures_propagate_unchanged() {
        let provider = Arc::new(
            MockProvider::new()
                .with_account(account("existing"))
                .with_silent_behavior(SilentBehavior::Fail("keychain unavailable".to_string())),
        );
        let client = TokenClient::new(provider.clone(), scopes());

        let err = client
            .acquire_api_token(&account("existing"))
            .await
            .unwrap_err();
        match err {
            AuthFlowError::Provider(ProviderError::Other { message }) => {
                assert_eq!(message, "keychain unavailable");
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }
}
