//! Identity provider SDK abstraction.
//!
//! The provider SDK is a black box: it owns the session cache, the
//! redirect plumbing, and the "interaction in progress" bookkeeping.
//! This trait is the seam the rest of the crate (and tests) program
//! against. The in-progress flag is part of the public contract here,
//! not an internals reach-in.

use async_trait::async_trait;
use time::OffsetDateTime;

/// A signed-in principal as known to the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Stable identifier for the account across sessions.
    pub home_account_id: String,

    /// Display/login name.
    pub username: String,
}

/// Result of a successful token acquisition.
#[derive(Debug, Clone)]
pub struct TokenResult {
    /// The bearer access token.
    pub access_token: String,

    /// Instant at which the token expires.
    pub expires_on: OffsetDateTime,

    /// Scopes actually granted.
    pub scopes: Vec<String>,
}

/// Failures reported by the provider SDK.
///
/// `InteractionRequired` and `InteractionInProgress` are distinguished
/// because the token client reacts to them differently; everything else
/// propagates unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Silent acquisition cannot proceed without user interaction
    /// (expired session, consent required, ...).
    #[error("Interaction required: {reason}")]
    InteractionRequired {
        /// Provider-supplied reason.
        reason: String,
    },

    /// An interactive flow is already under way; the provider refuses
    /// to start another.
    #[error("Interaction already in progress")]
    InteractionInProgress,

    /// Any other provider failure.
    #[error("{message}")]
    Other {
        /// Provider-supplied message.
        message: String,
    },
}

impl ProviderError {
    /// Creates a new `InteractionRequired` error.
    #[must_use]
    pub fn interaction_required(reason: impl Into<String>) -> Self {
        Self::InteractionRequired {
            reason: reason.into(),
        }
    }

    /// Creates a new `Other` error.
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// The identity provider SDK surface consumed by [`crate::TokenClient`].
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Performs the SDK's one-time startup work.
    async fn initialize(&self) -> Result<(), ProviderError>;

    /// Processes a pending redirect response, if the page load is the
    /// return leg of an interactive flow. Returns the account the
    /// redirect established, if any.
    async fn handle_redirect_response(&self) -> Result<Option<Account>, ProviderError>;

    /// The explicitly-marked active account, if one is set.
    fn active_account(&self) -> Option<Account>;

    /// Marks an account as the active one.
    fn set_active_account(&self, account: &Account);

    /// All accounts known to the session cache.
    fn all_accounts(&self) -> Vec<Account>;

    /// Returns `true` while an interactive flow is under way.
    fn is_interaction_in_progress(&self) -> bool;

    /// Starts an interactive sign-in redirect. The page is about to
    /// navigate away; callers must not continue after this resolves.
    async fn login_redirect(&self, scopes: &[String]) -> Result<(), ProviderError>;

    /// Attempts non-interactive token acquisition for the account.
    async fn acquire_token_silent(
        &self,
        scopes: &[String],
        account: &Account,
    ) -> Result<TokenResult, ProviderError>;

    /// Starts an interactive token acquisition redirect.
    async fn acquire_token_redirect(
        &self,
        scopes: &[String],
        account: &Account,
    ) -> Result<(), ProviderError>;

    /// Starts a sign-out redirect, clearing the active account.
    async fn logout_redirect(&self) -> Result<(), ProviderError>;
}
