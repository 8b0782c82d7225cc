//! Boot sequencing for the admin client.
//!
//! One cooperative flow per page load: ensure a signed-in session,
//! acquire an API token, check the required role, then hand off to the
//! UI shell. A pending interactive redirect suspends the sequence
//! silently; it is a control signal, not an error.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use casetrack_core::{AccessTokenClaims, RoleSet, extract_roles};

use crate::error::AuthFlowError;
use crate::provider::{Account, TokenResult};
use crate::token_client::TokenClient;

/// Display state of the boot sequence.
///
/// `Ready` is non-terminal (further authenticated calls follow);
/// `NotAuthorized` and `Error` are terminal for the current page
/// lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootState {
    Starting,
    Ready,
    NotAuthorized,
    Error,
}

/// Result of one boot attempt.
#[derive(Debug)]
pub enum BootOutcome {
    /// Signed in with an acceptable role; authenticated calls may
    /// proceed with the token.
    Ready {
        account: Account,
        token: TokenResult,
        roles: RoleSet,
    },

    /// Signed in, but the token lacks the required role.
    NotAuthorized { account: Account, roles: RoleSet },

    /// An interactive redirect is pending; the page is navigating away
    /// and nothing further should run.
    Suspended,

    /// The sequence failed for a real reason.
    Failed { message: String },
}

/// Sequences sign-in, token acquisition, and the role check.
pub struct AuthOrchestrator {
    tokens: TokenClient,
    required_role: String,
    state: BootState,
}

impl AuthOrchestrator {
    /// Creates an orchestrator requiring the `admin` role.
    #[must_use]
    pub fn new(tokens: TokenClient) -> Self {
        Self {
            tokens,
            required_role: "admin".to_string(),
            state: BootState::Starting,
        }
    }

    /// Overrides the role required to reach `Ready`.
    #[must_use]
    pub fn with_required_role(mut self, role: impl Into<String>) -> Self {
        self.required_role = role.into().to_lowercase();
        self
    }

    /// Current display state.
    #[must_use]
    pub fn state(&self) -> &BootState {
        &self.state
    }

    /// Access to the underlying token client, e.g. for sign-out.
    #[must_use]
    pub fn token_client(&self) -> &TokenClient {
        &self.tokens
    }

    /// Runs the boot sequence once.
    pub async fn boot(&mut self) -> BootOutcome {
        self.state = BootState::Starting;

        let account = match self.tokens.ensure_signed_in().await {
            Ok(account) => account,
            Err(e) => return self.interrupt(e),
        };

        let token = match self.tokens.acquire_api_token(&account).await {
            Ok(token) => token,
            Err(e) => return self.interrupt(e),
        };

        // An undecodable token reads as "no roles", matching the
        // provider's behavior of only ever omitting the claim.
        let roles = decode_roles_unverified(&token.access_token).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not decode token payload for role check");
            RoleSet::new()
        });

        if !roles.contains(&self.required_role) {
            tracing::info!(
                username = %account.username,
                required = %self.required_role,
                "Signed in but not authorized"
            );
            self.state = BootState::NotAuthorized;
            return BootOutcome::NotAuthorized { account, roles };
        }

        self.state = BootState::Ready;
        BootOutcome::Ready {
            account,
            token,
            roles,
        }
    }

    fn interrupt(&mut self, error: AuthFlowError) -> BootOutcome {
        if error.is_redirect() {
            tracing::debug!("Boot suspended: interactive redirect pending");
            return BootOutcome::Suspended;
        }
        tracing::warn!(error = %error, "Boot failed");
        self.state = BootState::Error;
        BootOutcome::Failed {
            message: error.to_string(),
        }
    }
}

/// Decodes the role set from a token payload without verifying the
/// signature.
///
/// The server re-validates every request; this pre-flight check only
/// decides which screen to show. Goes through the same shared
/// extraction as the server, so the two sides cannot drift.
pub fn decode_roles_unverified(access_token: &str) -> Result<RoleSet, AuthFlowError> {
    let payload = access_token
        .split('.')
        .nth(1)
        .ok_or_else(|| AuthFlowError::malformed_token("token is not a JWT"))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| AuthFlowError::malformed_token(format!("payload is not base64url: {e}")))?;

    let claims: AccessTokenClaims = serde_json::from_slice(&bytes)
        .map_err(|e| AuthFlowError::malformed_token(format!("payload is not claims JSON: {e}")))?;

    Ok(extract_roles(&claims))
}
