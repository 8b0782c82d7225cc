//! Client-side flow errors.

use crate::provider::ProviderError;

/// Errors surfaced by the sign-in and token acquisition flow.
#[derive(Debug, thiserror::Error)]
pub enum AuthFlowError {
    /// An interactive redirect has been started (or was already under
    /// way). Not a user-visible error: the page is navigating away and
    /// the caller must suspend silently.
    #[error("Redirecting to identity provider")]
    RedirectInProgress,

    /// The identity provider SDK reported a failure.
    #[error("Identity provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A protected API call returned a non-success status.
    #[error("API request failed: {status} {body}")]
    Api {
        /// Response status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// The HTTP transport failed before a response was produced.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The access token payload could not be decoded for the
    /// client-side role check.
    #[error("Malformed access token: {message}")]
    MalformedToken {
        /// Description of the decoding failure.
        message: String,
    },
}

impl AuthFlowError {
    /// Creates a new `MalformedToken` error.
    #[must_use]
    pub fn malformed_token(message: impl Into<String>) -> Self {
        Self::MalformedToken {
            message: message.into(),
        }
    }

    /// Returns `true` if this is the redirect control signal rather
    /// than a real failure.
    #[must_use]
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::RedirectInProgress)
    }
}
