use thiserror::Error;

/// Core error types for Casetrack operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{resource} '{id}' was not found")]
    NotFound { resource: String, id: String },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Time parsing error: {0}")]
    TimeError(#[from] time::error::Parse),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CoreError {
    /// Create a new NotFound error
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create a new Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a new Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this error maps to a 4xx response.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Validation { .. })
    }

    /// HTTP status code this error maps to.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation { .. } => 400,
            Self::JsonError(_)
            | Self::TimeError(_)
            | Self::Configuration(_)
            | Self::Internal { .. } => 500,
        }
    }
}
