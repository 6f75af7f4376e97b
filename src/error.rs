//! Error types for the image generation client.

use thiserror::Error;

/// Errors that can occur while talking to the generation API.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Base error for the generation client.
    #[error("[GeminiImageGen Error]: {message}")]
    Base {
        /// Error message
        message: String,
    },

    /// The service refused to generate content for the prompt.
    #[error("content blocked by the service: {reason}")]
    Blocked {
        /// The block reason reported by the service, e.g. `SAFETY`
        reason: String,
    },

    /// Error occurred during an API request.
    #[error("API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// No usable API key could be resolved.
    #[error(transparent)]
    CredentialError(#[from] crate::auth::CredentialError),

    /// Error occurred when accessing environment variables.
    #[error("Environment variable not found: {0}")]
    EnvError(#[from] std::env::VarError),

    /// Error occurred when parsing JSON.
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl GenerationError {
    /// Creates a new Base error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self::Base {
            message: message.into(),
        }
    }
}
