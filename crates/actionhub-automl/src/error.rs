//! Internal error types for actionhub-automl.

use thiserror::Error;

/// Result type alias for actionhub-automl transport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Internal error type for actionhub-automl transport operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Signing the service account assertion failed.
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    /// A request URL could not be built.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
    /// The OAuth token endpoint rejected the service account assertion.
    #[error("Token exchange failed: {0}")]
    Token(String),
    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    /// Configuration errors.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an API error.
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

impl From<Error> for actionhub_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                let message = if e.is_timeout() {
                    "Request timed out".to_owned()
                } else if e.is_connect() {
                    "Connection failed".to_owned()
                } else {
                    e.to_string()
                };
                actionhub_core::Error::upstream_failure()
                    .with_message(message)
                    .with_source(e)
            }
            Error::Serde(e) => actionhub_core::Error::serialization()
                .with_message(e.to_string())
                .with_source(e),
            Error::Jwt(e) => actionhub_core::Error::authentication()
                .with_message(format!("invalid service account credentials: {e}"))
                .with_source(e),
            Error::Url(e) => actionhub_core::Error::missing_configuration()
                .with_message(e.to_string())
                .with_source(e),
            Error::Token(message) => actionhub_core::Error::authentication()
                .with_message(format!("error authenticating with Google: {message}")),
            Error::Api { status, message } if status == 401 || status == 403 => {
                actionhub_core::Error::authentication().with_message(message)
            }
            Error::Api { message, .. } => {
                actionhub_core::Error::upstream_failure().with_message(message)
            }
            Error::Config(message) => {
                actionhub_core::Error::missing_configuration().with_message(message)
            }
        }
    }
}
