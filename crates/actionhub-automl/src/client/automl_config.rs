//! AutoML client configuration
//!
//! This module provides configuration structures and builders for the AutoML client.

use std::time::Duration;

use derive_builder::Builder;
use url::Url;

use crate::error::{Error, Result};

/// Production AutoML v1 endpoint.
pub const DEFAULT_BASE_URL: &str = "https://automl.googleapis.com/v1/";

/// Google OAuth 2.0 token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Scope requested for AutoML access.
pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Configuration for the AutoML client
///
/// Contains the endpoints, timeouts and OAuth settings used by
/// [`AutoMlClient`](super::AutoMlClient).
#[derive(Debug, Clone, Builder)]
#[builder(
    name = "AutoMlBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate_config")
)]
pub struct AutoMlConfig {
    /// Base URL of the AutoML REST API, always ending with a slash
    #[builder(setter(custom), default = "AutoMlConfig::default_base_url()")]
    pub base_url: Url,
    /// OAuth token endpoint used for the JWT-bearer grant
    #[builder(setter(custom), default = "AutoMlConfig::default_token_url()")]
    pub token_url: Url,
    /// OAuth scope requested for the access token
    #[builder(default = "DEFAULT_SCOPE.to_owned()")]
    pub scope: String,
    /// Lifetime requested for each signed assertion
    #[builder(default = "Duration::from_secs(3600)")]
    pub token_lifetime: Duration,
    /// Request timeout duration
    #[builder(default = "Duration::from_secs(60)")]
    pub timeout: Duration,
    /// Connection timeout duration
    #[builder(default = "Duration::from_secs(10)")]
    pub connect_timeout: Duration,
    /// User agent string for requests
    #[builder(default = "AutoMlConfig::default_user_agent()")]
    pub user_agent: String,
}

impl Default for AutoMlConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            token_url: Self::default_token_url(),
            scope: DEFAULT_SCOPE.to_owned(),
            token_lifetime: Duration::from_secs(3600),
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            user_agent: Self::default_user_agent(),
        }
    }
}

impl AutoMlConfig {
    /// Create a new configuration builder
    pub fn builder() -> AutoMlBuilder {
        AutoMlBuilder::default()
    }

    fn default_base_url() -> Url {
        DEFAULT_BASE_URL.parse().expect("Valid default URL")
    }

    fn default_token_url() -> Url {
        DEFAULT_TOKEN_URL.parse().expect("Valid default URL")
    }

    fn default_user_agent() -> String {
        format!("actionhub-automl/{}", env!("CARGO_PKG_VERSION"))
    }
}

impl AutoMlBuilder {
    /// Set the base URL for the AutoML API
    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        let mut base_url: Url = url
            .parse()
            .map_err(|e| Error::invalid_config(format!("Invalid base URL '{}': {}", url, e)))?;

        // Relative joins drop the last segment unless the base ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        self.base_url = Some(base_url);
        Ok(self)
    }

    /// Set the OAuth token endpoint
    pub fn with_token_url(mut self, url: &str) -> Result<Self> {
        self.token_url =
            Some(url.parse().map_err(|e| {
                Error::invalid_config(format!("Invalid token URL '{}': {}", url, e))
            })?);
        Ok(self)
    }

    fn validate_config(&self) -> std::result::Result<(), String> {
        if let Some(timeout) = &self.timeout {
            if timeout.is_zero() {
                return Err("Timeout must be greater than 0".to_string());
            }
        }

        if let Some(connect_timeout) = &self.connect_timeout {
            if connect_timeout.is_zero() {
                return Err("Connect timeout must be greater than 0".to_string());
            }
        }

        if let Some(token_lifetime) = &self.token_lifetime {
            if token_lifetime.as_secs() < 60 || token_lifetime.as_secs() > 3600 {
                return Err("Token lifetime must be between 60 and 3600 seconds".to_string());
            }
        }

        Ok(())
    }
}
