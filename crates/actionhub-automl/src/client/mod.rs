//! AutoML REST client.
//!
//! - [`AutoMlClient`]: reqwest-based implementation of [`AutoMlProvider`]
//! - [`AutoMlConfig`]: endpoints, timeouts and OAuth settings
//! - [`AutoMlCredentials`]: service account or pre-issued bearer token
//!
//! [`AutoMlProvider`]: crate::AutoMlProvider

mod automl_client;
mod automl_config;
mod credentials;

pub use automl_client::AutoMlClient;
pub use automl_config::{
    AutoMlBuilder, AutoMlConfig, DEFAULT_BASE_URL, DEFAULT_SCOPE, DEFAULT_TOKEN_URL,
};
pub use credentials::{AutoMlCredentials, ServiceAccountCredentials, normalize_private_key};
