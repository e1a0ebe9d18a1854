//! Authentication credentials for the AutoML client.

use std::fmt;

/// Service account identity used to sign OAuth assertions.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceAccountCredentials {
    /// Service account email, used as the assertion issuer.
    pub client_email: String,
    /// PEM encoded RSA private key.
    pub private_key: String,
}

impl ServiceAccountCredentials {
    /// Creates credentials, normalizing escaped newlines in the private key.
    ///
    /// Keys pasted into single-line settings arrive with literal `\n`
    /// sequences in place of line breaks.
    pub fn new(client_email: impl Into<String>, private_key: impl AsRef<str>) -> Self {
        Self {
            client_email: client_email.into(),
            private_key: normalize_private_key(private_key.as_ref()),
        }
    }
}

impl fmt::Debug for ServiceAccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountCredentials")
            .field("client_email", &self.client_email)
            .finish_non_exhaustive()
    }
}

/// Replaces literal backslash-n sequences with real newlines.
pub fn normalize_private_key(private_key: &str) -> String {
    private_key.replace("\\n", "\n")
}

/// Authentication credentials for the AutoML service.
#[derive(Debug, Clone)]
pub enum AutoMlCredentials {
    /// OAuth token obtained through the service account JWT-bearer grant.
    ServiceAccount(ServiceAccountCredentials),
    /// Pre-issued bearer token (emulators, workload identity sidecars).
    BearerToken(String),
}

impl AutoMlCredentials {
    /// Create service account credentials
    pub fn service_account(client_email: impl Into<String>, private_key: impl AsRef<str>) -> Self {
        Self::ServiceAccount(ServiceAccountCredentials::new(client_email, private_key))
    }

    /// Create bearer token credentials
    pub fn bearer_token(token: impl Into<String>) -> Self {
        Self::BearerToken(token.into())
    }

    /// Credential kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ServiceAccount(_) => "service_account",
            Self::BearerToken(_) => "bearer_token",
        }
    }
}

impl From<ServiceAccountCredentials> for AutoMlCredentials {
    fn from(credentials: ServiceAccountCredentials) -> Self {
        Self::ServiceAccount(credentials)
    }
}
