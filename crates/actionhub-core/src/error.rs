//! Structured error handling for action operations.

use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur while rendering a form or executing an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// A required action setting is absent.
    MissingConfiguration,
    /// A required end-user form value is absent at execution time.
    MissingFormInput,
    /// The vendor API returned an empty dataset list.
    NoDatasetsFound,
    /// The storage collaborator or the vendor API reported a failure.
    UpstreamFailure,
    /// Credentials were rejected or could not be used.
    Authentication,
    /// Serialization/deserialization error.
    Serialization,
    /// A bounded wait elapsed before the remote job finished.
    Timeout,
    /// The caller cancelled the operation.
    Cancelled,
    /// Unknown error occurred.
    #[default]
    Unknown,
}

/// Structured error type with classification and context tracking.
#[must_use]
#[derive(Debug, Error)]
#[error("[{kind}]{}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Primary error message.
    pub message: Option<String>,
    /// Underlying source error, if any.
    #[source]
    pub source: Option<BoxedError>,
    /// Additional context information.
    pub context: Option<String>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
            context: None,
        }
    }

    /// Creates a new error from a source error.
    pub fn from_source(kind: ErrorKind, source: impl Into<BoxedError>) -> Self {
        Self {
            kind,
            message: None,
            source: Some(source.into()),
            context: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the source of the error.
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds context to the error.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Creates a new missing configuration error.
    pub fn missing_configuration() -> Self {
        Self::new(ErrorKind::MissingConfiguration)
    }

    /// Creates a new missing form input error.
    pub fn missing_form_input() -> Self {
        Self::new(ErrorKind::MissingFormInput)
    }

    /// Creates a new "no datasets found" error.
    pub fn no_datasets_found() -> Self {
        Self::new(ErrorKind::NoDatasetsFound)
    }

    /// Creates a new upstream failure error.
    pub fn upstream_failure() -> Self {
        Self::new(ErrorKind::UpstreamFailure)
    }

    /// Creates a new authentication error.
    pub fn authentication() -> Self {
        Self::new(ErrorKind::Authentication)
    }

    /// Creates a new serialization error.
    pub fn serialization() -> Self {
        Self::new(ErrorKind::Serialization)
    }

    /// Creates a new timeout error.
    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout)
    }

    /// Creates a new cancellation error.
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled)
    }

    /// Creates a new unknown error.
    pub fn unknown() -> Self {
        Self::new(ErrorKind::Unknown)
    }

    /// Returns the human-readable message shown to the end user.
    ///
    /// Falls back to the stringified error when no message was attached.
    pub fn user_message(&self) -> String {
        match &self.message {
            Some(message) => message.clone(),
            None => match &self.context {
                Some(context) => format!("{self} ({context})"),
                None => self.to_string(),
            },
        }
    }

    /// Describes this error as the cause of a failed form render.
    ///
    /// Upstream failures are passed through verbatim, errors raised by the
    /// action itself carry an `Error: ` prefix.
    pub fn describe(&self) -> String {
        match self.kind {
            ErrorKind::UpstreamFailure => self.user_message(),
            _ => format!("Error: {}", self.user_message()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::from_source(ErrorKind::Serialization, error).with_message("Invalid JSON payload")
    }
}
