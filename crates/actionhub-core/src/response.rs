//! Action execution response types.

use serde::{Deserialize, Serialize};

use crate::Error;

/// Uniform result of an action execution.
///
/// There are no partial-success states: either the whole pipeline ran or
/// `success` is false and `message` explains the first failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Whether the host should re-run the originating query.
    #[serde(default)]
    pub refresh_query: bool,
}

impl ActionResponse {
    /// Creates a successful response with no message.
    pub fn success() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    /// Creates a failed response with the given message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Maps an error into a failed response.
    pub fn from_error(error: &Error) -> Self {
        Self::failure(error.user_message())
    }
}

impl From<Error> for ActionResponse {
    fn from(error: Error) -> Self {
        Self::from_error(&error)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_success_has_no_message() {
        let response = ActionResponse::success();
        assert!(response.success);
        assert!(response.message.is_none());

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({ "success": true, "refreshQuery": false })
        );
    }

    #[test]
    fn test_from_error_uses_message() {
        let error = Error::upstream_failure().with_message("error importing ds");
        let response = ActionResponse::from(error);

        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("error importing ds"));
    }

    #[test]
    fn test_from_error_without_message_stringifies() {
        let response = ActionResponse::from_error(&Error::cancelled());
        assert_eq!(response.message.as_deref(), Some("[cancelled]"));
    }
}
