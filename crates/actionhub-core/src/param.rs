//! Declared per-destination settings of an action.

use serde::{Deserialize, Serialize};

/// One setting an administrator fills in when configuring a destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionParam {
    /// Key the value is stored under in [`ActionRequest::params`].
    ///
    /// [`ActionRequest::params`]: crate::ActionRequest::params
    pub name: String,
    pub label: String,
    pub required: bool,
    /// Whether the host must mask the value.
    pub sensitive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ActionParam {
    /// Creates a required, non-sensitive parameter.
    pub fn required(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            required: true,
            sensitive: false,
            description: None,
        }
    }

    /// Marks the parameter as sensitive.
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Sets the help text.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
