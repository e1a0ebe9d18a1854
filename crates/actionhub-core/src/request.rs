//! Inbound action request types.

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Kind of content the host sends to an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(AsRefStr, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActionType {
    /// A whole dashboard export.
    Dashboard,
    /// A single query export.
    #[default]
    Query,
}

/// Exported data delivered with an execution request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Attachment {
    /// Raw file contents.
    pub data: Bytes,
    /// File name declared by the host, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Attachment {
    /// Creates an attachment from raw bytes.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            file_name: None,
        }
    }

    /// Sets the declared file name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

/// A form render or execution request from the host runtime.
///
/// `params` carries the per-destination action settings, `form_params` the
/// values the end user filled into the rendered form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionRequest {
    #[serde(default, rename = "type")]
    pub action_type: ActionType,
    #[serde(default)]
    pub params: HashMap<String, String>,
    #[serde(default)]
    pub form_params: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

impl ActionRequest {
    /// Creates an empty request of the given type.
    pub fn new(action_type: ActionType) -> Self {
        Self {
            action_type,
            ..Self::default()
        }
    }

    /// Sets one action setting.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Sets one form value.
    pub fn with_form_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form_params.insert(name.into(), value.into());
        self
    }

    /// Attaches exported data.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Returns a non-empty action setting.
    pub fn param(&self, name: &str) -> Option<&str> {
        non_empty(self.params.get(name))
    }

    /// Returns a non-empty form value.
    pub fn form_param(&self, name: &str) -> Option<&str> {
        non_empty(self.form_params.get(name))
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|value| !value.is_empty())
}
