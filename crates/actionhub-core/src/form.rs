//! Declarative form fields rendered by the host before execution.

use serde::{Deserialize, Serialize};

use crate::Error;

/// Kind of input widget the host renders for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Drop-down selection over [`FieldOption`]s.
    Select,
}

/// One selectable option of a [`FormField`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Value submitted when the option is chosen.
    pub name: String,
    /// Label shown to the end user.
    pub label: String,
}

impl FieldOption {
    /// Creates a new option.
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

/// Declarative description of one user-fillable input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    /// Form value key the host submits this field under.
    pub name: String,
    /// Label shown to the end user.
    pub label: String,
    /// Whether the host must collect a value.
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl FormField {
    /// Creates an optional field with only a name and a label.
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            required: false,
            description: None,
            options: None,
            field_type: None,
            default: None,
        }
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the help text.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the selectable options.
    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = Some(options);
        self
    }

    /// Sets the widget type.
    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    /// Sets the pre-selected value.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Result of a form render: either a populated field list or an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionForm {
    /// Ordered fields to render.
    #[serde(default)]
    pub fields: Vec<FormField>,
    /// Render failure reported to the end user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionForm {
    /// Creates a successful form from its fields.
    pub fn new(fields: Vec<FormField>) -> Self {
        Self {
            fields,
            error: None,
        }
    }

    /// Creates a failed form carrying only an error message.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            fields: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// Maps an error into a failed form.
    pub fn from_error(error: &Error) -> Self {
        Self::failed(error.user_message())
    }

    /// Returns the reported error, treating an empty string as no error.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref().filter(|error| !error.is_empty())
    }

    /// Finds a field by name.
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.name == name)
    }
}
