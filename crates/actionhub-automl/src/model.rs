//! AutoML v1 REST resources and resource paths.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Returns the `projects/{project}/locations/{region}` parent of datasets.
pub fn location_path(project_id: &str, region: &str) -> String {
    format!("projects/{project_id}/locations/{region}")
}

/// Returns the full resource name of a dataset.
pub fn dataset_path(project_id: &str, region: &str, dataset_id: &str) -> String {
    format!("{}/datasets/{dataset_id}", location_path(project_id, region))
}

/// Resolves a form value into a dataset resource name.
///
/// Dataset selectors submit full resource names; bare identifiers are
/// expanded under the configured project and region.
pub fn resolve_dataset_name(project_id: &str, region: &str, dataset: &str) -> String {
    if dataset.starts_with("projects/") {
        dataset.to_owned()
    } else {
        dataset_path(project_id, region, dataset)
    }
}

/// An AutoML dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Resource name; assigned by the server on creation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<jiff::Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    /// Problem-specific metadata such as `translationDatasetMetadata`.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Dataset {
    /// Creates a dataset description for [`create_dataset`].
    ///
    /// [`create_dataset`]: crate::AutoMlProvider::create_dataset
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    /// Attaches problem-specific metadata under the given key.
    pub fn with_metadata(mut self, key: impl Into<String>, metadata: Value) -> Self {
        self.metadata.insert(key.into(), metadata);
        self
    }
}

/// One page of `datasets.list`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListDatasetsResponse {
    #[serde(default)]
    pub datasets: Vec<Dataset>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Body of `datasets.importData`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDataRequest {
    pub input_config: InputConfig,
}

impl ImportDataRequest {
    /// Creates a request importing the given Cloud Storage objects.
    pub fn from_gcs<I, S>(input_uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input_config: InputConfig {
                gcs_source: GcsSource {
                    input_uris: input_uris.into_iter().map(Into::into).collect(),
                },
                params: Map::new(),
            },
        }
    }
}

/// Location of the data to import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputConfig {
    pub gcs_source: GcsSource,
    /// Problem-specific import parameters.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcsSource {
    /// `gs://bucket/object` URIs.
    pub input_uris: Vec<String>,
}

/// A long-running operation returned by mutating calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    /// Terminal failure, set only when `done`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

impl Operation {
    /// Creates a running operation.
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Marks the operation as finished successfully.
    pub fn succeeded(mut self) -> Self {
        self.done = true;
        self.error = None;
        self
    }

    /// Marks the operation as finished with an error.
    pub fn failed(mut self, code: i32, message: impl Into<String>) -> Self {
        self.done = true;
        self.error = Some(Status {
            code,
            message: message.into(),
            details: Vec::new(),
        });
        self
    }
}

/// RPC status carried by a failed operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<Value>,
}

/// Error envelope of a non-2xx Google API response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
    /// Canonical status name such as `PERMISSION_DENIED`.
    #[serde(default)]
    pub status: Option<String>,
}
