//! Mock storage collaborator for testing.
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! actionhub-core = { version = "...", features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use super::{BUCKET_FIELD, StagedObject, StorageProvider};
use crate::{
    ActionForm, ActionRequest, Error, FieldOption, FieldType, FormField, FormValues, Overwrite,
    Result,
};

/// Configuration for the mock storage provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockStorageConfig {
    /// Buckets offered by the form; no bucket field is rendered when empty.
    #[serde(default = "default_buckets")]
    pub buckets: Vec<String>,
    /// Error string reported on the rendered form.
    #[serde(default)]
    pub form_error: Option<String>,
    /// Failure message returned when staging a file.
    #[serde(default)]
    pub stage_error: Option<String>,
}

fn default_buckets() -> Vec<String> {
    vec!["bucket".to_owned()]
}

impl Default for MockStorageConfig {
    fn default() -> Self {
        Self {
            buckets: default_buckets(),
            form_error: None,
            stage_error: None,
        }
    }
}

/// Scriptable storage collaborator that records every staged object.
#[derive(Clone, Debug, Default)]
pub struct MockStorageProvider {
    config: Arc<MockStorageConfig>,
    staged: Arc<Mutex<Vec<StagedObject>>>,
}

impl MockStorageProvider {
    /// Creates a new mock storage provider with the given configuration.
    pub fn new(config: MockStorageConfig) -> Self {
        Self {
            config: Arc::new(config),
            staged: Arc::default(),
        }
    }

    /// Creates a provider whose uploads fail with the given message.
    pub fn failing_stage(message: impl Into<String>) -> Self {
        Self::new(MockStorageConfig {
            stage_error: Some(message.into()),
            ..Default::default()
        })
    }

    /// Returns every object staged so far.
    pub fn staged(&self) -> Vec<StagedObject> {
        self.staged
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the bucket selector field this provider renders.
    pub fn bucket_field(&self) -> Option<FormField> {
        let first = self.config.buckets.first()?;
        let options = self
            .config
            .buckets
            .iter()
            .map(|bucket| FieldOption::new(bucket, bucket))
            .collect();

        Some(
            FormField::new(BUCKET_FIELD, "Bucket")
                .required()
                .with_options(options)
                .with_type(FieldType::Select)
                .with_default(first),
        )
    }
}

#[async_trait::async_trait]
impl StorageProvider for MockStorageProvider {
    async fn stage_file(&self, request: &ActionRequest) -> Result<StagedObject> {
        if let Some(message) = &self.config.stage_error {
            return Err(Error::upstream_failure().with_message(message));
        }

        let values = FormValues::from(request);
        let bucket = values
            .bucket
            .or_else(|| self.config.buckets.first().cloned())
            .ok_or_else(|| Error::missing_form_input().with_message("bucket is mandatory"))?;
        let name = values
            .filename
            .or_else(|| request.attachment.as_ref()?.file_name.clone())
            .ok_or_else(|| Error::missing_form_input().with_message("filename is mandatory"))?;

        let mut staged = self.staged.lock().unwrap_or_else(PoisonError::into_inner);
        let name = match values.overwrite {
            Overwrite::Yes => name,
            Overwrite::No => unique_name(&name, staged.len() + 1),
        };

        let object = StagedObject::new(bucket, name);
        staged.push(object.clone());

        Ok(object)
    }

    async fn fetch_form(&self, _request: &ActionRequest) -> Result<ActionForm> {
        if let Some(error) = &self.config.form_error {
            return Ok(ActionForm::failed(error));
        }

        Ok(ActionForm::new(self.bucket_field().into_iter().collect()))
    }
}

/// Inserts `-{suffix}` before the extension of `name`.
fn unique_name(name: &str, suffix: usize) -> String {
    match name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => format!("{stem}-{suffix}.{extension}"),
        _ => format!("{name}-{suffix}"),
    }
}
