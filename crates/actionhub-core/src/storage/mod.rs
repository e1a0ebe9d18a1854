//! Storage collaborator used to stage exported files.
//!
//! Actions that import data into a remote service first upload the export to
//! a bucket. The upload itself and the bucket selector shown on the form are
//! owned by a separate storage action, which is injected here through
//! [`StorageProvider`]:
//!
//! - [`StorageProvider`]: core trait for storage collaborators
//! - [`StorageService`]: wrapper with observability and form-field extraction
//!
//! # Example
//!
//! ```rust,ignore
//! use actionhub_core::storage::StorageService;
//!
//! let storage = StorageService::new(my_gcs_action);
//! let bucket_field = storage.bucket_field(&request).await?;
//! let staged = storage.stage_file(&request).await?;
//! println!("staged at {}", staged.uri());
//! ```

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
mod mock;
mod service;

use std::fmt;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use mock::{MockStorageConfig, MockStorageProvider};
use serde::{Deserialize, Serialize};
pub use service::StorageService;

use crate::{ActionForm, ActionRequest, Result};

/// Tracing target for storage collaborator operations.
pub const TRACING_TARGET: &str = "actionhub_core::storage";

/// Name of the bucket selector field in the collaborator's form.
pub const BUCKET_FIELD: &str = "bucket";

/// An object written to cloud storage by the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedObject {
    pub bucket: String,
    /// Object name within the bucket.
    pub name: String,
}

impl StagedObject {
    /// Creates a new staged object reference.
    pub fn new(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            name: name.into(),
        }
    }

    /// Returns the `gs://<bucket>/<name>` location of the object.
    pub fn uri(&self) -> String {
        format!("gs://{}/{}", self.bucket, self.name)
    }
}

impl fmt::Display for StagedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}

/// Core trait for storage collaborators.
///
/// Both capabilities receive the whole request: the collaborator reads its
/// own credentials from the settings and the bucket, file name and overwrite
/// choice from the form values.
#[async_trait::async_trait]
pub trait StorageProvider: Send + Sync {
    /// Uploads the request attachment and returns where it was written.
    async fn stage_file(&self, request: &ActionRequest) -> Result<StagedObject>;

    /// Renders the collaborator's own form.
    ///
    /// A non-empty [`ActionForm::error`] is a reported failure.
    async fn fetch_form(&self, request: &ActionRequest) -> Result<ActionForm>;
}
