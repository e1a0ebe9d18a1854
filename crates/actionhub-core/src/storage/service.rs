//! Storage service wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use super::{BUCKET_FIELD, StagedObject, StorageProvider, TRACING_TARGET};
use crate::{ActionRequest, Error, FormField, FormValues, Result};

/// Storage service wrapper with observability.
///
/// This wrapper adds structured logging to any storage collaborator.
/// The inner provider is wrapped in `Arc` for cheap cloning.
#[derive(Clone)]
pub struct StorageService {
    inner: Arc<dyn StorageProvider>,
}

impl fmt::Debug for StorageService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageService").finish_non_exhaustive()
    }
}

impl StorageService {
    /// Create a new storage service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: StorageProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Uploads the request attachment through the collaborator.
    pub async fn stage_file(&self, request: &ActionRequest) -> Result<StagedObject> {
        let started_at = Instant::now();
        let size = request.attachment.as_ref().map_or(0, |a| a.data.len());
        let overwrite = FormValues::from(request).overwrite;

        tracing::debug!(
            target: TRACING_TARGET,
            size,
            overwrite = %overwrite,
            "Staging file"
        );

        let result = self.inner.stage_file(request).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(object) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    uri = %object,
                    elapsed_ms = elapsed.as_millis(),
                    "File staged"
                );
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Staging failed"
                );
            }
        }

        result
    }

    /// Returns the collaborator's bucket selector field.
    ///
    /// An error string reported on the collaborator's form becomes an
    /// upstream failure carrying that string verbatim.
    pub async fn bucket_field(&self, request: &ActionRequest) -> Result<FormField> {
        let form = self.inner.fetch_form(request).await?;

        if let Some(error) = form.error() {
            tracing::warn!(
                target: TRACING_TARGET,
                error,
                "Storage form reported an error"
            );
            return Err(Error::upstream_failure().with_message(error));
        }

        form.field(BUCKET_FIELD).cloned().ok_or_else(|| {
            Error::upstream_failure()
                .with_message("storage form did not provide a bucket field")
        })
    }
}
