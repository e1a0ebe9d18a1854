//! Provider traits for the AutoML service and the client factory.

use std::sync::Arc;

use actionhub_core::Result;

use crate::client::{AutoMlClient, AutoMlConfig, AutoMlCredentials};
use crate::model::{Dataset, ImportDataRequest, Operation};
use crate::TRACING_TARGET_CLIENT;

/// Core trait for AutoML v1 operations.
///
/// Resource arguments are full resource names such as
/// `projects/foo/locations/us-central1` or
/// `projects/foo/locations/us-central1/datasets/TBL123`.
#[async_trait::async_trait]
pub trait AutoMlProvider: Send + Sync {
    /// Lists every dataset under a location, following pagination.
    async fn list_datasets(&self, parent: &str) -> Result<Vec<Dataset>>;

    /// Starts creating a dataset under a location.
    async fn create_dataset(&self, parent: &str, dataset: &Dataset) -> Result<Operation>;

    /// Starts importing data into a dataset.
    async fn import_data(&self, dataset: &str, request: &ImportDataRequest) -> Result<Operation>;

    /// Fetches the current state of a long-running operation.
    async fn get_operation(&self, name: &str) -> Result<Operation>;
}

/// Builds AutoML handles bound to a set of credentials.
pub trait ClientFactory: Send + Sync {
    /// Returns a provider authenticated with the given credentials.
    ///
    /// Implementations must not perform network calls here; invalid
    /// credentials surface on first use of the returned provider.
    fn connect(
        &self,
        credentials: AutoMlCredentials,
        project_id: &str,
    ) -> Result<Arc<dyn AutoMlProvider>>;
}

/// Factory producing [`AutoMlClient`]s sharing one configuration.
#[derive(Debug, Clone, Default)]
pub struct AutoMlClientFactory {
    config: AutoMlConfig,
}

impl AutoMlClientFactory {
    /// Creates a factory for the given client configuration.
    pub fn new(config: AutoMlConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration applied to created clients.
    pub fn config(&self) -> &AutoMlConfig {
        &self.config
    }
}

impl ClientFactory for AutoMlClientFactory {
    fn connect(
        &self,
        credentials: AutoMlCredentials,
        project_id: &str,
    ) -> Result<Arc<dyn AutoMlProvider>> {
        tracing::trace!(
            target: TRACING_TARGET_CLIENT,
            project_id = %project_id,
            credentials = credentials.kind(),
            "Connecting AutoML client"
        );

        let client = AutoMlClient::new(self.config.clone(), credentials, project_id)?;
        Ok(Arc::new(client))
    }
}
