//! Dataset import action.
//!
//! Renders a form listing the AutoML datasets of the configured location,
//! then stages the export through the storage collaborator and imports it
//! into the selected dataset.

mod fields;

use std::sync::Arc;

use actionhub_core::{
    Action, ActionForm, ActionParam, ActionRequest, ActionResponse, ActionSettings, ActionType,
    Error, FormValues, Result, StorageService,
};
use tokio_util::sync::CancellationToken;

use crate::client::AutoMlCredentials;
use crate::model::{ImportDataRequest, location_path, resolve_dataset_name};
use crate::operation::{OperationPoller, PollPolicy};
use crate::{AutoMlProvider, ClientFactory, TRACING_TARGET_ACTION};

/// Prefix of every form error reported by this action.
const FORM_ERROR_PREFIX: &str = "error populating form fields";

/// Failure message when execution is missing its location or dataset.
const MANDATORY_FIELDS_MESSAGE: &str = "project_id, region and dataset are mandatory";

/// Imports exported data into a Google AutoML dataset.
pub struct AutoMlDatasetAction {
    storage: StorageService,
    factory: Arc<dyn ClientFactory>,
    poller: OperationPoller,
    shutdown: CancellationToken,
    params: Vec<ActionParam>,
}

impl AutoMlDatasetAction {
    /// Unique action identifier.
    pub const NAME: &str = "google_automl_table";

    /// Creates the action with the given storage collaborator and client factory.
    pub fn new<F>(storage: StorageService, factory: F) -> Self
    where
        F: ClientFactory + 'static,
    {
        Self::from_arc(storage, Arc::new(factory))
    }

    /// Creates the action from a shared client factory.
    pub fn from_arc(storage: StorageService, factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            storage,
            factory,
            poller: OperationPoller::default(),
            shutdown: CancellationToken::new(),
            params: fields::params(),
        }
    }

    /// Sets the policy used to await import operations.
    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poller = OperationPoller::new(policy);
        self
    }

    /// Ties pending imports to a shutdown token.
    ///
    /// Cancelling the token aborts every execution currently awaiting an
    /// import operation.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    fn connect(&self, settings: &ActionSettings) -> Result<Arc<dyn AutoMlProvider>> {
        let (project_id, _) = settings.location()?;
        let (client_email, private_key) = settings.credentials()?;

        self.factory.connect(
            AutoMlCredentials::service_account(client_email, private_key),
            project_id,
        )
    }

    async fn build_form(&self, request: &ActionRequest) -> Result<ActionForm> {
        let settings = ActionSettings::from(request);
        let (project_id, region) = settings.location()?;
        let provider = self.connect(&settings)?;

        let datasets = provider
            .list_datasets(&location_path(project_id, region))
            .await?;
        if datasets.is_empty() {
            return Err(Error::no_datasets_found().with_message("no datasets found in this account"));
        }

        let mut form = ActionForm::new(vec![
            fields::dataset_field(&datasets),
            fields::filename_field(),
            fields::overwrite_field(),
        ]);

        let bucket = self.storage.bucket_field(request).await?;
        form.fields.push(bucket);

        tracing::debug!(
            target: TRACING_TARGET_ACTION,
            project_id = %project_id,
            region = %region,
            datasets = datasets.len(),
            "Rendered dataset import form"
        );

        Ok(form)
    }

    /// Runs the import, aborting the operation wait when `cancel` fires.
    ///
    /// Missing location or dataset fails before any network call with a
    /// message naming the mandatory fields.
    pub async fn execute_with_cancel(
        &self,
        request: &ActionRequest,
        cancel: &CancellationToken,
    ) -> Result<ActionResponse> {
        let settings = ActionSettings::from(request);
        let values = FormValues::from(request);

        let (project_id, region) = settings
            .location()
            .map_err(|error| error.with_message(MANDATORY_FIELDS_MESSAGE))?;
        let dataset_id = values.dataset_id.as_deref().ok_or_else(|| {
            Error::missing_form_input().with_message(MANDATORY_FIELDS_MESSAGE)
        })?;
        settings.credentials()?;

        let staged = self.storage.stage_file(request).await?;

        let provider = self.connect(&settings)?;
        let dataset = resolve_dataset_name(project_id, region, dataset_id);
        let import = ImportDataRequest::from_gcs([staged.uri()]);

        tracing::info!(
            target: TRACING_TARGET_ACTION,
            dataset = %dataset,
            source = %staged,
            "Importing staged file"
        );

        let operation = provider.import_data(&dataset, &import).await?;
        let operation = self
            .poller
            .wait(provider.as_ref(), operation, cancel)
            .await?;

        tracing::info!(
            target: TRACING_TARGET_ACTION,
            dataset = %dataset,
            operation = %operation.name,
            "Import completed"
        );

        Ok(ActionResponse::success())
    }
}

impl std::fmt::Debug for AutoMlDatasetAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoMlDatasetAction")
            .field("storage", &self.storage)
            .field("poller", &self.poller)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl Action for AutoMlDatasetAction {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn label(&self) -> &str {
        "Google Cloud AutoML Table"
    }

    fn description(&self) -> &str {
        "Import your data into a Google AutoML Table"
    }

    fn icon_name(&self) -> Option<&str> {
        Some("google/automl/google_automl.png")
    }

    fn supported_action_types(&self) -> &[ActionType] {
        &[ActionType::Dashboard, ActionType::Query]
    }

    fn params(&self) -> &[ActionParam] {
        &self.params
    }

    fn uses_streaming(&self) -> bool {
        true
    }

    async fn form(&self, request: &ActionRequest) -> Result<ActionForm> {
        match self.build_form(request).await {
            Ok(form) => Ok(form),
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_ACTION,
                    error = %error,
                    "Failed to populate form"
                );
                Ok(ActionForm::failed(format!(
                    "{FORM_ERROR_PREFIX}: {}",
                    error.describe()
                )))
            }
        }
    }

    async fn execute(&self, request: &ActionRequest) -> Result<ActionResponse> {
        let cancel = self.shutdown.child_token();

        match self.execute_with_cancel(request, &cancel).await {
            Ok(response) => Ok(response),
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_ACTION,
                    error = %error,
                    "Dataset import failed"
                );
                Ok(ActionResponse::from_error(&error))
            }
        }
    }
}
