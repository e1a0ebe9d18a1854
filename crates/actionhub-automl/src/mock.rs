//! Mock AutoML provider and client factory for testing.
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! actionhub-automl = { version = "...", features = ["test-utils"] }
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use actionhub_core::{Error, Result};

use crate::client::AutoMlCredentials;
use crate::model::{Dataset, ImportDataRequest, Operation};
use crate::{AutoMlProvider, ClientFactory};

/// Configuration for the mock AutoML provider.
#[derive(Debug, Clone, Default)]
pub struct MockAutoMlConfig {
    /// Datasets returned by every listing.
    pub datasets: Vec<Dataset>,
    /// Failure message returned when listing datasets.
    pub list_error: Option<String>,
    /// Failure message returned when starting an import.
    pub import_error: Option<String>,
    /// Operation returned by `import_data`; a pending operation by default.
    pub import_operation: Option<Operation>,
    /// States returned by successive `get_operation` calls.
    ///
    /// The last state repeats once the queue is drained; an empty queue
    /// reports the operation as succeeded.
    pub operation_states: Vec<Operation>,
}

#[derive(Debug, Default)]
struct MockState {
    listed: Vec<String>,
    created: Vec<(String, Dataset)>,
    imports: Vec<(String, ImportDataRequest)>,
    pending_states: VecDeque<Operation>,
    last_state: Option<Operation>,
    operation_polls: usize,
}

/// Scriptable AutoML provider that records every request.
#[derive(Clone, Debug, Default)]
pub struct MockAutoMlProvider {
    config: Arc<MockAutoMlConfig>,
    state: Arc<Mutex<MockState>>,
}

impl MockAutoMlProvider {
    /// Creates a new mock provider with the given configuration.
    pub fn new(config: MockAutoMlConfig) -> Self {
        let state = MockState {
            pending_states: config.operation_states.iter().cloned().collect(),
            ..Default::default()
        };

        Self {
            config: Arc::new(config),
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Creates a provider listing datasets with the given resource names.
    ///
    /// Display names are the last path segment of each name.
    pub fn with_datasets<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let datasets = names
            .into_iter()
            .map(|name| {
                let name = name.into();
                let display_name = name.rsplit('/').next().unwrap_or_default().to_owned();
                Dataset {
                    name,
                    ..Dataset::new(display_name)
                }
            })
            .collect();

        Self::new(MockAutoMlConfig {
            datasets,
            ..Default::default()
        })
    }

    /// Returns the parents of every listing so far.
    pub fn listed(&self) -> Vec<String> {
        self.lock().listed.clone()
    }

    /// Returns every dataset creation so far.
    pub fn created(&self) -> Vec<(String, Dataset)> {
        self.lock().created.clone()
    }

    /// Returns every import request so far, with its target dataset.
    pub fn imports(&self) -> Vec<(String, ImportDataRequest)> {
        self.lock().imports.clone()
    }

    /// Returns how many times an operation was fetched.
    pub fn operation_polls(&self) -> usize {
        self.lock().operation_polls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl AutoMlProvider for MockAutoMlProvider {
    async fn list_datasets(&self, parent: &str) -> Result<Vec<Dataset>> {
        self.lock().listed.push(parent.to_owned());

        match &self.config.list_error {
            Some(message) => Err(Error::upstream_failure().with_message(message)),
            None => Ok(self.config.datasets.clone()),
        }
    }

    async fn create_dataset(&self, parent: &str, dataset: &Dataset) -> Result<Operation> {
        self.lock()
            .created
            .push((parent.to_owned(), dataset.clone()));

        Ok(Operation::pending(format!("{parent}/operations/create")).succeeded())
    }

    async fn import_data(&self, dataset: &str, request: &ImportDataRequest) -> Result<Operation> {
        if let Some(message) = &self.config.import_error {
            return Err(Error::upstream_failure().with_message(message));
        }

        self.lock()
            .imports
            .push((dataset.to_owned(), request.clone()));

        Ok(self
            .config
            .import_operation
            .clone()
            .unwrap_or_else(|| Operation::pending(format!("{dataset}/operations/import"))))
    }

    async fn get_operation(&self, name: &str) -> Result<Operation> {
        let mut state = self.lock();
        state.operation_polls += 1;

        let operation = match state.pending_states.pop_front() {
            Some(operation) => {
                state.last_state = Some(operation.clone());
                operation
            }
            None => state
                .last_state
                .clone()
                .unwrap_or_else(|| Operation::pending(name).succeeded()),
        };

        Ok(operation)
    }
}

/// Client factory handing out a shared [`MockAutoMlProvider`].
#[derive(Clone, Debug, Default)]
pub struct MockClientFactory {
    provider: MockAutoMlProvider,
    connect_error: Option<String>,
    connections: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockClientFactory {
    /// Creates a factory returning the given provider.
    pub fn new(provider: MockAutoMlProvider) -> Self {
        Self {
            provider,
            ..Default::default()
        }
    }

    /// Creates a factory whose connections fail with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            connect_error: Some(message.into()),
            ..Default::default()
        }
    }

    /// Returns the provider handed out by this factory.
    pub fn provider(&self) -> &MockAutoMlProvider {
        &self.provider
    }

    /// Returns the `(credential kind, project)` of every connection so far.
    pub fn connections(&self) -> Vec<(String, String)> {
        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ClientFactory for MockClientFactory {
    fn connect(
        &self,
        credentials: AutoMlCredentials,
        project_id: &str,
    ) -> Result<Arc<dyn AutoMlProvider>> {
        if let Some(message) = &self.connect_error {
            return Err(Error::authentication().with_message(message));
        }

        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((credentials.kind().to_owned(), project_id.to_owned()));

        Ok(Arc::new(self.provider.clone()))
    }
}
