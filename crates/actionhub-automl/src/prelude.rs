//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from this crate.

pub use crate::AutoMlDatasetAction;
pub use crate::client::{AutoMlClient, AutoMlConfig, AutoMlCredentials};
pub use crate::model::{Dataset, ImportDataRequest, Operation, location_path};
pub use crate::operation::{OperationPoller, PollPolicy};
pub use crate::provider::{AutoMlClientFactory, AutoMlProvider, ClientFactory};
