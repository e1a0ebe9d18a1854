#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for REST client operations.
pub const TRACING_TARGET_CLIENT: &str = "actionhub_automl::client";

/// Tracing target for long-running operation polling.
pub const TRACING_TARGET_OPERATION: &str = "actionhub_automl::operation";

/// Tracing target for the dataset import action.
pub const TRACING_TARGET_ACTION: &str = "actionhub_automl::action";

mod action;
pub mod client;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;
mod model;
pub mod operation;
#[doc(hidden)]
pub mod prelude;
mod provider;

pub use action::AutoMlDatasetAction;
pub use model::{
    Dataset, GcsSource, ImportDataRequest, InputConfig, Operation, Status, dataset_path,
    location_path, resolve_dataset_name,
};
pub use provider::{AutoMlClientFactory, AutoMlProvider, ClientFactory};
