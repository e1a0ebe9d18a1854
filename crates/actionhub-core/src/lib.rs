#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for action boundary operations.
pub const TRACING_TARGET_ACTION: &str = "actionhub_core::action";

mod action;
mod error;
mod form;
mod param;
#[doc(hidden)]
pub mod prelude;
mod request;
mod response;
mod settings;

pub mod storage;

pub use action::Action;
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use form::{ActionForm, FieldOption, FieldType, FormField};
pub use param::ActionParam;
pub use request::{ActionRequest, ActionType, Attachment};
pub use response::ActionResponse;
pub use settings::{ActionSettings, FormValues, Overwrite};
pub use storage::{StagedObject, StorageProvider, StorageService};
