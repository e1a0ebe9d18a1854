//! Prelude module for actionhub-core.
//!
//! This module re-exports the types an action implementation needs in
//! almost every file.

pub use crate::storage::{StagedObject, StorageProvider, StorageService};
pub use crate::{
    Action, ActionForm, ActionParam, ActionRequest, ActionResponse, ActionSettings, ActionType,
    Attachment, Error, ErrorKind, FieldOption, FieldType, FormField, FormValues, Result,
};
