//! Typed views over the flat string maps supplied by the host.
//!
//! The host hands settings and form values over as `name -> value` maps.
//! These types read them once at the action boundary so the rest of the
//! pipeline works with named members instead of probing keys.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{ActionRequest, Error, Result};

/// Per-destination settings of a Google Cloud action.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSettings {
    pub client_email: Option<String>,
    pub private_key: Option<String>,
    pub project_id: Option<String>,
    pub region: Option<String>,
}

impl std::fmt::Debug for ActionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionSettings")
            .field("client_email", &self.client_email)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("project_id", &self.project_id)
            .field("region", &self.region)
            .finish()
    }
}

impl ActionSettings {
    /// Setting name of the service account email.
    pub const CLIENT_EMAIL: &str = "client_email";
    /// Setting name of the service account private key.
    pub const PRIVATE_KEY: &str = "private_key";
    /// Setting name of the Google Cloud project.
    pub const PROJECT_ID: &str = "project_id";
    /// Setting name of the AutoML region.
    pub const REGION: &str = "region";

    /// Reads settings from a host parameter map. Empty values count as absent.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            client_email: value(params, Self::CLIENT_EMAIL),
            private_key: value(params, Self::PRIVATE_KEY),
            project_id: value(params, Self::PROJECT_ID),
            region: value(params, Self::REGION),
        }
    }

    /// Returns the project and region, failing when either is absent.
    pub fn location(&self) -> Result<(&str, &str)> {
        match (self.project_id.as_deref(), self.region.as_deref()) {
            (Some(project_id), Some(region)) => Ok((project_id, region)),
            _ => Err(Error::missing_configuration()
                .with_message("project id and region are required")),
        }
    }

    /// Returns the service account email and private key.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        match (self.client_email.as_deref(), self.private_key.as_deref()) {
            (Some(client_email), Some(private_key)) => Ok((client_email, private_key)),
            _ => Err(Error::missing_configuration()
                .with_message("client email and private key are required")),
        }
    }
}

impl From<&ActionRequest> for ActionSettings {
    fn from(request: &ActionRequest) -> Self {
        Self::from_params(&request.params)
    }
}

/// Whether the storage collaborator may replace an existing object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Overwrite {
    /// Reuse the chosen file name, replacing existing data.
    #[default]
    Yes,
    /// Make the file name unique before uploading.
    No,
}

/// Values the end user filled into the rendered form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValues {
    pub dataset_id: Option<String>,
    pub filename: Option<String>,
    pub overwrite: Overwrite,
    pub bucket: Option<String>,
}

impl FormValues {
    /// Form value name of the target dataset.
    pub const DATASET_ID: &str = "dataset_id";
    /// Form value name of the destination file.
    pub const FILENAME: &str = "filename";
    /// Form value name of the overwrite toggle.
    pub const OVERWRITE: &str = "overwrite";
    /// Form value name of the destination bucket.
    pub const BUCKET: &str = "bucket";

    /// Reads form values from a host map.
    ///
    /// Unrecognized overwrite values fall back to [`Overwrite::Yes`].
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let overwrite: Overwrite = value(params, Self::OVERWRITE)
            .and_then(|overwrite| overwrite.parse().ok())
            .unwrap_or_default();

        Self {
            dataset_id: value(params, Self::DATASET_ID),
            filename: value(params, Self::FILENAME),
            overwrite,
            bucket: value(params, Self::BUCKET),
        }
    }
}

impl From<&ActionRequest> for FormValues {
    fn from(request: &ActionRequest) -> Self {
        Self::from_params(&request.form_params)
    }
}

fn value(params: &HashMap<String, String>, name: &str) -> Option<String> {
    params
        .get(name)
        .filter(|value| !value.is_empty())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_settings_from_params() {
        let settings = ActionSettings::from_params(&params(&[
            ("client_email", "sa@example.iam.gserviceaccount.com"),
            ("private_key", "key"),
            ("project_id", "foo"),
            ("region", "us-central1"),
        ]));

        assert_eq!(settings.location().unwrap(), ("foo", "us-central1"));
        assert_eq!(
            settings.credentials().unwrap(),
            ("sa@example.iam.gserviceaccount.com", "key")
        );
    }

    #[test]
    fn test_missing_region_is_configuration_error() {
        let settings = ActionSettings::from_params(&params(&[("project_id", "foo"), ("region", "")]));

        let error = settings.location().unwrap_err();
        assert_eq!(error.kind, ErrorKind::MissingConfiguration);
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let settings = ActionSettings::from_params(&params(&[("private_key", "very-secret")]));
        let debug = format!("{settings:?}");

        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_form_values() {
        let values = FormValues::from_params(&params(&[
            ("dataset_id", "ds"),
            ("filename", "export.csv"),
            ("overwrite", "no"),
            ("bucket", "exports"),
        ]));

        assert_eq!(values.dataset_id.as_deref(), Some("ds"));
        assert_eq!(values.overwrite, Overwrite::No);
        assert_eq!(values.bucket.as_deref(), Some("exports"));
    }

    #[test]
    fn test_overwrite_defaults_to_yes() {
        let values = FormValues::from_params(&params(&[("overwrite", "maybe")]));
        assert_eq!(values.overwrite, Overwrite::Yes);

        let values = FormValues::from_params(&HashMap::new());
        assert_eq!(values.overwrite, Overwrite::Yes);
        assert!(values.dataset_id.is_none());
    }
}
