//! Settings and form fields declared by the dataset import action.

use actionhub_core::{ActionParam, ActionSettings, FieldOption, FieldType, FormField, FormValues};

use crate::model::Dataset;

pub(crate) fn params() -> Vec<ActionParam> {
    vec![
        ActionParam::required(ActionSettings::CLIENT_EMAIL, "Client Email").with_description(
            "Your client email for GCS from https://console.cloud.google.com/apis/credentials",
        ),
        ActionParam::required(ActionSettings::PRIVATE_KEY, "Private Key")
            .sensitive()
            .with_description(
                "Your private key for GCS from https://console.cloud.google.com/apis/credentials",
            ),
        ActionParam::required(ActionSettings::PROJECT_ID, "Project Id").with_description(
            "The Project Id for your GCS project from https://console.cloud.google.com/apis/credentials",
        ),
        ActionParam::required(ActionSettings::REGION, "Region")
            .with_description("the region will be used to manage the datasets (us-central1)"),
    ]
}

/// Dataset selector, defaulting to the first dataset.
///
/// Option names are full resource names; labels are display names.
pub(crate) fn dataset_field(datasets: &[Dataset]) -> FormField {
    let options: Vec<FieldOption> = datasets
        .iter()
        .map(|dataset| FieldOption::new(&dataset.name, &dataset.display_name))
        .collect();

    let mut field = FormField::new(FormValues::DATASET_ID, "Dataset")
        .required()
        .with_options(options)
        .with_type(FieldType::Select);

    if let Some(first) = datasets.first() {
        field = field.with_default(&first.name);
    }

    field
}

pub(crate) fn filename_field() -> FormField {
    FormField::new(FormValues::FILENAME, "File Name")
        .required()
        .with_description("the name of the file that will be created in the Google storage")
}

pub(crate) fn overwrite_field() -> FormField {
    FormField::new(FormValues::OVERWRITE, "Overwrite")
        .with_options(vec![
            FieldOption::new("yes", "Yes"),
            FieldOption::new("no", "No"),
        ])
        .with_default("yes")
        .with_description(
            "If Overwrite is enabled, will use the title or filename and overwrite existing data. \
             If disabled, a date time will be appended to the name to make the file unique.",
        )
}
