//! The action contract invoked by the host runtime.

use crate::{
    ActionForm, ActionParam, ActionRequest, ActionResponse, ActionType, Error, Result,
    TRACING_TARGET_ACTION,
};

/// A unit of plugin logic that moves exported data to a destination.
///
/// Implementors provide [`form`](Action::form) and [`execute`](Action::execute),
/// which may fail with an [`Error`]. The host calls the `validate_and_*`
/// wrappers instead, which check the declared settings first and never return
/// an error: every failure is mapped into the result shape of the operation.
#[async_trait::async_trait]
pub trait Action: Send + Sync {
    /// Unique action identifier.
    fn name(&self) -> &str;

    /// Human-readable action name.
    fn label(&self) -> &str;

    fn description(&self) -> &str;

    /// Icon path relative to the host's asset directory.
    fn icon_name(&self) -> Option<&str> {
        None
    }

    /// Content types this action accepts.
    fn supported_action_types(&self) -> &[ActionType];

    /// Settings declared for each configured destination.
    fn params(&self) -> &[ActionParam];

    /// Whether the action consumes the attachment as a stream.
    fn uses_streaming(&self) -> bool {
        false
    }

    /// Whether the host must render a form before execution.
    fn has_form(&self) -> bool {
        true
    }

    /// Produces the fields the end user fills in before execution.
    async fn form(&self, request: &ActionRequest) -> Result<ActionForm>;

    /// Runs the action against the submitted form values.
    async fn execute(&self, request: &ActionRequest) -> Result<ActionResponse>;

    /// Checks that every required setting is present.
    fn validate_params(&self, request: &ActionRequest) -> Result<()> {
        let missing = self
            .params()
            .iter()
            .find(|param| param.required && request.param(&param.name).is_none());

        match missing {
            Some(param) => Err(Error::missing_configuration().with_message(format!(
                "Required setting \"{}\" not specified in action settings.",
                param.label
            ))),
            None => Ok(()),
        }
    }

    /// Validates the settings and renders the form.
    async fn validate_and_fetch_form(&self, request: &ActionRequest) -> ActionForm {
        if let Err(error) = self.validate_params(request) {
            tracing::warn!(
                target: TRACING_TARGET_ACTION,
                action = self.name(),
                error = %error,
                "Rejected form request"
            );
            return ActionForm::from_error(&error);
        }

        match self.form(request).await {
            Ok(form) => form,
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_ACTION,
                    action = self.name(),
                    error = %error,
                    "Form render failed"
                );
                ActionForm::from_error(&error)
            }
        }
    }

    /// Validates the settings and request type, then executes the action.
    async fn validate_and_execute(&self, request: &ActionRequest) -> ActionResponse {
        if !self.supported_action_types().contains(&request.action_type) {
            return ActionResponse::failure(format!(
                "This action does not support requests of type {}.",
                request.action_type
            ));
        }

        if let Err(error) = self.validate_params(request) {
            tracing::warn!(
                target: TRACING_TARGET_ACTION,
                action = self.name(),
                error = %error,
                "Rejected execute request"
            );
            return ActionResponse::from_error(&error);
        }

        match self.execute(request).await {
            Ok(response) => response,
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_ACTION,
                    action = self.name(),
                    error = %error,
                    "Execution failed"
                );
                ActionResponse::from_error(&error)
            }
        }
    }
}
