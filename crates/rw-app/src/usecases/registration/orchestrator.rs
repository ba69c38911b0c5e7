//! Registration wizard orchestrator.
//!
//! This module coordinates the registration state machine and side effects.

use std::sync::Arc;

use tracing::{debug, error, info, info_span, warn, Instrument};

use rw_core::{
    ports::{DialogHostPort, RegistrationApiPort, WizardViewPort},
    registration::ValidationRules,
    DialogId, FormField, FormValues, RegistrationStateMachine, WizardAction, WizardEvent,
    WizardState, WizardStep,
};

use crate::usecases::registration::context::WizardContext;

/// Errors produced by the registration wizard.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("no state saved for registration dialog {0}")]
    UnknownDialog(DialogId),
    #[error("dialog host failed: {0}")]
    DialogHost(#[source] anyhow::Error),
}

/// Orchestrator that drives the registration wizard of every open dialog.
pub struct RegistrationWizard {
    context: WizardContext,

    api: Arc<dyn RegistrationApiPort>,
    view: Arc<dyn WizardViewPort>,
    dialog_host: Arc<dyn DialogHostPort>,
    rules: Arc<dyn ValidationRules>,
}

impl RegistrationWizard {
    pub fn new(
        api: Arc<dyn RegistrationApiPort>,
        view: Arc<dyn WizardViewPort>,
        dialog_host: Arc<dyn DialogHostPort>,
        rules: Arc<dyn ValidationRules>,
    ) -> Self {
        Self {
            context: WizardContext::new(),
            api,
            view,
            dialog_host,
            rules,
        }
    }

    /// Start the wizard for a freshly shown dialog and fetch its token.
    pub async fn prepare(&self, dialog_id: &DialogId) -> Result<WizardState, WizardError> {
        if self.context.open(dialog_id.clone()).await {
            warn!(dialog_id = %dialog_id, "registration dialog prepared twice, state reset");
        }
        self.advance(dialog_id, FormValues::default()).await
    }

    /// Handle a form submit.
    pub async fn advance(
        &self,
        dialog_id: &DialogId,
        form: FormValues,
    ) -> Result<WizardState, WizardError> {
        self.dispatch(dialog_id, WizardEvent::Submit { form }).await
    }

    /// The host moved input focus inside the dialog.
    pub async fn focus_changed(
        &self,
        dialog_id: &DialogId,
        field: Option<FormField>,
    ) -> Result<WizardState, WizardError> {
        self.dispatch(dialog_id, WizardEvent::FocusChanged { field })
            .await
    }

    /// The Close action that replaced the submit control was used.
    pub async fn request_close(&self, dialog_id: &DialogId) -> Result<(), WizardError> {
        self.dialog_host
            .close_dialog(dialog_id)
            .await
            .map_err(WizardError::DialogHost)?;
        self.close(dialog_id).await;
        Ok(())
    }

    /// The dialog was closed. Returns whether it had a state.
    pub async fn close(&self, dialog_id: &DialogId) -> bool {
        let removed = self.context.remove(dialog_id).await.is_some();
        debug!(dialog_id = %dialog_id, removed, "registration dialog closed");
        removed
    }

    pub async fn step(&self, dialog_id: &DialogId) -> Option<WizardStep> {
        self.context.get(dialog_id).await.map(|state| state.step)
    }

    pub async fn snapshot(&self, dialog_id: &DialogId) -> Option<WizardState> {
        self.context.get(dialog_id).await
    }

    pub async fn open_dialogs(&self) -> usize {
        self.context.len().await
    }

    async fn dispatch(
        &self,
        dialog_id: &DialogId,
        event: WizardEvent,
    ) -> Result<WizardState, WizardError> {
        let span = info_span!(
            "usecase.registration_wizard.dispatch",
            dialog_id = %dialog_id,
            event = event.name()
        );
        async {
            let mut current = self.apply(dialog_id, event).await.ok_or_else(|| {
                error!(dialog_id = %dialog_id, "no state saved for registration dialog");
                WizardError::UnknownDialog(dialog_id.clone())
            })?;

            loop {
                let (state, actions) = current;
                let follow_up = self.execute_actions(dialog_id, actions).await;
                let Some(event) = follow_up else {
                    return Ok(state);
                };
                match self.apply(dialog_id, event).await {
                    Some(next) => current = next,
                    None => {
                        // Closed while the request was in flight.
                        warn!(dialog_id = %dialog_id, "dropping result for closed registration dialog");
                        return Ok(state);
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Run one transition against the stored state.
    async fn apply(
        &self,
        dialog_id: &DialogId,
        event: WizardEvent,
    ) -> Option<(WizardState, Vec<WizardAction>)> {
        let event_name = event.name();
        let rules = self.rules.as_ref();
        let (next, (from, actions)) = self
            .context
            .update(dialog_id, |current| {
                let from = current.step;
                let (next, actions) = RegistrationStateMachine::transition(current, event, rules);
                (next, (from, actions))
            })
            .await?;
        info!(from = ?from, to = ?next.step, event = %event_name, "registration state transition");
        Some((next, actions))
    }

    /// Execute actions in order. Returns the event produced by a request,
    /// at most one per transition.
    async fn execute_actions(
        &self,
        dialog_id: &DialogId,
        actions: Vec<WizardAction>,
    ) -> Option<WizardEvent> {
        let mut follow_up = None;
        for action in actions {
            debug!(action = action.name(), "registration executing action");
            match action {
                WizardAction::Render(event) => {
                    self.view.render(dialog_id, event).await;
                }
                WizardAction::FetchToken => {
                    follow_up = Some(match self.api.prepare().await {
                        Ok(credentials) => WizardEvent::TokenIssued { credentials },
                        Err(err) => {
                            error!(error = %err, "registration token request failed");
                            WizardEvent::TokenFailed {
                                reason: err.to_string(),
                            }
                        }
                    });
                }
                WizardAction::CheckUsername {
                    username,
                    credentials,
                } => {
                    follow_up = Some(
                        match self.api.choose_username(&username, &credentials).await {
                            Ok(reply) => WizardEvent::UsernameChecked { reply },
                            Err(err) => {
                                error!(error = %err, "username check request failed");
                                WizardEvent::UsernameCheckFailed {
                                    reason: err.to_string(),
                                }
                            }
                        },
                    );
                }
                WizardAction::ShowPasswordForm => {
                    follow_up = Some(match self.dialog_host.show_password_form(dialog_id).await {
                        Ok(()) => WizardEvent::PasswordFormShown,
                        Err(err) => {
                            error!(error = %err, "password form could not be shown");
                            WizardEvent::PasswordFormFailed {
                                reason: err.to_string(),
                            }
                        }
                    });
                }
                WizardAction::SetPassword {
                    password,
                    credentials,
                } => {
                    follow_up = Some(match self.api.set_password(&password, &credentials).await {
                        Ok(reply) => {
                            if let Some(server_error) = &reply.error {
                                warn!(
                                    code = server_error.code,
                                    message = %server_error.message,
                                    "registration rejected by server"
                                );
                            }
                            WizardEvent::PasswordSet { reply }
                        }
                        Err(err) => {
                            error!(error = %err, "set password request failed");
                            WizardEvent::PasswordSetFailed {
                                reason: err.to_string(),
                            }
                        }
                    });
                }
                WizardAction::DiscardState => {
                    self.context.remove(dialog_id).await;
                    info!("registration state discarded");
                }
            }
        }
        follow_up
    }
}
