//! Registration state machine.
//!
//! Defines a pure state transition function for the registration wizard.
//! Side effects (requests, rendering, loading the password form) are
//! returned as actions and their results come back in as events.

use std::collections::BTreeSet;

use serde::Serialize;

use super::credentials::{Credentials, RegistrationKey, Token};
use super::form::{FormField, FormValues};
use super::rules::ValidationRules;
use super::view::{messages, AlertLevel, FieldStatus, WizardViewEvent};
use crate::security::SecretString;

/// `username_message` value the server sends for a free username.
pub const USERNAME_AVAILABLE: &str = "username_available";

/// Wizard step. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum WizardStep {
    AwaitingToken = 0,
    AwaitingUsername = 1,
    AwaitingPasswords = 2,
}

impl WizardStep {
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Request currently outstanding for a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Token,
    Username,
    Password,
}

/// Business error reported by the server inside a successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsernameVerdict {
    Available,
    Rejected { reason: String },
}

/// Answer of the username check endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UsernameReply {
    pub token: Option<Token>,
    pub registration_key: Option<RegistrationKey>,
    pub username_message: Option<String>,
    pub error: Option<ServerError>,
}

impl UsernameReply {
    pub fn verdict(&self) -> UsernameVerdict {
        match (&self.username_message, &self.error) {
            (Some(message), _) if message == USERNAME_AVAILABLE => UsernameVerdict::Available,
            (Some(message), _) => UsernameVerdict::Rejected {
                reason: message.clone(),
            },
            (None, Some(error)) => UsernameVerdict::Rejected {
                reason: error.message.clone(),
            },
            (None, None) => UsernameVerdict::Rejected {
                reason: "no answer".to_string(),
            },
        }
    }
}

/// Answer of the password endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PasswordReply {
    pub error: Option<ServerError>,
}

/// Terminal result of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered,
    Rejected(ServerError),
    Failed { reason: String },
}

/// State of one registration dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub step: WizardStep,
    /// Absent until the token request succeeded.
    pub credentials: Option<Credentials>,
    pub disabled: BTreeSet<FormField>,
    pub pending_request: Option<RequestKind>,
    pub password_form_shown: bool,
    /// Password sub-state: which of the two password fields a submit
    /// applies to.
    pub active_password_field: Option<FormField>,
    pub outcome: Option<RegistrationOutcome>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self {
            step: WizardStep::AwaitingToken,
            credentials: None,
            disabled: BTreeSet::new(),
            pending_request: None,
            password_form_shown: false,
            active_password_field: None,
            outcome: None,
        }
    }

    pub fn is_enabled(&self, field: FormField) -> bool {
        !self.disabled.contains(&field)
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Whether a submit would be handled at all.
    pub fn accepts_submit(&self) -> bool {
        if self.outcome.is_some() || self.pending_request.is_some() {
            return false;
        }
        match self.step {
            WizardStep::AwaitingToken => true,
            WizardStep::AwaitingUsername => self.is_enabled(FormField::Username),
            WizardStep::AwaitingPasswords => {
                self.password_form_shown
                    && (self.is_enabled(FormField::Password1)
                        || self.is_enabled(FormField::Password2))
            }
        }
    }

    /// No request outstanding and no submit can make progress any more.
    pub fn is_dead(&self) -> bool {
        self.outcome.is_none()
            && self.pending_request.is_none()
            && FormField::ALL.iter().all(|field| !self.is_enabled(*field))
    }

    fn disable_all(&mut self) {
        self.disabled.extend(FormField::ALL);
    }
}

/// Events that drive the wizard.
#[derive(Debug, PartialEq)]
pub enum WizardEvent {
    /// The form was submitted.
    Submit { form: FormValues },
    /// The host moved input focus.
    FocusChanged { field: Option<FormField> },

    // Results (from orchestrator)
    TokenIssued { credentials: Credentials },
    TokenFailed { reason: String },
    UsernameChecked { reply: UsernameReply },
    UsernameCheckFailed { reason: String },
    PasswordFormShown,
    PasswordFormFailed { reason: String },
    PasswordSet { reply: PasswordReply },
    PasswordSetFailed { reason: String },
}

impl WizardEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WizardEvent::Submit { .. } => "Submit",
            WizardEvent::FocusChanged { .. } => "FocusChanged",
            WizardEvent::TokenIssued { .. } => "TokenIssued",
            WizardEvent::TokenFailed { .. } => "TokenFailed",
            WizardEvent::UsernameChecked { .. } => "UsernameChecked",
            WizardEvent::UsernameCheckFailed { .. } => "UsernameCheckFailed",
            WizardEvent::PasswordFormShown => "PasswordFormShown",
            WizardEvent::PasswordFormFailed { .. } => "PasswordFormFailed",
            WizardEvent::PasswordSet { .. } => "PasswordSet",
            WizardEvent::PasswordSetFailed { .. } => "PasswordSetFailed",
        }
    }
}

/// Side-effects produced by state transitions.
#[derive(Debug, PartialEq)]
pub enum WizardAction {
    /// Emit a view event.
    Render(WizardViewEvent),
    /// Request a token and registration key.
    FetchToken,
    /// Ask the server whether the username is available.
    CheckUsername {
        username: String,
        credentials: Credentials,
    },
    /// Ask the dialog host to show the password fields.
    ShowPasswordForm,
    /// Set the password of the new account.
    SetPassword {
        password: SecretString,
        credentials: Credentials,
    },
    /// Drop the dialog's state; the flow is over.
    DiscardState,
}

impl WizardAction {
    pub fn name(&self) -> &'static str {
        match self {
            WizardAction::Render(_) => "Render",
            WizardAction::FetchToken => "FetchToken",
            WizardAction::CheckUsername { .. } => "CheckUsername",
            WizardAction::ShowPasswordForm => "ShowPasswordForm",
            WizardAction::SetPassword { .. } => "SetPassword",
            WizardAction::DiscardState => "DiscardState",
        }
    }
}

/// Pure registration state machine.
pub struct RegistrationStateMachine;

impl RegistrationStateMachine {
    pub fn transition(
        state: WizardState,
        event: WizardEvent,
        rules: &dyn ValidationRules,
    ) -> (WizardState, Vec<WizardAction>) {
        match (state.step, event) {
            (_, WizardEvent::Submit { .. }) if !state.accepts_submit() => (state, Vec::new()),
            (WizardStep::AwaitingToken, WizardEvent::Submit { .. }) => {
                let mut state = state;
                state.pending_request = Some(RequestKind::Token);
                (state, vec![WizardAction::FetchToken])
            }
            (WizardStep::AwaitingUsername, WizardEvent::Submit { form }) => {
                Self::submit_username(state, form.username, rules)
            }
            (WizardStep::AwaitingPasswords, WizardEvent::Submit { form }) => {
                Self::submit_passwords(state, form, rules)
            }
            (WizardStep::AwaitingPasswords, WizardEvent::FocusChanged { field })
                if state.password_form_shown && state.outcome.is_none() =>
            {
                let mut state = state;
                state.active_password_field = field.filter(|field| field.is_password());
                (state, Vec::new())
            }
            (WizardStep::AwaitingToken, WizardEvent::TokenIssued { credentials })
                if state.pending_request == Some(RequestKind::Token) =>
            {
                let mut state = state;
                state.pending_request = None;
                state.credentials = Some(credentials);
                state.step = WizardStep::AwaitingUsername;
                (state, Vec::new())
            }
            (WizardStep::AwaitingToken, WizardEvent::TokenFailed { .. }) => {
                let mut state = state;
                state.pending_request = None;
                state.disable_all();
                (
                    state,
                    vec![
                        WizardAction::Render(WizardViewEvent::FormDisabled),
                        WizardAction::Render(WizardViewEvent::InfoPanelRemoved),
                        WizardAction::Render(WizardViewEvent::Alert {
                            level: AlertLevel::Danger,
                            text: messages::TOKEN_FAILED.to_string(),
                        }),
                        WizardAction::DiscardState,
                    ],
                )
            }
            (WizardStep::AwaitingUsername, WizardEvent::UsernameChecked { reply })
                if state.pending_request == Some(RequestKind::Username) =>
            {
                Self::username_checked(state, reply)
            }
            (WizardStep::AwaitingUsername, WizardEvent::UsernameCheckFailed { reason })
                if state.pending_request == Some(RequestKind::Username) =>
            {
                let mut state = state;
                state.pending_request = None;
                state.disable_all();
                (
                    state,
                    vec![
                        WizardAction::Render(WizardViewEvent::FormDisabled),
                        WizardAction::Render(WizardViewEvent::error(
                            FormField::Username,
                            messages::request_failed(&reason),
                        )),
                    ],
                )
            }
            (WizardStep::AwaitingPasswords, WizardEvent::PasswordFormShown)
                if !state.password_form_shown =>
            {
                let mut state = state;
                state.password_form_shown = true;
                state.active_password_field = Some(FormField::Password1);
                (
                    state,
                    vec![WizardAction::Render(WizardViewEvent::FocusRequested {
                        field: FormField::Password1,
                    })],
                )
            }
            (WizardStep::AwaitingPasswords, WizardEvent::PasswordFormFailed { reason })
                if !state.password_form_shown =>
            {
                let mut state = state;
                state.disable_all();
                (
                    state,
                    vec![
                        WizardAction::Render(WizardViewEvent::FormDisabled),
                        WizardAction::Render(WizardViewEvent::Alert {
                            level: AlertLevel::Danger,
                            text: messages::password_form_failed(&reason),
                        }),
                    ],
                )
            }
            (WizardStep::AwaitingPasswords, WizardEvent::PasswordSet { reply })
                if state.pending_request == Some(RequestKind::Password) =>
            {
                let outcome = match reply.error {
                    Some(error) => RegistrationOutcome::Rejected(error),
                    None => RegistrationOutcome::Registered,
                };
                Self::finish(state, outcome)
            }
            (WizardStep::AwaitingPasswords, WizardEvent::PasswordSetFailed { reason })
                if state.pending_request == Some(RequestKind::Password) =>
            {
                Self::finish(state, RegistrationOutcome::Failed { reason })
            }
            (_, _) => (state, Vec::new()),
        }
    }

    fn submit_username(
        mut state: WizardState,
        username: String,
        rules: &dyn ValidationRules,
    ) -> (WizardState, Vec<WizardAction>) {
        let mut actions = vec![WizardAction::Render(WizardViewEvent::status(
            FormField::Username,
            FieldStatus::Processing,
        ))];

        if !rules.is_valid_username(&username) {
            actions.push(WizardAction::Render(WizardViewEvent::error(
                FormField::Username,
                messages::USERNAME_INVALID,
            )));
            return (state, actions);
        }

        let Some(credentials) = state.credentials.clone() else {
            return (state, actions);
        };

        state.disabled.insert(FormField::Username);
        state.pending_request = Some(RequestKind::Username);
        actions.push(WizardAction::Render(WizardViewEvent::FieldEnabled {
            field: FormField::Username,
            enabled: false,
        }));
        actions.push(WizardAction::CheckUsername {
            username,
            credentials,
        });
        (state, actions)
    }

    fn username_checked(
        mut state: WizardState,
        reply: UsernameReply,
    ) -> (WizardState, Vec<WizardAction>) {
        state.pending_request = None;
        let verdict = reply.verdict();
        if let Some(credentials) = state.credentials.as_mut() {
            credentials.rotate(reply.token, reply.registration_key);
        }

        match verdict {
            UsernameVerdict::Rejected { reason } => {
                state.disabled.remove(&FormField::Username);
                (
                    state,
                    vec![
                        WizardAction::Render(WizardViewEvent::error(
                            FormField::Username,
                            messages::username_rejected(&reason),
                        )),
                        WizardAction::Render(WizardViewEvent::FieldEnabled {
                            field: FormField::Username,
                            enabled: true,
                        }),
                    ],
                )
            }
            UsernameVerdict::Available => {
                state.step = WizardStep::AwaitingPasswords;
                (
                    state,
                    vec![
                        WizardAction::Render(WizardViewEvent::status(
                            FormField::Username,
                            FieldStatus::Success,
                        )),
                        WizardAction::ShowPasswordForm,
                    ],
                )
            }
        }
    }

    fn submit_passwords(
        mut state: WizardState,
        form: FormValues,
        rules: &dyn ValidationRules,
    ) -> (WizardState, Vec<WizardAction>) {
        let mut actions = vec![
            WizardAction::Render(WizardViewEvent::status(
                FormField::Password1,
                FieldStatus::Processing,
            )),
            WizardAction::Render(WizardViewEvent::status(
                FormField::Password2,
                FieldStatus::Processing,
            )),
        ];

        match state.active_password_field {
            Some(FormField::Password1) => {
                if !rules.is_valid_password(form.password1.expose()) {
                    actions.push(WizardAction::Render(WizardViewEvent::error(
                        FormField::Password1,
                        messages::PASSWORD_INVALID,
                    )));
                    return (state, actions);
                }
                actions.push(WizardAction::Render(WizardViewEvent::status(
                    FormField::Password1,
                    FieldStatus::Success,
                )));
                actions.push(WizardAction::Render(WizardViewEvent::status(
                    FormField::Password2,
                    FieldStatus::Warning,
                )));
                actions.push(WizardAction::Render(WizardViewEvent::FocusRequested {
                    field: FormField::Password2,
                }));
                state.active_password_field = Some(FormField::Password2);
            }
            Some(FormField::Password2) => {
                if !rules.is_valid_password(form.password1.expose()) {
                    actions.push(WizardAction::Render(WizardViewEvent::error(
                        FormField::Password1,
                        messages::PASSWORD_INVALID,
                    )));
                    actions.push(WizardAction::Render(WizardViewEvent::FocusRequested {
                        field: FormField::Password1,
                    }));
                    state.active_password_field = Some(FormField::Password1);
                    return (state, actions);
                }
                actions.push(WizardAction::Render(WizardViewEvent::status(
                    FormField::Password1,
                    FieldStatus::Success,
                )));

                if form.password1 != form.password2 {
                    actions.push(WizardAction::Render(WizardViewEvent::error(
                        FormField::Password2,
                        messages::PASSWORDS_DO_NOT_MATCH,
                    )));
                    return (state, actions);
                }
                actions.push(WizardAction::Render(WizardViewEvent::status(
                    FormField::Password2,
                    FieldStatus::Success,
                )));

                let Some(credentials) = state.credentials.clone() else {
                    return (state, actions);
                };

                for field in [FormField::Password1, FormField::Password2] {
                    state.disabled.insert(field);
                    actions.push(WizardAction::Render(WizardViewEvent::FieldEnabled {
                        field,
                        enabled: false,
                    }));
                }
                state.pending_request = Some(RequestKind::Password);
                actions.push(WizardAction::SetPassword {
                    password: form.password1,
                    credentials,
                });
            }
            // Neither password field is active: nothing to submit.
            _ => {}
        }

        (state, actions)
    }

    fn finish(
        mut state: WizardState,
        outcome: RegistrationOutcome,
    ) -> (WizardState, Vec<WizardAction>) {
        state.pending_request = None;
        let alert = match &outcome {
            RegistrationOutcome::Registered => WizardViewEvent::Alert {
                level: AlertLevel::Success,
                text: messages::REGISTRATION_SUCCESSFUL.to_string(),
            },
            RegistrationOutcome::Rejected(error) => WizardViewEvent::Alert {
                level: AlertLevel::Danger,
                text: messages::registration_rejected(error.code, &error.message),
            },
            RegistrationOutcome::Failed { reason } => WizardViewEvent::Alert {
                level: AlertLevel::Danger,
                text: messages::registration_failed(reason),
            },
        };
        state.outcome = Some(outcome);
        (
            state,
            vec![
                WizardAction::Render(alert),
                WizardAction::Render(WizardViewEvent::SubmitReplacedByClose),
            ],
        )
    }
}
