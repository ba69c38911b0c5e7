//! View events emitted by the wizard.
//!
//! A rendering layer subscribes to these instead of the wizard touching
//! any UI directly.

use serde::Serialize;

use super::form::FormField;

/// User-facing texts.
pub mod messages {
    pub const TOKEN_FAILED: &str = "Failed to get a token for registration.";
    pub const USERNAME_INVALID: &str = "Username invalid";
    pub const PASSWORD_INVALID: &str = "Password invalid";
    pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
    pub const REGISTRATION_SUCCESSFUL: &str = "Registration successful";

    pub fn username_rejected(reason: &str) -> String {
        format!("{}: {}", USERNAME_INVALID, reason)
    }

    pub fn request_failed(reason: &str) -> String {
        format!("Error handling request: {}", reason)
    }

    pub fn password_form_failed(reason: &str) -> String {
        format!("Failed to load the password form: {}", reason)
    }

    pub fn registration_rejected(code: i64, message: &str) -> String {
        format!("Registration failed: [{}] {}", code, message)
    }

    pub fn registration_failed(reason: &str) -> String {
        format!("Registration failed: {}", reason)
    }
}

/// Visual status of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldStatus {
    /// Neutral; previous feedback cleared.
    Processing,
    Warning,
    Error,
    Success,
}

impl FieldStatus {
    /// Status text shown next to the field.
    pub fn label(self) -> &'static str {
        match self {
            FieldStatus::Processing => "(processing)",
            FieldStatus::Warning => "(warning)",
            FieldStatus::Error => "(error)",
            FieldStatus::Success => "(ok)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertLevel {
    Success,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum WizardViewEvent {
    /// Replaces the field's status and its inline alert. `message: None`
    /// removes the alert, so a field never carries more than one.
    FieldStatusChanged {
        field: FormField,
        status: FieldStatus,
        message: Option<String>,
    },
    FieldEnabled {
        field: FormField,
        enabled: bool,
    },
    /// Every input of the form is disabled; the flow cannot continue.
    FormDisabled,
    /// The informational panel on top of the form is removed.
    InfoPanelRemoved,
    /// Form-level alert.
    Alert {
        level: AlertLevel,
        text: String,
    },
    FocusRequested {
        field: FormField,
    },
    /// The submit control is replaced by a Close action.
    SubmitReplacedByClose,
}

impl WizardViewEvent {
    pub fn status(field: FormField, status: FieldStatus) -> Self {
        WizardViewEvent::FieldStatusChanged {
            field,
            status,
            message: None,
        }
    }

    pub fn error(field: FormField, message: impl Into<String>) -> Self {
        WizardViewEvent::FieldStatusChanged {
            field,
            status: FieldStatus::Error,
            message: Some(message.into()),
        }
    }
}
