//! Registration domain module.
//!
//! This module defines the registration wizard state machine and the value
//! types it relays between the form and the registration API.

pub mod credentials;
pub mod form;
pub mod rules;
pub mod state_machine;
pub mod view;

pub use credentials::{Credentials, RegistrationKey, Token};
pub use form::{FormField, FormValues};
pub use rules::{RegexRules, ValidationRules};
pub use state_machine::{
    PasswordReply, RegistrationOutcome, RegistrationStateMachine, RequestKind, ServerError,
    UsernameReply, UsernameVerdict, WizardAction, WizardEvent, WizardState, WizardStep,
    USERNAME_AVAILABLE,
};
pub use view::{messages, AlertLevel, FieldStatus, WizardViewEvent};
