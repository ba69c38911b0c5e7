//! # rw-core
//!
//! Core domain models and business logic for regwizard.
//!
//! This crate contains the pure registration state machine and the port
//! traits it is driven through. It has no HTTP, terminal or runtime
//! dependencies.

pub mod config;
pub mod ids;
pub mod ports;
pub mod registration;
pub mod security;

// Re-export commonly used types at the crate root
pub use config::WizardConfig;
pub use ids::DialogId;
pub use registration::{
    Credentials, FormField, FormValues, RegistrationKey, RegistrationStateMachine, Token,
    WizardAction, WizardEvent, WizardState, WizardStep,
};
pub use security::SecretString;
