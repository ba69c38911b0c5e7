//! regwizard application layer
//!
//! This crate contains the registration use case: the orchestrator that
//! runs the core state machine and executes its side effects.

pub mod usecases;

pub use usecases::{RegistrationWizard, WizardError};
