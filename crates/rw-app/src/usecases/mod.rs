pub mod registration;

pub use registration::{RegistrationWizard, WizardError};
