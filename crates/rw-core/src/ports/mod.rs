//! Port interfaces for the application layer
//!
//! Ports define the contract between the registration use case and the
//! infrastructure or host that implements it: the remote registration API,
//! the rendering layer, and the dialog host.

pub mod dialog_host;
pub mod registration_api;
pub mod wizard_view;

pub use dialog_host::DialogHostPort;
pub use registration_api::{RegistrationApiError, RegistrationApiPort};
pub use wizard_view::WizardViewPort;
