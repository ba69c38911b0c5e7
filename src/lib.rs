//! regwizard
//!
//! Bootstrap and a terminal dialog host for the registration wizard.

pub mod bootstrap;
pub mod terminal;
