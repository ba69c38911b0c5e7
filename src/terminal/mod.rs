//! Terminal dialog host.
//!
//! Plays the role of the page hosting the registration dialog: prompts for
//! the field the wizard expects next and prints the view events.

mod host;
mod run;
mod view;

pub use host::TerminalDialogHost;
pub use run::run_dialog;
pub use view::{field_label, render_line, ConsoleView};
