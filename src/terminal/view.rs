use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use rw_core::ports::WizardViewPort;
use rw_core::registration::{AlertLevel, WizardViewEvent};
use rw_core::{DialogId, FormField};
use tracing::{debug, warn};

pub fn field_label(field: FormField) -> &'static str {
    match field {
        FormField::Username => "Username",
        FormField::Password1 => "Password",
        FormField::Password2 => "Confirm password",
    }
}

/// Text printed for a view event. `None` for events with no terminal
/// counterpart.
pub fn render_line(event: &WizardViewEvent) -> Option<String> {
    match event {
        WizardViewEvent::FieldStatusChanged {
            field,
            status,
            message,
        } => Some(match message {
            Some(message) => format!("{} {} {}", field_label(*field), status.label(), message),
            None => format!("{} {}", field_label(*field), status.label()),
        }),
        WizardViewEvent::FormDisabled => Some("The form is disabled.".to_string()),
        WizardViewEvent::Alert { level, text } => Some(match level {
            AlertLevel::Success => format!("[success] {}", text),
            AlertLevel::Danger => format!("[danger] {}", text),
        }),
        WizardViewEvent::FieldEnabled { .. }
        | WizardViewEvent::InfoPanelRemoved
        | WizardViewEvent::FocusRequested { .. }
        | WizardViewEvent::SubmitReplacedByClose => None,
    }
}

/// Writes view events as lines of text.
pub struct ConsoleView<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl<W: Write + Send> WizardViewPort for ConsoleView<W> {
    async fn render(&self, dialog_id: &DialogId, event: WizardViewEvent) {
        debug!(dialog_id = %dialog_id, event = ?event, "render");
        let Some(line) = render_line(&event) else {
            return;
        };
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(err) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            warn!(error = %err, "failed to write view event");
        }
    }
}
