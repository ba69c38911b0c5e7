use std::io::Write;

use rw_app::RegistrationWizard;
use rw_core::{DialogId, FormField, FormValues, SecretString, WizardState, WizardStep};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use super::host::TerminalDialogHost;
use super::view::field_label;

/// Current contents of the dialog's inputs.
#[derive(Default)]
struct FieldBuffer {
    username: String,
    password1: SecretString,
    password2: SecretString,
}

impl FieldBuffer {
    fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Username => self.username = value,
            FormField::Password1 => self.password1 = SecretString::new(value),
            FormField::Password2 => self.password2 = SecretString::new(value),
        }
    }

    fn snapshot(&self) -> FormValues {
        FormValues {
            username: self.username.clone(),
            password1: self.password1.duplicate(),
            password2: self.password2.duplicate(),
        }
    }
}

/// Field a submit would apply to, if any.
fn prompt_field(state: &WizardState) -> Option<FormField> {
    if !state.accepts_submit() {
        return None;
    }
    match state.step {
        WizardStep::AwaitingToken => None,
        WizardStep::AwaitingUsername => Some(FormField::Username),
        WizardStep::AwaitingPasswords => state.active_password_field,
    }
}

/// Run one registration dialog until it is closed, finished or dead.
///
/// Each input line is the new content of the prompted field and submits
/// the form. End of input closes the dialog.
pub async fn run_dialog<R, W>(
    wizard: &RegistrationWizard,
    host: &TerminalDialogHost,
    dialog_id: &DialogId,
    input: R,
    mut out: W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    host.open(dialog_id);
    wizard.prepare(dialog_id).await?;

    let mut lines = input.lines();
    let mut fields = FieldBuffer::default();

    loop {
        if host.is_closed(dialog_id) {
            break;
        }
        let Some(state) = wizard.snapshot(dialog_id).await else {
            debug!(dialog_id = %dialog_id, "registration state gone");
            break;
        };

        if state.is_finished() {
            write!(out, "Press Enter to close ")?;
            out.flush()?;
            let _ = lines.next_line().await?;
            wizard.request_close(dialog_id).await?;
            break;
        }

        if state.step == WizardStep::AwaitingPasswords
            && state.password_form_shown
            && state.active_password_field.is_none()
        {
            wizard
                .focus_changed(dialog_id, Some(FormField::Password1))
                .await?;
            continue;
        }

        let Some(field) = prompt_field(&state) else {
            info!(dialog_id = %dialog_id, "registration form cannot continue");
            wizard.request_close(dialog_id).await?;
            break;
        };

        write!(out, "{}: ", field_label(field))?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            wizard.request_close(dialog_id).await?;
            break;
        };

        fields.set(field, line);
        wizard.advance(dialog_id, fields.snapshot()).await?;
    }

    Ok(())
}
