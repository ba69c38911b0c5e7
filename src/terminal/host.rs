use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::bail;
use async_trait::async_trait;
use rw_core::ports::DialogHostPort;
use rw_core::DialogId;
use tracing::info;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct HostedDialog {
    password_form_shown: bool,
    closed: bool,
}

/// Dialog host for a terminal session.
///
/// "Showing" the password form switches the prompts over to the password
/// fields. The form template is only checked for being configured.
pub struct TerminalDialogHost {
    password_form: String,
    dialogs: Mutex<HashMap<DialogId, HostedDialog>>,
}

impl TerminalDialogHost {
    pub fn new(password_form: impl Into<String>) -> Self {
        Self {
            password_form: password_form.into(),
            dialogs: Mutex::new(HashMap::new()),
        }
    }

    /// Register a dialog that is about to be shown.
    pub fn open(&self, dialog_id: &DialogId) {
        self.dialogs().insert(dialog_id.clone(), HostedDialog::default());
    }

    /// Unknown dialogs count as closed.
    pub fn is_closed(&self, dialog_id: &DialogId) -> bool {
        self.dialogs()
            .get(dialog_id)
            .map_or(true, |dialog| dialog.closed)
    }

    pub fn password_form_shown(&self, dialog_id: &DialogId) -> bool {
        self.dialogs()
            .get(dialog_id)
            .is_some_and(|dialog| dialog.password_form_shown)
    }

    fn dialogs(&self) -> MutexGuard<'_, HashMap<DialogId, HostedDialog>> {
        match self.dialogs.lock() {
            Ok(dialogs) => dialogs,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl DialogHostPort for TerminalDialogHost {
    async fn show_password_form(&self, dialog_id: &DialogId) -> anyhow::Result<()> {
        if self.password_form.is_empty() {
            bail!("no password form configured");
        }
        let mut dialogs = self.dialogs();
        let Some(dialog) = dialogs.get_mut(dialog_id).filter(|dialog| !dialog.closed) else {
            bail!("dialog {} is not open", dialog_id);
        };
        dialog.password_form_shown = true;
        info!(dialog_id = %dialog_id, form = %self.password_form, "password form shown");
        Ok(())
    }

    async fn close_dialog(&self, dialog_id: &DialogId) -> anyhow::Result<()> {
        let mut dialogs = self.dialogs();
        let Some(dialog) = dialogs.get_mut(dialog_id) else {
            bail!("dialog {} is not open", dialog_id);
        };
        dialog.closed = true;
        info!(dialog_id = %dialog_id, "dialog closed");
        Ok(())
    }
}
