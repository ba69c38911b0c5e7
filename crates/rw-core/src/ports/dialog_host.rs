use anyhow::Result;

use crate::ids::DialogId;

/// Host that owns the dialog chrome.
#[async_trait::async_trait]
pub trait DialogHostPort: Send + Sync {
    /// Insert the password fields into the dialog's form. Resolves once
    /// they are ready to take focus.
    async fn show_password_form(&self, dialog_id: &DialogId) -> Result<()>;

    async fn close_dialog(&self, dialog_id: &DialogId) -> Result<()>;
}
