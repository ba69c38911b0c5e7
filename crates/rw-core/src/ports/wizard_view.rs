use crate::ids::DialogId;
use crate::registration::WizardViewEvent;

/// Rendering layer of a dialog.
#[async_trait::async_trait]
pub trait WizardViewPort: Send + Sync {
    async fn render(&self, dialog_id: &DialogId, event: WizardViewEvent);
}
