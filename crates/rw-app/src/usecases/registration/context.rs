use std::collections::HashMap;
use std::sync::Arc;

use rw_core::{DialogId, WizardState};
use tokio::sync::Mutex;

/// Per-dialog wizard states, owned by one `RegistrationWizard`.
///
/// The lock is only held while a transition is computed, never across a
/// request.
#[derive(Clone, Default)]
pub struct WizardContext {
    states: Arc<Mutex<HashMap<DialogId, WizardState>>>,
}

impl WizardContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fresh state for the dialog. Returns true if one was replaced.
    pub async fn open(&self, dialog_id: DialogId) -> bool {
        self.states
            .lock()
            .await
            .insert(dialog_id, WizardState::new())
            .is_some()
    }

    pub async fn get(&self, dialog_id: &DialogId) -> Option<WizardState> {
        self.states.lock().await.get(dialog_id).cloned()
    }

    pub async fn remove(&self, dialog_id: &DialogId) -> Option<WizardState> {
        self.states.lock().await.remove(dialog_id)
    }

    pub async fn len(&self) -> usize {
        self.states.lock().await.len()
    }

    /// Run `f` on the dialog's state and store the result atomically.
    /// `None` if the dialog has no state.
    pub async fn update<F, R>(&self, dialog_id: &DialogId, f: F) -> Option<(WizardState, R)>
    where
        F: FnOnce(WizardState) -> (WizardState, R),
    {
        let mut states = self.states.lock().await;
        let current = states.get(dialog_id).cloned()?;
        let (next, result) = f(current);
        states.insert(dialog_id.clone(), next.clone());
        Some((next, result))
    }
}
