//! Draft persistence adapter
//!
//! Best-effort snapshot of the treatment plan in a key-value store. Storage
//! failures degrade the session to non-persistent; they are logged, never raised.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{HandoutDraft, TreatmentPlan};
use crate::infrastructure::traits::KeyValueStore;

/// Key the draft is stored under by default.
pub const DRAFT_KEY: &str = "handoutDraft";

/// Saves, restores and erases the treatment plan draft.
pub struct DraftService {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl DraftService {
    /// Create a draft service storing under `key`.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Store `{ treatmentPlan }` under the draft key. Failures are ignored.
    pub fn persist(&self, plan: &TreatmentPlan) {
        let draft = HandoutDraft {
            treatment_plan: plan.clone(),
        };
        let payload = match serde_json::to_string(&draft) {
            Ok(p) => p,
            Err(e) => {
                debug!("persist: serialize failed: {}", e);
                return;
            }
        };
        match self.store.set(&self.key, &payload) {
            Ok(()) => debug!("persist: {} entries", plan.len()),
            Err(e) => debug!("persist: store failed: {}", e),
        }
    }

    /// Plan from the stored draft. Absent or malformed drafts yield `None`.
    pub fn restore(&self) -> Option<TreatmentPlan> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("restore: no draft under {}", self.key);
                return None;
            }
            Err(e) => {
                debug!("restore: store failed: {}", e);
                return None;
            }
        };
        match serde_json::from_str::<HandoutDraft>(&raw) {
            Ok(draft) => {
                debug!("restore: {} entries", draft.treatment_plan.len());
                Some(draft.treatment_plan)
            }
            Err(e) => {
                debug!("restore: ignoring malformed draft: {}", e);
                None
            }
        }
    }

    /// Remove the stored draft. Failures are ignored.
    pub fn erase(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            debug!("erase: store failed: {}", e);
        }
    }
}
