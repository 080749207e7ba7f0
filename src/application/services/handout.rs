//! Handout session service
//!
//! Owns one session's state: the loaded catalog, the current [`HandoutState`]
//! and the views rendered from it. Every mutation goes through
//! [`HandoutState::apply`], then re-renders and snapshots the draft.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::render::{render_selection, RenderedViews};
use crate::application::services::DraftService;
use crate::application::ApplicationResult;
use crate::domain::{
    Action, Catalog, EntryForm, EntryId, HandoutState, Medication, PlanEntry, TreatmentPlan,
};
use crate::infrastructure::traits::Clock;

/// One handout-building session.
pub struct HandoutService {
    catalog: Catalog,
    drafts: DraftService,
    clock: Arc<dyn Clock>,
    state: HandoutState,
    views: RenderedViews,
}

impl HandoutService {
    /// Create a session with an empty plan. Nothing is restored.
    pub fn new(catalog: Catalog, drafts: DraftService, clock: Arc<dyn Clock>) -> Self {
        let state = HandoutState::new();
        let views = RenderedViews::of(state.plan());
        Self {
            catalog,
            drafts,
            clock,
            state,
            views,
        }
    }

    /// Create a session and restore the persisted draft, if any.
    pub fn start(catalog: Catalog, drafts: DraftService, clock: Arc<dyn Clock>) -> Self {
        let mut service = Self::new(catalog, drafts, clock);
        service.restore();
        service
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &HandoutState {
        &self.state
    }

    pub fn plan(&self) -> &TreatmentPlan {
        self.state.plan()
    }

    pub fn selected(&self) -> Option<&Medication> {
        self.state.selected()
    }

    /// Views rendered after the last mutation.
    pub fn views(&self) -> &RenderedViews {
        &self.views
    }

    /// Name and image preview of the current selection.
    pub fn selection_view(&self) -> String {
        render_selection(self.state.selected())
    }

    /// Resolve `text` against the catalog and make it the selection.
    ///
    /// Non-matching text clears the selection.
    pub fn select(&mut self, text: &str) -> Option<&Medication> {
        let med = self.catalog.find_med_by_name(text).cloned();
        debug!("select: text={:?} matched={:?}", text, med.as_ref().map(|m| &m.name));
        self.update_selection(med);
        self.state.selected()
    }

    /// Set or clear the selection.
    pub fn update_selection(&mut self, med: Option<Medication>) {
        self.state = self.commit(Action::Select(med));
    }

    /// Replace the form being composed.
    pub fn update_form(&mut self, form: EntryForm) {
        self.state = self.commit(Action::UpdateForm(form));
    }

    /// Append the selection with the current form to the plan.
    ///
    /// Fails without touching the plan when nothing is selected or all form
    /// fields are empty. On success the selection and form are cleared.
    #[instrument(skip(self))]
    pub fn add_medication_to_plan(&mut self) -> ApplicationResult<PlanEntry> {
        let (state, entry) = self.state.add(self.clock.now_millis())?;
        self.state = state;
        self.refresh();
        self.drafts.persist(self.state.plan());
        debug!("add: id={} plan has {} entries", entry.id, self.state.plan().len());
        Ok(entry)
    }

    /// Drop the entry with `id`. Returns whether an entry was removed.
    #[instrument(skip(self))]
    pub fn remove_medication_from_plan(&mut self, id: EntryId) -> bool {
        let before = self.state.plan().len();
        self.state = self.commit(Action::Remove(id));
        self.refresh();
        self.drafts.persist(self.state.plan());
        self.state.plan().len() < before
    }

    /// Empty the plan, reset selection and form, erase the draft.
    #[instrument(skip(self))]
    pub fn clear_all(&mut self) {
        self.state = self.commit(Action::ClearAll);
        self.refresh();
        self.drafts.erase();
    }

    /// Replace the plan with the persisted draft, if one is readable.
    pub fn restore(&mut self) -> bool {
        match self.drafts.restore() {
            Some(plan) => {
                self.state = self.commit(Action::Restore(plan));
                self.refresh();
                true
            }
            None => false,
        }
    }

    /// Apply an action that cannot fail.
    fn commit(&self, action: Action) -> HandoutState {
        self.state
            .apply(action)
            .unwrap_or_else(|_| self.state.clone())
    }

    fn refresh(&mut self) {
        self.views = RenderedViews::of(self.state.plan());
    }
}
