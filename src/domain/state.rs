//! Application state and its update function
//!
//! Every mutation is an [`Action`] applied to a [`HandoutState`], producing a
//! new state. A failed action returns an error and leaves the input state as is.

use crate::domain::{
    DomainError, DomainResult, EntryForm, EntryId, Medication, PlanEntry, TreatmentPlan,
};

/// A single state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Set or clear the current selection
    Select(Option<Medication>),
    /// Replace the form being composed
    UpdateForm(EntryForm),
    /// Append the selection and form to the plan
    Add {
        /// Current time in milliseconds since the epoch
        timestamp_ms: u64,
    },
    /// Drop entries with this id
    Remove(EntryId),
    /// Empty the plan and reset selection and form
    ClearAll,
    /// Replace the plan with a restored draft
    Restore(TreatmentPlan),
}

/// Selection, form and treatment plan of one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandoutState {
    selected: Option<Medication>,
    form: EntryForm,
    plan: TreatmentPlan,
}

impl HandoutState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&Medication> {
        self.selected.as_ref()
    }

    pub fn form(&self) -> &EntryForm {
        &self.form
    }

    pub fn plan(&self) -> &TreatmentPlan {
        &self.plan
    }

    /// Apply `action` and return the resulting state.
    pub fn apply(&self, action: Action) -> DomainResult<HandoutState> {
        match action {
            Action::Select(selected) => Ok(Self {
                selected,
                ..self.clone()
            }),
            Action::UpdateForm(form) => Ok(Self {
                form: form.trimmed(),
                ..self.clone()
            }),
            Action::Add { timestamp_ms } => self.add(timestamp_ms).map(|(state, _)| state),
            Action::Remove(id) => Ok(Self {
                plan: self.plan.without(id),
                ..self.clone()
            }),
            Action::ClearAll => Ok(Self::default()),
            Action::Restore(plan) => Ok(Self {
                plan,
                ..self.clone()
            }),
        }
    }

    /// Append the selection with the current form; also returns the new entry.
    pub fn add(&self, timestamp_ms: u64) -> DomainResult<(HandoutState, PlanEntry)> {
        let medication = self.selected.as_ref().ok_or(DomainError::NoSelection)?;
        let form = self.form.trimmed();
        if form.is_blank() {
            return Err(DomainError::EmptyEntry);
        }

        let id = self.next_id(timestamp_ms);
        let entry = PlanEntry::new(id, medication, &form);

        let state = Self {
            selected: None,
            form: EntryForm::default(),
            plan: self.plan.with(entry.clone()),
        };
        Ok((state, entry))
    }

    /// Timestamp-derived id, bumped past the largest id already in the plan
    /// so ids stay unique when the clock repeats or runs backwards.
    ///
    /// A restored plan may already hold `u64::MAX`; then the lowest unused id
    /// is taken instead.
    fn next_id(&self, timestamp_ms: u64) -> EntryId {
        match self.plan.max_id() {
            Some(EntryId(max)) if max >= timestamp_ms => max
                .checked_add(1)
                .map(EntryId)
                .unwrap_or_else(|| self.lowest_free_id(timestamp_ms)),
            _ => EntryId(timestamp_ms),
        }
    }

    /// Smallest id not in the plan. A plan of n entries leaves one free in `0..=n`.
    fn lowest_free_id(&self, timestamp_ms: u64) -> EntryId {
        (0..=self.plan.len() as u64)
            .map(EntryId)
            .find(|id| !self.plan.contains(*id))
            .unwrap_or(EntryId(timestamp_ms))
    }
}
