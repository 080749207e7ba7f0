//! Tests for HandoutService: selection, plan building, rendering and persistence

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tempfile::TempDir;

use medhandout::application::render::EMPTY_HANDOUT;
use medhandout::application::services::{DraftService, HandoutService, DRAFT_KEY};
use medhandout::application::ApplicationError;
use medhandout::domain::{
    Catalog, CatalogSource, DomainError, EntryForm, EntryId, Medication,
};
use medhandout::infrastructure::traits::{
    Clock, FileStore, KeyValueStore, MemoryStore, RealFileSystem,
};
use medhandout::util::testing::init_test_setup;

/// Clock returning a fixed start time, advancing by `step` per call
struct StepClock {
    now: AtomicU64,
    step: u64,
}

impl StepClock {
    fn new(start: u64, step: u64) -> Arc<Self> {
        Arc::new(Self {
            now: AtomicU64::new(start),
            step,
        })
    }
}

impl Clock for StepClock {
    fn now_millis(&self) -> u64 {
        self.now.fetch_add(self.step, Ordering::SeqCst)
    }
}

/// Store where every operation fails (disabled storage, quota exceeded)
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> io::Result<Option<String>> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "storage disabled"))
    }

    fn set(&self, _key: &str, _value: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Other, "quota exceeded"))
    }

    fn remove(&self, _key: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "storage disabled"))
    }
}

fn advil_catalog() -> Catalog {
    Catalog::new(
        vec![Medication::new("Ibuprofen 200 mg", "images/ibuprofen-200.png", &["Advil 200"])],
        CatalogSource::BuiltIn,
    )
}

fn session_with(store: Arc<dyn KeyValueStore>) -> HandoutService {
    init_test_setup();
    HandoutService::start(
        Catalog::built_in(),
        DraftService::new(store, DRAFT_KEY),
        StepClock::new(1_700_000_000_000, 1),
    )
}

fn add(session: &mut HandoutService, med: &str, form: EntryForm) -> EntryId {
    session.select(med);
    session.update_form(form);
    session.add_medication_to_plan().expect("add").id
}

#[test]
fn given_alias_and_directions_when_adding_then_plan_has_matching_entry() {
    // Arrange
    init_test_setup();
    let mut session = HandoutService::start(
        advil_catalog(),
        DraftService::new(Arc::new(MemoryStore::default()), DRAFT_KEY),
        StepClock::new(1000, 1),
    );

    // Act
    let selected = session.select("advil 200").map(|m| m.name.clone());
    session.update_form(EntryForm::new("Take 1 tablet", "", ""));
    let entry = session.add_medication_to_plan().unwrap();

    // Assert
    assert_eq!(selected.as_deref(), Some("Ibuprofen 200 mg"));
    assert_eq!(session.plan().len(), 1);
    assert_eq!(entry.name, "Ibuprofen 200 mg");
    assert_eq!(entry.directions, "Take 1 tablet");
    assert_eq!(entry.image, "images/ibuprofen-200.png");
    assert_eq!(&session.plan().entries()[0], &entry);
}

#[test]
fn given_successful_add_when_done_then_selection_and_form_reset() {
    let mut session = session_with(Arc::new(MemoryStore::default()));

    add(&mut session, "Amox 500", EntryForm::new("", "Finish the course", ""));

    assert!(session.selected().is_none());
    assert_eq!(session.state().form(), &EntryForm::default());
    assert!(session.selection_view().contains(r#"alt="Medication image""#));
}

#[test]
fn given_no_selection_when_adding_then_blocking_error_and_plan_unchanged() {
    let mut session = session_with(Arc::new(MemoryStore::default()));
    session.select("Tylenol");
    session.update_form(EntryForm::new("Take 2", "", ""));

    let err = session.add_medication_to_plan().unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::NoSelection)
    ));
    assert!(session.plan().is_empty());
}

#[test]
fn given_all_fields_empty_when_adding_then_blocking_error_and_plan_unchanged() {
    let mut session = session_with(Arc::new(MemoryStore::default()));
    session.select("Metformin");
    session.update_form(EntryForm::new("  ", "", "\n"));

    let err = session.add_medication_to_plan().unwrap_err();

    assert!(matches!(err, ApplicationError::Domain(DomainError::EmptyEntry)));
    assert!(session.plan().is_empty());
    // selection survives a rejected add
    assert_eq!(session.selected().map(|m| m.name.as_str()), Some("Metformin 500 mg"));
}

#[test]
fn given_padded_fields_when_adding_then_values_are_trimmed() {
    let mut session = session_with(Arc::new(MemoryStore::default()));

    add(&mut session, "ibuprofen", EntryForm::new("  Take 1  ", "", " note "));

    let entry = &session.plan().entries()[0];
    assert_eq!(entry.directions, "Take 1");
    assert_eq!(entry.notes, "note");
}

#[test]
fn given_three_entries_when_removing_middle_then_exactly_that_one_removed() {
    let mut session = session_with(Arc::new(MemoryStore::default()));
    let a = add(&mut session, "Amox 500", EntryForm::new("a", "", ""));
    let b = add(&mut session, "Advil 200", EntryForm::new("b", "", ""));
    let c = add(&mut session, "Metformin", EntryForm::new("c", "", ""));

    let removed = session.remove_medication_from_plan(b);

    assert!(removed);
    let ids: Vec<EntryId> = session.plan().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![a, c]);
}

#[test]
fn given_absent_id_when_removing_then_plan_unchanged() {
    let mut session = session_with(Arc::new(MemoryStore::default()));
    add(&mut session, "Amox 500", EntryForm::new("a", "", ""));
    let before = session.plan().clone();

    let removed = session.remove_medication_from_plan(EntryId(42));

    assert!(!removed);
    assert_eq!(session.plan(), &before);
}

#[test]
fn given_mutation_when_done_then_views_rerendered() {
    let mut session = session_with(Arc::new(MemoryStore::default()));
    assert!(session.views().handout.contains(EMPTY_HANDOUT));
    assert!(session.views().summary.contains("No medications added yet."));

    let id = add(&mut session, "Advil 200", EntryForm::new("Take 1 tablet", "", ""));
    assert!(session.views().handout.contains("Take 1 tablet"));
    assert!(session.views().summary.contains("Ibuprofen 200 mg"));

    session.remove_medication_from_plan(id);
    assert!(session.views().handout.contains(EMPTY_HANDOUT));
    assert!(session.views().summary.contains(r#"class="empty-state""#));
}

#[test]
fn given_plan_when_new_session_starts_then_restores_same_entries() {
    // Arrange - first session writes to a file store
    let temp = TempDir::new().unwrap();
    let fs = Arc::new(RealFileSystem);
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(fs.clone(), temp.path()));
    let mut first = session_with(store);
    add(&mut first, "Amox 500", EntryForm::new("Twice daily", "With water", ""));
    add(&mut first, "Advil 200", EntryForm::new("", "", "As needed"));

    // Act - fresh store instance, fresh session
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(fs, temp.path()));
    let second = session_with(store);

    // Assert
    assert_eq!(second.plan(), first.plan());
    assert!(second.views().handout.contains("As needed"));
}

#[test]
fn given_persisted_plan_when_clearing_all_then_plan_and_snapshot_gone() {
    let store = Arc::new(MemoryStore::default());
    let mut session = session_with(store.clone());
    add(&mut session, "Amox 500", EntryForm::new("a", "", ""));
    assert!(store.get(DRAFT_KEY).unwrap().is_some());

    session.clear_all();

    assert!(session.plan().is_empty());
    assert!(session.selected().is_none());
    assert_eq!(store.get(DRAFT_KEY).unwrap(), None);
    assert!(session_with(store).plan().is_empty());
}

#[test]
fn given_malformed_snapshot_when_starting_then_plan_empty() {
    let store = Arc::new(MemoryStore::default());
    store
        .set(DRAFT_KEY, r#"{"treatmentPlan": {"not": "an array"}}"#)
        .unwrap();

    let session = session_with(store);

    assert!(session.plan().is_empty());
}

#[test]
fn given_broken_storage_when_mutating_then_session_keeps_working() {
    let mut session = session_with(Arc::new(BrokenStore));

    let id = add(&mut session, "Advil 200", EntryForm::new("Take 1", "", ""));
    assert_eq!(session.plan().len(), 1);

    session.remove_medication_from_plan(id);
    session.clear_all();
    assert!(session.plan().is_empty());
}

#[test]
fn given_frozen_clock_when_adding_repeatedly_then_ids_stay_unique() {
    init_test_setup();
    let mut session = HandoutService::start(
        Catalog::built_in(),
        DraftService::new(Arc::new(MemoryStore::default()), DRAFT_KEY),
        StepClock::new(5_000, 0),
    );

    let ids: Vec<EntryId> = (0..3)
        .map(|_| add(&mut session, "Amox 500", EntryForm::new("a", "", "")))
        .collect();

    assert_eq!(ids, vec![EntryId(5_000), EntryId(5_001), EntryId(5_002)]);
}

#[test]
fn given_restored_draft_with_max_id_when_adding_then_entry_added_with_unused_id() {
    let store = Arc::new(MemoryStore::default());
    store
        .set(
            DRAFT_KEY,
            r#"{"treatmentPlan":[{"id":18446744073709551615,"name":"Ibuprofen 200 mg","image":"","directions":"Take 1","instructions":"","notes":""}]}"#,
        )
        .unwrap();
    let mut session = session_with(store);

    let id = add(&mut session, "advil 200", EntryForm::new("Take 1", "", ""));

    assert_eq!(id, EntryId(0));
    assert_eq!(session.plan().len(), 2);
}
