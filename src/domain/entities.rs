//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reference catalog item. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    /// Display name, e.g. "Ibuprofen 200 mg"
    pub name: String,
    /// Image path relative to the handout, e.g. "images/ibuprofen-200.png"
    #[serde(default)]
    pub image: String,
    /// Alternate names matched by selection (brand names, short forms)
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Medication {
    pub fn new(name: impl Into<String>, image: impl Into<String>, aliases: &[&str]) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Case-insensitive exact match against name or any alias.
    ///
    /// `needle` must already be trimmed and lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase() == needle
            || self.aliases.iter().any(|a| a.to_lowercase() == needle)
    }
}

/// Identifier of a plan entry: creation time in milliseconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(EntryId)
    }
}

/// The free-text fields composed for one medication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub directions: String,
    pub instructions: String,
    pub notes: String,
}

impl EntryForm {
    pub fn new(
        directions: impl Into<String>,
        instructions: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            directions: directions.into(),
            instructions: instructions.into(),
            notes: notes.into(),
        }
    }

    /// Copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self::new(
            self.directions.trim(),
            self.instructions.trim(),
            self.notes.trim(),
        )
    }

    /// True when all three fields are empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.directions.trim().is_empty()
            && self.instructions.trim().is_empty()
            && self.notes.trim().is_empty()
    }
}

/// One medication with its directions, as shown on the handout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub id: EntryId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub directions: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub notes: String,
}

impl PlanEntry {
    pub fn new(id: EntryId, medication: &Medication, form: &EntryForm) -> Self {
        Self {
            id,
            name: medication.name.clone(),
            image: medication.image.clone(),
            directions: form.directions.clone(),
            instructions: form.instructions.clone(),
            notes: form.notes.clone(),
        }
    }

    /// Labelled non-empty text fields in display order.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("Directions", self.directions.as_str()),
            ("Instructions", self.instructions.as_str()),
            ("Notes", self.notes.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }
}

/// Ordered list of plan entries; insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreatmentPlan(Vec<PlanEntry>);

impl TreatmentPlan {
    pub fn new(entries: Vec<PlanEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlanEntry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.0.iter().any(|e| e.id == id)
    }

    /// Largest id in the plan, if any.
    pub fn max_id(&self) -> Option<EntryId> {
        self.0.iter().map(|e| e.id).max()
    }

    /// New plan with `entry` appended.
    pub fn with(&self, entry: PlanEntry) -> Self {
        let mut entries = self.0.clone();
        entries.push(entry);
        Self(entries)
    }

    /// New plan without entries carrying `id`. Absent ids leave the plan as is.
    pub fn without(&self, id: EntryId) -> Self {
        Self(self.0.iter().filter(|e| e.id != id).cloned().collect())
    }
}

impl<'a> IntoIterator for &'a TreatmentPlan {
    type Item = &'a PlanEntry;
    type IntoIter = std::slice::Iter<'a, PlanEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Persisted snapshot: `{ "treatmentPlan": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoutDraft {
    pub treatment_plan: TreatmentPlan,
}

/// Expand environment variables in a path string.
///
/// Supports `$VAR`, `${VAR}` and `~`.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
