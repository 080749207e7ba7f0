//! Medication catalog: lookup list and autocomplete source

use std::fmt;
use std::path::PathBuf;

use crate::domain::Medication;

/// Where the catalog entries came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Parsed from a JSON data file
    DataFile(PathBuf),
    /// Compiled-in fallback list
    BuiltIn,
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::DataFile(path) => write!(f, "{}", path.display()),
            CatalogSource::BuiltIn => write!(f, "built-in list"),
        }
    }
}

/// Medications available for selection, in data-file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    medications: Vec<Medication>,
    source: CatalogSource,
}

impl Catalog {
    pub fn new(medications: Vec<Medication>, source: CatalogSource) -> Self {
        Self {
            medications,
            source,
        }
    }

    /// Catalog made of the compiled-in fallback list.
    pub fn built_in() -> Self {
        Self::new(default_medications(), CatalogSource::BuiltIn)
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.medications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.medications.is_empty()
    }

    /// Names offered as completion candidates.
    pub fn names(&self) -> Vec<&str> {
        self.medications.iter().map(|m| m.name.as_str()).collect()
    }

    /// First medication whose name or alias equals `text`, ignoring case and
    /// surrounding whitespace. No partial or fuzzy matching.
    pub fn find_med_by_name(&self, text: &str) -> Option<&Medication> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.medications.iter().find(|m| m.matches(&needle))
    }
}

/// Fallback list used when the data file cannot be loaded.
pub fn default_medications() -> Vec<Medication> {
    vec![
        Medication::new(
            "Amoxicillin 500 mg",
            "images/amoxicillin-500.png",
            &["Amox 500", "Amoxicillin"],
        ),
        Medication::new(
            "Ibuprofen 200 mg",
            "images/ibuprofen-200.png",
            &["Advil 200", "Motrin 200", "Ibuprofen"],
        ),
        Medication::new(
            "Metformin 500 mg",
            "images/metformin-500.png",
            &["Glucophage 500", "Metformin"],
        ),
    ]
}
