//! Medication catalog loader
//!
//! Reads the medication list from a JSON data file. Any failure falls back to
//! the compiled-in list; the failure is logged and never surfaced.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{default_medications, Catalog, CatalogSource, Medication};
use crate::infrastructure::traits::FileSystem;

/// Service that loads the medication catalog.
pub struct CatalogService {
    fs: Arc<dyn FileSystem>,
}

impl CatalogService {
    /// Create a new catalog service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load the catalog from `data_file`, or the built-in list on failure.
    pub fn load(&self, data_file: &Path) -> Catalog {
        debug!("load: data_file={}", data_file.display());
        match self.read(data_file) {
            Ok(medications) => {
                debug!("load: {} medications from data file", medications.len());
                Catalog::new(medications, CatalogSource::DataFile(data_file.to_path_buf()))
            }
            Err(reason) => {
                warn!(
                    "using built-in medication list ({}); to customize, edit {}",
                    reason,
                    data_file.display()
                );
                Catalog::new(default_medications(), CatalogSource::BuiltIn)
            }
        }
    }

    fn read(&self, data_file: &Path) -> Result<Vec<Medication>, String> {
        let content = self
            .fs
            .read_to_string(data_file)
            .map_err(|e| format!("read {}: {}", data_file.display(), e))?;
        serde_json::from_str(&content).map_err(|e| format!("parse {}: {}", data_file.display(), e))
    }
}
