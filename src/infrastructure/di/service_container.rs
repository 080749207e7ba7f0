//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::application::services::{
    CatalogService, DraftService, HandoutService, PrintService,
};
use crate::config::Settings;
use crate::infrastructure::traits::{
    Clock, CommandRunner, FileStore, FileSystem, KeyValueStore, MemoryStore, RealCommandRunner,
    RealFileSystem, Selector, SkimSelector, SystemClock,
};

/// Container holding the I/O boundaries and settings of one invocation.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Project directory the catalog path resolves against
    pub project_dir: PathBuf,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Draft storage
    pub store: Arc<dyn KeyValueStore>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,

    /// Interactive medication picker
    pub selector: Arc<dyn Selector>,

    /// Time source for entry ids
    pub clock: Arc<dyn Clock>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    ///
    /// Drafts go to a file store unless `persist` is off, then to memory.
    pub fn new(settings: Settings, project_dir: &Path) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let store: Arc<dyn KeyValueStore> = if settings.persist {
            Arc::new(FileStore::new(fs.clone(), settings.storage_dir.clone()))
        } else {
            debug!("persistence disabled, using in-memory draft store");
            Arc::new(MemoryStore::default())
        };
        Self::with_deps(
            settings,
            project_dir,
            fs,
            store,
            Arc::new(RealCommandRunner),
            Arc::new(SkimSelector),
            Arc::new(SystemClock),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        project_dir: &Path,
        fs: Arc<dyn FileSystem>,
        store: Arc<dyn KeyValueStore>,
        cmd: Arc<dyn CommandRunner>,
        selector: Arc<dyn Selector>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            project_dir: project_dir.to_path_buf(),
            fs,
            store,
            cmd,
            selector,
            clock,
        }
    }

    pub fn catalog_service(&self) -> CatalogService {
        CatalogService::new(self.fs.clone())
    }

    pub fn draft_service(&self) -> DraftService {
        DraftService::new(self.store.clone(), self.settings.storage_key.clone())
    }

    pub fn print_service(&self) -> PrintService {
        PrintService::new(self.fs.clone(), self.cmd.clone())
    }

    /// Start a session: load the catalog, then restore the draft.
    pub fn handout_session(&self) -> HandoutService {
        let data_file = self.settings.data_file_in(&self.project_dir);
        let catalog = self.catalog_service().load(&data_file);
        HandoutService::start(catalog, self.draft_service(), self.clock.clone())
    }
}
