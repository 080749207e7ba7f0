//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/medhandout/medhandout.toml`
//! 3. Local config: `<project_dir>/.medhandout.toml`
//! 4. Environment variables: `MEDHANDOUT_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::services::DRAFT_KEY;
use crate::application::ApplicationError;
use crate::domain::expand_env_vars;

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_file: Option<PathBuf>,
    pub storage_dir: Option<PathBuf>,
    pub storage_key: Option<String>,
    pub persist: Option<bool>,
    pub title: Option<String>,
    pub print_command: Option<String>,
}

/// Unified configuration for medhandout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Medication catalog JSON, relative paths resolve against the project dir
    pub data_file: PathBuf,
    /// Directory holding the persisted draft
    pub storage_dir: PathBuf,
    /// Key the draft is stored under
    pub storage_key: String,
    /// Persist the draft between sessions
    pub persist: bool,
    /// Heading of the printed handout
    pub title: String,
    /// Command receiving the printable document as last argument (e.g. "lp")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_command: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data/medications.json"),
            storage_dir: default_storage_dir(),
            storage_key: DRAFT_KEY.to_string(),
            persist: true,
            title: "Medication Handout".to_string(),
            print_command: None,
        }
    }
}

/// Default draft directory: XDG data dir, else `~/.medhandout`.
fn default_storage_dir() -> PathBuf {
    ProjectDirs::from("", "", "medhandout")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.medhandout"))
}

/// Get the XDG config directory for medhandout.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "medhandout").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("medhandout.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".medhandout.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Catalog path, resolved against `project_dir` when relative.
    pub fn data_file_in(&self, project_dir: &Path) -> PathBuf {
        if self.data_file.is_absolute() {
            self.data_file.clone()
        } else {
            project_dir.join(&self.data_file)
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.data_file = PathBuf::from(expand_env_vars(&self.data_file.to_string_lossy()));
        self.storage_dir = PathBuf::from(expand_env_vars(&self.storage_dir.to_string_lossy()));
        self.print_command = self.print_command.as_deref().map(expand_env_vars);
    }

    /// Overlay `raw` onto self: every specified field wins.
    fn merge_with(&self, raw: &RawSettings) -> Self {
        Self {
            data_file: raw
                .data_file
                .clone()
                .unwrap_or_else(|| self.data_file.clone()),
            storage_dir: raw
                .storage_dir
                .clone()
                .unwrap_or_else(|| self.storage_dir.clone()),
            storage_key: raw
                .storage_key
                .clone()
                .unwrap_or_else(|| self.storage_key.clone()),
            persist: raw.persist.unwrap_or(self.persist),
            title: raw.title.clone().unwrap_or_else(|| self.title.clone()),
            print_command: raw
                .print_command
                .clone()
                .or_else(|| self.print_command.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for local config
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(project) = project_dir {
            let local_path = local_config_path(project);
            if local_path.exists() {
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply MEDHANDOUT_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("MEDHANDOUT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_file") {
            settings.data_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("storage_dir") {
            settings.storage_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("storage_key") {
            settings.storage_key = val;
        }
        if let Ok(val) = config.get_bool("persist") {
            settings.persist = val;
        }
        if let Ok(val) = config.get_string("title") {
            settings.title = val;
        }
        if let Ok(val) = config.get_string("print_command") {
            settings.print_command = Some(val);
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# medhandout configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/medhandout/medhandout.toml
#   Local:  <project_dir>/.medhandout.toml
#   Env:    MEDHANDOUT_* environment variables

# Medication catalog (JSON array of {name, image, aliases}).
# Relative paths resolve against the project directory.
# data_file = "data/medications.json"

# Where the treatment plan draft is kept between sessions
# storage_dir = "~/.local/share/medhandout"
# storage_key = "handoutDraft"

# Set to false to keep the plan only for the current command
# persist = true

# Heading of the printed handout
# title = "Medication Handout"

# Command that receives the printable HTML file as last argument
# print_command = "lp"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
