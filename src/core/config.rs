//! Configuration management with layered hierarchy
//!
//! Later layers win: built-in defaults, the global user config
//! (`~/.config/carcat/config.yaml`), the catalog's `.carcat/config.yaml`,
//! then `CARCAT_DB`, `CARCAT_PAGE_SIZE` and `CARCAT_LOG`. Command-line
//! flags are applied on top by the CLI.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::core::logging::LOG_ENV;
use crate::core::page::DEFAULT_PAGE_SIZE;
use crate::core::project::Project;
use crate::core::store::StoreOptions;

pub const DB_ENV: &str = "CARCAT_DB";
pub const PAGE_SIZE_ENV: &str = "CARCAT_PAGE_SIZE";

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// carcat configuration
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Database file; relative paths resolve against the catalog root
    pub database: Option<PathBuf>,

    /// Rows per page for list commands
    pub page_size: Option<u32>,

    /// How long a writer waits on another writer's lock
    pub busy_timeout_ms: Option<u64>,

    /// Log filter directive
    pub log_filter: Option<String>,

    /// Default output format
    pub default_format: Option<String>,
}

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {message}")]
    #[diagnostic(code(carcat::config))]
    Read { path: PathBuf, message: String },

    #[error("invalid config file {path:?}: {message}")]
    #[diagnostic(code(carcat::config))]
    Parse { path: PathBuf, message: String },

    #[error("invalid value '{value}' for {var}")]
    #[diagnostic(code(carcat::config), help("{var} must be a positive integer"))]
    InvalidEnv { var: &'static str, value: String },
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(project: Option<&Project>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read(&global_path)? {
                config.merge(global);
            }
        }

        if let Some(project) = project {
            if let Some(local) = Self::read(&project.config_path())? {
                config.merge(local);
            }
        }

        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Parse one config file; a missing file is not an error
    pub fn read(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        // A file holding nothing but comments parses as null
        if contents.lines().all(|l| l.trim().is_empty() || l.trim_start().starts_with('#')) {
            return Ok(Some(Config::default()));
        }

        serde_yml::from_str(&contents)
            .map(Some)
            .map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "carcat")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.database.is_some() {
            self.database = other.database;
        }
        if other.page_size.is_some() {
            self.page_size = other.page_size;
        }
        if other.busy_timeout_ms.is_some() {
            self.busy_timeout_ms = other.busy_timeout_ms;
        }
        if other.log_filter.is_some() {
            self.log_filter = other.log_filter;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Apply environment overrides read through `var`
    pub fn apply_env<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db) = var(DB_ENV) {
            self.database = Some(PathBuf::from(db));
        }
        if let Some(size) = var(PAGE_SIZE_ENV) {
            let parsed = size
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidEnv {
                    var: PAGE_SIZE_ENV,
                    value: size.clone(),
                })?;
            self.page_size = Some(parsed);
        }
        if let Some(filter) = var(LOG_ENV) {
            self.log_filter = Some(filter);
        }
        Ok(())
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS))
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            busy_timeout: self.busy_timeout(),
            ..StoreOptions::default()
        }
    }

    /// Resolve the database file for a catalog home
    pub fn database_path(&self, project: &Project) -> PathBuf {
        match &self.database {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => project.root().join(path),
            None => project.default_database_path(),
        }
    }
}
