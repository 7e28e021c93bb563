//! Catalog home discovery and structure
//!
//! A catalog home is any directory containing `.carcat/`. It holds the
//! catalog's config and, unless configured otherwise, its database.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the catalog metadata directory
pub const CATALOG_DIR: &str = ".carcat";

const CONFIG_FILE: &str = "config.yaml";
const DATABASE_FILE: &str = "catalog.db";

/// Represents a catalog home
#[derive(Debug, Clone)]
pub struct Project {
    /// Root directory (parent of .carcat/)
    root: PathBuf,
}

impl Project {
    /// Find the catalog home by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find the catalog home by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(CATALOG_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// The catalog home rooted at `path`, whether or not `.carcat/` exists yet
    pub fn at(path: &Path) -> Self {
        Self {
            root: path.canonicalize().unwrap_or_else(|_| path.to_path_buf()),
        }
    }

    /// Create `.carcat/` with a default config at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let project = Self::at(path);

        if project.carcat_dir().exists() {
            return Err(ProjectError::AlreadyExists(project.root));
        }

        Self::create_structure(project.root)
    }

    /// Re-initialize, discarding `database` and the default database
    ///
    /// The config is reset to defaults, so both files go: the one the old
    /// config pointed at and the one the new config will open.
    pub fn init_force(path: &Path, database: &Path) -> Result<Self, ProjectError> {
        let project = Self::at(path);
        let default = project.default_database_path();

        for db in [database, default.as_path()] {
            // SQLite keeps WAL side files next to the database
            for suffix in ["", "-wal", "-shm"] {
                let mut name = db.as_os_str().to_os_string();
                name.push(suffix);
                let file = PathBuf::from(name);
                if file.exists() {
                    std::fs::remove_file(&file).map_err(|e| ProjectError::IoError(e.to_string()))?;
                }
            }
        }

        Self::create_structure(project.root)
    }

    fn create_structure(root: PathBuf) -> Result<Self, ProjectError> {
        let dir = root.join(CATALOG_DIR);
        std::fs::create_dir_all(&dir).map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::write(dir.join(CONFIG_FILE), Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        Ok(Self { root })
    }

    fn default_config() -> &'static str {
        r#"# carcat catalog configuration

# Database file; relative paths are resolved against the catalog root
# database: .carcat/catalog.db

# Rows per page for list commands
# page_size: 20

# How long a write waits for another writer, in milliseconds
# busy_timeout_ms: 5000

# Log filter (overridden by CARCAT_LOG), e.g. warn, info, carcat=debug
# log_filter: warn

# Default output format (auto, yaml, tsv, json, csv, md, id)
# default_format: auto
"#
    }

    /// Get the catalog root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .carcat metadata directory
    pub fn carcat_dir(&self) -> PathBuf {
        self.root.join(CATALOG_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.carcat_dir().join(CONFIG_FILE)
    }

    /// Database location when none is configured
    pub fn default_database_path(&self) -> PathBuf {
        self.carcat_dir().join(DATABASE_FILE)
    }
}

/// Errors that can occur locating or creating a catalog home
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a carcat catalog (searched from {searched_from:?}). Run 'carcat init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("carcat catalog already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
