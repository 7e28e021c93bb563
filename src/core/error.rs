//! Catalog error taxonomy
//!
//! Every catalog operation returns [`Result`]. Callers (the CLI, or any other
//! transport) decide how each kind maps onto their own responses:
//! `NotFound` and `AlreadyExists` are always recoverable, `Conflict` means a
//! delete was blocked by dependents.

use miette::Diagnostic;
use thiserror::Error;

use crate::core::identity::{EntityKind, NaturalKey};

/// Result alias used throughout the catalog
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors raised by catalog operations
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("{kind} not found: {key}")]
    #[diagnostic(code(carcat::not_found))]
    NotFound { kind: EntityKind, key: String },

    #[error("{kind} already exists: {key}")]
    #[diagnostic(
        code(carcat::already_exists),
        help("natural keys are unique; look the existing {kind} up instead of creating it again")
    )]
    AlreadyExists { kind: EntityKind, key: String },

    #[error("cannot delete {kind} {key}: {reason}")]
    #[diagnostic(code(carcat::conflict))]
    Conflict {
        kind: EntityKind,
        key: String,
        reason: String,
    },

    #[error("invalid input: {0}")]
    #[diagnostic(code(carcat::invalid_input))]
    InvalidInput(String),

    #[error("catalog schema version {found} is not supported (expected {expected})")]
    #[diagnostic(
        code(carcat::schema),
        help("this catalog was written by a different carcat release; re-create it with `carcat init --force`")
    )]
    SchemaMismatch { found: i32, expected: i32 },

    #[error("storage error: {0}")]
    #[diagnostic(code(carcat::storage))]
    Storage(#[from] rusqlite::Error),
}

impl CatalogError {
    /// Entity identified by its surrogate id does not exist
    pub fn not_found_id(kind: EntityKind, id: i64) -> Self {
        CatalogError::NotFound {
            kind,
            key: format!("id={}", id),
        }
    }

    /// Entity identified by its natural key does not exist
    pub fn not_found_key(key: &NaturalKey) -> Self {
        CatalogError::NotFound {
            kind: key.kind(),
            key: key.to_string(),
        }
    }

    /// A write would duplicate the given natural key
    pub fn already_exists(key: &NaturalKey) -> Self {
        CatalogError::AlreadyExists {
            kind: key.kind(),
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, CatalogError::AlreadyExists { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, CatalogError::Conflict { .. })
    }
}
