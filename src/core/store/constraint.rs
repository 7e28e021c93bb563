//! Classification of SQLite constraint violations
//!
//! The application-level pre-checks only produce nicer messages; the UNIQUE
//! and FOREIGN KEY constraints are the actual guarantee. When a concurrent
//! writer slips past a pre-check, the violation raised here is translated
//! into the same error the pre-check would have produced.

use rusqlite::{ffi, ErrorCode};
use tracing::warn;

use crate::core::error::{CatalogError, Result};
use crate::core::identity::{EntityKind, NaturalKey};

/// Which constraint a failed statement violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// UNIQUE or PRIMARY KEY: a natural key is already owned
    Unique,
    /// FOREIGN KEY: a reference points at a missing row, or a delete would
    /// orphan dependents
    ForeignKey,
    /// NOT NULL, CHECK and the rest
    Other,
}

/// Classify a rusqlite error; `None` if it is not a constraint violation
pub fn classify(err: &rusqlite::Error) -> Option<Violation> {
    match err {
        rusqlite::Error::SqliteFailure(e, msg) if e.code == ErrorCode::ConstraintViolation => {
            Some(match e.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    Violation::Unique
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Violation::ForeignKey,
                // RESTRICT actions fire as a trigger; catalogs created with
                // them still report a foreign key failure in the message
                ffi::SQLITE_CONSTRAINT_TRIGGER if is_foreign_key_message(msg.as_deref()) => {
                    Violation::ForeignKey
                }
                _ => Violation::Other,
            })
        }
        _ => None,
    }
}

fn is_foreign_key_message(msg: Option<&str>) -> bool {
    msg.map_or(false, |m| m.contains("FOREIGN KEY constraint failed"))
}

/// Remap constraint violations on a storage result
pub(crate) trait ConstraintExt<T> {
    /// A uniqueness violation becomes `AlreadyExists` for `key`
    fn or_already_exists(self, key: &NaturalKey) -> Result<T>;

    /// A foreign key violation becomes `Conflict` on the `kind` row named `key`
    fn or_conflict(self, kind: EntityKind, key: &str, reason: &str) -> Result<T>;
}

impl<T> ConstraintExt<T> for rusqlite::Result<T> {
    fn or_already_exists(self, key: &NaturalKey) -> Result<T> {
        self.map_err(|err| match classify(&err) {
            Some(Violation::Unique) => {
                warn!(kind = %key.kind(), key = %key, "uniqueness constraint caught a concurrent duplicate");
                CatalogError::already_exists(key)
            }
            _ => CatalogError::Storage(err),
        })
    }

    fn or_conflict(self, kind: EntityKind, key: &str, reason: &str) -> Result<T> {
        self.map_err(|err| match classify(&err) {
            Some(Violation::ForeignKey) => {
                warn!(%kind, key, "foreign key constraint blocked a delete");
                CatalogError::Conflict {
                    kind,
                    key: key.to_string(),
                    reason: reason.to_string(),
                }
            }
            _ => CatalogError::Storage(err),
        })
    }
}
