//! SQLite-backed catalog store
//!
//! The store is the storage collaborator of the catalog. It owns the
//! connection and provides:
//! - the schema, with every natural key declared as a hard UNIQUE constraint
//!   and every reference as a foreign key (`PRAGMA foreign_keys = ON`)
//! - one write transaction per mutating operation (`BEGIN IMMEDIATE`), rolled
//!   back in full when the operation fails
//! - the shared surrogate id sequence
//! - classification of constraint violations (see [`constraint`])
//!
//! Cascades are NOT delegated to SQLite: no reference declares an `ON
//! DELETE` action, so a delete path that forgets a dependent fails loudly
//! instead of orphaning rows.

pub(crate) mod constraint;
mod schema;

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;
use tracing::debug;

use crate::core::error::Result;
use crate::core::identity::EntityKind;

pub use schema::SCHEMA_VERSION;

/// Connection settings
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// How long a writer waits for another connection's lock
    pub busy_timeout: Duration,
    /// Use write-ahead logging (file-backed stores only)
    pub wal: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_millis(5000),
            wal: true,
        }
    }
}

/// Row counts per table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub manufacturers: u64,
    pub models: u64,
    pub categories: u64,
    pub cars: u64,
    pub memberships: u64,
}

/// The catalog store backed by SQLite
pub struct CatalogStore {
    conn: Connection,
}

impl CatalogStore {
    /// Open or create a file-backed store
    pub fn open(path: &Path, options: &StoreOptions) -> Result<Self> {
        let conn = Connection::open(path)?;
        if options.wal {
            conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        }
        debug!(path = %path.display(), "opened catalog store");
        Self::from_connection(conn, options)
    }

    /// Open a private in-memory store
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, &StoreOptions::default())
    }

    fn from_connection(conn: Connection, options: &StoreOptions) -> Result<Self> {
        conn.busy_timeout(options.busy_timeout)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let mut store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Connection for reads outside a write transaction
    ///
    /// Reads made here see the last committed state and may be stale with
    /// respect to a concurrent writer.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `op` inside one IMMEDIATE transaction
    ///
    /// Commits only if `op` returns `Ok`; any error (or a panic) drops the
    /// transaction, which rolls back every write made by `op`.
    pub fn write<T, F>(&mut self, op: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = op(&*tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Count rows in every table
    pub fn statistics(&self) -> Result<CatalogStats> {
        let count = |kind: EntityKind| -> Result<u64> {
            let sql = format!("SELECT COUNT(*) FROM {}", kind.table());
            let n: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
            Ok(n as u64)
        };

        Ok(CatalogStats {
            manufacturers: count(EntityKind::Manufacturer)?,
            models: count(EntityKind::Model)?,
            categories: count(EntityKind::Category)?,
            cars: count(EntityKind::Car)?,
            memberships: count(EntityKind::Membership)?,
        })
    }
}

/// Draw the next surrogate id from the shared sequence
///
/// All entity kinds share one sequence, so an id is never reused across
/// kinds. Must be called inside a write transaction.
pub(crate) fn next_id(conn: &Connection) -> Result<i64> {
    conn.execute("UPDATE id_sequence SET next_id = next_id + 1 WHERE singleton = 1", [])?;
    let id = conn.query_row(
        "SELECT next_id - 1 FROM id_sequence WHERE singleton = 1",
        [],
        |row| row.get(0),
    )?;
    Ok(id)
}
