//! Entity trait - common interface for the keyed catalog entities
//!
//! Manufacturer, Model and Category are "simple" entities: a surrogate id plus
//! a natural key. They share one creation pattern, find-or-create, which is
//! expressed once here over the trait instead of per entity.

use rusqlite::Connection;
use serde::Serialize;
use tracing::debug;

use crate::core::error::Result;
use crate::core::identity::{EntityKind, NaturalKey};

/// A catalog entity identified by a natural key
pub trait Entity: Serialize + Sized {
    /// The entity kind
    const KIND: EntityKind;

    /// Borrowed form of the natural key (e.g. `str` for name-keyed entities)
    type Key: ?Sized;

    /// Get the entity's surrogate id
    fn id(&self) -> i64;

    /// Natural key for error messages and the identity resolver
    fn natural_key(key: &Self::Key) -> NaturalKey;

    /// Look up an existing row by natural key
    fn find_by_key(conn: &Connection, key: &Self::Key) -> Result<Option<Self>>;

    /// Insert a new row; a duplicate key fails with `AlreadyExists`
    fn insert(conn: &Connection, key: &Self::Key) -> Result<Self>;
}

/// Return the entity owning `key`, creating it if none does
///
/// Runs on the caller's connection, so inside a write transaction the
/// implicit creation commits or rolls back together with the outer write.
/// Only the "not found" outcome is absorbed (by creating); a duplicate
/// raised by the insert means another writer got there first, and the row
/// it created is returned instead.
pub fn find_or_create<E: Entity>(conn: &Connection, key: &E::Key) -> Result<E> {
    if let Some(found) = E::find_by_key(conn, key)? {
        return Ok(found);
    }

    match E::insert(conn, key) {
        Ok(created) => {
            debug!(
                kind = %E::KIND,
                id = created.id(),
                key = %E::natural_key(key),
                "implicitly created"
            );
            Ok(created)
        }
        Err(err) if err.is_already_exists() => E::find_by_key(conn, key)?.ok_or(err),
        Err(err) => Err(err),
    }
}
