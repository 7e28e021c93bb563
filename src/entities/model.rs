//! Model entity and its store
//!
//! Model names are global, not scoped to a manufacturer: "Regal" built by two
//! makes is the same model row, shared by both makes' cars.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::error::{CatalogError, Result};
use crate::core::identity::{self, EntityKind, NaturalKey};
use crate::core::page::{PageRequest, SortKey};
use crate::core::store::constraint::ConstraintExt;
use crate::core::store::next_id;
use crate::entities::car::Car;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: i64,
    pub name: String,
}

/// A model together with every car built on it
#[derive(Debug, Clone, Serialize)]
pub struct ModelWithCars {
    #[serde(flatten)]
    pub model: Model,
    pub cars: Vec<Car>,
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<Model> {
    Ok(Model {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn sort_column(key: SortKey) -> Option<&'static str> {
    match key {
        SortKey::Name => Some("name"),
        _ => None,
    }
}

pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Model>> {
    Ok(conn
        .query_row(
            "SELECT id, name FROM models WHERE name = ?1",
            params![name],
            from_row,
        )
        .optional()?)
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Model>> {
    Ok(conn
        .query_row("SELECT id, name FROM models WHERE id = ?1", params![id], from_row)
        .optional()?)
}

pub fn insert(conn: &Connection, name: &str) -> Result<Model> {
    let id = next_id(conn)?;
    conn.execute(
        "INSERT INTO models (id, name) VALUES (?1, ?2)",
        params![id, name],
    )
    .or_already_exists(&NaturalKey::model(name))?;

    Ok(Model {
        id,
        name: name.to_string(),
    })
}

/// Strict create: fails with `AlreadyExists` if the name is taken
pub fn create(conn: &Connection, name: &str) -> Result<Model> {
    let key = NaturalKey::model(name);
    key.validate()?;
    if identity::resolve(conn, &key)?.is_some() {
        return Err(CatalogError::already_exists(&key));
    }
    insert(conn, name)
}

/// Rename a model
///
/// No pre-check: a collision surfaces from the UNIQUE(name) constraint and
/// is reported as `AlreadyExists` all the same.
pub fn update(conn: &Connection, id: i64, name: &str) -> Result<Model> {
    let key = NaturalKey::model(name);
    key.validate()?;

    let changed = conn
        .execute(
            "UPDATE models SET name = ?1 WHERE id = ?2",
            params![name, id],
        )
        .or_already_exists(&key)?;
    if changed == 0 {
        return Err(CatalogError::not_found_id(EntityKind::Model, id));
    }

    Ok(Model {
        id,
        name: name.to_string(),
    })
}

/// Delete the model row; a car still referencing it is a `Conflict`
pub fn delete_row(conn: &Connection, model: &Model) -> Result<usize> {
    conn.execute("DELETE FROM models WHERE id = ?1", params![model.id])
        .or_conflict(
            EntityKind::Model,
            &NaturalKey::model(model.name.as_str()).to_string(),
            "cars still reference it",
        )
}

pub fn list(conn: &Connection, prefix: Option<&str>, page: &PageRequest) -> Result<Vec<Model>> {
    let sql = format!(
        "SELECT id, name FROM models WHERE (?1 IS NULL OR substr(name, 1, length(?1)) = ?1){}",
        page.sql_suffix(sort_column, "id")?
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![prefix], from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

impl Entity for Model {
    const KIND: EntityKind = EntityKind::Model;
    type Key = str;

    fn id(&self) -> i64 {
        self.id
    }

    fn natural_key(name: &str) -> NaturalKey {
        NaturalKey::model(name)
    }

    fn find_by_key(conn: &Connection, name: &str) -> Result<Option<Self>> {
        find_by_name(conn, name)
    }

    fn insert(conn: &Connection, name: &str) -> Result<Self> {
        insert(conn, name)
    }
}
