//! Manufacturer entity and its store
//!
//! A manufacturer is versioned by model year: "Acura 2017" and "Acura 2020"
//! are distinct rows. Its cars are derived from `cars.manufacturer_id`.

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
pub struct Manufacturer {
    pub id: i64,
    pub name: String,
    pub year: i32,
}

/// Natural key of a manufacturer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManufacturerKey {
    pub name: String,
    pub year: i32,
}

impl ManufacturerKey {
    pub fn new(name: impl Into<String>, year: i32) -> Self {
        Self {
            name: name.into(),
            year,
        }
    }
}

impl From<&ManufacturerKey> for NaturalKey {
    fn from(key: &ManufacturerKey) -> Self {
        NaturalKey::manufacturer(key.name.clone(), key.year)
    }
}

/// One year-version of a manufacturer together with its cars
#[derive(Debug, Clone, Serialize)]
pub struct ManufacturerWithCars {
    #[serde(flatten)]
    pub manufacturer: Manufacturer,
    pub cars: Vec<Car>,
}

const COLUMNS: &str = "id, name, year";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Manufacturer> {
    Ok(Manufacturer {
        id: row.get(0)?,
        name: row.get(1)?,
        year: row.get(2)?,
    })
}

fn sort_column(key: SortKey) -> Option<&'static str> {
    match key {
        SortKey::Id => None,
        SortKey::Name => Some("name"),
        SortKey::Year => Some("year"),
    }
}

pub fn find_by_key(conn: &Connection, key: &ManufacturerKey) -> Result<Option<Manufacturer>> {
    let sql = format!(
        "SELECT {} FROM manufacturers WHERE name = ?1 AND year = ?2",
        COLUMNS
    );
    Ok(conn
        .query_row(&sql, params![key.name, key.year], from_row)
        .optional()?)
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Manufacturer>> {
    let sql = format!("SELECT {} FROM manufacturers WHERE id = ?1", COLUMNS);
    Ok(conn.query_row(&sql, params![id], from_row).optional()?)
}

/// Insert without a pre-check; the UNIQUE(name, year) constraint decides
pub fn insert(conn: &Connection, key: &ManufacturerKey) -> Result<Manufacturer> {
    let id = next_id(conn)?;
    conn.execute(
        "INSERT INTO manufacturers (id, name, year) VALUES (?1, ?2, ?3)",
        params![id, key.name, key.year],
    )
    .or_already_exists(&NaturalKey::from(key))?;

    Ok(Manufacturer {
        id,
        name: key.name.clone(),
        year: key.year,
    })
}

/// Strict create: fails with `AlreadyExists` if the key is taken
pub fn create(conn: &Connection, key: &ManufacturerKey) -> Result<Manufacturer> {
    let natural: NaturalKey = key.into();
    natural.validate()?;
    if identity::resolve(conn, &natural)?.is_some() {
        return Err(CatalogError::already_exists(&natural));
    }
    insert(conn, key)
}

/// Rename or re-year a manufacturer
///
/// The new key is checked against every row except the one being updated,
/// so re-saving the current key is a no-op.
pub fn update(conn: &Connection, id: i64, key: &ManufacturerKey) -> Result<Manufacturer> {
    let natural: NaturalKey = key.into();
    natural.validate()?;

    if let Some(owner) = identity::resolve(conn, &natural)?.and_then(|r| r.id()) {
        if owner != id {
            return Err(CatalogError::already_exists(&natural));
        }
    }

    let changed = conn
        .execute(
            "UPDATE manufacturers SET name = ?1, year = ?2 WHERE id = ?3",
            params![key.name, key.year, id],
        )
        .or_already_exists(&natural)?;
    if changed == 0 {
        return Err(CatalogError::not_found_id(EntityKind::Manufacturer, id));
    }

    Ok(Manufacturer {
        id,
        name: key.name.clone(),
        year: key.year,
    })
}

/// Delete the manufacturer row only; dependents must already be gone
pub fn delete_row(conn: &Connection, id: i64) -> Result<usize> {
    Ok(conn.execute("DELETE FROM manufacturers WHERE id = ?1", params![id])?)
}

/// Ids of every year-version sharing `name`
pub fn ids_by_name(conn: &Connection, name: &str) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT id FROM manufacturers WHERE name = ?1 ORDER BY year")?;
    let ids = stmt
        .query_map(params![name], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()?;
    Ok(ids)
}

/// List manufacturers, optionally restricted to names starting with `prefix`
pub fn list(conn: &Connection, prefix: Option<&str>, page: &PageRequest) -> Result<Vec<Manufacturer>> {
    let sql = format!(
        "SELECT {} FROM manufacturers WHERE (?1 IS NULL OR substr(name, 1, length(?1)) = ?1){}",
        COLUMNS,
        page.sql_suffix(sort_column, "id")?
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![prefix], from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Every year-version of the manufacturer called `name`
pub fn list_by_name(conn: &Connection, name: &str, page: &PageRequest) -> Result<Vec<Manufacturer>> {
    let sql = format!(
        "SELECT {} FROM manufacturers WHERE name = ?1{}",
        COLUMNS,
        page.sql_suffix(sort_column, "id")?
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![name], from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Distinct manufacturer names, alphabetical
pub fn list_names(conn: &Connection, page: &PageRequest) -> Result<Vec<String>> {
    let sql = format!(
        "SELECT DISTINCT name FROM manufacturers{}",
        page.sql_suffix(|_| Some("name"), "name")?
    );
    let mut stmt = conn.prepare(&sql)?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(names)
}

impl Entity for Manufacturer {
    const KIND: EntityKind = EntityKind::Manufacturer;
    type Key = ManufacturerKey;

    fn id(&self) -> i64 {
        self.id
    }

    fn natural_key(key: &ManufacturerKey) -> NaturalKey {
        key.into()
    }

    fn find_by_key(conn: &Connection, key: &ManufacturerKey) -> Result<Option<Self>> {
        find_by_key(conn, key)
    }

    fn insert(conn: &Connection, key: &ManufacturerKey) -> Result<Self> {
        insert(conn, key)
    }
}
