//! Car entity and its row-level store
//!
//! A car has no identity fields of its own. Its logical identity is the
//! triple `(manufacturer.name, model.name, manufacturer.year)`, enforced by
//! `UNIQUE(manufacturer_id, model_id)` on the `cars` table.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde::Serialize;

use crate::core::error::Result;
use crate::core::identity::NaturalKey;
use crate::core::page::{PageRequest, SortKey};
use crate::core::store::constraint::ConstraintExt;
use crate::core::store::next_id;
use crate::entities::category::Category;
use crate::entities::manufacturer::Manufacturer;
use crate::entities::membership;
use crate::entities::model::Model;

/// A car with its manufacturer, model and categories loaded
///
/// `categories` is derived from the membership join on every load and is
/// ordered by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Car {
    pub id: i64,
    pub manufacturer: Manufacturer,
    pub model: Model,
    pub categories: Vec<Category>,
}

impl Car {
    /// Model year, carried by the manufacturer
    pub fn year(&self) -> i32 {
        self.manufacturer.year
    }

    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey::car(
            self.manufacturer.name.as_str(),
            self.model.name.as_str(),
            self.manufacturer.year,
        )
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Which cars a listing returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarFilter<'a> {
    All,
    /// Cars of every year-version of a manufacturer name
    ManufacturerName(&'a str),
    /// Same, restricted to model years `>= min_year`
    ManufacturerSince { name: &'a str, min_year: i32 },
    /// Cars of one manufacturer row
    Manufacturer(i64),
    Model(i64),
    /// Cars holding a membership in the category
    Category(i64),
}

impl CarFilter<'_> {
    fn where_clause(&self) -> (&'static str, Vec<Value>) {
        match *self {
            CarFilter::All => ("", Vec::new()),
            CarFilter::ManufacturerName(name) => {
                (" WHERE mf.name = ?1", vec![Value::Text(name.to_string())])
            }
            CarFilter::ManufacturerSince { name, min_year } => (
                " WHERE mf.name = ?1 AND mf.year >= ?2",
                vec![Value::Text(name.to_string()), Value::Integer(min_year as i64)],
            ),
            CarFilter::Manufacturer(id) => (" WHERE c.manufacturer_id = ?1", vec![Value::Integer(id)]),
            CarFilter::Model(id) => (" WHERE c.model_id = ?1", vec![Value::Integer(id)]),
            CarFilter::Category(id) => (
                " WHERE c.id IN (SELECT car_id FROM car_categories WHERE category_id = ?1)",
                vec![Value::Integer(id)],
            ),
        }
    }
}

const SELECT: &str = r#"SELECT c.id, mf.id, mf.name, mf.year, m.id, m.name
    FROM cars c
    JOIN manufacturers mf ON mf.id = c.manufacturer_id
    JOIN models m ON m.id = c.model_id"#;

fn from_row(row: &Row<'_>) -> rusqlite::Result<Car> {
    Ok(Car {
        id: row.get(0)?,
        manufacturer: Manufacturer {
            id: row.get(1)?,
            name: row.get(2)?,
            year: row.get(3)?,
        },
        model: Model {
            id: row.get(4)?,
            name: row.get(5)?,
        },
        categories: Vec::new(),
    })
}

fn sort_column(key: SortKey) -> Option<&'static str> {
    match key {
        SortKey::Id => None,
        SortKey::Name => Some("mf.name"),
        SortKey::Year => Some("mf.year"),
    }
}

fn with_categories(conn: &Connection, mut cars: Vec<Car>) -> Result<Vec<Car>> {
    for car in &mut cars {
        car.categories = membership::categories_of(conn, car.id)?;
    }
    Ok(cars)
}

/// Insert a car row referencing existing manufacturer and model rows
///
/// `key` names the triple in the error if the row already exists.
pub fn insert(conn: &Connection, manufacturer_id: i64, model_id: i64, key: &NaturalKey) -> Result<i64> {
    let id = next_id(conn)?;
    conn.execute(
        "INSERT INTO cars (id, manufacturer_id, model_id) VALUES (?1, ?2, ?3)",
        params![id, manufacturer_id, model_id],
    )
    .or_already_exists(key)?;
    Ok(id)
}

pub fn exists(conn: &Connection, id: i64) -> Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM cars WHERE id = ?1", params![id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

/// Load a car with manufacturer, model and categories
pub fn load(conn: &Connection, id: i64) -> Result<Option<Car>> {
    let sql = format!("{} WHERE c.id = ?1", SELECT);
    let car = conn.query_row(&sql, params![id], from_row).optional()?;
    match car {
        Some(mut car) => {
            car.categories = membership::categories_of(conn, car.id)?;
            Ok(Some(car))
        }
        None => Ok(None),
    }
}

/// Point a car at another manufacturer/model; memberships are untouched
pub fn set_refs(
    conn: &Connection,
    id: i64,
    manufacturer_id: i64,
    model_id: i64,
    key: &NaturalKey,
) -> Result<usize> {
    conn.execute(
        "UPDATE cars SET manufacturer_id = ?1, model_id = ?2 WHERE id = ?3",
        params![manufacturer_id, model_id, id],
    )
    .or_already_exists(key)
}

/// Delete the car row only; memberships must already be gone
pub fn delete_row(conn: &Connection, id: i64) -> Result<usize> {
    Ok(conn.execute("DELETE FROM cars WHERE id = ?1", params![id])?)
}

/// One page of cars matching `filter`
pub fn list(conn: &Connection, filter: CarFilter<'_>, page: &PageRequest) -> Result<Vec<Car>> {
    let (clause, values) = filter.where_clause();
    let sql = format!("{}{}{}", SELECT, clause, page.sql_suffix(sort_column, "c.id")?);
    let mut stmt = conn.prepare(&sql)?;
    let cars = stmt
        .query_map(params_from_iter(values), from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    with_categories(conn, cars)
}

/// Every car matching `filter`, by id
pub fn all(conn: &Connection, filter: CarFilter<'_>) -> Result<Vec<Car>> {
    let (clause, values) = filter.where_clause();
    let sql = format!("{}{} ORDER BY c.id", SELECT, clause);
    let mut stmt = conn.prepare(&sql)?;
    let cars = stmt
        .query_map(params_from_iter(values), from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    with_categories(conn, cars)
}

pub fn ids_by_manufacturer(conn: &Connection, manufacturer_id: i64) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT id FROM cars WHERE manufacturer_id = ?1 ORDER BY id")?;
    let ids = stmt
        .query_map(params![manufacturer_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()?;
    Ok(ids)
}

pub fn count_by_model(conn: &Connection, model_id: i64) -> Result<u64> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM cars WHERE model_id = ?1",
        params![model_id],
        |row| row.get(0),
    )?;
    Ok(n as u64)
}
