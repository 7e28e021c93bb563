//! Car/category membership join
//!
//! The join table is the single source of truth for the many-to-many
//! relationship. "A car's categories" and "a category's cars" are both read
//! from it; neither side keeps its own collection.

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::identity::NaturalKey;
use crate::core::store::constraint::ConstraintExt;
use crate::entities::category::{self, Category};

/// One (car, category) edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryMembership {
    pub car_id: i64,
    pub category_id: i64,
}

/// Link a car to a category; `key` names the pair if it is already linked
pub fn insert(conn: &Connection, car_id: i64, category_id: i64, key: &NaturalKey) -> Result<CategoryMembership> {
    conn.execute(
        "INSERT INTO car_categories (car_id, category_id) VALUES (?1, ?2)",
        params![car_id, category_id],
    )
    .or_already_exists(key)?;

    Ok(CategoryMembership {
        car_id,
        category_id,
    })
}

/// Remove one edge; returns the number of rows removed (0 or 1)
pub fn delete(conn: &Connection, car_id: i64, category_id: i64) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM car_categories WHERE car_id = ?1 AND category_id = ?2",
        params![car_id, category_id],
    )?)
}

pub fn delete_for_car(conn: &Connection, car_id: i64) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM car_categories WHERE car_id = ?1",
        params![car_id],
    )?)
}

pub fn delete_for_category(conn: &Connection, category_id: i64) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM car_categories WHERE category_id = ?1",
        params![category_id],
    )?)
}

/// Categories a car belongs to, by name
pub fn categories_of(conn: &Connection, car_id: i64) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        r#"SELECT ct.id, ct.name
           FROM car_categories cc
           JOIN categories ct ON ct.id = cc.category_id
           WHERE cc.car_id = ?1
           ORDER BY ct.name"#,
    )?;
    let rows = stmt
        .query_map(params![car_id], category::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}
