//! Category entity and its store
//!
//! A category does not store its cars; they are derived from the
//! `car_categories` join (see [`crate::entities::membership`]).

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::error::{CatalogError, Result};
use crate::core::identity::{self, EntityKind, NaturalKey};
use crate::core::page::{PageRequest, SortKey};
use crate::core::store::constraint::ConstraintExt;
use crate::core::store::next_id;
use crate::entities::car::Car;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryWithCars {
    #[serde(flatten)]
    pub category: Category,
    pub cars: Vec<Car>,
}

pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
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

pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Category>> {
    Ok(conn
        .query_row(
            "SELECT id, name FROM categories WHERE name = ?1",
            params![name],
            from_row,
        )
        .optional()?)
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Category>> {
    Ok(conn
        .query_row(
            "SELECT id, name FROM categories WHERE id = ?1",
            params![id],
            from_row,
        )
        .optional()?)
}

pub fn insert(conn: &Connection, name: &str) -> Result<Category> {
    let id = next_id(conn)?;
    conn.execute(
        "INSERT INTO categories (id, name) VALUES (?1, ?2)",
        params![id, name],
    )
    .or_already_exists(&NaturalKey::category(name))?;

    Ok(Category {
        id,
        name: name.to_string(),
    })
}

/// Strict create: fails with `AlreadyExists` if the name is taken
pub fn create(conn: &Connection, name: &str) -> Result<Category> {
    let key = NaturalKey::category(name);
    key.validate()?;
    if identity::resolve(conn, &key)?.is_some() {
        return Err(CatalogError::already_exists(&key));
    }
    insert(conn, name)
}

/// Rename a category; the new name must not belong to another category
pub fn update(conn: &Connection, id: i64, name: &str) -> Result<Category> {
    let key = NaturalKey::category(name);
    key.validate()?;

    if let Some(owner) = identity::resolve(conn, &key)?.and_then(|r| r.id()) {
        if owner != id {
            return Err(CatalogError::already_exists(&key));
        }
    }

    let changed = conn
        .execute(
            "UPDATE categories SET name = ?1 WHERE id = ?2",
            params![name, id],
        )
        .or_already_exists(&key)?;
    if changed == 0 {
        return Err(CatalogError::not_found_id(EntityKind::Category, id));
    }

    Ok(Category {
        id,
        name: name.to_string(),
    })
}

/// Delete the category row only; memberships must already be gone
pub fn delete_row(conn: &Connection, id: i64) -> Result<usize> {
    Ok(conn.execute("DELETE FROM categories WHERE id = ?1", params![id])?)
}

pub fn list(conn: &Connection, prefix: Option<&str>, page: &PageRequest) -> Result<Vec<Category>> {
    let sql = format!(
        "SELECT id, name FROM categories WHERE (?1 IS NULL OR substr(name, 1, length(?1)) = ?1){}",
        page.sql_suffix(sort_column, "id")?
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![prefix], from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

impl Entity for Category {
    const KIND: EntityKind = EntityKind::Category;
    type Key = str;

    fn id(&self) -> i64 {
        self.id
    }

    fn natural_key(name: &str) -> NaturalKey {
        NaturalKey::category(name)
    }

    fn find_by_key(conn: &Connection, name: &str) -> Result<Option<Self>> {
        find_by_name(conn, name)
    }

    fn insert(conn: &Connection, name: &str) -> Result<Self> {
        insert(conn, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::CatalogStore;

    #[test]
    fn test_create_and_find() {
        let mut store = CatalogStore::open_in_memory().unwrap();
        let wagon = store.write(|tx| create(tx, "Wagon")).unwrap();

        assert_eq!(find_by_name(store.conn(), "Wagon").unwrap(), Some(wagon.clone()));
        assert_eq!(find_by_id(store.conn(), wagon.id).unwrap(), Some(wagon));
        assert!(find_by_name(store.conn(), "Sedan").unwrap().is_none());
    }

    #[test]
    fn test_rename_onto_existing_name() {
        let mut store = CatalogStore::open_in_memory().unwrap();
        let (_wagon, sedan) = store
            .write(|tx| Ok((create(tx, "Wagon")?, create(tx, "Sedan")?)))
            .unwrap();

        let err = store.write(|tx| update(tx, sedan.id, "Wagon")).unwrap_err();
        assert!(err.is_already_exists());
    }

    #[test]
    fn test_list_pages() {
        let mut store = CatalogStore::open_in_memory().unwrap();
        store
            .write(|tx| {
                for name in ["Wagon", "Sedan", "Coupe"] {
                    create(tx, name)?;
                }
                Ok(())
            })
            .unwrap();

        let page = PageRequest::new(0, 2).sorted(SortKey::Name, Default::default());
        let first: Vec<_> = list(store.conn(), None, &page)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(first, vec!["Coupe", "Sedan"]);

        let page = PageRequest::new(1, 2).sorted(SortKey::Name, Default::default());
        let second = list(store.conn(), None, &page).unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].name, "Wagon");
    }
}
