//! Entity identity: kinds, natural keys and the identity resolver
//!
//! Surrogate ids are opaque and assigned by the store. What makes two requests
//! refer to the "same" entity is its natural key:
//!
//! | kind         | natural key                                   |
//! |--------------|-----------------------------------------------|
//! | manufacturer | `(name, year)`                                |
//! | model        | `name` (global, not scoped to a manufacturer) |
//! | category     | `name`                                        |
//! | car          | `(manufacturer.name, model.name, manufacturer.year)` |
//! | membership   | `(car, category)`                             |

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::{CatalogError, Result};

/// The entity kinds managed by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Manufacturer,
    Model,
    Category,
    Car,
    /// Car-to-category join record
    Membership,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Manufacturer => "manufacturer",
            EntityKind::Model => "model",
            EntityKind::Category => "category",
            EntityKind::Car => "car",
            EntityKind::Membership => "category membership",
        }
    }

    /// Backing table for this kind
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Manufacturer => "manufacturers",
            EntityKind::Model => "models",
            EntityKind::Category => "categories",
            EntityKind::Car => "cars",
            EntityKind::Membership => "car_categories",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manufacturer" => Ok(EntityKind::Manufacturer),
            "model" => Ok(EntityKind::Model),
            "category" => Ok(EntityKind::Category),
            "car" => Ok(EntityKind::Car),
            "membership" => Ok(EntityKind::Membership),
            _ => Err(CatalogError::InvalidInput(format!(
                "unknown entity kind '{}' (valid: manufacturer, model, category, car, membership)",
                s
            ))),
        }
    }
}

/// The attributes that determine an entity's real-world identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NaturalKey {
    Manufacturer {
        name: String,
        year: i32,
    },
    Model {
        name: String,
    },
    Category {
        name: String,
    },
    Car {
        manufacturer: String,
        model: String,
        year: i32,
    },
    Membership {
        car_id: i64,
        category: String,
    },
}

impl NaturalKey {
    pub fn manufacturer(name: impl Into<String>, year: i32) -> Self {
        NaturalKey::Manufacturer {
            name: name.into(),
            year,
        }
    }

    pub fn model(name: impl Into<String>) -> Self {
        NaturalKey::Model { name: name.into() }
    }

    pub fn category(name: impl Into<String>) -> Self {
        NaturalKey::Category { name: name.into() }
    }

    pub fn car(manufacturer: impl Into<String>, model: impl Into<String>, year: i32) -> Self {
        NaturalKey::Car {
            manufacturer: manufacturer.into(),
            model: model.into(),
            year,
        }
    }

    pub fn membership(car_id: i64, category: impl Into<String>) -> Self {
        NaturalKey::Membership {
            car_id,
            category: category.into(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            NaturalKey::Manufacturer { .. } => EntityKind::Manufacturer,
            NaturalKey::Model { .. } => EntityKind::Model,
            NaturalKey::Category { .. } => EntityKind::Category,
            NaturalKey::Car { .. } => EntityKind::Car,
            NaturalKey::Membership { .. } => EntityKind::Membership,
        }
    }

    /// Reject keys with blank name components
    pub fn validate(&self) -> Result<()> {
        let names: Vec<(&str, &str)> = match self {
            NaturalKey::Manufacturer { name, .. } => vec![("manufacturer name", name.as_str())],
            NaturalKey::Model { name } => vec![("model name", name.as_str())],
            NaturalKey::Category { name } => vec![("category name", name.as_str())],
            NaturalKey::Car {
                manufacturer,
                model,
                ..
            } => vec![
                ("manufacturer name", manufacturer.as_str()),
                ("model name", model.as_str()),
            ],
            NaturalKey::Membership { category, .. } => vec![("category name", category.as_str())],
        };

        for (field, value) in names {
            if value.trim().is_empty() {
                return Err(CatalogError::InvalidInput(format!("{} must not be blank", field)));
            }
        }
        Ok(())
    }
}

impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NaturalKey::Manufacturer { name, year } => write!(f, "name={}, year={}", name, year),
            NaturalKey::Model { name } | NaturalKey::Category { name } => write!(f, "name={}", name),
            NaturalKey::Car {
                manufacturer,
                model,
                year,
            } => write!(
                f,
                "manufacturer={}, model={}, year={}",
                manufacturer, model, year
            ),
            NaturalKey::Membership { car_id, category } => {
                write!(f, "car={}, category={}", car_id, category)
            }
        }
    }
}

/// Reference to an existing row found by the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Manufacturer(i64),
    Model(i64),
    Category(i64),
    Car(i64),
    Membership { car_id: i64, category_id: i64 },
}

impl EntityRef {
    /// Surrogate id of the row, if the kind has a single-column id
    pub fn id(&self) -> Option<i64> {
        match self {
            EntityRef::Manufacturer(id)
            | EntityRef::Model(id)
            | EntityRef::Category(id)
            | EntityRef::Car(id) => Some(*id),
            EntityRef::Membership { .. } => None,
        }
    }
}

/// Look up an existing entity by natural key
///
/// A pure read: never writes. Returns `None` when no row owns the key.
pub fn resolve(conn: &Connection, key: &NaturalKey) -> Result<Option<EntityRef>> {
    let found = match key {
        NaturalKey::Manufacturer { name, year } => conn
            .query_row(
                "SELECT id FROM manufacturers WHERE name = ?1 AND year = ?2",
                params![name, year],
                |row| row.get(0),
            )
            .optional()?
            .map(EntityRef::Manufacturer),
        NaturalKey::Model { name } => conn
            .query_row(
                "SELECT id FROM models WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?
            .map(EntityRef::Model),
        NaturalKey::Category { name } => conn
            .query_row(
                "SELECT id FROM categories WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?
            .map(EntityRef::Category),
        NaturalKey::Car {
            manufacturer,
            model,
            year,
        } => conn
            .query_row(
                r#"SELECT c.id
                   FROM cars c
                   JOIN manufacturers mf ON mf.id = c.manufacturer_id
                   JOIN models m ON m.id = c.model_id
                   WHERE mf.name = ?1 AND m.name = ?2 AND mf.year = ?3"#,
                params![manufacturer, model, year],
                |row| row.get(0),
            )
            .optional()?
            .map(EntityRef::Car),
        NaturalKey::Membership { car_id, category } => conn
            .query_row(
                r#"SELECT cc.car_id, cc.category_id
                   FROM car_categories cc
                   JOIN categories ct ON ct.id = cc.category_id
                   WHERE cc.car_id = ?1 AND ct.name = ?2"#,
                params![car_id, category],
                |row| {
                    Ok(EntityRef::Membership {
                        car_id: row.get(0)?,
                        category_id: row.get(1)?,
                    })
                },
            )
            .optional()?,
    };

    Ok(found)
}
