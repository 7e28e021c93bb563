//! Database schema initialization

use rusqlite::{params, OptionalExtension};

use super::CatalogStore;
use crate::core::error::{CatalogError, Result};

/// Current schema version
///
/// The catalog is the source of truth, so a mismatching version is refused
/// rather than rebuilt.
pub const SCHEMA_VERSION: i32 = 1;

impl CatalogStore {
    /// Create the schema on a fresh database, or verify an existing one
    pub(super) fn ensure_schema(&mut self) -> Result<()> {
        let has_version_table: bool = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
                [],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

        if has_version_table {
            let found: Option<i32> = self
                .conn
                .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                    row.get(0)
                })
                .optional()?;

            match found {
                Some(version) if version == SCHEMA_VERSION => return Ok(()),
                Some(version) => {
                    return Err(CatalogError::SchemaMismatch {
                        found: version,
                        expected: SCHEMA_VERSION,
                    })
                }
                // Table exists but was never stamped: finish initialization
                None => {}
            }
        }

        self.init_schema()
    }

    fn init_schema(&mut self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Surrogate id sequence shared by every entity kind
            CREATE TABLE IF NOT EXISTS id_sequence (
                singleton INTEGER PRIMARY KEY CHECK (singleton = 1),
                next_id INTEGER NOT NULL
            );
            INSERT OR IGNORE INTO id_sequence (singleton, next_id) VALUES (1, 1);

            -- Manufacturers are versioned by model year
            CREATE TABLE IF NOT EXISTS manufacturers (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                year INTEGER NOT NULL,
                UNIQUE (name, year)
            );

            -- Model names are global, shared across manufacturers
            CREATE TABLE IF NOT EXISTS models (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            );

            -- Foreign keys use the default NO ACTION so a blocked delete reports
            -- SQLITE_CONSTRAINT_FOREIGNKEY; cascades are done by the catalog.
            -- A manufacturer row is unique by (name, year), so the car triple
            -- (manufacturer, model, year) is unique iff (manufacturer_id, model_id) is.
            CREATE TABLE IF NOT EXISTS cars (
                id INTEGER PRIMARY KEY,
                manufacturer_id INTEGER NOT NULL
                    REFERENCES manufacturers(id),
                model_id INTEGER NOT NULL
                    REFERENCES models(id),
                UNIQUE (manufacturer_id, model_id)
            );
            CREATE INDEX IF NOT EXISTS idx_cars_model ON cars(model_id);

            -- Car/category join: the only place the relationship is stored
            CREATE TABLE IF NOT EXISTS car_categories (
                car_id INTEGER NOT NULL
                    REFERENCES cars(id),
                category_id INTEGER NOT NULL
                    REFERENCES categories(id),
                PRIMARY KEY (car_id, category_id)
            );
            CREATE INDEX IF NOT EXISTS idx_car_categories_category ON car_categories(category_id);
            "#,
        )?;

        self.conn.execute(
            "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;

        Ok(())
    }
}
