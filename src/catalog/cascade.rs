//! Delete paths
//!
//! One rule per kind:
//! - car: its memberships, then the car. Never blocked.
//! - manufacturer: every car it owns (with their memberships), then the
//!   manufacturer. The by-name variant applies this to every year-version.
//! - model: blocked with `Conflict` while any car references it.
//! - category: its memberships, then the category. Cars are untouched.
//!
//! No reference cascades in SQLite, so a path that forgot a dependent fails
//! with a foreign key violation instead of orphaning rows. Each public method runs in one
//! transaction: a failure part-way leaves nothing deleted.

use rusqlite::Connection;
use tracing::{debug, info};

use super::{Catalog, DeleteStats};
use crate::core::error::{CatalogError, Result};
use crate::core::identity::{EntityKind, NaturalKey};
use crate::entities::car;
use crate::entities::category;
use crate::entities::manufacturer::{self, ManufacturerKey};
use crate::entities::membership;
use crate::entities::model;

fn delete_car_in(conn: &Connection, car_id: i64) -> Result<DeleteStats> {
    let memberships = membership::delete_for_car(conn, car_id)?;
    let cars = car::delete_row(conn, car_id)?;
    Ok(DeleteStats {
        cars,
        memberships,
        ..Default::default()
    })
}

fn delete_manufacturer_in(conn: &Connection, manufacturer_id: i64) -> Result<DeleteStats> {
    let mut stats = DeleteStats::default();
    for car_id in car::ids_by_manufacturer(conn, manufacturer_id)? {
        stats.absorb(delete_car_in(conn, car_id)?);
    }
    stats.manufacturers = manufacturer::delete_row(conn, manufacturer_id)?;
    debug!(
        manufacturer_id,
        cars = stats.cars,
        memberships = stats.memberships,
        "manufacturer cascade"
    );
    Ok(stats)
}

impl Catalog {
    /// Delete a car and its memberships
    pub fn delete_car(&mut self, car_id: i64) -> Result<DeleteStats> {
        info!(car_id, "delete car");
        self.store.write(|tx| delete_car_in(tx, car_id))
    }

    /// Delete one manufacturer year-version with all of its cars
    pub fn delete_manufacturer(&mut self, name: &str, year: i32) -> Result<DeleteStats> {
        info!(name, year, "delete manufacturer");
        let key = ManufacturerKey::new(name, year);
        self.store.write(|tx| match manufacturer::find_by_key(tx, &key)? {
            Some(found) => delete_manufacturer_in(tx, found.id),
            None => Ok(DeleteStats::default()),
        })
    }

    /// Delete every year-version of a manufacturer with all of their cars
    pub fn delete_manufacturers_by_name(&mut self, name: &str) -> Result<DeleteStats> {
        info!(name, "delete manufacturer (all years)");
        self.store.write(|tx| {
            let mut stats = DeleteStats::default();
            for id in manufacturer::ids_by_name(tx, name)? {
                stats.absorb(delete_manufacturer_in(tx, id)?);
            }
            Ok(stats)
        })
    }

    /// Delete a model that no car references
    ///
    /// Fails with `Conflict` while cars still use it; delete or re-point
    /// those cars first.
    pub fn delete_model(&mut self, name: &str) -> Result<DeleteStats> {
        info!(name, "delete model");
        self.store.write(|tx| {
            let found = match model::find_by_name(tx, name)? {
                Some(found) => found,
                None => return Ok(DeleteStats::default()),
            };

            let dependents = car::count_by_model(tx, found.id)?;
            if dependents > 0 {
                return Err(CatalogError::Conflict {
                    kind: EntityKind::Model,
                    key: NaturalKey::model(name).to_string(),
                    reason: format!("{} car(s) still reference it", dependents),
                });
            }

            Ok(DeleteStats {
                models: model::delete_row(tx, &found)?,
                ..Default::default()
            })
        })
    }

    /// Delete a category and its memberships; cars stay
    pub fn delete_category(&mut self, name: &str) -> Result<DeleteStats> {
        info!(name, "delete category");
        self.store.write(|tx| {
            let found = match category::find_by_name(tx, name)? {
                Some(found) => found,
                None => return Ok(DeleteStats::default()),
            };

            let memberships = membership::delete_for_category(tx, found.id)?;
            let categories = category::delete_row(tx, found.id)?;
            debug!(category = name, memberships, "category cascade");
            Ok(DeleteStats {
                categories,
                memberships,
                ..Default::default()
            })
        })
    }
}
