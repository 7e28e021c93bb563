//! Manufacturer operations

use tracing::info;

use super::Catalog;
use crate::core::error::{CatalogError, Result};
use crate::core::identity::{EntityKind, NaturalKey};
use crate::core::page::PageRequest;
use crate::entities::car::{self, CarFilter};
use crate::entities::manufacturer::{self, Manufacturer, ManufacturerKey, ManufacturerWithCars};

impl Catalog {
    /// Create a manufacturer; fails with `AlreadyExists` on a taken `(name, year)`
    pub fn create_manufacturer(&mut self, name: &str, year: i32) -> Result<Manufacturer> {
        info!(name, year, "create manufacturer");
        let key = ManufacturerKey::new(name, year);
        self.store.write(|tx| manufacturer::create(tx, &key))
    }

    /// Find a manufacturer by natural key
    pub fn find_manufacturer(&self, name: &str, year: i32) -> Result<Manufacturer> {
        let key = ManufacturerKey::new(name, year);
        manufacturer::find_by_key(self.store.conn(), &key)?
            .ok_or_else(|| CatalogError::not_found_key(&NaturalKey::from(&key)))
    }

    pub fn get_manufacturer(&self, id: i64) -> Result<Manufacturer> {
        manufacturer::find_by_id(self.store.conn(), id)?
            .ok_or_else(|| CatalogError::not_found_id(EntityKind::Manufacturer, id))
    }

    /// Change a manufacturer's name and/or year
    ///
    /// Its cars follow along, so their triples change with it.
    pub fn update_manufacturer(&mut self, id: i64, name: &str, year: i32) -> Result<Manufacturer> {
        info!(id, name, year, "update manufacturer");
        let key = ManufacturerKey::new(name, year);
        self.store.write(|tx| manufacturer::update(tx, id, &key))
    }

    /// Manufacturers, optionally restricted to names starting with `prefix`
    pub fn list_manufacturers(&self, prefix: Option<&str>, page: &PageRequest) -> Result<Vec<Manufacturer>> {
        manufacturer::list(self.store.conn(), prefix, page)
    }

    /// Distinct manufacturer names
    pub fn list_manufacturer_names(&self, page: &PageRequest) -> Result<Vec<String>> {
        manufacturer::list_names(self.store.conn(), page)
    }

    /// Every year-version of a manufacturer, each with its cars
    pub fn list_manufacturers_by_name(
        &self,
        name: &str,
        page: &PageRequest,
    ) -> Result<Vec<ManufacturerWithCars>> {
        let conn = self.store.conn();
        manufacturer::list_by_name(conn, name, page)?
            .into_iter()
            .map(|mf| {
                let cars = car::all(conn, CarFilter::Manufacturer(mf.id))?;
                Ok(ManufacturerWithCars {
                    manufacturer: mf,
                    cars,
                })
            })
            .collect()
    }
}
