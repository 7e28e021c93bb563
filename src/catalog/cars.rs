//! Car identity and lifecycle
//!
//! A car is created or re-pointed only after its manufacturer and model have
//! been found or implicitly created, all inside one transaction. The
//! resolver pre-check produces the attributable `AlreadyExists`; the
//! `UNIQUE(manufacturer_id, model_id)` constraint is what actually holds
//! the line against a concurrent duplicate.

use rusqlite::Connection;
use tracing::info;

use super::Catalog;
use crate::core::entity::find_or_create;
use crate::core::error::{CatalogError, Result};
use crate::core::identity::{self, EntityKind, NaturalKey};
use crate::core::page::PageRequest;
use crate::entities::car::{self, Car, CarFilter};
use crate::entities::manufacturer::{Manufacturer, ManufacturerKey};
use crate::entities::model::Model;

/// Load a car that is known to exist inside the current transaction
pub(super) fn reload(conn: &Connection, id: i64) -> Result<Car> {
    car::load(conn, id)?.ok_or_else(|| CatalogError::not_found_id(EntityKind::Car, id))
}

/// Find-or-create the manufacturer and model a car triple refers to
fn resolve_refs(conn: &Connection, manufacturer: &str, model: &str, year: i32) -> Result<(i64, i64)> {
    let mf = find_or_create::<Manufacturer>(conn, &ManufacturerKey::new(manufacturer, year))?;
    let m = find_or_create::<Model>(conn, model)?;
    Ok((mf.id, m.id))
}

impl Catalog {
    /// Create a car, implicitly creating its manufacturer and model
    ///
    /// Fails with `AlreadyExists` naming the triple if a car already has it.
    pub fn create_car(&mut self, manufacturer: &str, model: &str, year: i32) -> Result<Car> {
        info!(manufacturer, model, year, "create car");
        let key = NaturalKey::car(manufacturer, model, year);
        key.validate()?;

        self.store.write(|tx| {
            if identity::resolve(tx, &key)?.is_some() {
                return Err(CatalogError::already_exists(&key));
            }

            let (manufacturer_id, model_id) = resolve_refs(tx, manufacturer, model, year)?;
            let id = car::insert(tx, manufacturer_id, model_id, &key)?;
            reload(tx, id)
        })
    }

    /// Re-point a car at another manufacturer/model/year
    ///
    /// The collision check runs first: a triple owned by another car is
    /// `AlreadyExists` even if `car_id` does not exist. Re-saving the car's
    /// own triple returns it unchanged. Category memberships are untouched.
    pub fn update_car(&mut self, car_id: i64, manufacturer: &str, model: &str, year: i32) -> Result<Car> {
        info!(car_id, manufacturer, model, year, "update car");
        let key = NaturalKey::car(manufacturer, model, year);
        key.validate()?;

        self.store.write(|tx| {
            if let Some(owner) = identity::resolve(tx, &key)?.and_then(|r| r.id()) {
                if owner != car_id {
                    return Err(CatalogError::already_exists(&key));
                }
                return reload(tx, car_id);
            }

            if !car::exists(tx, car_id)? {
                return Err(CatalogError::not_found_id(EntityKind::Car, car_id));
            }

            let (manufacturer_id, model_id) = resolve_refs(tx, manufacturer, model, year)?;
            car::set_refs(tx, car_id, manufacturer_id, model_id, &key)?;
            reload(tx, car_id)
        })
    }

    pub fn get_car(&self, id: i64) -> Result<Car> {
        reload(self.store.conn(), id)
    }

    /// Find a car by its triple
    pub fn find_car(&self, manufacturer: &str, model: &str, year: i32) -> Result<Car> {
        let key = NaturalKey::car(manufacturer, model, year);
        match identity::resolve(self.store.conn(), &key)?.and_then(|r| r.id()) {
            Some(id) => self.get_car(id),
            None => Err(CatalogError::not_found_key(&key)),
        }
    }

    pub fn list_cars(&self, page: &PageRequest) -> Result<Vec<Car>> {
        car::list(self.store.conn(), CarFilter::All, page)
    }

    /// Cars of every year-version of a manufacturer
    pub fn list_cars_by_manufacturer(&self, name: &str, page: &PageRequest) -> Result<Vec<Car>> {
        car::list(self.store.conn(), CarFilter::ManufacturerName(name), page)
    }

    /// Cars of a manufacturer with model year `>= min_year`
    pub fn list_cars_by_manufacturer_min_year(
        &self,
        name: &str,
        min_year: i32,
        page: &PageRequest,
    ) -> Result<Vec<Car>> {
        car::list(
            self.store.conn(),
            CarFilter::ManufacturerSince { name, min_year },
            page,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::EntityRef;
    use crate::core::store::StoreOptions;
    use std::sync::{Arc, Barrier};
    use std::thread;
    use tempfile::tempdir;

    #[test]
    fn test_walkthrough() {
        let mut catalog = Catalog::open_in_memory().unwrap();

        let acura = catalog.create_manufacturer("Acura", 2017).unwrap();
        let regal = catalog.create_model("Regal").unwrap();
        assert_eq!((acura.id, regal.id), (1, 2));

        let car = catalog.create_car("Acura", "Regal", 2017).unwrap();
        assert_eq!(car.id, 3);
        assert_eq!((car.manufacturer.id, car.model.id), (1, 2));
        assert!(car.categories.is_empty());

        let car = catalog.add_category(3, "Wagon").unwrap();
        assert_eq!(car.categories.len(), 1);
        assert_eq!(car.categories[0].id, 4);
        assert_eq!(car.category_names(), vec!["Wagon"]);
        assert_eq!(
            catalog.resolve(&NaturalKey::membership(3, "Wagon")).unwrap(),
            Some(EntityRef::Membership {
                car_id: 3,
                category_id: 4
            })
        );

        let err = catalog.create_car("Acura", "Regal", 2017).unwrap_err();
        assert!(err.is_already_exists());

        let removed = catalog.delete_car(3).unwrap();
        assert_eq!((removed.cars, removed.memberships), (1, 1));
        assert!(catalog
            .resolve(&NaturalKey::membership(3, "Wagon"))
            .unwrap()
            .is_none());

        assert!(catalog.add_category(3, "Wagon").unwrap_err().is_not_found());
    }

    #[test]
    fn test_repeated_create_leaves_one_of_each() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        catalog.create_car("Acura", "Regal", 2017).unwrap();
        let err = catalog.create_car("Acura", "Regal", 2017).unwrap_err();

        assert!(err.is_already_exists());
        let msg = err.to_string();
        assert!(msg.contains("Acura") && msg.contains("Regal") && msg.contains("2017"));

        let stats = catalog.statistics().unwrap();
        assert_eq!((stats.manufacturers, stats.models, stats.cars), (1, 1, 1));
    }

    #[test]
    fn test_create_reuses_existing_refs() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let acura = catalog.create_manufacturer("Acura", 2017).unwrap();
        let car = catalog.create_car("Acura", "Regal", 2017).unwrap();
        assert_eq!(car.manufacturer, acura);

        // Different year: a new manufacturer version, same model row
        let later = catalog.create_car("Acura", "Regal", 2020).unwrap();
        assert_ne!(later.manufacturer.id, acura.id);
        assert_eq!(later.model, car.model);
    }

    #[test]
    fn test_failed_create_leaves_no_implicit_rows() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let err = catalog.create_car("Acura", "", 2017).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidInput(_)));
        assert_eq!(catalog.statistics().unwrap().manufacturers, 0);
    }

    #[test]
    fn test_constraint_backs_up_the_pre_check() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let existing = catalog.create_car("Acura", "Regal", 2017).unwrap();
        let key = existing.natural_key();

        // Skip the resolver and go straight at the table, as a racing
        // writer that passed its own pre-check would
        let err = catalog
            .store
            .write(|tx| car::insert(tx, existing.manufacturer.id, existing.model.id, &key))
            .unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(catalog.statistics().unwrap().cars, 1);
    }

    #[test]
    fn test_update_car() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let car = catalog.create_car("Acura", "Regal", 2017).unwrap();
        let other = catalog.create_car("Buick", "Enclave", 2018).unwrap();
        catalog.add_category(car.id, "Wagon").unwrap();

        let moved = catalog.update_car(car.id, "Buick", "Regal", 2018).unwrap();
        assert_eq!(moved.manufacturer, other.manufacturer);
        assert_eq!(moved.category_names(), vec!["Wagon"]);

        // Own triple is a no-op
        let same = catalog.update_car(car.id, "Buick", "Regal", 2018).unwrap();
        assert_eq!(same, moved);

        // Another car's triple is taken
        let err = catalog
            .update_car(car.id, "Buick", "Enclave", 2018)
            .unwrap_err();
        assert!(err.is_already_exists());

        // Collision wins over a missing car
        let err = catalog.update_car(999, "Buick", "Enclave", 2018).unwrap_err();
        assert!(err.is_already_exists());

        let err = catalog.update_car(999, "Cadillac", "CTS", 2018).unwrap_err();
        assert!(err.is_not_found());
        assert!(catalog.find_manufacturer("Cadillac", 2018).is_err());
    }

    #[test]
    fn test_listings() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        catalog.create_car("Buick", "Regal", 2017).unwrap();
        catalog.create_car("Buick", "Enclave", 2020).unwrap();
        catalog.create_car("Acura", "TLX", 2020).unwrap();
        let page = PageRequest::default();

        assert_eq!(catalog.list_cars(&page).unwrap().len(), 3);
        assert_eq!(catalog.list_cars_by_manufacturer("Buick", &page).unwrap().len(), 2);

        let recent = catalog
            .list_cars_by_manufacturer_min_year("Buick", 2018, &page)
            .unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].model.name, "Enclave");

        let found = catalog.find_car("Acura", "TLX", 2020).unwrap();
        assert_eq!(found.model.name, "TLX");
        assert!(catalog.find_car("Acura", "TLX", 2017).unwrap_err().is_not_found());
    }

    #[test]
    fn test_out_of_range_page_is_invalid_input() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        catalog.create_car("Buick", "Regal", 2017).unwrap();

        let huge = PageRequest::new(u32::MAX, u32::MAX);
        let err = catalog.list_cars(&huge).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidInput(_)));
        let err = catalog.list_manufacturer_names(&huge).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidInput(_)));

        // Far past the end but representable: simply empty
        let far = PageRequest::new(u32::MAX, 2);
        assert!(catalog.list_cars(&far).unwrap().is_empty());
        assert!(catalog.list_manufacturer_names(&far).unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_create_car_has_one_winner() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("catalog.db");
        let options = StoreOptions::default();

        // Open both up front so schema setup is not part of the race
        let catalogs = vec![
            Catalog::open(&path, &options).unwrap(),
            Catalog::open(&path, &options).unwrap(),
        ];

        let barrier = Arc::new(Barrier::new(catalogs.len()));
        let handles: Vec<_> = catalogs
            .into_iter()
            .map(|mut catalog| {
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    catalog.create_car("Acura", "Regal", 2017)
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let winners = results.iter().filter(|r| r.is_ok()).count();
        let duplicates = results
            .iter()
            .filter(|r| matches!(r, Err(e) if e.is_already_exists()))
            .count();
        assert_eq!((winners, duplicates), (1, 1));

        let catalog = Catalog::open(&path, &options).unwrap();
        let stats = catalog.statistics().unwrap();
        assert_eq!((stats.manufacturers, stats.models, stats.cars), (1, 1, 1));
    }
}
