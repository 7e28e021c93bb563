//! Car/category membership operations

use tracing::{debug, info};

use super::cars::reload;
use super::Catalog;
use crate::core::entity::find_or_create;
use crate::core::error::{CatalogError, Result};
use crate::core::identity::{self, EntityKind, NaturalKey};
use crate::entities::car::{self, Car, CarFilter};
use crate::entities::category::{self, Category};
use crate::entities::membership;

impl Catalog {
    /// Put a car in a category, creating the category if needed
    ///
    /// Fails with `NotFound` for a missing car and `AlreadyExists` if the
    /// car is already in the category.
    pub fn add_category(&mut self, car_id: i64, category_name: &str) -> Result<Car> {
        info!(car_id, category = category_name, "add category to car");
        let key = NaturalKey::membership(car_id, category_name);
        key.validate()?;

        self.store.write(|tx| {
            if !car::exists(tx, car_id)? {
                return Err(CatalogError::not_found_id(EntityKind::Car, car_id));
            }

            let found = find_or_create::<Category>(tx, category_name)?;
            if identity::resolve(tx, &key)?.is_some() {
                return Err(CatalogError::already_exists(&key));
            }

            membership::insert(tx, car_id, found.id, &key)?;
            reload(tx, car_id)
        })
    }

    /// Take a car out of a category
    ///
    /// Removing a membership that does not exist, including one for a
    /// category that does not exist at all, succeeds and returns the car
    /// unchanged. Only a missing car is `NotFound`.
    pub fn remove_category(&mut self, car_id: i64, category_name: &str) -> Result<Car> {
        info!(car_id, category = category_name, "remove category from car");

        self.store.write(|tx| {
            if !car::exists(tx, car_id)? {
                return Err(CatalogError::not_found_id(EntityKind::Car, car_id));
            }

            match category::find_by_name(tx, category_name)? {
                Some(found) => {
                    let removed = membership::delete(tx, car_id, found.id)?;
                    if removed == 0 {
                        debug!(car_id, category = category_name, "car was not in category");
                    }
                }
                None => debug!(category = category_name, "no such category, nothing to remove"),
            }

            reload(tx, car_id)
        })
    }

    /// Categories a car belongs to
    pub fn categories_of(&self, car_id: i64) -> Result<Vec<Category>> {
        let conn = self.store.conn();
        if !car::exists(conn, car_id)? {
            return Err(CatalogError::not_found_id(EntityKind::Car, car_id));
        }
        membership::categories_of(conn, car_id)
    }

    /// Cars in a category
    pub fn cars_in(&self, category_id: i64) -> Result<Vec<Car>> {
        let conn = self.store.conn();
        if category::find_by_id(conn, category_id)?.is_none() {
            return Err(CatalogError::not_found_id(EntityKind::Category, category_id));
        }
        car::all(conn, CarFilter::Category(category_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(car: &Car) -> Vec<String> {
        car.categories.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn test_add_then_remove_restores_membership_set() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let car = catalog.create_car("Acura", "Regal", 2017).unwrap();
        let car = catalog.add_category(car.id, "Sedan").unwrap();
        let before = names(&car);

        catalog.add_category(car.id, "Wagon").unwrap();
        let after = catalog.remove_category(car.id, "Wagon").unwrap();
        assert_eq!(names(&after), before);

        // The category itself stays
        assert!(catalog.find_category("Wagon").is_ok());
    }

    #[test]
    fn test_remove_never_added_is_noop() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let car = catalog.create_car("Acura", "Regal", 2017).unwrap();
        let car = catalog.add_category(car.id, "Sedan").unwrap();
        catalog.create_category("Wagon").unwrap();

        // Category exists but is not linked
        let same = catalog.remove_category(car.id, "Wagon").unwrap();
        assert_eq!(same, car);

        // Category does not exist at all
        let same = catalog.remove_category(car.id, "NeverAdded").unwrap();
        assert_eq!(same, car);
        assert!(catalog.find_category("NeverAdded").unwrap_err().is_not_found());
    }

    #[test]
    fn test_membership_is_unique() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let car = catalog.create_car("Acura", "Regal", 2017).unwrap();
        catalog.add_category(car.id, "Wagon").unwrap();

        let err = catalog.add_category(car.id, "Wagon").unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(catalog.statistics().unwrap().memberships, 1);
        assert_eq!(catalog.categories_of(car.id).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_car() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        assert!(catalog.add_category(7, "Wagon").unwrap_err().is_not_found());
        assert!(catalog.remove_category(7, "Wagon").unwrap_err().is_not_found());
        assert!(catalog.categories_of(7).unwrap_err().is_not_found());

        // The failed add did not leave the category behind
        assert_eq!(catalog.statistics().unwrap().categories, 0);
    }

    #[test]
    fn test_cars_in_category() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let a = catalog.create_car("Acura", "Regal", 2017).unwrap();
        let b = catalog.create_car("Buick", "Regal", 2017).unwrap();
        catalog.add_category(a.id, "Wagon").unwrap();
        catalog.add_category(b.id, "Wagon").unwrap();

        let wagon = catalog.find_category("Wagon").unwrap();
        let ids: Vec<_> = catalog
            .cars_in(wagon.id)
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![a.id, b.id]);
        assert!(catalog.cars_in(999).unwrap_err().is_not_found());
    }
}
