//! Category operations

use tracing::info;

use super::Catalog;
use crate::core::error::{CatalogError, Result};
use crate::core::identity::{EntityKind, NaturalKey};
use crate::core::page::PageRequest;
use crate::entities::car::{self, CarFilter};
use crate::entities::category::{self, Category, CategoryWithCars};

impl Catalog {
    /// Create a category; fails with `AlreadyExists` on a taken name
    pub fn create_category(&mut self, name: &str) -> Result<Category> {
        info!(name, "create category");
        self.store.write(|tx| category::create(tx, name))
    }

    pub fn find_category(&self, name: &str) -> Result<Category> {
        category::find_by_name(self.store.conn(), name)?
            .ok_or_else(|| CatalogError::not_found_key(&NaturalKey::category(name)))
    }

    pub fn get_category(&self, id: i64) -> Result<Category> {
        category::find_by_id(self.store.conn(), id)?
            .ok_or_else(|| CatalogError::not_found_id(EntityKind::Category, id))
    }

    pub fn update_category(&mut self, id: i64, name: &str) -> Result<Category> {
        info!(id, name, "update category");
        self.store.write(|tx| category::update(tx, id, name))
    }

    pub fn list_categories(&self, prefix: Option<&str>, page: &PageRequest) -> Result<Vec<Category>> {
        category::list(self.store.conn(), prefix, page)
    }

    /// A category with the cars that hold a membership in it
    pub fn category_with_cars(&self, name: &str) -> Result<CategoryWithCars> {
        let found = self.find_category(name)?;
        let cars = car::all(self.store.conn(), CarFilter::Category(found.id))?;
        Ok(CategoryWithCars {
            category: found,
            cars,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_with_cars() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let regal = catalog.create_car("Buick", "Regal", 2017).unwrap();
        catalog.create_car("Buick", "Enclave", 2017).unwrap();
        catalog.add_category(regal.id, "Wagon").unwrap();

        let wagon = catalog.category_with_cars("Wagon").unwrap();
        assert_eq!(wagon.cars.len(), 1);
        assert_eq!(wagon.cars[0].id, regal.id);
        assert_eq!(wagon.cars[0].category_names(), vec!["Wagon"]);
    }

    #[test]
    fn test_category_lookups() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let wagon = catalog.create_category("Wagon").unwrap();

        assert_eq!(catalog.get_category(wagon.id).unwrap(), wagon);
        assert!(catalog.find_category("Sedan").unwrap_err().is_not_found());
        assert!(catalog.create_category("Wagon").unwrap_err().is_already_exists());

        let renamed = catalog.update_category(wagon.id, "Estate").unwrap();
        assert_eq!(renamed.name, "Estate");
        assert!(catalog.find_category("Wagon").unwrap_err().is_not_found());
    }
}
