//! Model operations

use tracing::info;

use super::Catalog;
use crate::core::error::{CatalogError, Result};
use crate::core::identity::{EntityKind, NaturalKey};
use crate::core::page::PageRequest;
use crate::entities::car::{self, CarFilter};
use crate::entities::model::{self, Model, ModelWithCars};

impl Catalog {
    /// Create a model; fails with `AlreadyExists` on a taken name
    pub fn create_model(&mut self, name: &str) -> Result<Model> {
        info!(name, "create model");
        self.store.write(|tx| model::create(tx, name))
    }

    pub fn find_model(&self, name: &str) -> Result<Model> {
        model::find_by_name(self.store.conn(), name)?
            .ok_or_else(|| CatalogError::not_found_key(&NaturalKey::model(name)))
    }

    pub fn get_model(&self, id: i64) -> Result<Model> {
        model::find_by_id(self.store.conn(), id)?
            .ok_or_else(|| CatalogError::not_found_id(EntityKind::Model, id))
    }

    /// Rename a model; every car on it follows
    pub fn update_model(&mut self, id: i64, name: &str) -> Result<Model> {
        info!(id, name, "update model");
        self.store.write(|tx| model::update(tx, id, name))
    }

    pub fn list_models(&self, prefix: Option<&str>, page: &PageRequest) -> Result<Vec<Model>> {
        model::list(self.store.conn(), prefix, page)
    }

    /// A model with every car built on it, across manufacturers
    pub fn model_with_cars(&self, name: &str) -> Result<ModelWithCars> {
        let found = self.find_model(name)?;
        let cars = car::all(self.store.conn(), CarFilter::Model(found.id))?;
        Ok(ModelWithCars { model: found, cars })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_is_shared_across_manufacturers() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let buick = catalog.create_car("Buick", "Regal", 2017).unwrap();
        let acura = catalog.create_car("Acura", "Regal", 2017).unwrap();
        assert_eq!(buick.model, acura.model);

        let regal = catalog.model_with_cars("Regal").unwrap();
        assert_eq!(regal.cars.len(), 2);
        assert_eq!(catalog.statistics().unwrap().models, 1);
    }

    #[test]
    fn test_model_lookups() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let regal = catalog.create_model("Regal").unwrap();

        assert_eq!(catalog.get_model(regal.id).unwrap(), regal);
        assert!(catalog.find_model("Enclave").unwrap_err().is_not_found());
        assert!(catalog.model_with_cars("Enclave").unwrap_err().is_not_found());
        assert!(catalog.create_model("Regal").unwrap_err().is_already_exists());
    }

    #[test]
    fn test_rename_collision() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        catalog.create_model("Regal").unwrap();
        let enclave = catalog.create_model("Enclave").unwrap();

        let err = catalog.update_model(enclave.id, "Regal").unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(catalog.find_model("Enclave").unwrap(), enclave);
    }
}
