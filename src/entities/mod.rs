//! Entity type definitions and their row-level stores
//!
//! The catalog manages exactly four entity kinds plus one join:
//!
//! - [`Manufacturer`] - a make, versioned by model year
//! - [`Model`] - a model name, shared across manufacturers
//! - [`Category`] - a free-form grouping such as "Wagon"
//! - [`Car`] - one (manufacturer, model) pairing
//! - [`CategoryMembership`] - the car/category join record
//!
//! Functions here take a plain `&Connection` and never open transactions of
//! their own; the [`crate::catalog::Catalog`] facade decides the transaction
//! boundaries.

pub mod car;
pub mod category;
pub mod manufacturer;
pub mod membership;
pub mod model;

pub use car::{Car, CarFilter};
pub use category::{Category, CategoryWithCars};
pub use manufacturer::{Manufacturer, ManufacturerKey, ManufacturerWithCars};
pub use membership::CategoryMembership;
pub use model::{Model, ModelWithCars};
