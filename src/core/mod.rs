//! Core module - identity, storage and the ambient plumbing

pub mod config;
pub mod entity;
pub mod error;
pub mod identity;
pub mod logging;
pub mod page;
pub mod project;
pub mod store;

pub use config::{Config, ConfigError};
pub use entity::{find_or_create, Entity};
pub use error::{CatalogError, Result};
pub use identity::{EntityKind, EntityRef, NaturalKey};
pub use page::{PageRequest, SortDirection, SortKey, SortSpec};
pub use project::{Project, ProjectError};
pub use store::{CatalogStats, CatalogStore, StoreOptions};
