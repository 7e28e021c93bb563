//! carcat: car catalog
//!
//! Tracks manufacturers, models, cars and categories, and guards their
//! identity: no two rows share a natural key, cars and memberships never
//! dangle, and deletes cascade without leaving orphans.

pub mod catalog;
pub mod cli;
pub mod core;
pub mod entities;

pub use catalog::{Catalog, DeleteStats};
