//! The catalog engine
//!
//! [`Catalog`] owns the store and exposes one method per catalog operation.
//! Every mutating method runs inside exactly one write transaction, so its
//! implicit creations, cascades and the primary write commit together or
//! not at all. Read methods run on the bare connection and may observe a
//! slightly stale snapshot.
//!
//! The methods are split by concern:
//! - `manufacturers`, `models`, `categories` - simple entity operations
//! - `cars` - car identity and lifecycle
//! - `membership` - car/category membership
//! - `cascade` - every delete path

mod cars;
mod cascade;
mod categories;
mod manufacturers;
mod membership;
mod models;

use std::path::Path;

use serde::Serialize;

use crate::core::error::Result;
use crate::core::identity::{self, EntityRef, NaturalKey};
use crate::core::store::{CatalogStats, CatalogStore, StoreOptions};

/// Row counts removed by a delete
///
/// All zeros means nothing matched; callers treat that as "not found"
/// rather than as an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeleteStats {
    pub manufacturers: usize,
    pub models: usize,
    pub categories: usize,
    pub cars: usize,
    pub memberships: usize,
}

impl DeleteStats {
    pub fn total(&self) -> usize {
        self.manufacturers + self.models + self.categories + self.cars + self.memberships
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    fn absorb(&mut self, other: DeleteStats) {
        self.manufacturers += other.manufacturers;
        self.models += other.models;
        self.categories += other.categories;
        self.cars += other.cars;
        self.memberships += other.memberships;
    }
}

/// The catalog: identity resolution, lifecycle, membership and cascades
pub struct Catalog {
    store: CatalogStore,
}

impl Catalog {
    pub fn new(store: CatalogStore) -> Self {
        Self { store }
    }

    /// Open a file-backed catalog
    pub fn open(path: &Path, options: &StoreOptions) -> Result<Self> {
        Ok(Self::new(CatalogStore::open(path, options)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(CatalogStore::open_in_memory()?))
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Identity resolver: find the row owning a natural key, if any
    pub fn resolve(&self, key: &NaturalKey) -> Result<Option<EntityRef>> {
        identity::resolve(self.store.conn(), key)
    }

    pub fn statistics(&self) -> Result<CatalogStats> {
        self.store.statistics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_stats_total() {
        let mut stats = DeleteStats::default();
        assert!(stats.is_empty());

        stats.absorb(DeleteStats {
            cars: 2,
            memberships: 3,
            ..Default::default()
        });
        stats.absorb(DeleteStats {
            manufacturers: 1,
            ..Default::default()
        });
        assert_eq!(stats.total(), 6);
        assert!(!stats.is_empty());
    }
}
