//! Manufacturer reference data held in memory.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{CatalogueRepositoryError, ManufacturerRepository};
use crate::domain::{Manufacturer, NewManufacturer, RecordId};

/// Manufacturers in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryManufacturerRepository {
    rows: Mutex<Vec<Manufacturer>>,
}

impl InMemoryManufacturerRepository {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ManufacturerRepository for InMemoryManufacturerRepository {
    async fn list_all(&self) -> Result<Vec<Manufacturer>, CatalogueRepositoryError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| CatalogueRepositoryError::connection("manufacturer store lock poisoned"))?
            .clone();
        rows.sort_by(|left, right| left.name.cmp(&right.name).then(left.id.cmp(&right.id)));
        Ok(rows)
    }

    async fn insert(
        &self,
        manufacturer: &NewManufacturer,
    ) -> Result<Manufacturer, CatalogueRepositoryError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| CatalogueRepositoryError::connection("manufacturer store lock poisoned"))?;
        if rows.iter().any(|row| row.name == manufacturer.name) {
            return Err(CatalogueRepositoryError::query(format!(
                "manufacturer {} already exists",
                manufacturer.name
            )));
        }
        let next = i32::try_from(rows.len())
            .ok()
            .and_then(|count| count.checked_add(1))
            .and_then(|raw| RecordId::new(raw).ok())
            .ok_or_else(|| CatalogueRepositoryError::query("record id space exhausted"))?;
        let stored = Manufacturer {
            id: next,
            name: manufacturer.name.clone(),
            founded: manufacturer.founded,
            defunct: manufacturer.defunct,
            country: manufacturer.country.clone(),
            description: manufacturer.description.clone(),
        };
        rows.push(stored.clone());
        Ok(stored)
    }
}
