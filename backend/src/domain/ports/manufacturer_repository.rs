//! Port for manufacturer reference data.

use async_trait::async_trait;

use crate::domain::{Manufacturer, NewManufacturer};

use super::CatalogueRepositoryError;

/// Manufacturer storage.
#[async_trait]
pub trait ManufacturerRepository: Send + Sync {
    /// Every manufacturer, ordered by name.
    async fn list_all(&self) -> Result<Vec<Manufacturer>, CatalogueRepositoryError>;

    /// Store a manufacturer.
    async fn insert(
        &self,
        manufacturer: &NewManufacturer,
    ) -> Result<Manufacturer, CatalogueRepositoryError>;
}
