//! PostgreSQL-backed manufacturer repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CatalogueRepositoryError, ManufacturerRepository};
use crate::domain::{Manufacturer, NewManufacturer, RecordId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ManufacturerRow, NewManufacturerRow};
use super::pool::DbPool;
use super::schema::manufacturers;

/// Diesel implementation of [`ManufacturerRepository`].
#[derive(Clone)]
pub struct DieselManufacturerRepository {
    pool: DbPool,
}

impl DieselManufacturerRepository {
    /// Repository drawing connections from `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogueRepositoryError {
    map_basic_diesel_error(
        error,
        "manufacturer",
        CatalogueRepositoryError::query,
        CatalogueRepositoryError::connection,
    )
}

fn row_to_manufacturer(row: ManufacturerRow) -> Result<Manufacturer, CatalogueRepositoryError> {
    let id = RecordId::new(row.id)
        .map_err(|err| CatalogueRepositoryError::query(format!("stored id {}: {err}", row.id)))?;
    Ok(Manufacturer {
        id,
        name: row.name,
        founded: row.founded,
        defunct: row.defunct,
        country: row.country,
        description: row.description,
    })
}

#[async_trait]
impl ManufacturerRepository for DieselManufacturerRepository {
    async fn list_all(&self) -> Result<Vec<Manufacturer>, CatalogueRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, CatalogueRepositoryError::connection))?;
        manufacturers::table
            .order_by((manufacturers::name.asc(), manufacturers::id.asc()))
            .select(ManufacturerRow::as_select())
            .load::<ManufacturerRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(row_to_manufacturer)
            .collect()
    }

    async fn insert(
        &self,
        manufacturer: &NewManufacturer,
    ) -> Result<Manufacturer, CatalogueRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, CatalogueRepositoryError::connection))?;
        let row = NewManufacturerRow {
            name: &manufacturer.name,
            founded: manufacturer.founded,
            defunct: manufacturer.defunct,
            country: &manufacturer.country,
            description: &manufacturer.description,
        };
        let stored = diesel::insert_into(manufacturers::table)
            .values(&row)
            .returning(ManufacturerRow::as_returning())
            .get_result::<ManufacturerRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_manufacturer(stored)
    }
}
