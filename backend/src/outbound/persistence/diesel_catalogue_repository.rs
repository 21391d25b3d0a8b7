//! PostgreSQL-backed camera and ephemera repositories.
//!
//! Each list call builds the filtered query twice from the same
//! [`QuerySpec`]: once for `count(*)`, once for the ordered page. Only
//! columns named by the domain allow-lists are ever referenced, and search
//! terms are bound as escaped `ILIKE` patterns.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use mockable::Clock;
use pagination::PageWindow;

use crate::domain::ports::{
    CameraRepository, CatalogueRepositoryError, EphemeraRepository, RecordPage,
};
use crate::domain::{
    Camera, CameraDetails, CameraDraft, Ephemera, EphemeraDetails, EphemeraDraft, EqualityField,
    QuerySpec, RecordId, SortDirection, SortField, TextField,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CameraChangeset, CameraRow, EphemeraChangeset, EphemeraRow};
use super::pool::{DbPool, PoolError};
use super::schema::{cameras, ephemera};

type CameraQuery = cameras::BoxedQuery<'static, Pg>;
type CameraPredicate = Box<dyn BoxableExpression<cameras::table, Pg, SqlType = Bool>>;
type EphemeraQuery = ephemera::BoxedQuery<'static, Pg>;
type EphemeraPredicate = Box<dyn BoxableExpression<ephemera::table, Pg, SqlType = Bool>>;

fn map_pool_error(error: PoolError) -> CatalogueRepositoryError {
    map_basic_pool_error(error, CatalogueRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogueRepositoryError {
    map_basic_diesel_error(
        error,
        "catalogue",
        CatalogueRepositoryError::query,
        CatalogueRepositoryError::connection,
    )
}

/// Wrap a literal term in `%…%`, escaping the `ILIKE` metacharacters.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn window_bounds(window: PageWindow) -> (i64, i64) {
    (
        i64::try_from(window.limit()).unwrap_or(i64::MAX),
        i64::try_from(window.offset()).unwrap_or(i64::MAX),
    )
}

fn record_id(raw: i32) -> Result<RecordId, CatalogueRepositoryError> {
    RecordId::new(raw).map_err(|err| CatalogueRepositoryError::query(format!("stored id {raw}: {err}")))
}

// ---------------------------------------------------------------------------
// Cameras
// ---------------------------------------------------------------------------

fn camera_text(field: TextField, pattern: &str) -> Option<CameraPredicate> {
    match field {
        TextField::Name => Some(Box::new(cameras::name.ilike(pattern.to_owned()))),
        TextField::Manufacturer => Some(Box::new(cameras::manufacturer.ilike(pattern.to_owned()))),
        TextField::Description => Some(Box::new(cameras::description.ilike(pattern.to_owned()))),
        TextField::Title => None,
    }
}

fn filtered_cameras(spec: &QuerySpec) -> CameraQuery {
    let mut query = cameras::table
        .filter(cameras::deleted_at.is_null())
        .into_boxed();

    if let Some(search) = spec.search() {
        let pattern = like_pattern(&search.term);
        let predicate = search
            .fields
            .iter()
            .filter_map(|&field| camera_text(field, &pattern))
            .reduce(|acc, next| -> CameraPredicate { Box::new(acc.or(next)) });
        if let Some(predicate) = predicate {
            query = query.filter(predicate);
        }
    }

    for condition in spec.equality() {
        let value = condition.value.clone();
        query = match condition.field {
            EqualityField::Manufacturer => query.filter(cameras::manufacturer.eq(value)),
            EqualityField::Format => query.filter(cameras::format.eq(value)),
            EqualityField::Kind => query,
        };
    }

    if let Some(range) = spec.year_range() {
        if let Some(from) = range.from {
            query = query.filter(cameras::year_introduced.ge(from));
        }
        if let Some(to) = range.to {
            query = query.filter(cameras::year_introduced.le(to));
        }
    }
    query
}

fn ordered_cameras(query: CameraQuery, spec: &QuerySpec) -> CameraQuery {
    let query = match (spec.sort_field(), spec.direction()) {
        (SortField::YearIntroduced, SortDirection::Asc) => {
            query.order_by(cameras::year_introduced.asc())
        }
        (SortField::YearIntroduced, SortDirection::Desc) => {
            query.order_by(cameras::year_introduced.desc())
        }
        (SortField::Rarity, SortDirection::Asc) => query.order_by(cameras::rarity.asc()),
        (SortField::Rarity, SortDirection::Desc) => query.order_by(cameras::rarity.desc()),
        (_, SortDirection::Asc) => query.order_by(cameras::name.asc()),
        (_, SortDirection::Desc) => query.order_by(cameras::name.desc()),
    };
    query.then_order_by(cameras::id.asc())
}

fn camera_changeset(details: &CameraDetails, now: DateTime<Utc>) -> CameraChangeset<'_> {
    CameraChangeset {
        name: &details.name,
        manufacturer: &details.manufacturer,
        year_introduced: details.year_introduced,
        year_discontinued: details.year_discontinued,
        format: &details.format,
        plate_sizes: &details.plate_sizes,
        lens: &details.lens,
        shutter: &details.shutter,
        features: &details.features,
        description: &details.description,
        image_urls: &details.image_urls,
        rarity: &details.rarity,
        estimated_value_min: details.estimated_value_min,
        estimated_value_max: details.estimated_value_max,
        updated_at: now,
    }
}

fn row_to_camera(row: CameraRow) -> Result<Camera, CatalogueRepositoryError> {
    Ok(Camera {
        id: record_id(row.id)?,
        details: CameraDetails {
            name: row.name,
            manufacturer: row.manufacturer,
            year_introduced: row.year_introduced,
            year_discontinued: row.year_discontinued,
            format: row.format,
            plate_sizes: row.plate_sizes,
            lens: row.lens,
            shutter: row.shutter,
            features: row.features,
            description: row.description,
            image_urls: row.image_urls,
            rarity: row.rarity,
            estimated_value_min: row.estimated_value_min,
            estimated_value_max: row.estimated_value_max,
        },
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Diesel implementation of [`CameraRepository`].
#[derive(Clone)]
pub struct DieselCameraRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselCameraRepository {
    /// Repository stamping modification times from `clock`.
    #[must_use]
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    async fn live_camera(
        conn: &mut AsyncPgConnection,
        id: RecordId,
    ) -> Result<Option<CameraRow>, CatalogueRepositoryError> {
        cameras::table
            .filter(cameras::id.eq(id.get()))
            .filter(cameras::deleted_at.is_null())
            .select(CameraRow::as_select())
            .first::<CameraRow>(conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }
}

#[async_trait]
impl CameraRepository for DieselCameraRepository {
    async fn list(
        &self,
        spec: &QuerySpec,
        window: PageWindow,
    ) -> Result<RecordPage<Camera>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total = filtered_cameras(spec)
            .select(count_star())
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let (limit, offset) = window_bounds(window);
        let rows = ordered_cameras(filtered_cameras(spec), spec)
            .limit(limit)
            .offset(offset)
            .select(CameraRow::as_select())
            .load::<CameraRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(RecordPage {
            rows: rows
                .into_iter()
                .map(row_to_camera)
                .collect::<Result<_, _>>()?,
            total,
        })
    }

    async fn find(&self, id: RecordId) -> Result<Option<Camera>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        Self::live_camera(&mut conn, id)
            .await?
            .map(row_to_camera)
            .transpose()
    }

    async fn create(&self, draft: &CameraDraft) -> Result<Camera, CatalogueRepositoryError> {
        let now = self.clock.utc();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(cameras::table)
            .values((
                camera_changeset(draft.details(), now),
                cameras::created_at.eq(now),
            ))
            .returning(CameraRow::as_returning())
            .get_result::<CameraRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_camera(row)
    }

    async fn update(
        &self,
        id: RecordId,
        draft: &CameraDraft,
    ) -> Result<Option<Camera>, CatalogueRepositoryError> {
        let now = self.clock.utc();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(
            cameras::table
                .filter(cameras::id.eq(id.get()))
                .filter(cameras::deleted_at.is_null()),
        )
        .set(camera_changeset(draft.details(), now))
        .returning(CameraRow::as_returning())
        .get_result::<CameraRow>(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?
        .map(row_to_camera)
        .transpose()
    }

    async fn soft_delete(&self, id: RecordId) -> Result<bool, CatalogueRepositoryError> {
        let now = self.clock.utc();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::update(
            cameras::table
                .filter(cameras::id.eq(id.get()))
                .filter(cameras::deleted_at.is_null()),
        )
        .set(cameras::deleted_at.eq(Some(now)))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }
}

// ---------------------------------------------------------------------------
// Ephemera
// ---------------------------------------------------------------------------

fn ephemera_text(field: TextField, pattern: &str) -> Option<EphemeraPredicate> {
    match field {
        TextField::Title => Some(Box::new(ephemera::title.ilike(pattern.to_owned()))),
        TextField::Description => Some(Box::new(ephemera::description.ilike(pattern.to_owned()))),
        TextField::Name | TextField::Manufacturer => None,
    }
}

fn filtered_ephemera(spec: &QuerySpec) -> EphemeraQuery {
    let mut query = ephemera::table
        .filter(ephemera::deleted_at.is_null())
        .into_boxed();

    if let Some(search) = spec.search() {
        let pattern = like_pattern(&search.term);
        let predicate = search
            .fields
            .iter()
            .filter_map(|&field| ephemera_text(field, &pattern))
            .reduce(|acc, next| -> EphemeraPredicate { Box::new(acc.or(next)) });
        if let Some(predicate) = predicate {
            query = query.filter(predicate);
        }
    }

    for condition in spec.equality() {
        if condition.field == EqualityField::Kind {
            query = query.filter(ephemera::kind.eq(condition.value.clone()));
        }
    }

    if let Some(range) = spec.year_range() {
        if let Some(from) = range.from {
            query = query.filter(ephemera::year.ge(from));
        }
        if let Some(to) = range.to {
            query = query.filter(ephemera::year.le(to));
        }
    }
    query
}

fn ordered_ephemera(query: EphemeraQuery, spec: &QuerySpec) -> EphemeraQuery {
    let query = match (spec.sort_field(), spec.direction()) {
        (SortField::Year, SortDirection::Asc) => query.order_by(ephemera::year.asc()),
        (SortField::Year, SortDirection::Desc) => query.order_by(ephemera::year.desc()),
        (_, SortDirection::Asc) => query.order_by(ephemera::title.asc()),
        (_, SortDirection::Desc) => query.order_by(ephemera::title.desc()),
    };
    query.then_order_by(ephemera::id.asc())
}

fn ephemera_changeset(details: &EphemeraDetails, now: DateTime<Utc>) -> EphemeraChangeset<'_> {
    EphemeraChangeset {
        kind: &details.kind,
        title: &details.title,
        year: details.year,
        pages: details.pages,
        description: &details.description,
        scan_url: &details.scan_url,
        thumbnail_url: &details.thumbnail_url,
        related_cameras: details.related_cameras.iter().map(|id| id.get()).collect(),
        updated_at: now,
    }
}

fn row_to_ephemera(row: EphemeraRow) -> Result<Ephemera, CatalogueRepositoryError> {
    let related_cameras = row
        .related_cameras
        .into_iter()
        .map(record_id)
        .collect::<Result<_, _>>()?;
    Ok(Ephemera {
        id: record_id(row.id)?,
        details: EphemeraDetails {
            kind: row.kind,
            title: row.title,
            year: row.year,
            pages: row.pages,
            description: row.description,
            scan_url: row.scan_url,
            thumbnail_url: row.thumbnail_url,
            related_cameras,
        },
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Diesel implementation of [`EphemeraRepository`].
#[derive(Clone)]
pub struct DieselEphemeraRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselEphemeraRepository {
    /// Repository stamping modification times from `clock`.
    #[must_use]
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl EphemeraRepository for DieselEphemeraRepository {
    async fn list(
        &self,
        spec: &QuerySpec,
        window: PageWindow,
    ) -> Result<RecordPage<Ephemera>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total = filtered_ephemera(spec)
            .select(count_star())
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let (limit, offset) = window_bounds(window);
        let rows = ordered_ephemera(filtered_ephemera(spec), spec)
            .limit(limit)
            .offset(offset)
            .select(EphemeraRow::as_select())
            .load::<EphemeraRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(RecordPage {
            rows: rows
                .into_iter()
                .map(row_to_ephemera)
                .collect::<Result<_, _>>()?,
            total,
        })
    }

    async fn find(&self, id: RecordId) -> Result<Option<Ephemera>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        ephemera::table
            .filter(ephemera::id.eq(id.get()))
            .filter(ephemera::deleted_at.is_null())
            .select(EphemeraRow::as_select())
            .first::<EphemeraRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_ephemera)
            .transpose()
    }

    async fn create(&self, draft: &EphemeraDraft) -> Result<Ephemera, CatalogueRepositoryError> {
        let now = self.clock.utc();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(ephemera::table)
            .values((
                ephemera_changeset(draft.details(), now),
                ephemera::created_at.eq(now),
            ))
            .returning(EphemeraRow::as_returning())
            .get_result::<EphemeraRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_ephemera(row)
    }

    async fn update(
        &self,
        id: RecordId,
        draft: &EphemeraDraft,
    ) -> Result<Option<Ephemera>, CatalogueRepositoryError> {
        let now = self.clock.utc();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(
            ephemera::table
                .filter(ephemera::id.eq(id.get()))
                .filter(ephemera::deleted_at.is_null()),
        )
        .set(ephemera_changeset(draft.details(), now))
        .returning(EphemeraRow::as_returning())
        .get_result::<EphemeraRow>(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?
        .map(row_to_ephemera)
        .transpose()
    }

    async fn soft_delete(&self, id: RecordId) -> Result<bool, CatalogueRepositoryError> {
        let now = self.clock.utc();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::update(
            ephemera::table
                .filter(ephemera::id.eq(id.get()))
                .filter(ephemera::deleted_at.is_null()),
        )
        .set(ephemera::deleted_at.eq(Some(now)))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }
}
