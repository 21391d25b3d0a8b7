//! Camera and ephemera tables held in memory.
//!
//! Listing applies a [`QuerySpec`] the same way the SQL adapter does: the
//! search term is a case-insensitive literal substring ORed across the
//! allow-listed text columns, equality filters are exact, year bounds are
//! inclusive, and rows are ordered by the sort field with ascending id as
//! the tiebreak.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use pagination::PageWindow;

use crate::domain::ports::{
    CameraRepository, CatalogueRepositoryError, EphemeraRepository, RecordPage,
};
use crate::domain::{
    Camera, CameraDetails, CameraDraft, Ephemera, EphemeraDetails, EphemeraDraft, EqualityField,
    QuerySpec, RecordId, SortDirection, SortField, TextField, YearField,
};

/// Value a row is ordered by.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey<'a> {
    Year(i32),
    Text(&'a str),
}

/// Column access used to evaluate a [`QuerySpec`] against stored details.
trait CatalogueDetails: Clone + Send + Sync {
    fn text(&self, field: TextField) -> &str;
    fn equality(&self, field: EqualityField) -> &str;
    fn year(&self, field: YearField) -> i32;
    fn sort_key(&self, field: SortField) -> SortKey<'_>;
}

impl CatalogueDetails for CameraDetails {
    fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Name => &self.name,
            TextField::Manufacturer => &self.manufacturer,
            TextField::Description => &self.description,
            TextField::Title => "",
        }
    }

    fn equality(&self, field: EqualityField) -> &str {
        match field {
            EqualityField::Manufacturer => &self.manufacturer,
            EqualityField::Format => &self.format,
            EqualityField::Kind => "",
        }
    }

    fn year(&self, _field: YearField) -> i32 {
        self.year_introduced
    }

    fn sort_key(&self, field: SortField) -> SortKey<'_> {
        match field {
            SortField::YearIntroduced | SortField::Year => SortKey::Year(self.year_introduced),
            SortField::Rarity => SortKey::Text(&self.rarity),
            SortField::Name | SortField::Title => SortKey::Text(&self.name),
        }
    }
}

impl CatalogueDetails for EphemeraDetails {
    fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Title | TextField::Name => &self.title,
            TextField::Description => &self.description,
            TextField::Manufacturer => "",
        }
    }

    fn equality(&self, field: EqualityField) -> &str {
        match field {
            EqualityField::Kind => &self.kind,
            EqualityField::Manufacturer | EqualityField::Format => "",
        }
    }

    fn year(&self, _field: YearField) -> i32 {
        self.year
    }

    fn sort_key(&self, field: SortField) -> SortKey<'_> {
        match field {
            SortField::Year | SortField::YearIntroduced => SortKey::Year(self.year),
            SortField::Title | SortField::Name | SortField::Rarity => SortKey::Text(&self.title),
        }
    }
}

#[derive(Debug, Clone)]
struct Row<D> {
    details: D,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl<D> Row<D> {
    const fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

fn matches<D: CatalogueDetails>(details: &D, spec: &QuerySpec) -> bool {
    let search_ok = spec.search().is_none_or(|search| {
        let needle = search.term.to_lowercase();
        search
            .fields
            .iter()
            .any(|&field| details.text(field).to_lowercase().contains(&needle))
    });
    let equality_ok = spec
        .equality()
        .iter()
        .all(|condition| details.equality(condition.field) == condition.value);
    let year_ok = spec
        .year_range()
        .is_none_or(|range| range.contains(details.year(range.field)));
    search_ok && equality_ok && year_ok
}

fn compare<D: CatalogueDetails>(
    spec: &QuerySpec,
    (left_id, left): (&RecordId, &Row<D>),
    (right_id, right): (&RecordId, &Row<D>),
) -> Ordering {
    let field = spec.sort_field();
    let primary = left
        .details
        .sort_key(field)
        .cmp(&right.details.sort_key(field));
    let directed = match spec.direction() {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };
    directed.then_with(|| left_id.cmp(right_id))
}

#[derive(Debug)]
struct Table<D> {
    next_id: i32,
    rows: BTreeMap<RecordId, Row<D>>,
}

/// Mutex-guarded table shared by both resource adapters.
struct MemoryTable<D> {
    table: Mutex<Table<D>>,
    clock: Arc<dyn Clock>,
}

impl<D: CatalogueDetails> MemoryTable<D> {
    fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: Mutex::new(Table {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table<D>>, CatalogueRepositoryError> {
        self.table
            .lock()
            .map_err(|_| CatalogueRepositoryError::connection("catalogue store lock poisoned"))
    }

    fn list(
        &self,
        spec: &QuerySpec,
        window: PageWindow,
    ) -> Result<RecordPage<(RecordId, Row<D>)>, CatalogueRepositoryError> {
        let table = self.lock()?;
        let mut matching: Vec<(&RecordId, &Row<D>)> = table
            .rows
            .iter()
            .filter(|(_, row)| row.is_live() && matches(&row.details, spec))
            .collect();
        matching.sort_by(|left, right| compare(spec, *left, *right));

        let total = i64::try_from(matching.len()).unwrap_or(i64::MAX);
        let offset = usize::try_from(window.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit()).unwrap_or(usize::MAX);
        let rows = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(id, row)| (*id, row.clone()))
            .collect();
        Ok(RecordPage { rows, total })
    }

    fn find(&self, id: RecordId) -> Result<Option<Row<D>>, CatalogueRepositoryError> {
        Ok(self
            .lock()?
            .rows
            .get(&id)
            .filter(|row| row.is_live())
            .cloned())
    }

    fn create(&self, details: &D) -> Result<(RecordId, Row<D>), CatalogueRepositoryError> {
        let now = self.clock.utc();
        let mut table = self.lock()?;
        let id = RecordId::new(table.next_id)
            .map_err(|_| CatalogueRepositoryError::query("record id space exhausted"))?;
        table.next_id = table
            .next_id
            .checked_add(1)
            .ok_or_else(|| CatalogueRepositoryError::query("record id space exhausted"))?;
        let row = Row {
            details: details.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        table.rows.insert(id, row.clone());
        Ok((id, row))
    }

    fn update(&self, id: RecordId, details: &D) -> Result<Option<Row<D>>, CatalogueRepositoryError> {
        let now = self.clock.utc();
        let mut table = self.lock()?;
        Ok(table
            .rows
            .get_mut(&id)
            .filter(|row| row.is_live())
            .map(|row| {
                row.details = details.clone();
                row.updated_at = now;
                row.clone()
            }))
    }

    fn soft_delete(&self, id: RecordId) -> Result<bool, CatalogueRepositoryError> {
        let now = self.clock.utc();
        let mut table = self.lock()?;
        Ok(match table.rows.get_mut(&id).filter(|row| row.is_live()) {
            Some(row) => {
                row.deleted_at = Some(now);
                true
            }
            None => false,
        })
    }
}

fn camera((id, row): (RecordId, Row<CameraDetails>)) -> Camera {
    Camera {
        id,
        details: row.details,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn ephemera((id, row): (RecordId, Row<EphemeraDetails>)) -> Ephemera {
    Ephemera {
        id,
        details: row.details,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn page<D, T>(
    found: RecordPage<(RecordId, Row<D>)>,
    convert: fn((RecordId, Row<D>)) -> T,
) -> RecordPage<T> {
    RecordPage {
        rows: found.rows.into_iter().map(convert).collect(),
        total: found.total,
    }
}

/// In-memory [`CameraRepository`].
pub struct InMemoryCameraRepository {
    table: MemoryTable<CameraDetails>,
}

impl InMemoryCameraRepository {
    /// Empty repository stamping rows with `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: MemoryTable::new(clock),
        }
    }
}

#[async_trait]
impl CameraRepository for InMemoryCameraRepository {
    async fn list(
        &self,
        spec: &QuerySpec,
        window: PageWindow,
    ) -> Result<RecordPage<Camera>, CatalogueRepositoryError> {
        self.table.list(spec, window).map(|rows| page(rows, camera))
    }

    async fn find(&self, id: RecordId) -> Result<Option<Camera>, CatalogueRepositoryError> {
        Ok(self.table.find(id)?.map(|row| camera((id, row))))
    }

    async fn create(&self, draft: &CameraDraft) -> Result<Camera, CatalogueRepositoryError> {
        self.table.create(draft.details()).map(camera)
    }

    async fn update(
        &self,
        id: RecordId,
        draft: &CameraDraft,
    ) -> Result<Option<Camera>, CatalogueRepositoryError> {
        Ok(self
            .table
            .update(id, draft.details())?
            .map(|row| camera((id, row))))
    }

    async fn soft_delete(&self, id: RecordId) -> Result<bool, CatalogueRepositoryError> {
        self.table.soft_delete(id)
    }
}

/// In-memory [`EphemeraRepository`].
pub struct InMemoryEphemeraRepository {
    table: MemoryTable<EphemeraDetails>,
}

impl InMemoryEphemeraRepository {
    /// Empty repository stamping rows with `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: MemoryTable::new(clock),
        }
    }
}

#[async_trait]
impl EphemeraRepository for InMemoryEphemeraRepository {
    async fn list(
        &self,
        spec: &QuerySpec,
        window: PageWindow,
    ) -> Result<RecordPage<Ephemera>, CatalogueRepositoryError> {
        self.table.list(spec, window).map(|rows| page(rows, ephemera))
    }

    async fn find(&self, id: RecordId) -> Result<Option<Ephemera>, CatalogueRepositoryError> {
        Ok(self.table.find(id)?.map(|row| ephemera((id, row))))
    }

    async fn create(&self, draft: &EphemeraDraft) -> Result<Ephemera, CatalogueRepositoryError> {
        self.table.create(draft.details()).map(ephemera)
    }

    async fn update(
        &self,
        id: RecordId,
        draft: &EphemeraDraft,
    ) -> Result<Option<Ephemera>, CatalogueRepositoryError> {
        Ok(self
            .table
            .update(id, draft.details())?
            .map(|row| ephemera((id, row))))
    }

    async fn soft_delete(&self, id: RecordId) -> Result<bool, CatalogueRepositoryError> {
        self.table.soft_delete(id)
    }
}
