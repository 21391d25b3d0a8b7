//! Ports for camera and ephemera storage.
//!
//! List operations receive an already-validated [`QuerySpec`] and a clamped
//! [`PageWindow`], and return the page of rows together with the total
//! number of matches. Soft-deleted records are invisible to every method.

use async_trait::async_trait;
use pagination::PageWindow;

use crate::domain::{Camera, CameraDraft, Ephemera, EphemeraDraft, QuerySpec, RecordId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue repository adapters.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "catalogue repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } => "catalogue repository query failed: {message}",
    }
}

/// One page of matching rows plus the total match count.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPage<T> {
    /// Rows within the requested window.
    pub rows: Vec<T>,
    /// Matches across all pages.
    pub total: i64,
}

/// Camera storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CameraRepository: Send + Sync {
    /// Cameras matching `spec`, ordered by its sort then by id.
    async fn list(
        &self,
        spec: &QuerySpec,
        window: PageWindow,
    ) -> Result<RecordPage<Camera>, CatalogueRepositoryError>;

    /// A live camera by id.
    async fn find(&self, id: RecordId) -> Result<Option<Camera>, CatalogueRepositoryError>;

    /// Store a new camera.
    async fn create(&self, draft: &CameraDraft) -> Result<Camera, CatalogueRepositoryError>;

    /// Replace a live camera's attributes. `None` when no live camera has `id`.
    async fn update(
        &self,
        id: RecordId,
        draft: &CameraDraft,
    ) -> Result<Option<Camera>, CatalogueRepositoryError>;

    /// Soft-delete a live camera. `false` when no live camera has `id`.
    async fn soft_delete(&self, id: RecordId) -> Result<bool, CatalogueRepositoryError>;
}

/// Ephemera storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EphemeraRepository: Send + Sync {
    /// Items matching `spec`, ordered by its sort then by id.
    async fn list(
        &self,
        spec: &QuerySpec,
        window: PageWindow,
    ) -> Result<RecordPage<Ephemera>, CatalogueRepositoryError>;

    /// A live item by id.
    async fn find(&self, id: RecordId) -> Result<Option<Ephemera>, CatalogueRepositoryError>;

    /// Store a new item.
    async fn create(&self, draft: &EphemeraDraft) -> Result<Ephemera, CatalogueRepositoryError>;

    /// Replace a live item's attributes.
    async fn update(
        &self,
        id: RecordId,
        draft: &EphemeraDraft,
    ) -> Result<Option<Ephemera>, CatalogueRepositoryError>;

    /// Soft-delete a live item.
    async fn soft_delete(&self, id: RecordId) -> Result<bool, CatalogueRepositoryError>;
}
