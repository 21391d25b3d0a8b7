//! Driven ports: the storage boundaries the domain talks through.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod catalogue_repository;
mod image_store;
mod manufacturer_repository;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountPersistenceError, AccountRepository};
#[cfg(test)]
pub use catalogue_repository::{MockCameraRepository, MockEphemeraRepository};
pub use catalogue_repository::{
    CameraRepository, CatalogueRepositoryError, EphemeraRepository, RecordPage,
};
pub use image_store::{ImageStore, ImageStoreError};
pub use manufacturer_repository::ManufacturerRepository;
