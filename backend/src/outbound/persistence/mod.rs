//! PostgreSQL persistence adapters.
//!
//! Repositories translate between Diesel rows and domain types and carry no
//! business rules. Row structs and the table definitions stay private to
//! this module.
//!
//! ```no_run
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use backend::outbound::persistence::{DbPool, DieselCameraRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/catalogue")).await?;
//! let cameras = DieselCameraRepository::new(pool, Arc::new(mockable::DefaultClock));
//! # let _ = cameras;
//! # Ok(())
//! # }
//! ```

mod diesel_account_repository;
mod diesel_basic_error_mapping;
mod diesel_catalogue_repository;
mod diesel_manufacturer_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_catalogue_repository::{DieselCameraRepository, DieselEphemeraRepository};
pub use diesel_manufacturer_repository::DieselManufacturerRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
