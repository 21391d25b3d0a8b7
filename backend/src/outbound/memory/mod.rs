//! In-process adapters for running without PostgreSQL.
//!
//! State lives behind a mutex for the lifetime of the process. These
//! adapters back the test harness and the database-less development mode;
//! they honour the same contracts as the Diesel repositories, including
//! soft deletion and the allow-listed query semantics.

mod accounts;
mod catalogue;
mod manufacturers;

pub use accounts::InMemoryAccountRepository;
pub use catalogue::{InMemoryCameraRepository, InMemoryEphemeraRepository};
pub use manufacturers::InMemoryManufacturerRepository;
