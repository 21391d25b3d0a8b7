//! Outbound adapters implementing the domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: process-local repositories for development and tests
//! - **image_storage**: upload storage in a capability-scoped directory
//!
//! Adapters translate between infrastructure representations and domain
//! types. They contain no business logic.

pub mod image_storage;
pub mod memory;
pub mod persistence;
