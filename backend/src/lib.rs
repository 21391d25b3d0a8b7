//! Camera and ephemera catalogue backend.
//!
//! The domain layer owns the vocabulary and rules; `inbound` adapts HTTP onto
//! it and `outbound` implements its ports against PostgreSQL, memory, and the
//! local filesystem.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod seed;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::{Trace, cors};
