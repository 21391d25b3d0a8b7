//! Request middleware.
//!
//! Request tracing and the cross-origin policy live here. Bearer
//! authentication is decided per handler by the extractors in
//! [`crate::inbound::http::session`].

pub mod cors;
pub mod trace;

pub use cors::cors;
pub use trace::Trace;
