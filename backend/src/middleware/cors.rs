//! Cross-origin policy for browser clients.
//!
//! Any origin may call the API. Credentials travel in the `Authorization`
//! header rather than cookies, so the policy does not allow credentials.

use actix_cors::Cors;
use actix_web::http::{Method, header};

const PREFLIGHT_MAX_AGE_SECS: usize = 3600;

/// Cross-origin middleware for the whole application.
#[must_use]
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_LENGTH])
        .max_age(PREFLIGHT_MAX_AGE_SECS)
}
