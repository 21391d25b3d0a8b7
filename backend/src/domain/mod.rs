//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed vocabulary shared by the HTTP adapter
//! and the persistence adapters, and the services that compose it. Types keep
//! their invariants behind constructors; serialisation contracts live in each
//! type's Rustdoc.
//!
//! Public surface:
//! - Error, ErrorCode: the API error payload and its stable identifiers.
//! - Account, Email, Role, CredentialStore: identity and credentials.
//! - SessionTokenService, AuthorizationGate: bearer tokens and access rules.
//! - QuerySpec: allow-listed list filters for cameras and ephemera.
//! - Camera, Ephemera, Manufacturer: catalogue records.
//! - ports: driven-port traits implemented by outbound adapters.

pub mod account;
pub mod auth;
pub mod authorization;
pub mod camera;
pub mod credentials;
pub mod ephemera;
pub mod error;
pub mod manufacturer;
pub mod ports;
pub mod query;
pub mod record;
pub mod session_token;
pub mod trace_id;
pub mod upload;

pub use self::account::{
    Account, AccountId, AccountValidationError, EMAIL_MAX, Email, Role, StoredAccount,
};
pub use self::auth::{
    AccountService, AuthenticatedSession, CredentialsValidationError, LoginCredentials,
    PASSWORD_MIN, RegistrationCredentials, map_account_persistence_error,
};
pub use self::authorization::{AuthorizationGate, Decision, Denial, Requirement};
pub use self::camera::{Camera, CameraDetails, CameraDraft};
pub use self::credentials::{CredentialError, CredentialStore, PasswordHash};
pub use self::ephemera::{Ephemera, EphemeraDetails, EphemeraDraft};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::manufacturer::{Manufacturer, NewManufacturer};
pub use self::query::{
    EqualityCondition, EqualityField, QuerySpec, ResourceKind, SearchCondition, SortDirection,
    SortField, TextField, YearField, YearRange,
};
pub use self::record::{InvalidRecordId, RecordId, RecordValidationError};
pub use self::session_token::{
    AuthError, DEFAULT_TOKEN_LIFETIME, IssuedToken, Principal, SIGNING_SECRET_MIN_LEN,
    SessionTokenService, SigningSecret,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::upload::{ImageFormat, ImageName, MAX_UPLOAD_BYTES};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
