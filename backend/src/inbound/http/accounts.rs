//! Account endpoints.
//!
//! ```text
//! POST /api/v1/auth/register {"email":"ada@example.com","password":"hunter22"}
//! POST /api/v1/auth/login    {"email":"ada@example.com","password":"hunter22"}
//! GET  /api/v1/auth/profile  (Authorization: Bearer <token>)
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, RegistrationCredentials};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{AccountBody, SessionBody};
use crate::inbound::http::session::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::credentials_validation_error;

/// Email and password, as submitted for registration and login.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct CredentialsRequest {
    #[serde(default)]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[serde(default)]
    #[schema(example = "hunter22")]
    pub password: String,
}

/// Create a `user` account and return a bearer token for it.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = SessionBody),
        (status = 400, description = "Invalid email or password", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let CredentialsRequest { email, password } = payload.into_inner();
    let credentials = RegistrationCredentials::try_from_parts(&email, &password)
        .map_err(credentials_validation_error)?;
    let session = state.accounts.register(&credentials).await?;
    Ok(HttpResponse::Created().json(SessionBody::from(session)))
}

/// Exchange credentials for a bearer token.
///
/// Unknown emails and wrong passwords produce the same response.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionBody),
        (status = 400, description = "Missing email or password", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<SessionBody>> {
    let CredentialsRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&email, &password)
        .map_err(credentials_validation_error)?;
    let session = state.accounts.login(&credentials).await?;
    Ok(web::Json(session.into()))
}

/// The account behind the presented token.
#[utoipa::path(
    get,
    path = "/api/v1/auth/profile",
    responses(
        (status = 200, description = "Current account", body = AccountBody),
        (status = 401, description = "Missing, invalid or expired token", body = Error),
        (status = 404, description = "Account no longer exists", body = Error)
    ),
    tags = ["auth"],
    operation_id = "profile",
    security(("bearer" = []))
)]
#[get("/auth/profile")]
pub async fn profile(
    user: Authenticated,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<AccountBody>> {
    let account = state.accounts.profile(&user.0.account_id).await?;
    Ok(web::Json(account.into()))
}

#[cfg(test)]
mod tests;
