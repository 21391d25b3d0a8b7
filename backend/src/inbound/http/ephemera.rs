//! Ephemera endpoints: catalogues, manuals, advertisements.
//!
//! ```text
//! GET    /api/v1/ephemera?type=catalog&year_from=1900&sort=year
//! GET    /api/v1/ephemera/{id}
//! POST   /api/v1/ephemera        (authenticated)
//! PUT    /api/v1/ephemera/{id}   (authenticated)
//! DELETE /api/v1/ephemera/{id}   (admin)
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::Paginated;
use tracing::info;

use crate::domain::{EphemeraDraft, Error, ResourceKind};
use crate::inbound::http::ApiResult;
use crate::inbound::http::catalogue::{ListParams, list_request, map_catalogue_error};
use crate::inbound::http::schemas::{EphemeraBody, EphemeraFields, EphemeraPageSchema};
use crate::inbound::http::session::{AdminPrincipal, Authenticated};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_record_id, record_validation_error};

const RESOURCE: &str = "ephemera";

fn not_found() -> Error {
    Error::not_found("ephemera not found")
}

/// List ephemera, filtered, sorted and paginated.
#[utoipa::path(
    get,
    path = "/api/v1/ephemera",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive substring of title or description"),
        ("type" = Option<String>, Query, description = "Exact type, e.g. catalog"),
        ("year_from" = Option<i32>, Query, description = "Earliest publication year"),
        ("year_to" = Option<i32>, Query, description = "Latest publication year"),
        ("sort" = Option<String>, Query, description = "title | year"),
        ("order" = Option<String>, Query, description = "asc | desc"),
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("page_size" = Option<u32>, Query, description = "Rows per page, at most 100")
    ),
    responses(
        (status = 200, description = "Page of ephemera", body = EphemeraPageSchema),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["ephemera"],
    operation_id = "listEphemera",
    security([])
)]
#[get("/ephemera")]
pub async fn list_ephemera(
    state: web::Data<HttpState>,
    params: web::Query<ListParams>,
) -> ApiResult<web::Json<Paginated<EphemeraBody>>> {
    let (spec, window) = list_request(ResourceKind::Ephemera, &params);
    let page = state
        .ephemera
        .list(&spec, window)
        .await
        .map_err(map_catalogue_error)?;
    Ok(web::Json(
        Paginated::new(window, page.total, page.rows).map(EphemeraBody::from),
    ))
}

/// Fetch one item.
#[utoipa::path(
    get,
    path = "/api/v1/ephemera/{id}",
    params(("id" = i32, Path, description = "Ephemera id")),
    responses(
        (status = 200, description = "Ephemera item", body = EphemeraBody),
        (status = 404, description = "No such item", body = Error)
    ),
    tags = ["ephemera"],
    operation_id = "getEphemera",
    security([])
)]
#[get("/ephemera/{id}")]
pub async fn get_ephemera(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<EphemeraBody>> {
    let id = parse_record_id(&path, RESOURCE)?;
    state
        .ephemera
        .find(id)
        .await
        .map_err(map_catalogue_error)?
        .map(|item| web::Json(item.into()))
        .ok_or_else(not_found)
}

/// Add an item.
#[utoipa::path(
    post,
    path = "/api/v1/ephemera",
    request_body = EphemeraFields,
    responses(
        (status = 201, description = "Created", body = EphemeraBody),
        (status = 400, description = "Invalid body", body = Error),
        (status = 401, description = "Missing, invalid or expired token", body = Error)
    ),
    tags = ["ephemera"],
    operation_id = "createEphemera",
    security(("bearer" = []))
)]
#[post("/ephemera")]
pub async fn create_ephemera(
    user: Authenticated,
    state: web::Data<HttpState>,
    payload: web::Json<EphemeraFields>,
) -> ApiResult<HttpResponse> {
    let draft =
        EphemeraDraft::try_new(payload.into_inner().into()).map_err(record_validation_error)?;
    let item = state
        .ephemera
        .create(&draft)
        .await
        .map_err(map_catalogue_error)?;
    info!(ephemera_id = %item.id, account_id = %user.0.account_id, "ephemera created");
    Ok(HttpResponse::Created().json(EphemeraBody::from(item)))
}

/// Replace an item's attributes.
#[utoipa::path(
    put,
    path = "/api/v1/ephemera/{id}",
    params(("id" = i32, Path, description = "Ephemera id")),
    request_body = EphemeraFields,
    responses(
        (status = 200, description = "Updated", body = EphemeraBody),
        (status = 400, description = "Invalid body", body = Error),
        (status = 401, description = "Missing, invalid or expired token", body = Error),
        (status = 404, description = "No such item", body = Error)
    ),
    tags = ["ephemera"],
    operation_id = "updateEphemera",
    security(("bearer" = []))
)]
#[put("/ephemera/{id}")]
pub async fn update_ephemera(
    user: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<EphemeraFields>,
) -> ApiResult<web::Json<EphemeraBody>> {
    let id = parse_record_id(&path, RESOURCE)?;
    let draft =
        EphemeraDraft::try_new(payload.into_inner().into()).map_err(record_validation_error)?;
    let item = state
        .ephemera
        .update(id, &draft)
        .await
        .map_err(map_catalogue_error)?
        .ok_or_else(not_found)?;
    info!(ephemera_id = %item.id, account_id = %user.0.account_id, "ephemera updated");
    Ok(web::Json(item.into()))
}

/// Soft-delete an item. Admin only.
#[utoipa::path(
    delete,
    path = "/api/v1/ephemera/{id}",
    params(("id" = i32, Path, description = "Ephemera id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Missing, invalid or expired token", body = Error),
        (status = 403, description = "Administrator role required", body = Error),
        (status = 404, description = "No such item", body = Error)
    ),
    tags = ["ephemera"],
    operation_id = "deleteEphemera",
    security(("bearer" = []))
)]
#[delete("/ephemera/{id}")]
pub async fn delete_ephemera(
    admin: AdminPrincipal,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path, RESOURCE)?;
    if !state
        .ephemera
        .soft_delete(id)
        .await
        .map_err(map_catalogue_error)?
    {
        return Err(not_found());
    }
    info!(ephemera_id = %id, account_id = %admin.0.account_id, "ephemera deleted");
    Ok(HttpResponse::NoContent().finish())
}
