//! Camera endpoints.
//!
//! ```text
//! GET    /api/v1/cameras?search=reflex&manufacturer=Thornton-Pickard&sort=year_introduced&order=desc&page=1&page_size=20
//! GET    /api/v1/cameras/search?search=reflex
//! GET    /api/v1/cameras/{id}
//! POST   /api/v1/cameras        (authenticated)
//! PUT    /api/v1/cameras/{id}   (authenticated)
//! DELETE /api/v1/cameras/{id}   (admin)
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::Paginated;
use tracing::info;

use crate::domain::{CameraDraft, Error, ResourceKind};
use crate::inbound::http::ApiResult;
use crate::inbound::http::catalogue::{ListParams, list_request, map_catalogue_error};
use crate::inbound::http::schemas::{CameraBody, CameraFields, CameraPageSchema};
use crate::inbound::http::session::{AdminPrincipal, Authenticated};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_record_id, record_validation_error};

const RESOURCE: &str = "camera";

async fn list(state: &HttpState, params: &ListParams) -> ApiResult<Paginated<CameraBody>> {
    let (spec, window) = list_request(ResourceKind::Camera, params);
    let page = state
        .cameras
        .list(&spec, window)
        .await
        .map_err(map_catalogue_error)?;
    Ok(Paginated::new(window, page.total, page.rows).map(CameraBody::from))
}

/// List cameras, filtered, sorted and paginated.
///
/// Unknown parameters are ignored; invalid `sort`, `order`, `year_from`,
/// `year_to`, `page` and `page_size` values fall back to defaults.
#[utoipa::path(
    get,
    path = "/api/v1/cameras",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive substring of name, manufacturer or description"),
        ("manufacturer" = Option<String>, Query, description = "Exact manufacturer"),
        ("format" = Option<String>, Query, description = "Exact format"),
        ("year_from" = Option<i32>, Query, description = "Earliest year introduced"),
        ("year_to" = Option<i32>, Query, description = "Latest year introduced"),
        ("sort" = Option<String>, Query, description = "name | year_introduced | rarity"),
        ("order" = Option<String>, Query, description = "asc | desc"),
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("page_size" = Option<u32>, Query, description = "Rows per page, at most 100")
    ),
    responses(
        (status = 200, description = "Page of cameras", body = CameraPageSchema),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["cameras"],
    operation_id = "listCameras",
    security([])
)]
#[get("/cameras")]
pub async fn list_cameras(
    state: web::Data<HttpState>,
    params: web::Query<ListParams>,
) -> ApiResult<web::Json<Paginated<CameraBody>>> {
    list(&state, &params).await.map(web::Json)
}

/// Search alias of [`list_cameras`].
#[utoipa::path(
    get,
    path = "/api/v1/cameras/search",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive substring of name, manufacturer or description")
    ),
    responses(
        (status = 200, description = "Page of cameras", body = CameraPageSchema),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["cameras"],
    operation_id = "searchCameras",
    security([])
)]
#[get("/cameras/search")]
pub async fn search_cameras(
    state: web::Data<HttpState>,
    params: web::Query<ListParams>,
) -> ApiResult<web::Json<Paginated<CameraBody>>> {
    list(&state, &params).await.map(web::Json)
}

/// Fetch one camera.
#[utoipa::path(
    get,
    path = "/api/v1/cameras/{id}",
    params(("id" = i32, Path, description = "Camera id")),
    responses(
        (status = 200, description = "Camera", body = CameraBody),
        (status = 404, description = "No such camera", body = Error)
    ),
    tags = ["cameras"],
    operation_id = "getCamera",
    security([])
)]
#[get("/cameras/{id}")]
pub async fn get_camera(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<CameraBody>> {
    let id = parse_record_id(&path, RESOURCE)?;
    state
        .cameras
        .find(id)
        .await
        .map_err(map_catalogue_error)?
        .map(|camera| web::Json(camera.into()))
        .ok_or_else(|| Error::not_found("camera not found"))
}

/// Add a camera.
#[utoipa::path(
    post,
    path = "/api/v1/cameras",
    request_body = CameraFields,
    responses(
        (status = 201, description = "Created", body = CameraBody),
        (status = 400, description = "Invalid body", body = Error),
        (status = 401, description = "Missing, invalid or expired token", body = Error)
    ),
    tags = ["cameras"],
    operation_id = "createCamera",
    security(("bearer" = []))
)]
#[post("/cameras")]
pub async fn create_camera(
    user: Authenticated,
    state: web::Data<HttpState>,
    payload: web::Json<CameraFields>,
) -> ApiResult<HttpResponse> {
    let draft = CameraDraft::try_new(payload.into_inner().into()).map_err(record_validation_error)?;
    let camera = state
        .cameras
        .create(&draft)
        .await
        .map_err(map_catalogue_error)?;
    info!(camera_id = %camera.id, account_id = %user.0.account_id, "camera created");
    Ok(HttpResponse::Created().json(CameraBody::from(camera)))
}

/// Replace a camera's attributes.
#[utoipa::path(
    put,
    path = "/api/v1/cameras/{id}",
    params(("id" = i32, Path, description = "Camera id")),
    request_body = CameraFields,
    responses(
        (status = 200, description = "Updated", body = CameraBody),
        (status = 400, description = "Invalid body", body = Error),
        (status = 401, description = "Missing, invalid or expired token", body = Error),
        (status = 404, description = "No such camera", body = Error)
    ),
    tags = ["cameras"],
    operation_id = "updateCamera",
    security(("bearer" = []))
)]
#[put("/cameras/{id}")]
pub async fn update_camera(
    user: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<CameraFields>,
) -> ApiResult<web::Json<CameraBody>> {
    let id = parse_record_id(&path, RESOURCE)?;
    let draft = CameraDraft::try_new(payload.into_inner().into()).map_err(record_validation_error)?;
    let camera = state
        .cameras
        .update(id, &draft)
        .await
        .map_err(map_catalogue_error)?
        .ok_or_else(|| Error::not_found("camera not found"))?;
    info!(camera_id = %camera.id, account_id = %user.0.account_id, "camera updated");
    Ok(web::Json(camera.into()))
}

/// Soft-delete a camera. Admin only; the role is checked before existence.
#[utoipa::path(
    delete,
    path = "/api/v1/cameras/{id}",
    params(("id" = i32, Path, description = "Camera id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Missing, invalid or expired token", body = Error),
        (status = 403, description = "Administrator role required", body = Error),
        (status = 404, description = "No such camera", body = Error)
    ),
    tags = ["cameras"],
    operation_id = "deleteCamera",
    security(("bearer" = []))
)]
#[delete("/cameras/{id}")]
pub async fn delete_camera(
    admin: AdminPrincipal,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path, RESOURCE)?;
    let deleted = state
        .cameras
        .soft_delete(id)
        .await
        .map_err(map_catalogue_error)?;
    if !deleted {
        return Err(Error::not_found("camera not found"));
    }
    info!(camera_id = %id, account_id = %admin.0.account_id, "camera deleted");
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests;
