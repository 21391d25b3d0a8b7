//! Manufacturer reference data.

use actix_web::{get, web};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::catalogue::map_catalogue_error;
use crate::inbound::http::schemas::ManufacturerBody;
use crate::inbound::http::state::HttpState;

/// All manufacturers, ordered by name.
#[utoipa::path(
    get,
    path = "/api/v1/manufacturers",
    responses(
        (status = 200, description = "Manufacturers", body = [ManufacturerBody]),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["manufacturers"],
    operation_id = "listManufacturers",
    security([])
)]
#[get("/manufacturers")]
pub async fn list_manufacturers(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ManufacturerBody>>> {
    let rows = state
        .manufacturers
        .list_all()
        .await
        .map_err(map_catalogue_error)?;
    Ok(web::Json(rows.into_iter().map(ManufacturerBody::from).collect()))
}
