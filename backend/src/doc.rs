//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST handler in the inbound layer, the request
//! and response bodies from [`crate::inbound::http::schemas`], and the bearer
//! security scheme. Swagger UI serves it at `/docs` in debug builds.

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::accounts::CredentialsRequest;
use crate::inbound::http::schemas::{
    AccountBody, CameraBody, CameraFields, CameraPageSchema, EphemeraBody, EphemeraFields,
    EphemeraPageSchema, ManufacturerBody, MultiUploadBody, MultiUploadForm, SessionBody,
    UploadBody, UploadForm,
};
use crate::inbound::http::health::StatusBody;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token issued by POST /api/v1/auth/register or /api/v1/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Camera catalogue API",
        description = "Catalogue of vintage cameras and printed ephemera, with bearer-token accounts.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::profile,
        crate::inbound::http::cameras::list_cameras,
        crate::inbound::http::cameras::search_cameras,
        crate::inbound::http::cameras::get_camera,
        crate::inbound::http::cameras::create_camera,
        crate::inbound::http::cameras::update_camera,
        crate::inbound::http::cameras::delete_camera,
        crate::inbound::http::ephemera::list_ephemera,
        crate::inbound::http::ephemera::get_ephemera,
        crate::inbound::http::ephemera::create_ephemera,
        crate::inbound::http::ephemera::update_ephemera,
        crate::inbound::http::ephemera::delete_ephemera,
        crate::inbound::http::manufacturers::list_manufacturers,
        crate::inbound::http::uploads::upload_image,
        crate::inbound::http::uploads::upload_images,
        crate::inbound::http::uploads::get_upload,
        crate::inbound::http::health::status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CredentialsRequest,
        AccountBody,
        SessionBody,
        CameraFields,
        CameraBody,
        CameraPageSchema,
        EphemeraFields,
        EphemeraBody,
        EphemeraPageSchema,
        ManufacturerBody,
        UploadBody,
        UploadForm,
        MultiUploadBody,
        MultiUploadForm,
        StatusBody,
        Error,
        ErrorCode
    )),
    tags(
        (name = "accounts", description = "Registration, login and profile"),
        (name = "cameras", description = "Camera catalogue"),
        (name = "ephemera", description = "Catalogues, manuals and advertisements"),
        (name = "manufacturers", description = "Manufacturer reference data"),
        (name = "uploads", description = "Image uploads"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
