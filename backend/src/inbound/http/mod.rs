//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod cameras;
pub mod catalogue;
pub mod ephemera;
pub mod error;
pub mod health;
pub mod manufacturers;
pub mod schemas;
pub mod session;
pub mod state;
pub mod token_config;
pub mod uploads;
pub(crate) mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register the REST API and the upload file route.
///
/// Expects a `web::Data<state::HttpState>` on the application. Health checks
/// are registered separately because they depend only on
/// [`health::HealthState`].
///
/// # Examples
/// ```no_run
/// use actix_web::App;
/// use backend::inbound::http::configure_api;
///
/// let _app = App::new().configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(
            web::scope("/api/v1")
                .service(accounts::register)
                .service(accounts::login)
                .service(accounts::profile)
                // `/cameras/search` must precede `/cameras/{id}`.
                .service(cameras::list_cameras)
                .service(cameras::search_cameras)
                .service(cameras::get_camera)
                .service(cameras::create_camera)
                .service(cameras::update_camera)
                .service(cameras::delete_camera)
                .service(ephemera::list_ephemera)
                .service(ephemera::get_ephemera)
                .service(ephemera::create_ephemera)
                .service(ephemera::update_ephemera)
                .service(ephemera::delete_ephemera)
                .service(manufacturers::list_manufacturers)
                .service(uploads::upload_image)
                .service(uploads::upload_images),
        )
        .service(uploads::get_upload);
}
