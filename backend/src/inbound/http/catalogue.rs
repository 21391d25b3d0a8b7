//! Pieces shared by the camera and ephemera handlers.

use std::collections::HashMap;

use pagination::PageWindow;

use crate::domain::ports::CatalogueRepositoryError;
use crate::domain::{Error, QuerySpec, ResourceKind};

/// Raw list parameters. Unknown keys are carried along and ignored later.
pub type ListParams = HashMap<String, String>;

/// Split raw list parameters into a validated filter specification and a
/// clamped page window. Neither step can fail.
pub(crate) fn list_request(resource: ResourceKind, params: &ListParams) -> (QuerySpec, PageWindow) {
    let spec = QuerySpec::build(resource, params);
    let window = PageWindow::from_params(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    (spec, window)
}

/// Map catalogue persistence failures onto the shared error taxonomy.
pub(crate) fn map_catalogue_error(error: CatalogueRepositoryError) -> Error {
    match error {
        CatalogueRepositoryError::Connection { message } => Error::service_unavailable(message),
        CatalogueRepositoryError::Query { message } => Error::internal(message),
    }
}
