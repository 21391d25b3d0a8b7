//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CameraRepository, EphemeraRepository, ImageStore, ManufacturerRepository,
};
use crate::domain::{AccountService, AuthorizationGate};

/// Parameter object bundling the driven ports used by catalogue handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub cameras: Arc<dyn CameraRepository>,
    pub ephemera: Arc<dyn EphemeraRepository>,
    pub manufacturers: Arc<dyn ManufacturerRepository>,
    pub images: Arc<dyn ImageStore>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: AccountService,
    pub gate: Arc<AuthorizationGate>,
    pub cameras: Arc<dyn CameraRepository>,
    pub ephemera: Arc<dyn EphemeraRepository>,
    pub manufacturers: Arc<dyn ManufacturerRepository>,
    pub images: Arc<dyn ImageStore>,
}

impl HttpState {
    /// Assemble handler state from the account workflows, the gate and the
    /// catalogue ports.
    pub fn new(accounts: AccountService, gate: Arc<AuthorizationGate>, ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            cameras,
            ephemera,
            manufacturers,
            images,
        } = ports;
        Self {
            accounts,
            gate,
            cameras,
            ephemera,
            manufacturers,
            images,
        }
    }
}
