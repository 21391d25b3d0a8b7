//! Builders for HTTP state ports and the repositories behind them.

use std::path::Path;
use std::sync::Arc;

use mockable::Clock;
use tracing::warn;

use backend::domain::ports::{
    AccountRepository, CameraRepository, EphemeraRepository, ManufacturerRepository,
};
use backend::domain::{AccountService, AuthorizationGate, CredentialStore, SessionTokenService};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::image_storage::CapStdImageStore;
use backend::outbound::memory::{
    InMemoryAccountRepository, InMemoryCameraRepository, InMemoryEphemeraRepository,
    InMemoryManufacturerRepository,
};
use backend::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselCameraRepository, DieselEphemeraRepository,
    DieselManufacturerRepository,
};
use backend::seed::{SeedTargets, seed_catalogue};

use super::ServerConfig;

/// Repository set selected for this process.
struct Repositories {
    accounts: Arc<dyn AccountRepository>,
    cameras: Arc<dyn CameraRepository>,
    ephemera: Arc<dyn EphemeraRepository>,
    manufacturers: Arc<dyn ManufacturerRepository>,
}

/// Use PostgreSQL-backed repositories when a pool is available, otherwise
/// keep everything in memory.
fn build_repositories(pool: Option<&DbPool>, clock: &Arc<dyn Clock>) -> Repositories {
    match pool {
        Some(pool) => Repositories {
            accounts: Arc::new(DieselAccountRepository::new(pool.clone())),
            cameras: Arc::new(DieselCameraRepository::new(pool.clone(), Arc::clone(clock))),
            ephemera: Arc::new(DieselEphemeraRepository::new(pool.clone(), Arc::clone(clock))),
            manufacturers: Arc::new(DieselManufacturerRepository::new(pool.clone())),
        },
        None => {
            warn!("no database configured; records are kept in memory and lost on exit");
            Repositories {
                accounts: Arc::new(InMemoryAccountRepository::new()),
                cameras: Arc::new(InMemoryCameraRepository::new(Arc::clone(clock))),
                ephemera: Arc::new(InMemoryEphemeraRepository::new(Arc::clone(clock))),
                manufacturers: Arc::new(InMemoryManufacturerRepository::new()),
            }
        }
    }
}

fn open_image_store(path: &Path, clock: Arc<dyn Clock>) -> std::io::Result<CapStdImageStore> {
    CapStdImageStore::open(path, clock).map_err(|err| {
        std::io::Error::new(
            err.kind(),
            format!("failed to open upload directory {}: {err}", path.display()),
        )
    })
}

/// Wire the account service, the authorization gate and the catalogue ports.
///
/// # Errors
/// Returns [`std::io::Error`] when the upload directory cannot be opened.
pub(crate) fn build_http_state(
    config: &ServerConfig,
    clock: Arc<dyn Clock>,
) -> std::io::Result<HttpState> {
    let repositories = build_repositories(config.db_pool.as_ref(), &clock);
    let tokens = Arc::new(SessionTokenService::new(
        &config.tokens.secret,
        config.tokens.lifetime,
        Arc::clone(&clock),
    ));
    let accounts = AccountService::new(
        repositories.accounts,
        Arc::new(CredentialStore::new()),
        Arc::clone(&tokens),
        Arc::clone(&clock),
    );
    let gate = Arc::new(AuthorizationGate::new(tokens));
    let images = Arc::new(open_image_store(&config.upload_dir, clock)?);

    Ok(HttpState::new(
        accounts,
        gate,
        HttpStatePorts {
            cameras: repositories.cameras,
            ephemera: repositories.ephemera,
            manufacturers: repositories.manufacturers,
            images,
        },
    ))
}

/// Seed the sample catalogue through the ports held by `state`.
///
/// # Errors
/// Returns [`std::io::Error`] when any seeding step fails.
pub(crate) async fn seed_state(
    state: &HttpState,
    admin_password: Option<&str>,
) -> std::io::Result<()> {
    seed_catalogue(
        SeedTargets {
            accounts: &state.accounts,
            manufacturers: state.manufacturers.as_ref(),
            cameras: state.cameras.as_ref(),
        },
        admin_password,
    )
    .await
    .map(drop)
    .map_err(|err| std::io::Error::other(format!("seeding failed: {err}")))
}

/// Seed through [`seed_state`], logging a failure instead of aborting
/// startup. Returns whether seeding succeeded.
pub(crate) async fn seed_or_warn(state: &HttpState, admin_password: Option<&str>) -> bool {
    match seed_state(state, admin_password).await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "continuing without seed data");
            false
        }
    }
}
