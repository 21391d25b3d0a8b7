//! Backend entry-point: loads settings, selects storage, and serves the REST
//! API with its OpenAPI docs.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::token_config::{
    BuildMode, secret_fingerprint, token_settings_from_process_env,
};
use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use backend::settings::ServerSettings;
use server::{ServerConfig, create_server};

async fn connect_database(database_url: &str) -> std::io::Result<DbPool> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .map_err(|err| std::io::Error::other(format!("migration task failed: {err}")))?
        .map_err(|err| std::io::Error::other(format!("migrations failed: {err}")))?;

    DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|err| std::io::Error::other(format!("database pool failed: {err}")))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|err| std::io::Error::other(format!("invalid server settings: {err}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;

    let tokens = token_settings_from_process_env(BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    if tokens.ephemeral {
        warn!("using an ephemeral token signing key; tokens will not survive a restart");
    }
    info!(
        fingerprint = %secret_fingerprint(&tokens.secret),
        lifetime_seconds = tokens.lifetime.num_seconds(),
        "token signing key loaded"
    );

    let mut config = ServerConfig::new(bind_addr, tokens, settings.upload_dir().to_path_buf());
    if let Some(database_url) = settings.database_url() {
        config = config.with_db_pool(connect_database(database_url).await?);
    }
    if settings.seed {
        config = config.with_seed(settings.admin_password().map(str::to_owned));
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting server");
    let server = create_server(health_state.clone(), config).await?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
