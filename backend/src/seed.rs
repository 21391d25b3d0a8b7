//! Startup seeding of the administrator account and reference catalogue.
//!
//! Every step is idempotent: the admin account is created only when its
//! email is free, and manufacturers and cameras are inserted only into
//! empty tables.

use pagination::PageWindow;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::ports::{CameraRepository, CatalogueRepositoryError, ManufacturerRepository};
use crate::domain::{
    AccountService, AccountValidationError, CameraDetails, CameraDraft, Email, NewManufacturer,
    QuerySpec, RecordValidationError, ResourceKind, Role,
};

/// Login of the seeded administrator.
pub const ADMIN_EMAIL: &str = "admin@thorntonpickard.com";

/// Errors returned while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Account creation failed.
    #[error("admin account seeding failed: {0}")]
    Account(#[source] crate::domain::Error),
    /// Catalogue storage failed.
    #[error("catalogue seeding failed: {0}")]
    Catalogue(#[from] CatalogueRepositoryError),
    /// Built-in seed data was rejected by validation.
    #[error("invalid seed record: {0}")]
    InvalidRecord(#[from] RecordValidationError),
    /// The built-in admin email failed to parse.
    #[error("invalid admin email: {0}")]
    InvalidEmail(#[from] AccountValidationError),
}

/// What a seeding run changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedOutcome {
    /// Whether the admin account was created by this run.
    pub admin_created: bool,
    /// Manufacturers inserted.
    pub manufacturers: usize,
    /// Cameras inserted.
    pub cameras: usize,
}

/// Ports and services seeding writes through.
pub struct SeedTargets<'a> {
    /// Account workflows, used to hash the admin password.
    pub accounts: &'a AccountService,
    /// Manufacturer storage.
    pub manufacturers: &'a dyn ManufacturerRepository,
    /// Camera storage.
    pub cameras: &'a dyn CameraRepository,
}

/// Seed the admin account, manufacturers and cameras.
///
/// The admin step is skipped with a warning when `admin_password` is
/// `None`.
///
/// # Errors
///
/// [`SeedError`] when a repository or the account service fails.
pub async fn seed_catalogue(
    targets: SeedTargets<'_>,
    admin_password: Option<&str>,
) -> Result<SeedOutcome, SeedError> {
    let admin_created = seed_admin(targets.accounts, admin_password).await?;
    let manufacturers = seed_manufacturers(targets.manufacturers).await?;
    let cameras = seed_cameras(targets.cameras).await?;

    let outcome = SeedOutcome {
        admin_created,
        manufacturers,
        cameras,
    };
    info!(
        admin_created,
        manufacturers, cameras, "catalogue seeding completed"
    );
    Ok(outcome)
}

async fn seed_admin(accounts: &AccountService, password: Option<&str>) -> Result<bool, SeedError> {
    let Some(password) = password else {
        warn!(email = ADMIN_EMAIL, "no admin password configured; skipping admin seed");
        return Ok(false);
    };
    let email = Email::parse(ADMIN_EMAIL)?;
    let created = accounts
        .ensure_account(&email, password, Role::Admin)
        .await
        .map_err(SeedError::Account)?;
    if !created {
        info!(email = ADMIN_EMAIL, "admin account already exists; skipping");
    }
    Ok(created)
}

async fn seed_manufacturers(repo: &dyn ManufacturerRepository) -> Result<usize, SeedError> {
    if !repo.list_all().await?.is_empty() {
        info!("manufacturers already exist; skipping seed");
        return Ok(0);
    }
    let defaults = default_manufacturers();
    for manufacturer in &defaults {
        repo.insert(manufacturer).await?;
    }
    Ok(defaults.len())
}

async fn seed_cameras(repo: &dyn CameraRepository) -> Result<usize, SeedError> {
    let existing = repo
        .list(&QuerySpec::unfiltered(ResourceKind::Camera), PageWindow::new(1, 1))
        .await?;
    if existing.total > 0 {
        info!("cameras already exist; skipping seed");
        return Ok(0);
    }
    let drafts = default_cameras()
        .into_iter()
        .map(CameraDraft::try_new)
        .collect::<Result<Vec<_>, _>>()?;
    for draft in &drafts {
        repo.create(draft).await?;
    }
    Ok(drafts.len())
}

fn default_manufacturers() -> Vec<NewManufacturer> {
    vec![NewManufacturer {
        name: "Thornton-Pickard".to_owned(),
        founded: 1888,
        defunct: Some(1939),
        country: "United Kingdom".to_owned(),
        description: "British camera manufacturer known for quality plate cameras and shutters"
            .to_owned(),
    }]
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|&value| value.to_owned()).collect()
}

fn default_cameras() -> Vec<CameraDetails> {
    vec![
        CameraDetails {
            name: "Ruby Reflex".to_owned(),
            manufacturer: "Thornton-Pickard".to_owned(),
            year_introduced: 1909,
            year_discontinued: Some(1926),
            format: "Plate".to_owned(),
            plate_sizes: strings(&["4x5", "5x7"]),
            lens: "Various".to_owned(),
            shutter: "Focal Plane".to_owned(),
            features: strings(&["Reflex viewing", "Tilting back", "Rising front"]),
            description: "Professional reflex camera popular with press photographers".to_owned(),
            rarity: "Uncommon".to_owned(),
            estimated_value_min: Some(500.0),
            estimated_value_max: Some(800.0),
            ..CameraDetails::default()
        },
        CameraDetails {
            name: "Imperial Triple Extension".to_owned(),
            manufacturer: "Thornton-Pickard".to_owned(),
            year_introduced: 1895,
            format: "Plate".to_owned(),
            plate_sizes: strings(&["Half-plate", "Whole-plate"]),
            shutter: "Time Shutter".to_owned(),
            features: strings(&["Triple extension bellows", "Mahogany construction"]),
            description: "High-quality field camera with extensive movements".to_owned(),
            rarity: "Rare".to_owned(),
            estimated_value_min: Some(300.0),
            estimated_value_max: Some(600.0),
            ..CameraDetails::default()
        },
    ]
}
