//! Test utilities shared by unit tests (in `src/`) and integration tests
//! (in `tests/`).
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature. Panics
//! here are test failures, so `expect` is used freely.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{CameraRepository, ImageStore};
use crate::domain::{
    Account, AccountId, AccountService, AuthorizationGate, Camera, CameraDetails, CameraDraft,
    CredentialStore, DEFAULT_TOKEN_LIFETIME, Email, Role, SIGNING_SECRET_MIN_LEN,
    SessionTokenService, SigningSecret,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::image_storage::CapStdImageStore;
use crate::outbound::memory::{
    InMemoryAccountRepository, InMemoryCameraRepository, InMemoryEphemeraRepository,
    InMemoryManufacturerRepository,
};

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Clock frozen at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move forward by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        *self.lock_clock() += delta;
    }

    /// Move forward by whole seconds.
    pub fn advance_seconds(&self, seconds: i64) {
        self.advance(TimeDelta::seconds(seconds));
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().expect("clock mutex")
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Argon2 store with minimal cost, for tests that hash passwords.
#[must_use]
pub fn fast_credential_store() -> CredentialStore {
    CredentialStore::with_cost(8, 1).expect("valid argon2 parameters")
}

/// Fully wired HTTP state over in-memory adapters and a temporary upload
/// directory.
///
/// # Examples
///
/// ```
/// use actix_web::{App, test, web};
/// use backend::domain::Role;
/// use backend::inbound::http::configure_api;
/// use backend::test_support::TestHarness;
///
/// # actix_web::rt::System::new().block_on(async {
/// let harness = TestHarness::new();
/// let app = test::init_service(
///     App::new()
///         .app_data(web::Data::new(harness.state.clone()))
///         .configure(configure_api),
/// )
/// .await;
/// let req = test::TestRequest::get()
///     .uri("/api/v1/auth/profile")
///     .insert_header(("Authorization", harness.bearer_for(Role::User)))
///     .to_request();
/// // The token is valid but names an account that was never stored.
/// assert_eq!(test::call_service(&app, req).await.status(), 404);
/// # });
/// ```
pub struct TestHarness {
    /// State to register with `App::app_data`.
    pub state: HttpState,
    /// Clock shared by the token service and repositories.
    pub clock: Arc<MutableClock>,
    /// Token service behind the gate.
    pub tokens: Arc<SessionTokenService>,
    cameras: Arc<InMemoryCameraRepository>,
    _uploads: tempfile::TempDir,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    /// Fresh, empty harness.
    #[must_use]
    pub fn new() -> Self {
        let clock = Arc::new(MutableClock::new(Utc::now()));
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let secret = SigningSecret::from_bytes(vec![0x5a; SIGNING_SECRET_MIN_LEN]);
        let tokens = Arc::new(SessionTokenService::new(
            &secret,
            DEFAULT_TOKEN_LIFETIME,
            Arc::clone(&dyn_clock),
        ));
        let accounts = AccountService::new(
            Arc::new(InMemoryAccountRepository::new()),
            Arc::new(fast_credential_store()),
            Arc::clone(&tokens),
            Arc::clone(&dyn_clock),
        );
        let gate = Arc::new(AuthorizationGate::new(Arc::clone(&tokens)));

        let uploads = tempfile::tempdir().expect("upload temp dir");
        let images: Arc<dyn ImageStore> = Arc::new(
            CapStdImageStore::open(uploads.path(), Arc::clone(&dyn_clock))
                .expect("open upload dir"),
        );
        let cameras = Arc::new(InMemoryCameraRepository::new(Arc::clone(&dyn_clock)));

        let state = HttpState::new(
            accounts,
            gate,
            HttpStatePorts {
                cameras: cameras.clone(),
                ephemera: Arc::new(InMemoryEphemeraRepository::new(dyn_clock)),
                manufacturers: Arc::new(InMemoryManufacturerRepository::new()),
                images,
            },
        );

        Self {
            state,
            clock,
            tokens,
            cameras,
            _uploads: uploads,
        }
    }

    /// `Authorization` header value for a fresh, unpersisted account.
    #[must_use]
    pub fn bearer_for(&self, role: Role) -> String {
        let account = Account {
            id: AccountId::random(),
            email: Email::parse("harness@example.com").expect("valid email"),
            role,
            created_at: self.clock.utc(),
        };
        let issued = self.tokens.issue(&account).expect("token issues");
        format!("Bearer {}", issued.token)
    }

    /// Store a camera directly, bypassing HTTP.
    pub async fn insert_camera(&self, details: CameraDetails) -> Camera {
        let draft = CameraDraft::try_new(details).expect("valid camera");
        self.cameras.create(&draft).await.expect("camera stored")
    }
}

/// Boundary used by [`multipart_body`].
pub const MULTIPART_BOUNDARY: &str = "catalogue-test-boundary";

/// Encode `(field, filename, bytes)` parts as a `multipart/form-data` body.
///
/// Returns the `Content-Type` header value and the body.
#[must_use]
pub fn multipart_body(parts: &[(&str, &str, &[u8])]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (field, filename, bytes) in parts {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    (
        format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        body,
    )
}
