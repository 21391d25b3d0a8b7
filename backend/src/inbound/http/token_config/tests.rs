//! Unit tests for token configuration parsing.

use std::collections::HashMap;
use std::io::Write;

use mockable::MockEnv;
use rstest::rstest;
use tempfile::NamedTempFile;

use super::*;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temporary key file");
    file.write_all(&vec![b'k'; len]).expect("write key bytes");
    file
}

fn path_of(file: &NamedTempFile) -> String {
    file.path().to_string_lossy().into_owned()
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn expect_error(result: Result<TokenSettings, TokenConfigError>, label: &str) -> TokenConfigError {
    match result {
        Ok(_) => panic!("{label}"),
        Err(error) => error,
    }
}

#[rstest]
#[case(BuildMode::Debug)]
#[case(BuildMode::Release)]
fn reads_a_long_enough_key(#[case] mode: BuildMode) {
    let file = key_file(SIGNING_SECRET_MIN_LEN);
    let env = mock_env(HashMap::from([(KEY_FILE_ENV, path_of(&file))]));

    let settings = token_settings_from_env(&env, mode).expect("settings load");
    assert!(!settings.ephemeral);
    assert_eq!(settings.secret.expose(), vec![b'k'; SIGNING_SECRET_MIN_LEN].as_slice());
    assert_eq!(settings.lifetime, DEFAULT_TOKEN_LIFETIME);
}

#[rstest]
fn release_rejects_a_missing_key() {
    let env = mock_env(HashMap::from([(
        KEY_FILE_ENV,
        "/nonexistent/token-signing-key".to_owned(),
    )]));
    let err = expect_error(
        token_settings_from_env(&env, BuildMode::Release),
        "expected missing key to fail",
    );
    assert!(matches!(err, TokenConfigError::KeyRead { .. }));
}

#[rstest]
fn release_rejects_a_short_key() {
    let file = key_file(SIGNING_SECRET_MIN_LEN - 1);
    let env = mock_env(HashMap::from([(KEY_FILE_ENV, path_of(&file))]));
    let err = expect_error(
        token_settings_from_env(&env, BuildMode::Release),
        "expected short key to fail",
    );
    assert!(matches!(
        err,
        TokenConfigError::KeyTooShort { length, min_len, .. }
            if length == SIGNING_SECRET_MIN_LEN - 1 && min_len == SIGNING_SECRET_MIN_LEN
    ));
}

#[rstest]
fn debug_falls_back_to_an_ephemeral_key() {
    let env = mock_env(HashMap::from([(
        KEY_FILE_ENV,
        "/nonexistent/token-signing-key".to_owned(),
    )]));
    let settings = token_settings_from_env(&env, BuildMode::Debug).expect("debug tolerates");
    assert!(settings.ephemeral);
    assert_eq!(settings.secret.expose().len(), SIGNING_SECRET_MIN_LEN);
}

#[rstest]
#[case("1")]
#[case("true")]
fn release_allows_ephemeral_keys_when_asked(#[case] flag: &str) {
    let env = mock_env(HashMap::from([
        (KEY_FILE_ENV, "/nonexistent/token-signing-key".to_owned()),
        (ALLOW_EPHEMERAL_ENV, flag.to_owned()),
    ]));
    let settings = token_settings_from_env(&env, BuildMode::Release).expect("ephemeral allowed");
    assert!(settings.ephemeral);
}

#[rstest]
fn invalid_ephemeral_flag_is_rejected() {
    let env = mock_env(HashMap::from([(ALLOW_EPHEMERAL_ENV, "maybe".to_owned())]));
    let err = expect_error(
        token_settings_from_env(&env, BuildMode::Debug),
        "expected invalid flag to fail",
    );
    assert!(matches!(
        err,
        TokenConfigError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            ..
        }
    ));
}

#[rstest]
#[case("3600", 3600)]
#[case(" 60 ", 60)]
fn lifetime_is_read_in_seconds(#[case] raw: &str, #[case] expected: i64) {
    let file = key_file(SIGNING_SECRET_MIN_LEN);
    let env = mock_env(HashMap::from([
        (KEY_FILE_ENV, path_of(&file)),
        (TTL_ENV, raw.to_owned()),
    ]));
    let settings = token_settings_from_env(&env, BuildMode::Release).expect("settings load");
    assert_eq!(settings.lifetime.num_seconds(), expected);
}

#[rstest]
#[case("0")]
#[case("-10")]
#[case("soon")]
fn invalid_lifetimes_are_rejected(#[case] raw: &str) {
    let env = mock_env(HashMap::from([(TTL_ENV, raw.to_owned())]));
    let err = expect_error(
        token_settings_from_env(&env, BuildMode::Debug),
        "expected invalid lifetime to fail",
    );
    assert!(matches!(err, TokenConfigError::InvalidEnv { name: TTL_ENV, .. }));
}

#[rstest]
fn fingerprints_are_stable_and_distinct() {
    let first = SigningSecret::from_bytes(vec![b'a'; SIGNING_SECRET_MIN_LEN]);
    let again = SigningSecret::from_bytes(vec![b'a'; SIGNING_SECRET_MIN_LEN]);
    let other = SigningSecret::from_bytes(vec![b'b'; SIGNING_SECRET_MIN_LEN]);

    let fp = secret_fingerprint(&first);
    assert_eq!(fp.len(), FINGERPRINT_BYTES * 2);
    assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert_eq!(fp, secret_fingerprint(&again));
    assert_ne!(fp, secret_fingerprint(&other));
}

#[rstest]
fn process_environment_is_read() {
    let file = key_file(SIGNING_SECRET_MIN_LEN);
    let _guard = env_lock::lock_env([
        (KEY_FILE_ENV, Some(path_of(&file))),
        (TTL_ENV, Some("120".to_owned())),
        (ALLOW_EPHEMERAL_ENV, None),
    ]);

    let settings =
        token_settings_from_process_env(BuildMode::Release).expect("process settings load");
    assert!(!settings.ephemeral);
    assert_eq!(settings.lifetime.num_seconds(), 120);
}
