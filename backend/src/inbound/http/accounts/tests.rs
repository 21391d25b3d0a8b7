//! Tests for the account endpoints.

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test};
use serde_json::{Value, json};

use crate::inbound::http::configure_api;
use crate::test_support::TestHarness;

macro_rules! init_app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new($harness.state.clone()))
                .configure(configure_api),
        )
        .await
    };
}

fn credentials(email: &str, password: &str) -> Value {
    json!({ "email": email, "password": password })
}

#[actix_web::test]
async fn register_returns_token_and_public_account() {
    let harness = TestHarness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(credentials("Ada@Example.com", "hunter22"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(res).await;
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["expires_at"].is_string());
    assert_eq!(body["account"]["email"], "ada@example.com");
    assert_eq!(body["account"]["role"], "user");
    let account = body["account"].as_object().expect("account object");
    assert!(!account.contains_key("password_hash"));
    assert!(!account.contains_key("password"));
}

#[actix_web::test]
async fn duplicate_registration_conflicts_without_a_token() {
    let harness = TestHarness::new();
    let app = init_app!(harness);

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(credentials("ada@example.com", "hunter22"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), expected);
        if expected == StatusCode::CONFLICT {
            let body: Value = test::read_body_json(res).await;
            assert_eq!(body["code"], "conflict");
            assert!(body.get("token").is_none());
        }
    }
}

#[actix_web::test]
async fn registration_validates_email_and_password() {
    let harness = TestHarness::new();
    let app = init_app!(harness);

    for (email, password, field) in [
        ("not-an-email", "hunter22", "email"),
        ("ada@example.com", "short", "password"),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(credentials(email, password))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], field);
    }
}

#[actix_web::test]
async fn login_then_profile_round_trip() {
    let harness = TestHarness::new();
    let app = init_app!(harness);

    let register = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(credentials("ada@example.com", "hunter22"))
        .to_request();
    assert_eq!(
        test::call_service(&app, register).await.status(),
        StatusCode::CREATED
    );

    let login = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(credentials("ADA@example.com", "hunter22"))
        .to_request();
    let res = test::call_service(&app, login).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    let token = body["token"].as_str().expect("token").to_owned();

    let profile = test::TestRequest::get()
        .uri("/api/v1/auth/profile")
        .insert_header((AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let res = test::call_service(&app, profile).await;
    assert_eq!(res.status(), StatusCode::OK);
    let account: Value = test::read_body_json(res).await;
    assert_eq!(account["email"], "ada@example.com");
    assert_eq!(account["id"], body["account"]["id"]);
}

#[actix_web::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let harness = TestHarness::new();
    let app = init_app!(harness);

    let register = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(credentials("ada@example.com", "hunter22"))
        .to_request();
    test::call_service(&app, register).await;

    let mut bodies = Vec::new();
    for (email, password) in [
        ("ada@example.com", "wrong-password"),
        ("nobody@example.com", "hunter22"),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(credentials(email, password))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let mut body: Value = test::read_body_json(res).await;
        if let Some(object) = body.as_object_mut() {
            object.remove("trace_id");
        }
        bodies.push(body);
    }
    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[0]["message"], "invalid credentials");
}

#[actix_web::test]
async fn profile_requires_a_token() {
    let harness = TestHarness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/profile")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn profile_of_a_vanished_account_is_not_found() {
    let harness = TestHarness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/profile")
        .insert_header((AUTHORIZATION, harness.bearer_for(crate::domain::Role::User)))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn malformed_json_is_an_invalid_request() {
    let harness = TestHarness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"email\":")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
}
