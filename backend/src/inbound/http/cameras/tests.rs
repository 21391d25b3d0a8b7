//! Tests for the camera endpoints.

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test};
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::{CameraDetails, Role};
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

fn camera(name: &str, manufacturer: &str, year: i32, format: &str) -> CameraDetails {
    CameraDetails {
        name: name.to_owned(),
        manufacturer: manufacturer.to_owned(),
        year_introduced: year,
        format: format.to_owned(),
        rarity: "common".to_owned(),
        ..CameraDetails::default()
    }
}

async fn seeded_harness() -> TestHarness {
    let harness = TestHarness::new();
    for details in [
        camera("Ruby Reflex", "Thornton-Pickard", 1912, "plate"),
        camera("Imperial Triple Extension", "Thornton-Pickard", 1904, "plate"),
        camera("Brownie No. 2", "Kodak", 1901, "roll"),
        camera("Vest Pocket", "Kodak", 1912, "roll"),
    ] {
        harness.insert_camera(details).await;
    }
    harness
}

macro_rules! get_json {
    ($app:expr, $uri:expr) => {{
        let uri: &str = $uri;
        let res = test::call_service(&$app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK, "{uri}");
        let body: Value = test::read_body_json(res).await;
        body
    }};
}

#[actix_web::test]
async fn list_returns_the_envelope_in_name_order() {
    let harness = seeded_harness().await;
    let app = init_app!(harness);

    let body = get_json!(app, "/api/v1/cameras");
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 10);
    assert_eq!(body["total"], 4);
    assert_eq!(body["total_pages"], 1);
    let names: Vec<&str> = body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert_eq!(
        names,
        ["Brownie No. 2", "Imperial Triple Extension", "Ruby Reflex", "Vest Pocket"]
    );
}

#[rstest]
#[case("page=0&page_size=500", 1, 100)]
#[case("page=abc&page_size=-5", 1, 10)]
#[case("page=2&page_size=3", 2, 3)]
#[actix_web::test]
async fn envelope_echoes_effective_window(
    #[case] query: &str,
    #[case] page: u32,
    #[case] page_size: u32,
) {
    let harness = seeded_harness().await;
    let app = init_app!(harness);

    let body = get_json!(app, &format!("/api/v1/cameras?{query}"));
    assert_eq!(body["page"], page);
    assert_eq!(body["page_size"], page_size);
}

#[actix_web::test]
async fn second_page_holds_the_remainder() {
    let harness = seeded_harness().await;
    let app = init_app!(harness);

    let body = get_json!(app, "/api/v1/cameras?page=2&page_size=3");
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
}

#[rstest]
#[case("search=REFLEX", 1)]
#[case("search=thornton", 2)]
#[case("manufacturer=Kodak", 2)]
#[case("manufacturer=kodak", 0)]
#[case("format=roll&year_from=1910", 1)]
#[case("year_from=1902&year_to=1910", 1)]
#[case("year_from=nineteen-hundred", 4)]
#[case("secretfield=1&sort=DROP%20TABLE&order=sideways", 4)]
#[case("search=nothing-like-this", 0)]
#[actix_web::test]
async fn filters_narrow_the_total(#[case] query: &str, #[case] total: i64) {
    let harness = seeded_harness().await;
    let app = init_app!(harness);

    let body = get_json!(app, &format!("/api/v1/cameras?{query}"));
    assert_eq!(body["total"], total, "{query}");
}

#[actix_web::test]
async fn search_endpoint_matches_list() {
    let harness = seeded_harness().await;
    let app = init_app!(harness);

    let listed = get_json!(app, "/api/v1/cameras?search=pocket");
    let searched = get_json!(app, "/api/v1/cameras/search?search=pocket");
    assert_eq!(listed, searched);
}

#[actix_web::test]
async fn sort_by_year_descending_breaks_ties_by_id() {
    let harness = seeded_harness().await;
    let app = init_app!(harness);

    let body = get_json!(app, "/api/v1/cameras?sort=year_introduced&order=desc");
    let names: Vec<&str> = body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert_eq!(
        names,
        ["Ruby Reflex", "Vest Pocket", "Imperial Triple Extension", "Brownie No. 2"]
    );
}

#[actix_web::test]
async fn writes_require_a_token() {
    let harness = TestHarness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/v1/cameras")
        .set_json(json!({"name": "Ruby Reflex", "manufacturer": "Thornton-Pickard"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn create_update_delete_flow() {
    let harness = TestHarness::new();
    let app = init_app!(harness);
    let user = harness.bearer_for(Role::User);
    let admin = harness.bearer_for(Role::Admin);

    let create = test::TestRequest::post()
        .uri("/api/v1/cameras")
        .insert_header((AUTHORIZATION, user.clone()))
        .set_json(json!({
            "name": "Ruby Reflex",
            "manufacturer": "Thornton-Pickard",
            "year_introduced": 1912,
            "estimated_value_min": 500.0,
            "estimated_value_max": 800.0
        }))
        .to_request();
    let res = test::call_service(&app, create).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(res).await;
    let id = created["id"].as_i64().expect("numeric id");
    assert_eq!(created["estimated_value_range"], "500 - 800");

    let update = test::TestRequest::put()
        .uri(&format!("/api/v1/cameras/{id}"))
        .insert_header((AUTHORIZATION, user.clone()))
        .set_json(json!({"name": "Ruby Reflex Tropical", "manufacturer": "Thornton-Pickard"}))
        .to_request();
    let res = test::call_service(&app, update).await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(res).await;
    assert_eq!(updated["name"], "Ruby Reflex Tropical");
    assert_eq!(updated["year_introduced"], 0);
    assert!(updated.get("estimated_value_range").is_none());

    let user_delete = test::TestRequest::delete()
        .uri(&format!("/api/v1/cameras/{id}"))
        .insert_header((AUTHORIZATION, user))
        .to_request();
    assert_eq!(
        test::call_service(&app, user_delete).await.status(),
        StatusCode::FORBIDDEN
    );

    for expected in [StatusCode::NO_CONTENT, StatusCode::NOT_FOUND] {
        let admin_delete = test::TestRequest::delete()
            .uri(&format!("/api/v1/cameras/{id}"))
            .insert_header((AUTHORIZATION, admin.clone()))
            .to_request();
        assert_eq!(test::call_service(&app, admin_delete).await.status(), expected);
    }

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/cameras/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case(json!({"name": " ", "manufacturer": "Kodak"}), "name")]
#[case(json!({"name": "Brownie", "manufacturer": ""}), "manufacturer")]
#[case(
    json!({"name": "Brownie", "manufacturer": "Kodak", "estimated_value_min": 10.0, "estimated_value_max": 5.0}),
    "estimated_value_max"
)]
#[case(json!({"name": "x".repeat(300), "manufacturer": "Kodak"}), "name")]
#[case(json!({"name": "Brownie", "manufacturer": "Kodak", "format": "f".repeat(256)}), "format")]
#[actix_web::test]
async fn invalid_bodies_are_rejected(#[case] body: Value, #[case] field: &str) {
    let harness = TestHarness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/v1/cameras")
        .insert_header((AUTHORIZATION, harness.bearer_for(Role::User)))
        .set_json(body)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload: Value = test::read_body_json(res).await;
    assert_eq!(payload["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn overlong_update_is_rejected_before_storage() {
    let harness = seeded_harness().await;
    let app = init_app!(harness);

    let req = test::TestRequest::put()
        .uri("/api/v1/cameras/1")
        .insert_header((AUTHORIZATION, harness.bearer_for(Role::User)))
        .set_json(json!({"name": "Ruby", "manufacturer": "m".repeat(256)}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload: Value = test::read_body_json(res).await;
    assert_eq!(payload["details"]["code"], "too_long");
    assert_eq!(payload["details"]["field"], "manufacturer");
}

#[rstest]
#[case("/api/v1/cameras/999")]
#[case("/api/v1/cameras/not-a-number")]
#[actix_web::test]
async fn non_admin_delete_is_forbidden_even_when_missing(#[case] uri: &str) {
    let harness = TestHarness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::delete()
        .uri(uri)
        .insert_header((AUTHORIZATION, harness.bearer_for(Role::User)))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let anonymous = test::TestRequest::delete().uri(uri).to_request();
    assert_eq!(
        test::call_service(&app, anonymous).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn update_of_missing_camera_is_not_found() {
    let harness = TestHarness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::put()
        .uri("/api/v1/cameras/42")
        .insert_header((AUTHORIZATION, harness.bearer_for(Role::User)))
        .set_json(json!({"name": "Ruby Reflex", "manufacturer": "Thornton-Pickard"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}
