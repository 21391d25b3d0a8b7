//! Bearer-token extractors.
//!
//! Handlers declare the capability they need by taking [`Authenticated`] or
//! [`AdminPrincipal`] as their first argument. Actix resolves extractors in
//! argument order, so the gate decides before the path, query or body is
//! looked at and before any handler logic runs.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};

use crate::domain::{Decision, Error, Principal, Requirement};

use super::state::HttpState;

/// Any verified account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authenticated(pub Principal);

/// A verified account holding the admin role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminPrincipal(pub Principal);

fn gate_request(req: &HttpRequest, requirement: Requirement) -> Result<Principal, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not registered"))?;
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    match state.gate.evaluate(header, requirement) {
        Decision::Allow(Some(principal)) => Ok(principal),
        Decision::Allow(None) => Err(Error::unauthorized("authentication required")),
        Decision::Deny(denial) => Err(denial.into()),
    }
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(gate_request(req, Requirement::Authenticated).map(Self))
    }
}

impl FromRequest for AdminPrincipal {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(gate_request(req, Requirement::Admin).map(Self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use rstest::rstest;

    use crate::domain::Role;
    use crate::test_support::TestHarness;

    async fn whoami(user: Authenticated) -> HttpResponse {
        HttpResponse::Ok().body(user.0.role.as_str())
    }

    async fn admin_only(_: AdminPrincipal) -> HttpResponse {
        HttpResponse::NoContent().finish()
    }

    async fn status_for(path: &str, authorization: Option<String>) -> StatusCode {
        let harness = TestHarness::new();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(harness.state.clone()))
                .route("/me", web::get().to(whoami))
                .route("/admin", web::delete().to(admin_only)),
        )
        .await;
        let mut request = if path == "/admin" {
            test::TestRequest::delete()
        } else {
            test::TestRequest::get()
        }
        .uri(path);
        if let Some(value) = authorization {
            request = request.insert_header((AUTHORIZATION, value));
        }
        test::call_service(&app, request.to_request()).await.status()
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Bearer".to_owned()))]
    #[case(Some("Basic dXNlcjpwYXNz".to_owned()))]
    #[case(Some("Bearer not.a.token".to_owned()))]
    #[actix_web::test]
    async fn missing_or_invalid_tokens_are_unauthenticated(#[case] header: Option<String>) {
        assert_eq!(status_for("/me", header.clone()).await, StatusCode::UNAUTHORIZED);
        assert_eq!(status_for("/admin", header).await, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn user_tokens_pass_authenticated_but_not_admin() {
        let harness = TestHarness::new();
        let token = harness.bearer_for(Role::User);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(harness.state.clone()))
                .route("/me", web::get().to(whoami))
                .route("/admin", web::delete().to(admin_only)),
        )
        .await;

        let me = test::TestRequest::get()
            .uri("/me")
            .insert_header((AUTHORIZATION, token.clone()))
            .to_request();
        let res = test::call_service(&app, me).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "user");

        let admin = test::TestRequest::delete()
            .uri("/admin")
            .insert_header((AUTHORIZATION, token))
            .to_request();
        assert_eq!(
            test::call_service(&app, admin).await.status(),
            StatusCode::FORBIDDEN
        );
    }

    #[actix_web::test]
    async fn admin_tokens_pass_the_admin_gate() {
        let harness = TestHarness::new();
        let token = harness.bearer_for(Role::Admin);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(harness.state.clone()))
                .route("/admin", web::delete().to(admin_only)),
        )
        .await;
        let req = test::TestRequest::delete()
            .uri("/admin")
            .insert_header((AUTHORIZATION, token))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NO_CONTENT
        );
    }

    #[actix_web::test]
    async fn expired_tokens_are_unauthenticated() {
        let harness = TestHarness::new();
        let token = harness.bearer_for(Role::Admin);
        harness.clock.advance_seconds(harness.tokens.lifetime().num_seconds() + 1);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(harness.state.clone()))
                .route("/me", web::get().to(whoami)),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((AUTHORIZATION, token))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
