//! Bearer-token caller extraction.
//!
//! Handlers that need an identity take a [`Caller`] argument. Extraction
//! reads `Authorization: Bearer <token>` and asks the accounts port to verify
//! it, so handlers never see raw tokens.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{AuthenticatedUser, Capability, Error, Role, UserId, authorize};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Verified identity of the requesting user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(AuthenticatedUser);

impl Caller {
    pub fn id(&self) -> UserId {
        self.0.id
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    /// Fail with `forbidden` unless the caller's role grants `capability`.
    pub fn require(&self, capability: Capability) -> Result<(), Error> {
        authorize(self.role(), capability)
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("No token provided"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("Invalid token"))?;
    value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("No token provided"))
}

fn extract(req: &HttpRequest) -> Result<Caller, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let token = bearer_token(req)?;
    let user = state.accounts.authenticate(token).inspect_err(|err| {
        debug!(error = %err, "bearer token rejected");
    })?;
    Ok(Caller(user))
}

impl FromRequest for Caller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::inbound::http::test_utils::{TestPorts, caller_token};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use actix_web::{App, HttpResponse};
    use rstest::rstest;
    use serde_json::Value;

    async fn whoami(caller: Caller) -> HttpResponse {
        HttpResponse::Ok().body(format!("{}:{}", caller.id(), caller.role()))
    }

    async fn managers_only(caller: Caller) -> Result<HttpResponse, Error> {
        caller.require(Capability::ManageListings)?;
        Ok(HttpResponse::Ok().finish())
    }

    fn app(
        ports: TestPorts,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(ports.into_state()))
            .route("/whoami", web::get().to(whoami))
            .route("/manage", web::get().to(managers_only))
    }

    #[actix_web::test]
    async fn valid_bearer_tokens_resolve_the_caller() {
        let mut ports = TestPorts::default();
        ports.authenticate_as(UserId::new(7), Role::Sales);
        let service = actix_test::init_service(app(ports)).await;

        let request = actix_test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, format!("Bearer {}", caller_token())))
            .to_request();
        let response = actix_test::call_service(&service, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(actix_test::read_body(response).await, "7:sales");
    }

    #[rstest]
    #[case::missing(None, "No token provided")]
    #[case::wrong_scheme(Some("Basic abc"), "No token provided")]
    #[case::empty(Some("Bearer "), "No token provided")]
    #[actix_web::test]
    async fn absent_tokens_are_unauthorised(
        #[case] header: Option<&'static str>,
        #[case] message: &str,
    ) {
        let service = actix_test::init_service(app(TestPorts::default())).await;

        let mut request = actix_test::TestRequest::get().uri("/whoami");
        if let Some(value) = header {
            request = request.insert_header((AUTHORIZATION, value));
        }
        let response = actix_test::call_service(&service, request.to_request()).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], message);
    }

    #[actix_web::test]
    async fn rejected_tokens_are_unauthorised() {
        let mut ports = TestPorts::default();
        ports
            .accounts
            .expect_authenticate()
            .returning(|_| Err(Error::unauthorized("Invalid token")));
        let service = actix_test::init_service(app(ports)).await;

        let request = actix_test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, "Bearer forged"))
            .to_request();
        let response = actix_test::call_service(&service, request).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], "unauthorized");
    }

    #[rstest]
    #[case(Role::Viewer, StatusCode::FORBIDDEN)]
    #[case(Role::Sales, StatusCode::OK)]
    #[actix_web::test]
    async fn capabilities_gate_by_role(#[case] role: Role, #[case] expected: StatusCode) {
        let mut ports = TestPorts::default();
        ports.authenticate_as(UserId::new(3), role);
        let service = actix_test::init_service(app(ports)).await;

        let request = actix_test::TestRequest::get()
            .uri("/manage")
            .insert_header((AUTHORIZATION, format!("Bearer {}", caller_token())))
            .to_request();
        let response = actix_test::call_service(&service, request).await;

        assert_eq!(response.status(), expected);
    }

    #[rstest]
    fn require_reports_forbidden() {
        let caller = Caller(AuthenticatedUser {
            id: UserId::new(1),
            email: "viewer@example.com".to_owned(),
            role: Role::Viewer,
        });
        let err = caller
            .require(Capability::RemoveListings)
            .expect_err("viewer cannot remove");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
