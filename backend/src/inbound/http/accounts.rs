//! Account API handlers.
//!
//! ```text
//! POST /api/auth/register {"name":"Sam","email":"sam@example.com","password":"hunter22"}
//! POST /api/auth/login {"email":"sam@example.com","password":"hunter22"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AccessToken, ApiResult, Error, LoginCredentials, Registration};
use crate::inbound::http::state::HttpState;

/// Sign-up request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// One of `owner`, `admin`, `sales`, `viewer`; defaults to `viewer`.
    #[serde(default)]
    pub role: Option<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.name,
            &value.email,
            &value.password,
            value.role.as_deref(),
        )
    }
}

/// Login request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub token: AccessToken,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: AccessToken,
}

/// Create an account and return a bearer token for it.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let token = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User created".to_owned(),
        token,
    }))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = TokenResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let token = state.accounts.login(credentials).await?;
    Ok(web::Json(TokenResponse { token }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::test_utils::TestPorts;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    fn test_app(
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
            .service(web::scope("/api/auth").service(register).service(login))
    }

    async fn send(ports: TestPorts, uri: &str, body: Value) -> (StatusCode, Value) {
        let app = test::init_service(test_app(ports)).await;
        let request = test::TestRequest::post().uri(uri).set_json(body).to_request();
        let response = test::call_service(&app, request).await;
        let status = response.status();
        (status, test::read_body_json(response).await)
    }

    #[actix_web::test]
    async fn register_returns_created_with_token() {
        let mut ports = TestPorts::default();
        ports
            .accounts
            .expect_register()
            .withf(|registration| {
                registration.email().to_string() == "sam@example.com"
                    && registration.role() == Role::Sales
            })
            .times(1)
            .returning(|_| Ok(AccessToken::new("signed".to_owned())));

        let (status, body) = send(
            ports,
            "/api/auth/register",
            json!({
                "name": "Sam",
                "email": " Sam@Example.com ",
                "password": "hunter22",
                "role": "sales"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "User created");
        assert_eq!(body["token"], "signed");
    }

    #[rstest]
    #[case(json!({"name": "", "email": "a@b.co", "password": "hunter22"}), "name")]
    #[case(json!({"name": "Sam", "email": "nope", "password": "hunter22"}), "email")]
    #[case(json!({"name": "Sam", "email": "a@b.co", "password": "short"}), "password")]
    #[case(json!({"name": "Sam", "email": "a@b.co", "password": "hunter22", "role": "root"}), "role")]
    #[actix_web::test]
    async fn register_rejects_invalid_fields(#[case] body: Value, #[case] field: &str) {
        let (status, body) = send(TestPorts::default(), "/api/auth/register", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], field);
    }

    #[actix_web::test]
    async fn register_surfaces_duplicate_email_as_conflict() {
        let mut ports = TestPorts::default();
        ports
            .accounts
            .expect_register()
            .returning(|_| Err(Error::conflict("Email already exists")));

        let (status, body) = send(
            ports,
            "/api/auth/register",
            json!({"name": "Sam", "email": "a@b.co", "password": "hunter22"}),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "Email already exists");
    }

    #[actix_web::test]
    async fn login_returns_token() {
        let mut ports = TestPorts::default();
        ports
            .accounts
            .expect_login()
            .withf(|credentials| credentials.email() == "admin@carsales.com")
            .returning(|_| Ok(AccessToken::new("signed".to_owned())));

        let (status, body) = send(
            ports,
            "/api/auth/login",
            json!({"email": "Admin@CarSales.com", "password": "admin123"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"token": "signed"}));
    }

    #[actix_web::test]
    async fn login_with_bad_credentials_is_unauthorised() {
        let mut ports = TestPorts::default();
        ports
            .accounts
            .expect_login()
            .returning(|_| Err(Error::unauthorized("Invalid credentials")));

        let (status, body) = send(
            ports,
            "/api/auth/login",
            json!({"email": "admin@carsales.com", "password": "wrong"}),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid credentials");
    }

    #[actix_web::test]
    async fn login_with_blank_password_is_a_bad_request() {
        let (status, body) = send(
            TestPorts::default(),
            "/api/auth/login",
            json!({"email": "admin@carsales.com", "password": ""}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], "password");
    }
}
