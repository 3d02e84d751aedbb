//! Shared harness for end-to-end tests over the in-memory adapters.

use std::net::SocketAddr;
use std::time::Duration;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use actix_web::{test, web};
use carmarket::inbound::http::health::HealthState;
use carmarket::server::{AppDependencies, ServerConfig, build_app, build_http_state};
use serde_json::{Value, json};
use tempfile::TempDir;

const BOUNDARY: &str = "carmarket-it-boundary";

/// Uploads directory kept alive for the duration of a test.
pub struct Harness {
    pub uploads: TempDir,
    pub deps: AppDependencies,
}

impl Harness {
    pub fn new() -> Self {
        let uploads = tempfile::tempdir().expect("temp upload dir");
        let addr: SocketAddr = "127.0.0.1:0".parse().expect("literal address");
        let config = ServerConfig::new(
            addr,
            uploads.path(),
            b"integration-secret",
            Duration::from_secs(3600),
        );
        let http_state = build_http_state(&config).expect("http state");
        let deps = AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: web::Data::new(http_state),
            upload_dir: uploads.path().to_path_buf(),
        };
        Self { uploads, deps }
    }
}

pub trait TestApp: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {}

impl<S> TestApp for S where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>
{
}

pub async fn app(harness: &Harness) -> impl TestApp {
    test::init_service(build_app(harness.deps.clone())).await
}

/// Send `request` and decode the JSON body, or `Value::Null` when empty.
pub async fn send(app: &impl TestApp, request: Request) -> (StatusCode, Value) {
    let response = test::call_service(app, request).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}

/// Register an account with `role` and return its bearer token.
pub async fn register(app: &impl TestApp, email: &str, role: &str) -> String {
    let request = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": "Test User",
            "email": email,
            "password": "secret1",
            "role": role,
        }))
        .to_request();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["token"].as_str().expect("token").to_owned()
}

pub fn auth(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

pub async fn create_car(app: &impl TestApp, token: &str, make: &str) -> i64 {
    let request = test::TestRequest::post()
        .uri("/api/cars")
        .insert_header(auth(token))
        .set_json(json!({
            "make": make,
            "model": "Corolla",
            "year": 2020,
            "mileage": 12000,
            "price": 15000,
            "fuelType": "Petrol",
            "transmission": "Manual",
            "bodyType": "Hatchback",
        }))
        .to_request();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::CREATED, "create car failed: {body}");
    body["id"].as_i64().expect("car id")
}

/// Build a multipart request carrying one PNG per entry of `files` under
/// the form field `field`. Each entry is the file content.
pub fn upload_request(uri: &str, token: &str, field: &str, files: &[&str]) -> Request {
    let mut body = Vec::new();
    for (index, bytes) in files.iter().enumerate() {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
                 filename=\"photo-{index}.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    test::TestRequest::post()
        .uri(uri)
        .insert_header(auth(token))
        .insert_header((
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
        .to_request()
}
