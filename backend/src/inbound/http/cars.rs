//! Car listing API handlers.
//!
//! ```text
//! GET    /api/cars
//! GET    /api/cars/search?make=toy&minPrice=1000
//! GET    /api/cars/{id}
//! POST   /api/cars        (owner, admin, sales)
//! PUT    /api/cars/{id}   (owner, admin, sales)
//! DELETE /api/cars/{id}   (owner, admin)
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    ApiResult, Capability, Car, CarDraft, CarId, CarPatch, CarSearch, Error,
};
use crate::inbound::http::auth::Caller;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, lenient_number, non_blank, parse_id};

pub(crate) const CAR_ID: FieldName = FieldName::new("id");

/// Listing fields accepted by `POST /api/cars`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCarRequest {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub mileage: i32,
    pub price: i64,
    pub fuel_type: String,
    pub transmission: String,
    pub body_type: String,
    #[serde(default)]
    pub available: Option<bool>,
}

impl From<CreateCarRequest> for CarDraft {
    fn from(value: CreateCarRequest) -> Self {
        Self {
            make: value.make,
            model: value.model,
            year: value.year,
            mileage: value.mileage,
            price: value.price,
            fuel_type: value.fuel_type,
            transmission: value.transmission,
            body_type: value.body_type,
            available: value.available,
        }
    }
}

/// Partial update accepted by `PUT /api/cars/{id}`.
///
/// `imageUrl` is derived from the primary image and cannot be set here.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCarRequest {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub mileage: Option<i32>,
    pub price: Option<i64>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub body_type: Option<String>,
    pub available: Option<bool>,
}

impl From<UpdateCarRequest> for CarPatch {
    fn from(value: UpdateCarRequest) -> Self {
        Self {
            make: value.make,
            model: value.model,
            year: value.year,
            mileage: value.mileage,
            price: value.price,
            fuel_type: value.fuel_type,
            transmission: value.transmission,
            body_type: value.body_type,
            available: value.available,
        }
    }
}

/// Search filters. Numeric values that do not parse are ignored.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct CarSearchQuery {
    /// Case-insensitive substring of the make.
    pub make: Option<String>,
    pub model: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub body_type: Option<String>,
    /// Exact model year.
    pub year: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<String>,
    /// Inclusive upper price bound.
    pub max_price: Option<String>,
}

impl From<CarSearchQuery> for CarSearch {
    fn from(value: CarSearchQuery) -> Self {
        Self {
            make: non_blank(value.make),
            model: non_blank(value.model),
            fuel_type: non_blank(value.fuel_type),
            transmission: non_blank(value.transmission),
            body_type: non_blank(value.body_type),
            year: lenient_number(value.year.as_deref()),
            min_price: lenient_number(value.min_price.as_deref()),
            max_price: lenient_number(value.max_price.as_deref()),
        }
    }
}

/// Body of simple acknowledgement responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// List every car, oldest listing first.
#[utoipa::path(
    get,
    path = "/api/cars",
    responses(
        (status = 200, description = "Cars", body = [Car]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["cars"],
    operation_id = "listCars",
    security([])
)]
#[get("")]
pub async fn list_cars(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Car>>> {
    Ok(web::Json(state.cars.list().await?))
}

/// Filter cars by make, model, drivetrain, body type, year and price range.
#[utoipa::path(
    get,
    path = "/api/cars/search",
    params(CarSearchQuery),
    responses(
        (status = 200, description = "Matching cars", body = [Car]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["cars"],
    operation_id = "searchCars",
    security([])
)]
#[get("/search")]
pub async fn search_cars(
    state: web::Data<HttpState>,
    query: web::Query<CarSearchQuery>,
) -> ApiResult<web::Json<Vec<Car>>> {
    let filters = CarSearch::from(query.into_inner());
    Ok(web::Json(state.cars.search(filters).await?))
}

/// Fetch one car.
#[utoipa::path(
    get,
    path = "/api/cars/{id}",
    params(("id" = i32, Path, description = "Car id")),
    responses(
        (status = 200, description = "Car", body = Car),
        (status = 400, description = "Invalid id", body = Error),
        (status = 404, description = "Car not found", body = Error)
    ),
    tags = ["cars"],
    operation_id = "getCar",
    security([])
)]
#[get("/{id}")]
pub async fn get_car(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Car>> {
    let id: CarId = parse_id(&path, CAR_ID)?;
    Ok(web::Json(state.cars.get(id).await?))
}

/// Create a listing.
#[utoipa::path(
    post,
    path = "/api/cars",
    request_body = CreateCarRequest,
    responses(
        (status = 201, description = "Car created", body = Car),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["cars"],
    operation_id = "createCar"
)]
#[post("")]
pub async fn create_car(
    caller: Caller,
    state: web::Data<HttpState>,
    payload: web::Json<CreateCarRequest>,
) -> ApiResult<HttpResponse> {
    caller.require(Capability::ManageListings)?;
    let car = state.cars.create(payload.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(car))
}

/// Apply a partial update to a listing.
#[utoipa::path(
    put,
    path = "/api/cars/{id}",
    params(("id" = i32, Path, description = "Car id")),
    request_body = UpdateCarRequest,
    responses(
        (status = 200, description = "Updated car", body = Car),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Car not found", body = Error)
    ),
    tags = ["cars"],
    operation_id = "updateCar"
)]
#[put("/{id}")]
pub async fn update_car(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateCarRequest>,
) -> ApiResult<web::Json<Car>> {
    caller.require(Capability::ManageListings)?;
    let id: CarId = parse_id(&path, CAR_ID)?;
    let car = state.cars.update(id, payload.into_inner().into()).await?;
    Ok(web::Json(car))
}

/// Delete a listing together with its images and favourites.
#[utoipa::path(
    delete,
    path = "/api/cars/{id}",
    params(("id" = i32, Path, description = "Car id")),
    responses(
        (status = 200, description = "Car deleted", body = MessageResponse),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Car not found", body = Error)
    ),
    tags = ["cars"],
    operation_id = "deleteCar"
)]
#[delete("/{id}")]
pub async fn delete_car(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    caller.require(Capability::RemoveListings)?;
    let id: CarId = parse_id(&path, CAR_ID)?;
    state.cars.delete(id).await?;
    Ok(web::Json(MessageResponse::new("Car deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, UserId};
    use crate::inbound::http::test_utils::{TestPorts, bearer, sample_car};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use mockall::predicate::eq;
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
        App::new().app_data(web::Data::new(ports.into_state())).service(
            web::scope("/api/cars")
                .service(list_cars)
                .service(search_cars)
                .service(create_car)
                .service(get_car)
                .service(update_car)
                .service(delete_car),
        )
    }

    async fn call(ports: TestPorts, request: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(test_app(ports)).await;
        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = test::read_body(response).await;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("json body")
        };
        (status, value)
    }

    fn create_body() -> Value {
        json!({
            "make": "Toyota",
            "model": "Corolla",
            "year": 2020,
            "mileage": 42000,
            "price": 15500,
            "fuelType": "Petrol",
            "transmission": "Manual",
            "bodyType": "Hatchback"
        })
    }

    #[actix_web::test]
    async fn list_is_public_and_camel_cased() {
        let mut ports = TestPorts::default();
        ports
            .cars
            .expect_list()
            .returning(|| Ok(vec![sample_car(1), sample_car(2)]));

        let (status, body) = call(ports, test::TestRequest::get().uri("/api/cars")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], 1);
        assert_eq!(body[1]["fuelType"], "Petrol");
        assert!(body[0].get("imageUrl").is_some());
    }

    #[actix_web::test]
    async fn search_parses_filters_leniently() {
        let mut ports = TestPorts::default();
        ports
            .cars
            .expect_search()
            .with(eq(CarSearch {
                make: Some("toy".to_owned()),
                min_price: Some(1000),
                ..CarSearch::default()
            }))
            .returning(|_| Ok(vec![sample_car(3)]));

        let (status, body) = call(
            ports,
            test::TestRequest::get()
                .uri("/api/cars/search?make=toy&minPrice=1000&maxPrice=lots&year=&model="),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().expect("array").len(), 1);
    }

    #[rstest]
    #[case("/api/cars/abc")]
    #[case("/api/cars/0")]
    #[actix_web::test]
    async fn malformed_ids_are_bad_requests(#[case] uri: &str) {
        let (status, body) = call(TestPorts::default(), test::TestRequest::get().uri(uri)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["code"], "invalid_id");
    }

    #[actix_web::test]
    async fn missing_cars_are_not_found() {
        let mut ports = TestPorts::default();
        ports
            .cars
            .expect_get()
            .with(eq(CarId::new(9)))
            .returning(|_| Err(Error::not_found("Car not found")));

        let (status, body) = call(ports, test::TestRequest::get().uri("/api/cars/9")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Car not found");
    }

    #[actix_web::test]
    async fn create_requires_a_token() {
        let (status, _) = call(
            TestPorts::default(),
            test::TestRequest::post().uri("/api/cars").set_json(create_body()),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn viewers_cannot_create() {
        let mut ports = TestPorts::default();
        ports.authenticate_as(UserId::new(4), Role::Viewer);

        let (status, body) = call(
            ports,
            test::TestRequest::post()
                .uri("/api/cars")
                .insert_header(bearer())
                .set_json(create_body()),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "forbidden");
    }

    #[actix_web::test]
    async fn sales_can_create() {
        let mut ports = TestPorts::default();
        ports.authenticate_as(UserId::new(2), Role::Sales);
        ports
            .cars
            .expect_create()
            .withf(|draft| draft.make == "Toyota" && draft.available.is_none())
            .times(1)
            .returning(|_| Ok(sample_car(5)));

        let (status, body) = call(
            ports,
            test::TestRequest::post()
                .uri("/api/cars")
                .insert_header(bearer())
                .set_json(create_body()),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 5);
    }

    #[actix_web::test]
    async fn update_passes_only_supplied_fields() {
        let mut ports = TestPorts::default();
        ports.authenticate_as(UserId::new(2), Role::Admin);
        ports
            .cars
            .expect_update()
            .withf(|id, patch| {
                *id == CarId::new(5)
                    && patch.price == Some(14_000)
                    && patch.make.is_none()
                    && patch.available == Some(false)
            })
            .returning(|_, _| Ok(sample_car(5)));

        let (status, _) = call(
            ports,
            test::TestRequest::put()
                .uri("/api/cars/5")
                .insert_header(bearer())
                .set_json(json!({"price": 14000, "available": false})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
    }

    #[rstest]
    #[case(Role::Sales, StatusCode::FORBIDDEN)]
    #[case(Role::Owner, StatusCode::OK)]
    #[actix_web::test]
    async fn delete_needs_remove_capability(#[case] role: Role, #[case] expected: StatusCode) {
        let mut ports = TestPorts::default();
        ports.authenticate_as(UserId::new(2), role);
        ports.cars.expect_delete().returning(|_| Ok(()));

        let (status, _) = call(
            ports,
            test::TestRequest::delete()
                .uri("/api/cars/5")
                .insert_header(bearer()),
        )
        .await;

        assert_eq!(status, expected);
    }
}
