//! Administration API handlers, restricted to owners and admins.

use actix_web::{delete, get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ApiResult, Capability, Car, CarId, Error, Role, User, UserId};
use crate::inbound::http::auth::Caller;
use crate::inbound::http::cars::{CAR_ID, MessageResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

const USER_ID: FieldName = FieldName::new("id");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ChangeRoleRequest {
    /// One of `owner`, `admin`, `sales`, `viewer`.
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserEnvelope {
    pub message: String,
    pub user: User,
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "All users", body = [User]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListUsers"
)]
#[get("/users")]
pub async fn list_users(
    caller: Caller,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<User>>> {
    caller.require(Capability::Administer)?;
    Ok(web::Json(state.admin.list_users().await?))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/role",
    params(("id" = i32, Path, description = "User id")),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "User role updated", body = UserEnvelope),
        (status = 400, description = "Invalid id or role", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminChangeRole"
)]
#[put("/users/{id}/role")]
pub async fn change_role(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ChangeRoleRequest>,
) -> ApiResult<web::Json<UserEnvelope>> {
    caller.require(Capability::Administer)?;
    let id: UserId = parse_id(&path, USER_ID)?;
    let role: Role = payload.role.trim().parse()?;
    let user = state.admin.change_role(id, role).await?;
    Ok(web::Json(UserEnvelope {
        message: "User role updated".to_owned(),
        user,
    }))
}

/// Delete a user with their messages and favourites.
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminDeleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    caller.require(Capability::Administer)?;
    let id: UserId = parse_id(&path, USER_ID)?;
    state.admin.delete_user(id).await?;
    Ok(web::Json(MessageResponse::new("User deleted")))
}

#[utoipa::path(
    get,
    path = "/api/admin/cars",
    responses(
        (status = 200, description = "All cars", body = [Car]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListCars"
)]
#[get("/cars")]
pub async fn list_cars(
    caller: Caller,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<Car>>> {
    caller.require(Capability::Administer)?;
    Ok(web::Json(state.cars.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/cars/{id}",
    params(("id" = i32, Path, description = "Car id")),
    responses(
        (status = 200, description = "Car", body = Car),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Car not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminGetCar"
)]
#[get("/cars/{id}")]
pub async fn get_car(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Car>> {
    caller.require(Capability::Administer)?;
    let id: CarId = parse_id(&path, CAR_ID)?;
    Ok(web::Json(state.cars.get(id).await?))
}
