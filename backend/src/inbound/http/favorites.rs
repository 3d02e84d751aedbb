//! Favourites API handlers. Every route acts on the caller's own list.

use actix_web::{HttpResponse, delete, get, post, web};

use crate::domain::{ApiResult, Capability, CarId, Error, FavoriteWithCar};
use crate::inbound::http::auth::Caller;
use crate::inbound::http::cars::MessageResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

const CAR_ID: FieldName = FieldName::new("carId");

/// Mark a car as a favourite. Repeating the call is harmless.
#[utoipa::path(
    post,
    path = "/api/favorites/{carId}",
    params(("carId" = i32, Path, description = "Car id")),
    responses(
        (status = 201, description = "Added to favorites", body = MessageResponse),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Car not found", body = Error)
    ),
    tags = ["favorites"],
    operation_id = "addFavorite"
)]
#[post("/{carId}")]
pub async fn add_favorite(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    caller.require(Capability::Participate)?;
    let car_id: CarId = parse_id(&path, CAR_ID)?;
    state.favorites.add(caller.id(), car_id).await?;
    Ok(HttpResponse::Created().json(MessageResponse::new("Added to favorites")))
}

/// The caller's favourites, most recent first.
#[utoipa::path(
    get,
    path = "/api/favorites",
    responses(
        (status = 200, description = "Favourites with their cars", body = [FavoriteWithCar]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["favorites"],
    operation_id = "listFavorites"
)]
#[get("")]
pub async fn list_favorites(
    caller: Caller,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<FavoriteWithCar>>> {
    caller.require(Capability::Participate)?;
    Ok(web::Json(state.favorites.list(caller.id()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/favorites/{carId}",
    params(("carId" = i32, Path, description = "Car id")),
    responses(
        (status = 200, description = "Removed from favorites", body = MessageResponse),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found in favorites", body = Error)
    ),
    tags = ["favorites"],
    operation_id = "removeFavorite"
)]
#[delete("/{carId}")]
pub async fn remove_favorite(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    caller.require(Capability::Participate)?;
    let car_id: CarId = parse_id(&path, CAR_ID)?;
    state.favorites.remove(caller.id(), car_id).await?;
    Ok(web::Json(MessageResponse::new("Removed from favorites")))
}
