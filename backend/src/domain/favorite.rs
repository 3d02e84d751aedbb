//! Cars a user has bookmarked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Car, CarId, UserId};

/// A (user, car) bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: i32,
    pub user_id: UserId,
    pub car_id: CarId,
    pub created_at: DateTime<Utc>,
}

/// Favourite joined with the car it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteWithCar {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub car: Car,
}
