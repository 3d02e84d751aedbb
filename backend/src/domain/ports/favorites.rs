//! Driving port for a user's favourites list.

use async_trait::async_trait;

use crate::domain::{CarId, Error, FavoriteWithCar, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Favorites: Send + Sync {
    /// Bookmark a car. Adding an existing pair succeeds without a duplicate.
    async fn add(&self, user_id: UserId, car_id: CarId) -> Result<(), Error>;

    async fn list(&self, user_id: UserId) -> Result<Vec<FavoriteWithCar>, Error>;

    async fn remove(&self, user_id: UserId, car_id: CarId) -> Result<(), Error>;
}
