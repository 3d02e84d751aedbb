//! Favourites list of each user.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{CarRepository, FavoriteRepository, Favorites};
use crate::domain::{CarId, Error, FavoriteWithCar, UserId};

/// Service implementing the [`Favorites`] driving port.
#[derive(Clone)]
pub struct FavoritesService<F, C> {
    favorites: Arc<F>,
    cars: Arc<C>,
}

impl<F, C> FavoritesService<F, C> {
    pub fn new(favorites: Arc<F>, cars: Arc<C>) -> Self {
        Self { favorites, cars }
    }
}

#[async_trait]
impl<F, C> Favorites for FavoritesService<F, C>
where
    F: FavoriteRepository,
    C: CarRepository,
{
    async fn add(&self, user_id: UserId, car_id: CarId) -> Result<(), Error> {
        if self.cars.find_by_id(car_id).await?.is_none() {
            return Err(Error::not_found("Car not found"));
        }
        let favorite = self.favorites.add(user_id, car_id).await?;
        debug!(user_id = %user_id, car_id = %car_id, favorite_id = favorite.id, "favorite recorded");
        Ok(())
    }

    async fn list(&self, user_id: UserId) -> Result<Vec<FavoriteWithCar>, Error> {
        Ok(self.favorites.list_for_user(user_id).await?)
    }

    async fn remove(&self, user_id: UserId, car_id: CarId) -> Result<(), Error> {
        if self.favorites.remove(user_id, car_id).await? {
            Ok(())
        } else {
            Err(Error::not_found("Not found in favorites"))
        }
    }
}
