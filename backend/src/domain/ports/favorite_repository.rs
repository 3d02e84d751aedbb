//! Port abstraction for favourites persistence.

use async_trait::async_trait;

use crate::domain::{CarId, Error, Favorite, FavoriteWithCar, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by favourites adapters.
    pub enum FavoritePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "favorite repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "favorite repository query failed: {message}",
        /// The referenced car does not exist.
        MissingCar => "favorite references a car that does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Record the pair, returning the existing row if it is already present.
    ///
    /// Fails with `MissingCar` when the car is gone by the time of the write.
    async fn add(&self, user_id: UserId, car_id: CarId) -> Result<Favorite, FavoritePersistenceError>;

    /// The user's favourites with their cars, most recent first.
    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<FavoriteWithCar>, FavoritePersistenceError>;

    /// Remove the pair. Returns whether a row was removed.
    async fn remove(&self, user_id: UserId, car_id: CarId) -> Result<bool, FavoritePersistenceError>;
}

impl From<FavoritePersistenceError> for Error {
    fn from(err: FavoritePersistenceError) -> Self {
        match err {
            FavoritePersistenceError::Connection { message }
            | FavoritePersistenceError::Query { message } => Error::internal(message),
            FavoritePersistenceError::MissingCar => Error::not_found("Car not found"),
        }
    }
}
