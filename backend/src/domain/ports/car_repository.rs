//! Port abstraction for car listing persistence.

use async_trait::async_trait;

use crate::domain::{Car, CarDeletionReport, CarId, CarSearch, Error, NewCar};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by car repository adapters.
    pub enum CarPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "car repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "car repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarRepository: Send + Sync {
    /// Every listing, ascending id.
    async fn list_all(&self) -> Result<Vec<Car>, CarPersistenceError>;

    /// Listings matching all supplied filters, ascending id.
    async fn search(&self, filters: &CarSearch) -> Result<Vec<Car>, CarPersistenceError>;

    async fn find_by_id(&self, id: CarId) -> Result<Option<Car>, CarPersistenceError>;

    async fn insert(&self, car: &NewCar) -> Result<Car, CarPersistenceError>;

    /// Overwrite the editable columns of an existing listing. The legacy
    /// image field is only written by [`CarRepository::set_image_url`].
    ///
    /// Returns `None` when the row no longer exists.
    async fn update(&self, car: &Car) -> Result<Option<Car>, CarPersistenceError>;

    /// Write the legacy single-image field.
    async fn set_image_url(
        &self,
        id: CarId,
        image_url: Option<String>,
    ) -> Result<(), CarPersistenceError>;

    /// Remove the car's images, the favourites pointing at it and then the
    /// car itself, atomically.
    ///
    /// Returns `None` when the car does not exist. Stored image files are
    /// not touched; the report lists their urls for the caller to clean up.
    async fn delete_cascade(
        &self,
        id: CarId,
    ) -> Result<Option<CarDeletionReport>, CarPersistenceError>;
}

impl From<CarPersistenceError> for Error {
    fn from(err: CarPersistenceError) -> Self {
        match err {
            CarPersistenceError::Connection { message } | CarPersistenceError::Query { message } => {
                Error::internal(message)
            }
        }
    }
}
