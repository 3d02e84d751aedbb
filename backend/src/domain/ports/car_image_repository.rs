//! Port abstraction for image record persistence.
//!
//! Each call is a single statement. Keeping exactly one primary image per
//! car is the image set service's job, not the adapter's.

use async_trait::async_trait;

use crate::domain::{CarId, CarImage, Error, ImageId, NewCarImage};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by image repository adapters.
    pub enum CarImagePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "image repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "image repository query failed: {message}",
        /// The referenced car does not exist.
        MissingCar => "image references a car that does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarImageRepository: Send + Sync {
    /// Images of `car_id` in display order: `sort_order`, then id.
    async fn list_for_car(&self, car_id: CarId) -> Result<Vec<CarImage>, CarImagePersistenceError>;

    /// Image `image_id`, only if it belongs to `car_id`.
    async fn find(
        &self,
        car_id: CarId,
        image_id: ImageId,
    ) -> Result<Option<CarImage>, CarImagePersistenceError>;

    /// Insert records in order, returning them with assigned ids.
    async fn insert_many(
        &self,
        images: &[NewCarImage],
    ) -> Result<Vec<CarImage>, CarImagePersistenceError>;

    /// Persist caption, sort order and primary flag of an existing image.
    async fn update(&self, image: &CarImage) -> Result<CarImage, CarImagePersistenceError>;

    /// Clear the primary flag on every image of `car_id`.
    async fn clear_primary(&self, car_id: CarId) -> Result<(), CarImagePersistenceError>;

    /// Delete one record. Returns whether a row was removed.
    async fn delete(&self, image_id: ImageId) -> Result<bool, CarImagePersistenceError>;
}

impl From<CarImagePersistenceError> for Error {
    fn from(err: CarImagePersistenceError) -> Self {
        match err {
            CarImagePersistenceError::Connection { message }
            | CarImagePersistenceError::Query { message } => Error::internal(message),
            CarImagePersistenceError::MissingCar => Error::not_found("Car not found"),
        }
    }
}
