//! Driving port for the image set of a car.
//!
//! Implementations keep these rules for every car with at least one image:
//! exactly one image is primary and the car's legacy `image_url` equals the
//! primary's url. A car without images has no legacy url.

use async_trait::async_trait;

use crate::domain::{CarId, CarImage, Error, ImageId, ImagePatch, ImageUpload};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarImages: Send + Sync {
    /// Images in display order.
    async fn list(&self, car_id: CarId) -> Result<Vec<CarImage>, Error>;

    /// Append a batch of 1..=10 files after the current highest sort order.
    ///
    /// When the car has no primary, the first new image becomes primary.
    async fn add(&self, car_id: CarId, uploads: Vec<ImageUpload>) -> Result<Vec<CarImage>, Error>;

    /// Append one file and make it the primary image.
    async fn replace_primary(&self, car_id: CarId, upload: ImageUpload) -> Result<CarImage, Error>;

    /// Change caption, sort order or primary designation.
    ///
    /// Clearing the primary flag of the current primary is ignored.
    async fn update(
        &self,
        car_id: CarId,
        image_id: ImageId,
        patch: ImagePatch,
    ) -> Result<CarImage, Error>;

    /// Remove an image, promoting a successor if it was primary.
    async fn delete(&self, car_id: CarId, image_id: ImageId) -> Result<(), Error>;
}
