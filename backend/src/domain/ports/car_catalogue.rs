//! Driving port for listing reads and writes.

use async_trait::async_trait;

use crate::domain::{Car, CarDraft, CarId, CarPatch, CarSearch, Error};

/// Use-cases over car listings consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarCatalogue: Send + Sync {
    async fn list(&self) -> Result<Vec<Car>, Error>;

    async fn search(&self, filters: CarSearch) -> Result<Vec<Car>, Error>;

    /// # Errors
    ///
    /// `not_found` when the car does not exist.
    async fn get(&self, id: CarId) -> Result<Car, Error>;

    async fn create(&self, draft: CarDraft) -> Result<Car, Error>;

    /// Merge `patch` into the listing.
    async fn update(&self, id: CarId, patch: CarPatch) -> Result<Car, Error>;

    /// Delete the listing with its images and favourites.
    async fn delete(&self, id: CarId) -> Result<(), Error>;
}
