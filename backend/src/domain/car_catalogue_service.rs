//! Listing reads and writes.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use crate::domain::ports::{CarCatalogue, CarRepository, ImageStore};
use crate::domain::{Car, CarDraft, CarId, CarPatch, CarSearch, Error, current_year};

/// Car catalogue service implementing the [`CarCatalogue`] driving port.
#[derive(Clone)]
pub struct CarCatalogueService<C, S> {
    cars: Arc<C>,
    store: Arc<S>,
}

impl<C, S> CarCatalogueService<C, S> {
    /// Create a new service over the given adapters.
    pub fn new(cars: Arc<C>, store: Arc<S>) -> Self {
        Self { cars, store }
    }
}

fn car_not_found() -> Error {
    Error::not_found("Car not found")
}

#[async_trait]
impl<C, S> CarCatalogue for CarCatalogueService<C, S>
where
    C: CarRepository,
    S: ImageStore,
{
    async fn list(&self) -> Result<Vec<Car>, Error> {
        Ok(self.cars.list_all().await?)
    }

    async fn search(&self, filters: CarSearch) -> Result<Vec<Car>, Error> {
        Ok(self.cars.search(&filters).await?)
    }

    async fn get(&self, id: CarId) -> Result<Car, Error> {
        self.cars.find_by_id(id).await?.ok_or_else(car_not_found)
    }

    async fn create(&self, draft: CarDraft) -> Result<Car, Error> {
        let new_car = draft.validate(current_year())?;
        let car = self.cars.insert(&new_car).await?;
        info!(car_id = %car.id, "car created");
        Ok(car)
    }

    async fn update(&self, id: CarId, patch: CarPatch) -> Result<Car, Error> {
        let patch = patch.validate(current_year())?;
        let mut car = self.get(id).await?;
        patch.apply(&mut car, Utc::now());
        self.cars.update(&car).await?.ok_or_else(car_not_found)
    }

    async fn delete(&self, id: CarId) -> Result<(), Error> {
        let report = self.cars.delete_cascade(id).await?.ok_or_else(car_not_found)?;
        for url in &report.image_urls {
            if let Err(err) = self.store.remove(url).await {
                warn!(car_id = %id, url = %url, error = %err, "failed to remove stored image file");
            }
        }
        info!(
            car_id = %id,
            images_removed = report.image_urls.len(),
            favorites_removed = report.favorites_removed,
            "car deleted"
        );
        Ok(())
    }
}
