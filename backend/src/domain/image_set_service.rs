//! Image set management for car listings.
//!
//! Every car with images has exactly one primary image, and the car's
//! legacy `image_url` column carries that image's url. Each mutation that
//! can move the primary designation rewrites the legacy column.
//!
//! The primary swap is a sequence of single-row statements (clear every
//! primary, set the target, write the legacy url) with no surrounding
//! transaction. Two concurrent swaps on one car can interleave so that the
//! legacy url names an image that is no longer primary.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::ports::{CarImageRepository, CarImages, CarRepository, ImageStore};
use crate::domain::{
    Car, CarId, CarImage, Error, ImageId, ImagePatch, ImageUpload, MAX_BATCH_IMAGES, NewCarImage,
    ValidatedUpload, next_sort_order, promotion_candidate, validate_uploads,
};

/// Image set service implementing the [`CarImages`] driving port.
#[derive(Clone)]
pub struct ImageSetService<C, I, S> {
    cars: Arc<C>,
    images: Arc<I>,
    store: Arc<S>,
}

impl<C, I, S> ImageSetService<C, I, S> {
    /// Create a new service over the given adapters.
    pub fn new(cars: Arc<C>, images: Arc<I>, store: Arc<S>) -> Self {
        Self {
            cars,
            images,
            store,
        }
    }
}

impl<C, I, S> ImageSetService<C, I, S>
where
    C: CarRepository,
    I: CarImageRepository,
    S: ImageStore,
{
    async fn require_car(&self, car_id: CarId) -> Result<Car, Error> {
        self.cars
            .find_by_id(car_id)
            .await?
            .ok_or_else(|| Error::not_found("Car not found"))
    }

    async fn require_image(&self, car_id: CarId, image_id: ImageId) -> Result<CarImage, Error> {
        self.images
            .find(car_id, image_id)
            .await?
            .ok_or_else(|| Error::not_found("Image not found"))
    }

    /// Write every upload to the store. On failure the files already written
    /// are removed before the error is returned.
    async fn store_all(&self, uploads: &[ValidatedUpload]) -> Result<Vec<String>, Error> {
        let mut urls = Vec::with_capacity(uploads.len());
        for upload in uploads {
            match self.store.store(upload).await {
                Ok(url) => urls.push(url),
                Err(err) => {
                    self.discard_files(&urls).await;
                    return Err(err.into());
                }
            }
        }
        Ok(urls)
    }

    /// Best-effort file removal; failures are logged and swallowed.
    async fn discard_files(&self, urls: &[String]) {
        for url in urls {
            if let Err(err) = self.store.remove(url).await {
                warn!(url = %url, error = %err, "failed to remove stored image file");
            }
        }
    }

    /// Insert records for already-stored files, cleaning the files up if the
    /// insert fails.
    async fn insert_records(
        &self,
        records: Vec<NewCarImage>,
    ) -> Result<Vec<CarImage>, Error> {
        match self.images.insert_many(&records).await {
            Ok(inserted) => Ok(inserted),
            Err(err) => {
                let urls: Vec<String> = records.into_iter().map(|record| record.url).collect();
                self.discard_files(&urls).await;
                Err(err.into())
            }
        }
    }

    async fn sync_legacy_url(&self, car_id: CarId, url: Option<String>) -> Result<(), Error> {
        self.cars.set_image_url(car_id, url).await?;
        Ok(())
    }

    /// Clear every primary of the car, flag `image`, then rewrite the
    /// legacy url.
    async fn make_primary(&self, mut image: CarImage) -> Result<CarImage, Error> {
        self.images.clear_primary(image.car_id).await?;
        image.is_primary = true;
        let saved = self.images.update(&image).await?;
        self.sync_legacy_url(saved.car_id, Some(saved.url.clone())).await?;
        Ok(saved)
    }

    async fn promote_successor(&self, car_id: CarId) -> Result<(), Error> {
        let remaining = self.images.list_for_car(car_id).await?;
        match promotion_candidate(&remaining).cloned() {
            Some(mut next) => {
                next.is_primary = true;
                let promoted = self.images.update(&next).await?;
                info!(car_id = %car_id, image_id = %promoted.id, "promoted image to primary");
                self.sync_legacy_url(car_id, Some(promoted.url)).await
            }
            None => self.sync_legacy_url(car_id, None).await,
        }
    }
}

/// Captions are stored trimmed; a blank caption removes it.
fn clean_caption(caption: &str) -> Option<String> {
    let trimmed = caption.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[async_trait]
impl<C, I, S> CarImages for ImageSetService<C, I, S>
where
    C: CarRepository,
    I: CarImageRepository,
    S: ImageStore,
{
    async fn list(&self, car_id: CarId) -> Result<Vec<CarImage>, Error> {
        let mut images = self.images.list_for_car(car_id).await?;
        images.sort_by(CarImage::display_cmp);
        Ok(images)
    }

    async fn add(&self, car_id: CarId, uploads: Vec<ImageUpload>) -> Result<Vec<CarImage>, Error> {
        self.require_car(car_id).await?;
        let validated = validate_uploads(uploads, MAX_BATCH_IMAGES)?;
        let existing = self.images.list_for_car(car_id).await?;
        let needs_primary = !existing.iter().any(|image| image.is_primary);
        let first_order = next_sort_order(&existing);

        let urls = self.store_all(&validated).await?;
        let records = urls
            .into_iter()
            .zip(first_order..)
            .enumerate()
            .map(|(index, (url, sort_order))| NewCarImage {
                car_id,
                url,
                sort_order,
                is_primary: needs_primary && index == 0,
            })
            .collect();
        let inserted = self.insert_records(records).await?;

        if needs_primary {
            let primary_url = inserted
                .iter()
                .find(|image| image.is_primary)
                .map(|image| image.url.clone());
            self.sync_legacy_url(car_id, primary_url).await?;
        }
        info!(car_id = %car_id, count = inserted.len(), "images added");
        Ok(inserted)
    }

    async fn replace_primary(&self, car_id: CarId, upload: ImageUpload) -> Result<CarImage, Error> {
        self.require_car(car_id).await?;
        let validated = validate_uploads(vec![upload], 1)?;
        let existing = self.images.list_for_car(car_id).await?;
        let sort_order = next_sort_order(&existing);

        let urls = self.store_all(&validated).await?;
        let records = urls
            .into_iter()
            .map(|url| NewCarImage {
                car_id,
                url,
                sort_order,
                is_primary: false,
            })
            .collect();
        let appended = self
            .insert_records(records)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::internal("image insert returned no rows"))?;
        let image = self.make_primary(appended).await?;
        info!(car_id = %car_id, image_id = %image.id, "primary image replaced");
        Ok(image)
    }

    async fn update(
        &self,
        car_id: CarId,
        image_id: ImageId,
        patch: ImagePatch,
    ) -> Result<CarImage, Error> {
        self.require_car(car_id).await?;
        let mut image = self.require_image(car_id, image_id).await?;

        if let Some(caption) = patch.caption {
            image.caption = clean_caption(&caption);
        }
        if let Some(sort_order) = patch.sort_order {
            image.sort_order = sort_order;
        }

        match patch.is_primary {
            Some(true) => {
                let saved = self.make_primary(image).await?;
                info!(car_id = %car_id, image_id = %image_id, "primary image changed");
                return Ok(saved);
            }
            Some(false) if image.is_primary => {
                debug!(car_id = %car_id, image_id = %image_id, "ignoring request to unset primary");
            }
            _ => {}
        }

        Ok(self.images.update(&image).await?)
    }

    async fn delete(&self, car_id: CarId, image_id: ImageId) -> Result<(), Error> {
        self.require_car(car_id).await?;
        let image = self.require_image(car_id, image_id).await?;

        if !self.images.delete(image_id).await? {
            return Err(Error::not_found("Image not found"));
        }
        self.discard_files(std::slice::from_ref(&image.url)).await;

        if image.is_primary {
            self.promote_successor(car_id).await?;
        }
        info!(car_id = %car_id, image_id = %image_id, "image deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "image_set_service_tests.rs"]
mod tests;
