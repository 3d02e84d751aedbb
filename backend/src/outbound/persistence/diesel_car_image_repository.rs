//! PostgreSQL-backed `CarImageRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CarImagePersistenceError, CarImageRepository};
use crate::domain::{CarId, CarImage, ImageId, NewCarImage};

use super::error_mapping::{is_foreign_key_violation, map_diesel_error, map_pool_error};
use super::models::{CarImageRow, CarImageUpdate, NewCarImageRow};
use super::pool::DbPool;
use super::schema::car_images;

/// Diesel-backed implementation of the `CarImageRepository` port.
#[derive(Clone)]
pub struct DieselCarImageRepository {
    pool: DbPool,
}

impl DieselCarImageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_image(row: CarImageRow) -> CarImage {
    CarImage {
        id: ImageId::new(row.id),
        car_id: CarId::new(row.car_id),
        url: row.url,
        caption: row.caption,
        is_primary: row.is_primary,
        sort_order: row.sort_order,
        created_at: row.created_at,
    }
}

#[async_trait]
impl CarImageRepository for DieselCarImageRepository {
    async fn list_for_car(&self, car_id: CarId) -> Result<Vec<CarImage>, CarImagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CarImageRow> = car_images::table
            .filter(car_images::car_id.eq(car_id.get()))
            .order((car_images::sort_order.asc(), car_images::id.asc()))
            .select(CarImageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_image).collect())
    }

    async fn find(
        &self,
        car_id: CarId,
        image_id: ImageId,
    ) -> Result<Option<CarImage>, CarImagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CarImageRow> = car_images::table
            .filter(car_images::id.eq(image_id.get()))
            .filter(car_images::car_id.eq(car_id.get()))
            .select(CarImageRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_image))
    }

    async fn insert_many(
        &self,
        images: &[NewCarImage],
    ) -> Result<Vec<CarImage>, CarImagePersistenceError> {
        if images.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NewCarImageRow<'_>> = images
            .iter()
            .map(|image| NewCarImageRow {
                car_id: image.car_id.get(),
                url: &image.url,
                is_primary: image.is_primary,
                sort_order: image.sort_order,
            })
            .collect();

        let inserted: Vec<CarImageRow> = diesel::insert_into(car_images::table)
            .values(&rows)
            .returning(CarImageRow::as_returning())
            .get_results(&mut conn)
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    CarImagePersistenceError::missing_car()
                } else {
                    map_diesel_error(err)
                }
            })?;
        // RETURNING order is unspecified; hand rows back in display order.
        let mut images: Vec<CarImage> = inserted.into_iter().map(row_to_image).collect();
        images.sort_by(CarImage::display_cmp);
        Ok(images)
    }

    async fn update(&self, image: &CarImage) -> Result<CarImage, CarImagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = CarImageUpdate {
            caption: image.caption.as_deref(),
            is_primary: image.is_primary,
            sort_order: image.sort_order,
        };
        let row: CarImageRow = diesel::update(car_images::table.find(image.id.get()))
            .set(&changes)
            .returning(CarImageRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row_to_image(row))
    }

    async fn clear_primary(&self, car_id: CarId) -> Result<(), CarImagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(
            car_images::table
                .filter(car_images::car_id.eq(car_id.get()))
                .filter(car_images::is_primary.eq(true)),
        )
        .set(car_images::is_primary.eq(false))
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(map_diesel_error)
    }

    async fn delete(&self, image_id: ImageId) -> Result<bool, CarImagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(car_images::table.find(image_id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
