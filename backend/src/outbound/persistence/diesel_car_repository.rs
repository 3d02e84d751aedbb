//! PostgreSQL-backed `CarRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;

use crate::domain::ports::{CarPersistenceError, CarRepository};
use crate::domain::{Car, CarDeletionReport, CarId, CarSearch, NewCar};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CarRow, CarUpdate, NewCarRow};
use super::pool::DbPool;
use super::row_count;
use super::schema::{car_images, cars, favorites};

/// Diesel-backed implementation of the `CarRepository` port.
#[derive(Clone)]
pub struct DieselCarRepository {
    pool: DbPool,
}

impl DieselCarRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn row_to_car(row: CarRow) -> Car {
    Car {
        id: CarId::new(row.id),
        make: row.make,
        model: row.model,
        year: row.year,
        mileage: row.mileage,
        price: row.price,
        fuel_type: row.fuel_type,
        transmission: row.transmission,
        body_type: row.body_type,
        image_url: row.image_url,
        available: row.available,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// `ILIKE` pattern matching `value` anywhere, with wildcards in the input
/// taken literally.
fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl CarRepository for DieselCarRepository {
    async fn list_all(&self) -> Result<Vec<Car>, CarPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CarRow> = cars::table
            .order(cars::id.asc())
            .select(CarRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_car).collect())
    }

    async fn search(&self, filters: &CarSearch) -> Result<Vec<Car>, CarPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = cars::table.select(CarRow::as_select()).into_boxed();
        if let Some(make) = &filters.make {
            query = query.filter(cars::make.ilike(contains_pattern(make)));
        }
        if let Some(model) = &filters.model {
            query = query.filter(cars::model.ilike(contains_pattern(model)));
        }
        if let Some(fuel_type) = &filters.fuel_type {
            query = query.filter(cars::fuel_type.ilike(contains_pattern(fuel_type)));
        }
        if let Some(transmission) = &filters.transmission {
            query = query.filter(cars::transmission.ilike(contains_pattern(transmission)));
        }
        if let Some(body_type) = &filters.body_type {
            query = query.filter(cars::body_type.ilike(contains_pattern(body_type)));
        }
        if let Some(year) = filters.year {
            query = query.filter(cars::year.eq(year));
        }
        if let Some(min_price) = filters.min_price {
            query = query.filter(cars::price.ge(min_price));
        }
        if let Some(max_price) = filters.max_price {
            query = query.filter(cars::price.le(max_price));
        }

        let rows: Vec<CarRow> = query
            .order(cars::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_car).collect())
    }

    async fn find_by_id(&self, id: CarId) -> Result<Option<Car>, CarPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CarRow> = cars::table
            .find(id.get())
            .select(CarRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_car))
    }

    async fn insert(&self, car: &NewCar) -> Result<Car, CarPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewCarRow {
            make: &car.make,
            model: &car.model,
            year: car.year,
            mileage: car.mileage,
            price: car.price,
            fuel_type: &car.fuel_type,
            transmission: &car.transmission,
            body_type: &car.body_type,
            available: car.available,
        };
        let inserted: CarRow = diesel::insert_into(cars::table)
            .values(&row)
            .returning(CarRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row_to_car(inserted))
    }

    async fn update(&self, car: &Car) -> Result<Option<Car>, CarPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = CarUpdate {
            make: &car.make,
            model: &car.model,
            year: car.year,
            mileage: car.mileage,
            price: car.price,
            fuel_type: &car.fuel_type,
            transmission: &car.transmission,
            body_type: &car.body_type,
            available: car.available,
            updated_at: car.updated_at,
        };
        let updated: Option<CarRow> = diesel::update(cars::table.find(car.id.get()))
            .set(&changes)
            .returning(CarRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(updated.map(row_to_car))
    }

    async fn set_image_url(
        &self,
        id: CarId,
        image_url: Option<String>,
    ) -> Result<(), CarPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(cars::table.find(id.get()))
            .set((
                cars::image_url.eq(image_url),
                cars::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete_cascade(
        &self,
        id: CarId,
    ) -> Result<Option<CarDeletionReport>, CarPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let car_id = id.get();

        conn.transaction(|conn| {
            async move {
                let image_urls: Vec<String> = car_images::table
                    .filter(car_images::car_id.eq(car_id))
                    .order((car_images::sort_order.asc(), car_images::id.asc()))
                    .select(car_images::url)
                    .load(conn)
                    .await?;
                let favorites_removed =
                    diesel::delete(favorites::table.filter(favorites::car_id.eq(car_id)))
                        .execute(conn)
                        .await?;
                diesel::delete(car_images::table.filter(car_images::car_id.eq(car_id)))
                    .execute(conn)
                    .await?;
                let deleted = diesel::delete(cars::table.find(car_id))
                    .execute(conn)
                    .await?;

                if deleted == 0 {
                    return Ok(None);
                }
                Ok(Some(CarDeletionReport {
                    image_urls,
                    favorites_removed: row_count(favorites_removed),
                }))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
