//! PostgreSQL-backed `FavoriteRepository` implementation using Diesel ORM.
//!
//! The `(user_id, car_id)` unique index makes `add` idempotent: a repeated
//! insert is skipped and the existing row returned.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{FavoritePersistenceError, FavoriteRepository};
use crate::domain::{CarId, Favorite, FavoriteWithCar, UserId};

use super::diesel_car_repository::row_to_car;
use super::error_mapping::{is_foreign_key_violation, map_diesel_error, map_pool_error};
use super::models::{CarRow, FavoriteRow, NewFavoriteRow};
use super::pool::DbPool;
use super::schema::{cars, favorites};

/// Diesel-backed implementation of the `FavoriteRepository` port.
#[derive(Clone)]
pub struct DieselFavoriteRepository {
    pool: DbPool,
}

impl DieselFavoriteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_favorite(row: FavoriteRow) -> Favorite {
    Favorite {
        id: row.id,
        user_id: UserId::new(row.user_id),
        car_id: CarId::new(row.car_id),
        created_at: row.created_at,
    }
}

#[async_trait]
impl FavoriteRepository for DieselFavoriteRepository {
    async fn add(&self, user_id: UserId, car_id: CarId) -> Result<Favorite, FavoritePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewFavoriteRow {
            user_id: user_id.get(),
            car_id: car_id.get(),
        };
        diesel::insert_into(favorites::table)
            .values(&row)
            .on_conflict((favorites::user_id, favorites::car_id))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    FavoritePersistenceError::missing_car()
                } else {
                    map_diesel_error(err)
                }
            })?;

        let stored: FavoriteRow = favorites::table
            .filter(favorites::user_id.eq(row.user_id))
            .filter(favorites::car_id.eq(row.car_id))
            .select(FavoriteRow::as_select())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row_to_favorite(stored))
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<FavoriteWithCar>, FavoritePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(FavoriteRow, CarRow)> = favorites::table
            .inner_join(cars::table)
            .filter(favorites::user_id.eq(user_id.get()))
            .order((favorites::created_at.desc(), favorites::id.desc()))
            .select((FavoriteRow::as_select(), CarRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|(favorite, car)| FavoriteWithCar {
                id: favorite.id,
                created_at: favorite.created_at,
                car: row_to_car(car),
            })
            .collect())
    }

    async fn remove(&self, user_id: UserId, car_id: CarId) -> Result<bool, FavoritePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            favorites::table
                .filter(favorites::user_id.eq(user_id.get()))
                .filter(favorites::car_id.eq(car_id.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
