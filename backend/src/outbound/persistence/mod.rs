//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module. Connections come from a `bb8` pool through
//! `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use carmarket::outbound::persistence::{DbPool, DieselCarRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/carmarket")).await?;
//! let cars = DieselCarRepository::new(pool);
//! ```

mod diesel_car_image_repository;
mod diesel_car_repository;
mod diesel_favorite_repository;
mod diesel_message_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_car_image_repository::DieselCarImageRepository;
pub use diesel_car_repository::DieselCarRepository;
pub use diesel_favorite_repository::DieselFavoriteRepository;
pub use diesel_message_repository::DieselMessageRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

/// Affected-row count from `execute` as reported in deletion summaries.
fn row_count(count: usize) -> u64 {
    u64::try_from(count).unwrap_or(u64::MAX)
}
