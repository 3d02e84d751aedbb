//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{car_images, cars, favorites, messages, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

// ---------------------------------------------------------------------------
// Cars
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cars)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CarRow {
    pub id: i32,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub mileage: i32,
    pub price: i64,
    pub fuel_type: String,
    pub transmission: String,
    pub body_type: String,
    pub image_url: Option<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cars)]
pub(crate) struct NewCarRow<'a> {
    pub make: &'a str,
    pub model: &'a str,
    pub year: i32,
    pub mileage: i32,
    pub price: i64,
    pub fuel_type: &'a str,
    pub transmission: &'a str,
    pub body_type: &'a str,
    pub available: bool,
}

/// Overwrite of a listing's editable columns. `image_url` is left to
/// `set_image_url`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = cars)]
pub(crate) struct CarUpdate<'a> {
    pub make: &'a str,
    pub model: &'a str,
    pub year: i32,
    pub mileage: i32,
    pub price: i64,
    pub fuel_type: &'a str,
    pub transmission: &'a str,
    pub body_type: &'a str,
    pub available: bool,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Car images
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = car_images)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CarImageRow {
    pub id: i32,
    pub car_id: i32,
    pub url: String,
    pub caption: Option<String>,
    pub is_primary: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = car_images)]
pub(crate) struct NewCarImageRow<'a> {
    pub car_id: i32,
    pub url: &'a str,
    pub is_primary: bool,
    pub sort_order: i32,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = car_images)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CarImageUpdate<'a> {
    pub caption: Option<&'a str>,
    pub is_primary: bool,
    pub sort_order: i32,
}

// ---------------------------------------------------------------------------
// Favourites
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = favorites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FavoriteRow {
    pub id: i32,
    pub user_id: i32,
    pub car_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = favorites)]
pub(crate) struct NewFavoriteRow {
    pub user_id: i32,
    pub car_id: i32,
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MessageRow {
    pub id: i32,
    pub content: String,
    pub sender_id: i32,
    pub receiver_id: i32,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub(crate) struct NewMessageRow<'a> {
    pub content: &'a str,
    pub sender_id: i32,
    pub receiver_id: i32,
}
