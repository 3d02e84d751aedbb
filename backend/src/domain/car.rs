//! Car listings, their validated drafts and patches, and search filters.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{field_error, non_empty};
use super::{CarId, Error};

/// First model year accepted for a listing.
pub const EARLIEST_MODEL_YEAR: i32 = 1886;

/// A car listing.
///
/// `image_url` is the legacy single-image field. It mirrors the url of the
/// primary image whenever the car has images and is `None` otherwise. Only
/// the image set manager writes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: CarId,
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

/// Unvalidated listing fields as supplied by a client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CarDraft {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub mileage: i32,
    pub price: i64,
    pub fuel_type: String,
    pub transmission: String,
    pub body_type: String,
    pub available: Option<bool>,
}

/// Listing ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCar {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub mileage: i32,
    pub price: i64,
    pub fuel_type: String,
    pub transmission: String,
    pub body_type: String,
    pub available: bool,
}

fn check_year(year: i32, current_year: i32) -> Result<i32, Error> {
    if (EARLIEST_MODEL_YEAR..=current_year + 1).contains(&year) {
        Ok(year)
    } else {
        Err(field_error(
            "year",
            "out_of_range",
            format!("year must be between {EARLIEST_MODEL_YEAR} and {}", current_year + 1),
        ))
    }
}

fn check_non_negative<T>(field: &str, value: T) -> Result<T, Error>
where
    T: PartialOrd + Default,
{
    if value < T::default() {
        return Err(field_error(field, "negative", format!("{field} must not be negative")));
    }
    Ok(value)
}

/// Calendar year used for the upper model-year bound.
#[must_use]
pub fn current_year() -> i32 {
    Utc::now().year()
}

impl CarDraft {
    /// Validate every field against `current_year`.
    pub fn validate(self, current_year: i32) -> Result<NewCar, Error> {
        Ok(NewCar {
            make: non_empty("make", &self.make)?,
            model: non_empty("model", &self.model)?,
            year: check_year(self.year, current_year)?,
            mileage: check_non_negative("mileage", self.mileage)?,
            price: check_non_negative("price", self.price)?,
            fuel_type: non_empty("fuelType", &self.fuel_type)?,
            transmission: non_empty("transmission", &self.transmission)?,
            body_type: non_empty("bodyType", &self.body_type)?,
            available: self.available.unwrap_or(true),
        })
    }
}

/// Partial update of a listing. Absent fields are left untouched; the
/// legacy image field is not part of a patch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CarPatch {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub mileage: Option<i32>,
    pub price: Option<i64>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub body_type: Option<String>,
    pub available: Option<bool>,
}

impl CarPatch {
    /// Validate the supplied fields with the same rules as [`CarDraft`].
    pub fn validate(self, current_year: i32) -> Result<Self, Error> {
        let text = |field: &str, value: Option<String>| {
            value.map(|raw| non_empty(field, &raw)).transpose()
        };
        Ok(Self {
            make: text("make", self.make)?,
            model: text("model", self.model)?,
            year: self.year.map(|y| check_year(y, current_year)).transpose()?,
            mileage: self
                .mileage
                .map(|m| check_non_negative("mileage", m))
                .transpose()?,
            price: self.price.map(|p| check_non_negative("price", p)).transpose()?,
            fuel_type: text("fuelType", self.fuel_type)?,
            transmission: text("transmission", self.transmission)?,
            body_type: text("bodyType", self.body_type)?,
            available: self.available,
        })
    }

    /// Merge this patch into `car`, refreshing `updated_at`.
    pub fn apply(self, car: &mut Car, now: DateTime<Utc>) {
        let Self {
            make,
            model,
            year,
            mileage,
            price,
            fuel_type,
            transmission,
            body_type,
            available,
        } = self;
        if let Some(v) = make {
            car.make = v;
        }
        if let Some(v) = model {
            car.model = v;
        }
        if let Some(v) = year {
            car.year = v;
        }
        if let Some(v) = mileage {
            car.mileage = v;
        }
        if let Some(v) = price {
            car.price = v;
        }
        if let Some(v) = fuel_type {
            car.fuel_type = v;
        }
        if let Some(v) = transmission {
            car.transmission = v;
        }
        if let Some(v) = body_type {
            car.body_type = v;
        }
        if let Some(v) = available {
            car.available = v;
        }
        car.updated_at = now;
    }
}

/// Conjunctive search filters. Text filters match case-insensitive
/// substrings; prices are inclusive bounds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CarSearch {
    pub make: Option<String>,
    pub model: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub body_type: Option<String>,
    pub year: Option<i32>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}

fn contains_ignore_case(haystack: &str, needle: Option<&String>) -> bool {
    needle.is_none_or(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
}

impl CarSearch {
    /// Whether `car` satisfies every supplied filter.
    #[must_use]
    pub fn matches(&self, car: &Car) -> bool {
        contains_ignore_case(&car.make, self.make.as_ref())
            && contains_ignore_case(&car.model, self.model.as_ref())
            && contains_ignore_case(&car.fuel_type, self.fuel_type.as_ref())
            && contains_ignore_case(&car.transmission, self.transmission.as_ref())
            && contains_ignore_case(&car.body_type, self.body_type.as_ref())
            && self.year.is_none_or(|y| car.year == y)
            && self.min_price.is_none_or(|min| car.price >= min)
            && self.max_price.is_none_or(|max| car.price <= max)
    }
}

/// What a cascading car deletion removed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CarDeletionReport {
    /// Urls of the image records removed with the car.
    pub image_urls: Vec<String>,
    pub favorites_removed: u64,
}
