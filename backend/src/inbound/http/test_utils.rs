//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::header::AUTHORIZATION;
use chrono::{TimeZone, Utc};

use crate::domain::ports::{
    MockAccounts, MockCarCatalogue, MockCarImages, MockFavorites, MockMessaging,
    MockUserAdministration,
};
use crate::domain::{AuthenticatedUser, Car, CarId, CarImage, ImageId, Role, UserId};
use crate::inbound::http::state::HttpState;

const TOKEN: &str = "test-token";

/// Token accepted by [`TestPorts::authenticate_as`].
pub fn caller_token() -> &'static str {
    TOKEN
}

/// `Authorization` header carrying [`caller_token`].
pub fn bearer() -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {TOKEN}"))
}

/// Mocked driving ports, converted into [`HttpState`] once expectations are set.
#[derive(Default)]
pub struct TestPorts {
    pub cars: MockCarCatalogue,
    pub images: MockCarImages,
    pub accounts: MockAccounts,
    pub admin: MockUserAdministration,
    pub favorites: MockFavorites,
    pub messaging: MockMessaging,
}

impl TestPorts {
    /// Accept [`caller_token`] as the given user.
    pub fn authenticate_as(&mut self, id: UserId, role: Role) {
        self.accounts
            .expect_authenticate()
            .withf(|token| token == TOKEN)
            .returning(move |_| {
                Ok(AuthenticatedUser {
                    id,
                    email: format!("user{id}@example.com"),
                    role,
                })
            });
    }

    pub fn into_state(self) -> HttpState {
        HttpState {
            cars: Arc::new(self.cars),
            images: Arc::new(self.images),
            accounts: Arc::new(self.accounts),
            admin: Arc::new(self.admin),
            favorites: Arc::new(self.favorites),
            messaging: Arc::new(self.messaging),
        }
    }
}

pub fn sample_car(id: i32) -> Car {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("valid date");
    Car {
        id: CarId::new(id),
        make: "Toyota".to_owned(),
        model: "Corolla".to_owned(),
        year: 2020,
        mileage: 42_000,
        price: 15_500,
        fuel_type: "Petrol".to_owned(),
        transmission: "Manual".to_owned(),
        body_type: "Hatchback".to_owned(),
        image_url: None,
        available: true,
        created_at: at,
        updated_at: at,
    }
}

pub fn sample_image(car: i32, id: i32, sort_order: i32, is_primary: bool) -> CarImage {
    CarImage {
        id: ImageId::new(id),
        car_id: CarId::new(car),
        url: format!("/uploads/car-1700000000000-{id}.png"),
        caption: None,
        is_primary,
        sort_order,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("valid date"),
    }
}

const BOUNDARY: &str = "carmarket-test-boundary";

/// One part of a hand-built `multipart/form-data` body.
pub struct MultipartPart<'a> {
    name: &'a str,
    file: Option<(&'a str, &'a str)>,
    bytes: &'a [u8],
}

impl<'a> MultipartPart<'a> {
    pub fn file(name: &'a str, file_name: &'a str, content_type: &'a str, bytes: &'a [u8]) -> Self {
        Self {
            name,
            file: Some((file_name, content_type)),
            bytes,
        }
    }

    pub fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            file: None,
            bytes: value.as_bytes(),
        }
    }
}

/// Encode `parts`, returning the content-type header value and the body.
pub fn multipart_body(parts: &[MultipartPart<'_>]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part.file {
            Some((file_name, content_type)) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{file_name}\"\r\n\
                     Content-Type: {content_type}\r\n\r\n",
                    part.name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    part.name
                )
                .as_bytes(),
            ),
        }
        body.extend_from_slice(part.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}
