//! Images attached to car listings and the rules for uploading them.
//!
//! Display order is `(sort_order, id)` ascending. Upload validation runs
//! over the whole batch before anything is written, so a single bad file
//! rejects the request without leaving partial state behind.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use super::validation::field_error;
use super::{CarId, Error, ImageId};

/// Per-file size ceiling for uploads (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Maximum number of files accepted by one batch upload.
pub const MAX_BATCH_IMAGES: usize = 10;

/// Image attached to a car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarImage {
    pub id: ImageId,
    pub car_id: CarId,
    /// Public path of the stored file, e.g. `/uploads/car-1700000000000-42.png`.
    pub url: String,
    pub caption: Option<String>,
    pub is_primary: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl CarImage {
    /// Compare two images by display order.
    #[must_use]
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        (self.sort_order, self.id).cmp(&(other.sort_order, other.id))
    }
}

/// Image record to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCarImage {
    pub car_id: CarId,
    pub url: String,
    pub sort_order: i32,
    pub is_primary: bool,
}

/// Changes requested for one image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImagePatch {
    pub caption: Option<String>,
    pub sort_order: Option<i32>,
    pub is_primary: Option<bool>,
}

/// Sort order for the next appended image: one past the current maximum,
/// or zero for a car without images.
///
/// # Examples
/// ```
/// use carmarket::domain::next_sort_order;
///
/// assert_eq!(next_sort_order(&[]), 0);
/// ```
#[must_use]
pub fn next_sort_order(images: &[CarImage]) -> i32 {
    images
        .iter()
        .map(|image| image.sort_order)
        .max()
        .map_or(0, |max| max.saturating_add(1))
}

/// Image to promote after the primary is removed: the lowest
/// `(sort_order, id)` among `remaining`.
#[must_use]
pub fn promotion_candidate(remaining: &[CarImage]) -> Option<&CarImage> {
    remaining.iter().min_by(|a, b| a.display_cmp(b))
}

/// Accepted image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageContentType {
    Jpeg,
    Png,
    Webp,
}

impl ImageContentType {
    /// Map a declared MIME type onto a supported format.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// File extension used for stored files.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }
}

/// Raw file received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    /// Content type declared by the client.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Upload that passed type and size checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    pub content_type: ImageContentType,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    fn validate(self, index: usize) -> Result<ValidatedUpload, Error> {
        let Some(content_type) = ImageContentType::from_mime(&self.content_type) else {
            return Err(Error::invalid_request(
                "Only image files (jpeg, png, webp) are allowed",
            )
            .with_details(json!({
                "field": "images",
                "code": "unsupported_type",
                "index": index,
                "value": self.content_type,
            })));
        };
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(Error::invalid_request("File too large").with_details(json!({
                "field": "images",
                "code": "too_large",
                "index": index,
                "limit": MAX_IMAGE_BYTES,
            })));
        }
        Ok(ValidatedUpload {
            content_type,
            bytes: self.bytes,
        })
    }
}

/// Validate a batch of 1..=`max` uploads, all-or-nothing.
pub fn validate_uploads(uploads: Vec<ImageUpload>, max: usize) -> Result<Vec<ValidatedUpload>, Error> {
    if uploads.is_empty() {
        return Err(field_error("images", "missing", "No images provided"));
    }
    if uploads.len() > max {
        return Err(field_error(
            "images",
            "too_many",
            format!("At most {max} images may be uploaded at once"),
        ));
    }
    uploads
        .into_iter()
        .enumerate()
        .map(|(index, upload)| upload.validate(index))
        .collect()
}
