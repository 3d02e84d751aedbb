//! Car image API handlers.
//!
//! ```text
//! GET    /api/cars/{id}/images
//! POST   /api/cars/{id}/images             multipart field `images`, 1..=10 files
//! POST   /api/cars/{id}/image              multipart field `image`, exactly one file
//! PATCH  /api/cars/{id}/images/{imageId}   {"caption":"Front","sortOrder":2,"isPrimary":true}
//! DELETE /api/cars/{id}/images/{imageId}
//! ```
//!
//! Upload, edit and replace need `ManageListings`; delete needs
//! `RemoveListings`. Listing is public.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    ApiResult, Capability, CarId, CarImage, Error, ImageId, ImagePatch, MAX_BATCH_IMAGES,
};
use crate::inbound::http::auth::Caller;
use crate::inbound::http::cars::{CAR_ID, MessageResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::uploads::collect_files;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_id};

const IMAGE_ID: FieldName = FieldName::new("imageId");
const BATCH_FIELD: FieldName = FieldName::new("images");
const SINGLE_FIELD: FieldName = FieldName::new("image");

/// Changes accepted by `PATCH /api/cars/{id}/images/{imageId}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateImageRequest {
    pub caption: Option<String>,
    pub sort_order: Option<i32>,
    /// `true` makes this the car's primary image. `false` is ignored.
    pub is_primary: Option<bool>,
}

impl From<UpdateImageRequest> for ImagePatch {
    fn from(value: UpdateImageRequest) -> Self {
        Self {
            caption: value.caption,
            sort_order: value.sort_order,
            is_primary: value.is_primary,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImagesUploadedResponse {
    pub message: String,
    pub images: Vec<CarImage>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImageResponse {
    pub message: String,
    pub image: CarImage,
}

/// Upload form for the batch endpoint: one or more files under `images`.
#[derive(ToSchema)]
pub struct ImagesForm {
    pub images: Vec<String>,
}

/// Upload form for the replace endpoint: a single file under `image`.
#[derive(ToSchema)]
pub struct ImageForm {
    pub image: String,
}

fn ids(path: &(String, String)) -> Result<(CarId, ImageId), Error> {
    Ok((parse_id(&path.0, CAR_ID)?, parse_id(&path.1, IMAGE_ID)?))
}

/// List a car's images in display order.
#[utoipa::path(
    get,
    path = "/api/cars/{id}/images",
    params(("id" = i32, Path, description = "Car id")),
    responses(
        (status = 200, description = "Images ordered by sortOrder then id", body = [CarImage]),
        (status = 400, description = "Invalid id", body = Error)
    ),
    tags = ["images"],
    operation_id = "listCarImages",
    security([])
)]
#[get("/{id}/images")]
pub async fn list_images(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<CarImage>>> {
    let car_id: CarId = parse_id(&path, CAR_ID)?;
    Ok(web::Json(state.images.list(car_id).await?))
}

/// Append uploaded files to a car's images.
///
/// The first image a car receives becomes its primary.
#[utoipa::path(
    post,
    path = "/api/cars/{id}/images",
    params(("id" = i32, Path, description = "Car id")),
    request_body(content = ImagesForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Images uploaded", body = ImagesUploadedResponse),
        (status = 400, description = "Missing, invalid or too many files", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Car not found", body = Error)
    ),
    tags = ["images"],
    operation_id = "uploadCarImages"
)]
#[post("/{id}/images")]
pub async fn upload_images(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    caller.require(Capability::ManageListings)?;
    let car_id: CarId = parse_id(&path, CAR_ID)?;
    let uploads = collect_files(payload, BATCH_FIELD, MAX_BATCH_IMAGES).await?;
    let images = state.images.add(car_id, uploads).await?;
    Ok(HttpResponse::Created().json(ImagesUploadedResponse {
        message: "Images uploaded".to_owned(),
        images,
    }))
}

/// Upload one file and make it the car's primary image.
#[utoipa::path(
    post,
    path = "/api/cars/{id}/image",
    params(("id" = i32, Path, description = "Car id")),
    request_body(content = ImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Primary image replaced", body = ImageResponse),
        (status = 400, description = "Missing or invalid file", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Car not found", body = Error)
    ),
    tags = ["images"],
    operation_id = "replacePrimaryImage"
)]
#[post("/{id}/image")]
pub async fn replace_primary_image(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    caller.require(Capability::ManageListings)?;
    let car_id: CarId = parse_id(&path, CAR_ID)?;
    let mut uploads = collect_files(payload, SINGLE_FIELD, 1).await?;
    if uploads.len() > 1 {
        return Err(Error::invalid_request("Only one image may be uploaded").with_details(
            json!({ "field": SINGLE_FIELD.as_str(), "code": "too_many" }),
        ));
    }
    let upload = uploads
        .pop()
        .ok_or_else(|| missing_field_error(SINGLE_FIELD))?;
    let image = state.images.replace_primary(car_id, upload).await?;
    Ok(HttpResponse::Created().json(ImageResponse {
        message: "Primary image replaced".to_owned(),
        image,
    }))
}

/// Edit an image's caption, position or primary flag.
#[utoipa::path(
    patch,
    path = "/api/cars/{id}/images/{imageId}",
    params(
        ("id" = i32, Path, description = "Car id"),
        ("imageId" = i32, Path, description = "Image id")
    ),
    request_body = UpdateImageRequest,
    responses(
        (status = 200, description = "Image updated", body = ImageResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Car or image not found", body = Error)
    ),
    tags = ["images"],
    operation_id = "updateCarImage"
)]
#[patch("/{id}/images/{imageId}")]
pub async fn update_image(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
    payload: web::Json<UpdateImageRequest>,
) -> ApiResult<web::Json<ImageResponse>> {
    caller.require(Capability::ManageListings)?;
    let (car_id, image_id) = ids(&path)?;
    let image = state
        .images
        .update(car_id, image_id, payload.into_inner().into())
        .await?;
    Ok(web::Json(ImageResponse {
        message: "Image updated".to_owned(),
        image,
    }))
}

/// Remove an image; a deleted primary hands over to the next image in order.
#[utoipa::path(
    delete,
    path = "/api/cars/{id}/images/{imageId}",
    params(
        ("id" = i32, Path, description = "Car id"),
        ("imageId" = i32, Path, description = "Image id")
    ),
    responses(
        (status = 200, description = "Image deleted", body = MessageResponse),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Car or image not found", body = Error)
    ),
    tags = ["images"],
    operation_id = "deleteCarImage"
)]
#[delete("/{id}/images/{imageId}")]
pub async fn delete_image(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<MessageResponse>> {
    caller.require(Capability::RemoveListings)?;
    let (car_id, image_id) = ids(&path)?;
    state.images.delete(car_id, image_id).await?;
    Ok(web::Json(MessageResponse::new("Image deleted")))
}
