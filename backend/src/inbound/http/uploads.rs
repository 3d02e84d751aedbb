//! Multipart image collection for the car image endpoints.
//!
//! Files are buffered in memory only up to one byte past
//! [`MAX_IMAGE_BYTES`]; anything beyond is drained and discarded so the
//! domain validation can reject the file without the request growing
//! unbounded. Parts under other field names are drained and ignored.

use actix_multipart::{Field, Multipart, MultipartError};
use futures_util::TryStreamExt as _;
use serde_json::json;
use tracing::debug;

use crate::domain::{Error, ImageUpload, MAX_IMAGE_BYTES};
use crate::inbound::http::validation::FieldName;

const BUFFER_CEILING: usize = MAX_IMAGE_BYTES + 1;

fn multipart_error(err: &MultipartError) -> Error {
    Error::invalid_request("malformed multipart body").with_details(json!({
        "field": "body",
        "code": "malformed",
        "reason": err.to_string(),
    }))
}

async fn drain(field: &mut Field) -> Result<(), Error> {
    while field.try_next().await.map_err(|err| multipart_error(&err))?.is_some() {}
    Ok(())
}

async fn read_capped(field: &mut Field) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(|err| multipart_error(&err))? {
        let room = BUFFER_CEILING.saturating_sub(bytes.len());
        let take = chunk.len().min(room);
        bytes.extend_from_slice(chunk.get(..take).unwrap_or_default());
    }
    Ok(bytes)
}

/// Collect up to `max_files + 1` files sent under `field`.
///
/// One extra file is kept so callers can tell "exactly the limit" from
/// "too many".
pub(crate) async fn collect_files(
    mut payload: Multipart,
    field: FieldName,
    max_files: usize,
) -> Result<Vec<ImageUpload>, Error> {
    let wanted = field.as_str();
    let mut uploads = Vec::new();
    while let Some(mut part) = payload.try_next().await.map_err(|err| multipart_error(&err))? {
        let matches = part.name() == Some(wanted);
        if !matches || uploads.len() > max_files {
            debug!(field = ?part.name(), "skipping multipart part");
            drain(&mut part).await?;
            continue;
        }
        let content_type = part
            .content_type()
            .map(|mime| mime.essence_str().to_owned())
            .unwrap_or_default();
        let file_name = part
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .map(str::to_owned);
        let bytes = read_capped(&mut part).await?;
        uploads.push(ImageUpload {
            file_name,
            content_type,
            bytes,
        });
    }
    Ok(uploads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{MultipartPart, multipart_body};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;
    use serde_json::Value;

    async fn summarise(payload: Multipart) -> Result<HttpResponse, Error> {
        let uploads = collect_files(payload, FieldName::new("images"), 2).await?;
        let summary: Vec<Value> = uploads
            .iter()
            .map(|upload| {
                json!({
                    "name": upload.file_name,
                    "type": upload.content_type,
                    "len": upload.bytes.len(),
                })
            })
            .collect();
        Ok(HttpResponse::Ok().json(summary))
    }

    async fn post(parts: &[MultipartPart<'_>]) -> (StatusCode, Value) {
        let app = test::init_service(App::new().route("/", web::post().to(summarise))).await;
        let (content_type, body) = multipart_body(parts);
        let request = test::TestRequest::post()
            .uri("/")
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request();
        let response = test::call_service(&app, request).await;
        let status = response.status();
        (status, test::read_body_json(response).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn collects_files_under_the_requested_field() {
        let (status, body) = post(&[
            MultipartPart::file("images", "a.png", "image/png", b"png-bytes"),
            MultipartPart::text("caption", "ignored"),
            MultipartPart::file("images", "b.jpg", "image/jpeg", b"jpg"),
        ])
        .await;

        assert_eq!(status, StatusCode::OK);
        let files = body.as_array().expect("array");
        assert_eq!(files.len(), 2);
        assert_eq!(files[0]["name"], "a.png");
        assert_eq!(files[0]["type"], "image/png");
        assert_eq!(files[0]["len"], 9);
        assert_eq!(files[1]["type"], "image/jpeg");
    }

    #[rstest]
    #[actix_web::test]
    async fn keeps_one_file_past_the_limit() {
        let (_, body) = post(&[
            MultipartPart::file("images", "1.png", "image/png", b"1"),
            MultipartPart::file("images", "2.png", "image/png", b"2"),
            MultipartPart::file("images", "3.png", "image/png", b"3"),
            MultipartPart::file("images", "4.png", "image/png", b"4"),
        ])
        .await;

        assert_eq!(body.as_array().expect("array").len(), 3);
    }

    #[rstest]
    #[actix_web::test]
    async fn oversized_files_are_capped_just_past_the_limit() {
        let big = vec![7_u8; MAX_IMAGE_BYTES + 1024];
        let (_, body) = post(&[MultipartPart::file("images", "big.png", "image/png", &big)]).await;

        assert_eq!(body[0]["len"], BUFFER_CEILING);
    }

    #[rstest]
    #[actix_web::test]
    async fn other_fields_yield_nothing() {
        let (status, body) =
            post(&[MultipartPart::file("image", "a.png", "image/png", b"x")]).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().expect("array").is_empty());
    }
}
