//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (accounts, cars,
//!   images, favourites, messages, administration, health)
//! - **Schemas**: domain entities and the request/response bodies
//! - **Security**: bearer token authentication scheme
//!
//! The generated document is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::domain::{
    Car, CarImage, Error, ErrorCode, FavoriteWithCar, Message, MessageStats, MessageThreadEntry,
    Role, User, UserSummary,
};
use crate::inbound::http::accounts::{LoginRequest, RegisterRequest, RegisterResponse, TokenResponse};
use crate::inbound::http::admin::{ChangeRoleRequest, UserEnvelope};
use crate::inbound::http::cars::{CreateCarRequest, MessageResponse, UpdateCarRequest};
use crate::inbound::http::images::{
    ImageForm, ImageResponse, ImagesForm, ImagesUploadedResponse, UpdateImageRequest,
};
use crate::inbound::http::messages::{MessageEnvelope, ReadCount, SendMessageRequest, UnreadCount};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Car marketplace API",
        description = "Listings, listing images, favourites, messaging and user administration."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("bearerAuth" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::cars::list_cars,
        crate::inbound::http::cars::search_cars,
        crate::inbound::http::cars::get_car,
        crate::inbound::http::cars::create_car,
        crate::inbound::http::cars::update_car,
        crate::inbound::http::cars::delete_car,
        crate::inbound::http::images::list_images,
        crate::inbound::http::images::upload_images,
        crate::inbound::http::images::replace_primary_image,
        crate::inbound::http::images::update_image,
        crate::inbound::http::images::delete_image,
        crate::inbound::http::favorites::add_favorite,
        crate::inbound::http::favorites::list_favorites,
        crate::inbound::http::favorites::remove_favorite,
        crate::inbound::http::messages::send_message,
        crate::inbound::http::messages::list_messages,
        crate::inbound::http::messages::mark_read,
        crate::inbound::http::messages::unread_count,
        crate::inbound::http::messages::read_count,
        crate::inbound::http::messages::message_stats,
        crate::inbound::http::admin::list_users,
        crate::inbound::http::admin::change_role,
        crate::inbound::http::admin::delete_user,
        crate::inbound::http::admin::list_cars,
        crate::inbound::http::admin::get_car,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Role,
        User,
        UserSummary,
        Car,
        CarImage,
        FavoriteWithCar,
        Message,
        MessageThreadEntry,
        MessageStats,
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        TokenResponse,
        CreateCarRequest,
        UpdateCarRequest,
        MessageResponse,
        UpdateImageRequest,
        ImagesForm,
        ImageForm,
        ImagesUploadedResponse,
        ImageResponse,
        SendMessageRequest,
        MessageEnvelope,
        UnreadCount,
        ReadCount,
        ChangeRoleRequest,
        UserEnvelope,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "cars", description = "Car listings"),
        (name = "images", description = "Listing images and the primary image"),
        (name = "favorites", description = "The caller's saved listings"),
        (name = "messages", description = "Direct messages between users"),
        (name = "admin", description = "User and listing administration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
