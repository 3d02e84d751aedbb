//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::{DEV_JWT_SECRET, Settings};
pub use state_builders::build_http_state;

use std::path::PathBuf;

use actix_files::Files;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::Trace;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::error::{json_error_handler, path_error_handler, query_error_handler};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{accounts, admin, cars, favorites, images, messages};

/// Upper bound for JSON request bodies.
pub const JSON_BODY_LIMIT: usize = 64 * 1024;

/// Shared state handed to every worker's [`App`].
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    pub upload_dir: PathBuf,
}

/// Assemble the application: routes, extractor configuration, tracing and
/// static upload serving.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        upload_dir,
    } = deps;

    let auth = web::scope("/api/auth")
        .service(accounts::register)
        .service(accounts::login);

    // `/search` must be registered ahead of `/{id}`.
    let cars = web::scope("/api/cars")
        .service(cars::list_cars)
        .service(cars::search_cars)
        .service(cars::create_car)
        .service(images::list_images)
        .service(images::upload_images)
        .service(images::replace_primary_image)
        .service(images::update_image)
        .service(images::delete_image)
        .service(cars::get_car)
        .service(cars::update_car)
        .service(cars::delete_car);

    let favorites = web::scope("/api/favorites")
        .service(favorites::add_favorite)
        .service(favorites::list_favorites)
        .service(favorites::remove_favorite);

    let messages = web::scope("/api/messages")
        .service(messages::send_message)
        .service(messages::list_messages)
        .service(messages::unread_count)
        .service(messages::read_count)
        .service(messages::message_stats)
        .service(messages::mark_read);

    let admin = web::scope("/api/admin")
        .service(admin::list_users)
        .service(admin::change_role)
        .service(admin::delete_user)
        .service(admin::list_cars)
        .service(admin::get_car);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(
            web::JsonConfig::default()
                .limit(JSON_BODY_LIMIT)
                .error_handler(json_error_handler),
        )
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .wrap(Trace)
        .service(auth)
        .service(cars)
        .service(favorites)
        .service(messages)
        .service(admin)
        .service(Files::new("/uploads", upload_dir))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the listener is bound.
/// - `http_state`: domain ports, usually from [`build_http_state`].
/// - `config`: binding and upload settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    config: &ServerConfig,
) -> std::io::Result<Server> {
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state: web::Data::new(http_state),
        upload_dir: config.upload_dir.clone(),
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(config.bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}
