//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! adapters, and the services implementing the driving ports.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Car, CarImage, User, Message, Favorite: persisted entities.
//! - Role / Capability / authorize: the static access-control table.
//! - ImageSetService and friends: use-case implementations generic over
//!   their driven ports.

pub mod access;
pub mod account_service;
pub mod auth;
pub mod car;
pub mod car_catalogue_service;
pub mod error;
pub mod favorite;
pub mod favorites_service;
pub mod ids;
pub mod image;
pub mod image_set_service;
pub mod message;
pub mod messaging_service;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_admin_service;
mod validation;

pub use self::access::{Capability, Role, UnknownRole, authorize};
pub use self::account_service::AccountService;
pub use self::auth::{AccessToken, AuthenticatedUser, LoginCredentials, PASSWORD_MIN_CHARS, Registration};
pub use self::car::{
    Car, CarDeletionReport, CarDraft, CarPatch, CarSearch, EARLIEST_MODEL_YEAR, NewCar,
    current_year,
};
pub use self::car_catalogue_service::CarCatalogueService;
pub use self::error::{Error, ErrorCode};
pub use self::favorite::{Favorite, FavoriteWithCar};
pub use self::favorites_service::FavoritesService;
pub use self::ids::{CarId, ImageId, InvalidId, MessageId, UserId};
pub use self::image::{
    CarImage, ImageContentType, ImagePatch, ImageUpload, MAX_BATCH_IMAGES, MAX_IMAGE_BYTES,
    NewCarImage, ValidatedUpload, next_sort_order, promotion_candidate, validate_uploads,
};
pub use self::image_set_service::ImageSetService;
pub use self::message::{
    Message, MessageStats, MessageThreadEntry, NewMessage, sort_newest_first,
};
pub use self::messaging_service::MessagingService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Email, NewUser, User, UserAccount, UserDeletionReport, UserSummary};
pub use self::user_admin_service::UserAdminService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use carmarket::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
