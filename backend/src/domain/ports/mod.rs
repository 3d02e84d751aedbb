//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, the image store, credentials) are
//! implemented by outbound adapters. Driving ports are implemented by the
//! domain services and called from inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts;
mod car_catalogue;
mod car_image_repository;
mod car_images;
mod car_repository;
mod credentials;
mod favorite_repository;
mod favorites;
mod image_store;
mod message_repository;
mod messaging;
mod user_administration;
mod user_repository;

#[cfg(test)]
pub use accounts::MockAccounts;
pub use accounts::Accounts;
#[cfg(test)]
pub use car_catalogue::MockCarCatalogue;
pub use car_catalogue::CarCatalogue;
#[cfg(test)]
pub use car_image_repository::MockCarImageRepository;
pub use car_image_repository::{CarImagePersistenceError, CarImageRepository};
#[cfg(test)]
pub use car_images::MockCarImages;
pub use car_images::CarImages;
#[cfg(test)]
pub use car_repository::MockCarRepository;
pub use car_repository::{CarPersistenceError, CarRepository};
#[cfg(test)]
pub use credentials::{MockPasswordHasher, MockTokenService};
pub use credentials::{PasswordHashError, PasswordHasher, TokenError, TokenService};
#[cfg(test)]
pub use favorite_repository::MockFavoriteRepository;
pub use favorite_repository::{FavoritePersistenceError, FavoriteRepository};
#[cfg(test)]
pub use favorites::MockFavorites;
pub use favorites::Favorites;
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageStore, ImageStoreError};
#[cfg(test)]
pub use message_repository::MockMessageRepository;
pub use message_repository::{MessagePersistenceError, MessageRepository};
#[cfg(test)]
pub use messaging::MockMessaging;
pub use messaging::Messaging;
#[cfg(test)]
pub use user_administration::MockUserAdministration;
pub use user_administration::UserAdministration;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
