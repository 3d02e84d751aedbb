//! HTTP inbound adapter exposing the marketplace REST endpoints.

pub mod accounts;
pub mod admin;
pub mod auth;
pub mod cars;
pub mod error;
pub mod favorites;
pub mod health;
pub mod images;
pub mod messages;
pub mod state;
#[cfg(test)]
pub mod test_utils;
mod uploads;
pub mod validation;

pub use auth::Caller;
pub use state::HttpState;
