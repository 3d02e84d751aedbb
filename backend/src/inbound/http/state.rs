//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    Accounts, CarCatalogue, CarImages, Favorites, Messaging, UserAdministration,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub cars: Arc<dyn CarCatalogue>,
    pub images: Arc<dyn CarImages>,
    pub accounts: Arc<dyn Accounts>,
    pub admin: Arc<dyn UserAdministration>,
    pub favorites: Arc<dyn Favorites>,
    pub messaging: Arc<dyn Messaging>,
}
