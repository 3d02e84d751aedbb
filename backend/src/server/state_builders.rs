//! Builders wiring adapters into the domain services behind [`HttpState`].

use std::io;
use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{
    CarImageRepository, CarRepository, FavoriteRepository, MessageRepository, UserRepository,
};
use crate::domain::{
    AccountService, CarCatalogueService, FavoritesService, ImageSetService, MessagingService,
    UserAdminService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::auth::{Argon2PasswordHasher, JwtTokenService};
use crate::outbound::memory::InMemoryStore;
use crate::outbound::persistence::{
    DieselCarImageRepository, DieselCarRepository, DieselFavoriteRepository,
    DieselMessageRepository, DieselUserRepository,
};
use crate::outbound::storage::CapStdImageStore;

use super::ServerConfig;

/// Repository adapters shared by the services.
struct Repositories<C, I, U, F, M> {
    cars: Arc<C>,
    images: Arc<I>,
    users: Arc<U>,
    favorites: Arc<F>,
    messages: Arc<M>,
}

/// Credential and file adapters shared by the services.
struct Adapters {
    store: Arc<CapStdImageStore>,
    hasher: Arc<Argon2PasswordHasher>,
    tokens: Arc<JwtTokenService>,
}

fn wire<C, I, U, F, M>(repos: Repositories<C, I, U, F, M>, adapters: Adapters) -> HttpState
where
    C: CarRepository + 'static,
    I: CarImageRepository + 'static,
    U: UserRepository + 'static,
    F: FavoriteRepository + 'static,
    M: MessageRepository + 'static,
{
    let Repositories {
        cars,
        images,
        users,
        favorites,
        messages,
    } = repos;
    let Adapters {
        store,
        hasher,
        tokens,
    } = adapters;

    HttpState {
        cars: Arc::new(CarCatalogueService::new(cars.clone(), store.clone())),
        images: Arc::new(ImageSetService::new(cars.clone(), images, store)),
        accounts: Arc::new(AccountService::new(users.clone(), hasher, tokens)),
        admin: Arc::new(UserAdminService::new(users.clone())),
        favorites: Arc::new(FavoritesService::new(favorites, cars)),
        messaging: Arc::new(MessagingService::new(messages, users)),
    }
}

/// Build the HTTP state from configuration.
///
/// Uses the PostgreSQL adapters when a pool is configured and a shared
/// [`InMemoryStore`] otherwise.
///
/// # Errors
///
/// Returns [`io::Error`] when the upload directory cannot be opened.
pub fn build_http_state(config: &ServerConfig) -> io::Result<HttpState> {
    let adapters = Adapters {
        store: Arc::new(CapStdImageStore::open(config.upload_dir.clone())?),
        hasher: Arc::new(Argon2PasswordHasher::new()),
        tokens: Arc::new(JwtTokenService::new(&config.jwt_secret, config.token_ttl)),
    };

    let state = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL persistence");
            wire(
                Repositories {
                    cars: Arc::new(DieselCarRepository::new(pool.clone())),
                    images: Arc::new(DieselCarImageRepository::new(pool.clone())),
                    users: Arc::new(DieselUserRepository::new(pool.clone())),
                    favorites: Arc::new(DieselFavoriteRepository::new(pool.clone())),
                    messages: Arc::new(DieselMessageRepository::new(pool.clone())),
                },
                adapters,
            )
        }
        None => {
            info!("no database configured; data is kept in memory");
            let memory = Arc::new(InMemoryStore::new());
            wire(
                Repositories {
                    cars: memory.clone(),
                    images: memory.clone(),
                    users: memory.clone(),
                    favorites: memory.clone(),
                    messages: memory,
                },
                adapters,
            )
        }
    };
    Ok(state)
}
