//! Backend entry-point: loads settings, prepares persistence and serves the
//! REST API.

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use carmarket::domain::Registration;
use carmarket::domain::ports::Accounts;
use carmarket::inbound::http::health::HealthState;
use carmarket::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use carmarket::server::{DEV_JWT_SECRET, ServerConfig, Settings, build_http_state, create_server};

/// Create the seed owner account unless a user with its email exists.
async fn seed_admin(accounts: &dyn Accounts, settings: &Settings) {
    let registration = match Registration::try_from_parts(
        settings.seed_admin_name(),
        settings.seed_admin_email(),
        settings.seed_admin_password(),
        Some("owner"),
    ) {
        Ok(registration) => registration,
        Err(err) => {
            warn!(error = %err, "seed administrator settings are invalid; skipping");
            return;
        }
    };
    match accounts.ensure_account(registration).await {
        Ok(true) => info!(email = settings.seed_admin_email(), "seed administrator created"),
        Ok(false) => info!(email = settings.seed_admin_email(), "seed administrator present"),
        Err(err) => warn!(error = %err, "failed to create seed administrator"),
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = Settings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::other(format!("failed to load settings: {err}")))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    let secret = settings.jwt_secret().unwrap_or_else(|| {
        warn!("CARMARKET_JWT_SECRET is unset; using the development secret");
        DEV_JWT_SECRET
    });

    let mut config = ServerConfig::new(
        bind_addr,
        settings.upload_dir(),
        secret.as_bytes(),
        settings.token_ttl(),
    );

    if let Some(database_url) = settings.database_url.as_deref() {
        run_migrations(database_url)
            .await
            .map_err(|err| io::Error::other(err.to_string()))?;
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(|err| io::Error::other(err.to_string()))?;
        config = config.with_db_pool(pool);
    }

    let http_state = build_http_state(&config)?;
    if settings.seed_admin {
        seed_admin(http_state.accounts.as_ref(), &settings).await;
    }

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %config.bind_addr(), "listening");
    create_server(health_state, http_state, &config)?.await
}
