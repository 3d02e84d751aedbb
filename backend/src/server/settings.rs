//! Process settings loaded via OrthoConfig from `CARMARKET_*` variables and
//! CLI flags.

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_TOKEN_TTL_HOURS: u64 = 8;
const DEFAULT_SEED_ADMIN_EMAIL: &str = "admin@carsales.com";
const DEFAULT_SEED_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_SEED_ADMIN_NAME: &str = "Admin User";

/// Secret used when `CARMARKET_JWT_SECRET` is unset. Development only.
pub const DEV_JWT_SECRET: &str = "carmarket-dev-secret-change-me";

/// Runtime configuration for the marketplace server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CARMARKET")]
pub struct Settings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the server keeps data in memory.
    pub database_url: Option<String>,
    /// Directory holding uploaded images.
    pub upload_dir: Option<PathBuf>,
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: Option<String>,
    /// Token lifetime in hours.
    pub token_ttl_hours: Option<u64>,
    /// Create the seed administrator on startup.
    #[ortho_config(default = true)]
    pub seed_admin: bool,
    pub seed_admin_email: Option<String>,
    pub seed_admin_password: Option<String>,
    pub seed_admin_name: Option<String>,
}

impl Settings {
    /// Parse the configured bind address.
    ///
    /// # Errors
    ///
    /// Returns the parse error for a malformed address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).parse()
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR))
    }

    /// The signing secret, or `None` when the development fallback applies.
    pub fn jwt_secret(&self) -> Option<&str> {
        self.jwt_secret.as_deref().filter(|secret| !secret.is_empty())
    }

    pub fn token_ttl(&self) -> Duration {
        let hours = self.token_ttl_hours.unwrap_or(DEFAULT_TOKEN_TTL_HOURS);
        Duration::from_secs(hours.saturating_mul(3600))
    }

    pub fn seed_admin_email(&self) -> &str {
        self.seed_admin_email
            .as_deref()
            .unwrap_or(DEFAULT_SEED_ADMIN_EMAIL)
    }

    pub fn seed_admin_password(&self) -> &str {
        self.seed_admin_password
            .as_deref()
            .unwrap_or(DEFAULT_SEED_ADMIN_PASSWORD)
    }

    pub fn seed_admin_name(&self) -> &str {
        self.seed_admin_name
            .as_deref()
            .unwrap_or(DEFAULT_SEED_ADMIN_NAME)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> Settings {
        Settings::load_from_iter([OsString::from("carmarket")]).expect("config should load")
    }

    fn env(
        bind_addr: Option<&str>,
        jwt_secret: Option<&str>,
        token_ttl_hours: Option<&str>,
    ) -> [(&'static str, Option<String>); 9] {
        [
            ("CARMARKET_BIND_ADDR", bind_addr.map(str::to_owned)),
            ("CARMARKET_DATABASE_URL", None),
            ("CARMARKET_UPLOAD_DIR", None),
            ("CARMARKET_JWT_SECRET", jwt_secret.map(str::to_owned)),
            ("CARMARKET_TOKEN_TTL_HOURS", token_ttl_hours.map(str::to_owned)),
            ("CARMARKET_SEED_ADMIN", None),
            ("CARMARKET_SEED_ADMIN_EMAIL", None),
            ("CARMARKET_SEED_ADMIN_PASSWORD", None),
            ("CARMARKET_SEED_ADMIN_NAME", None),
        ]
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(env(None, None, None));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:3000".parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.database_url.is_none());
        assert_eq!(settings.upload_dir(), PathBuf::from("uploads"));
        assert!(settings.jwt_secret().is_none());
        assert_eq!(settings.token_ttl(), Duration::from_secs(8 * 3600));
        assert!(settings.seed_admin);
        assert_eq!(settings.seed_admin_email(), "admin@carsales.com");
        assert_eq!(settings.seed_admin_password(), "admin123");
        assert_eq!(settings.seed_admin_name(), "Admin User");
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env(Some("127.0.0.1:8081"), Some("s3cret"), Some("2")));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("configured address").port(),
            8081
        );
        assert_eq!(settings.jwt_secret(), Some("s3cret"));
        assert_eq!(settings.token_ttl(), Duration::from_secs(2 * 3600));
    }
}
