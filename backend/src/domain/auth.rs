//! Authentication primitives: credentials, registrations and caller identity.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::validation::{field_error, non_empty};
use super::{Email, Error, Role, UserId};

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN_CHARS: usize = 6;

/// Validated login credentials used by the accounts service.
///
/// ## Invariants
/// - `email` is trimmed and lowercased and must not be empty. It is not
///   checked for shape: an unknown address fails the same way as a wrong
///   password.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use carmarket::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Admin@CarSales.com", "admin123").unwrap();
/// assert_eq!(creds.email(), "admin@carsales.com");
/// assert_eq!(creds.password(), "admin123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, Error> {
        let normalised = non_empty("email", email)?.to_lowercase();
        if password.is_empty() {
            return Err(field_error("password", "empty", "password must not be empty"));
        }
        Ok(Self {
            email: normalised,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for the account lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: String,
    email: Email,
    password: Zeroizing<String>,
    role: Role,
}

impl Registration {
    /// Validate raw sign-up fields. A missing role defaults to `viewer`.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> Result<Self, Error> {
        let name = non_empty("name", name)?;
        let email = Email::parse(email)?;
        if password.chars().count() < PASSWORD_MIN_CHARS {
            return Err(field_error(
                "password",
                "too_short",
                format!("password must be at least {PASSWORD_MIN_CHARS} characters"),
            ));
        }
        let role = role.map(str::parse::<Role>).transpose()?.unwrap_or_default();
        Ok(Self {
            name,
            email,
            password: Zeroizing::new(password.to_owned()),
            role,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

/// Identity established from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: String,
    pub role: Role,
}

/// Signed bearer token handed to clients.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    #[must_use]
    pub fn new(value: String) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", "email")]
    #[case("   ", "pw", "email")]
    #[case("user@example.com", "", "password")]
    fn invalid_credentials(#[case] email: &str, #[case] password: &str, #[case] field: &str) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details().expect("details")["field"], field);
    }

    #[rstest]
    fn registration_defaults_to_viewer() {
        let reg = Registration::try_from_parts("Jane", "jane@example.com", "secret1", None)
            .expect("valid");
        assert_eq!(reg.role(), Role::Viewer);
        assert_eq!(reg.email().as_ref(), "jane@example.com");
    }

    #[rstest]
    fn registration_accepts_explicit_role() {
        let reg = Registration::try_from_parts("Sam", "sam@example.com", "secret1", Some("sales"))
            .expect("valid");
        assert_eq!(reg.role(), Role::Sales);
    }

    #[rstest]
    #[case("", "a@b.co", "secret1", None, "name")]
    #[case("Jane", "nope", "secret1", None, "email")]
    #[case("Jane", "a@b.co", "12345", None, "password")]
    #[case("Jane", "a@b.co", "secret1", Some("root"), "role")]
    fn registration_rejects_bad_fields(
        #[case] name: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] role: Option<&str>,
        #[case] field: &str,
    ) {
        let err = Registration::try_from_parts(name, email, password, role).expect_err("invalid");
        assert_eq!(err.details().expect("details")["field"], field);
    }

    #[rstest]
    fn token_debug_hides_value() {
        let token = AccessToken::new("secret.jwt.value".into());
        assert_eq!(format!("{token:?}"), "AccessToken(..)");
    }
}
