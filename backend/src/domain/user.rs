//! User accounts and their public projections.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::field_error;
use super::{Error, Role, UserId};

/// Normalised email address: trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    ///
    /// The address must contain exactly one `@`, a non-empty local part and
    /// a domain with at least one interior dot.
    ///
    /// # Examples
    /// ```
    /// use carmarket::domain::Email;
    ///
    /// let email = Email::parse(" Jane@Example.COM ").unwrap();
    /// assert_eq!(email.as_ref(), "jane@example.com");
    /// assert!(Email::parse("not-an-email").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let normalised = raw.trim().to_lowercase();
        let invalid = || field_error("email", "invalid_email", "Invalid email address");
        let (local, domain) = normalised.split_once('@').ok_or_else(invalid)?;
        let domain_ok = domain
            .split_once('.')
            .is_some_and(|(head, tail)| !head.is_empty() && !tail.is_empty());
        if local.is_empty() || domain.contains('@') || !domain_ok {
            return Err(invalid());
        }
        if normalised.chars().any(char::is_whitespace) {
            return Err(invalid());
        }
        Ok(Self(normalised))
    }

    /// Wrap an address already normalised by storage.
    #[must_use]
    pub fn from_trusted(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Public view of a user account. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored account: the user plus their password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub user: User,
    pub password_hash: String,
}

/// Account to be inserted; the password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: Email,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
}

/// Compact identity attached to messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: Email,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Rows removed when a user is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserDeletionReport {
    pub messages_removed: u64,
    pub favorites_removed: u64,
}
