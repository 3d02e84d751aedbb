//! Roles and the static capability table.
//!
//! Roles form a closed set. Routes ask for a [`Capability`] rather than a
//! list of role names, and [`authorize`] answers membership against the
//! table below.
//!
//! | capability       | owner | admin | sales | viewer |
//! |------------------|-------|-------|-------|--------|
//! | `ManageListings` | yes   | yes   | yes   | no     |
//! | `RemoveListings` | yes   | yes   | no    | no     |
//! | `Administer`     | yes   | yes   | no    | no     |
//! | `Participate`    | yes   | yes   | yes   | yes    |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use super::Error;

/// Role assigned to every user account.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Sales,
    Admin,
    #[default]
    Viewer,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Self; 4] = [Self::Owner, Self::Sales, Self::Admin, Self::Viewer];

    /// Stable lowercase name used in storage and tokens.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Sales => "sales",
            Self::Admin => "admin",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role name is outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_owned()))
    }
}

impl From<UnknownRole> for Error {
    fn from(value: UnknownRole) -> Self {
        Error::invalid_request("Invalid role").with_details(json!({
            "field": "role",
            "code": "unknown_role",
            "value": value.0,
        }))
    }
}

/// Permission a route requires from its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Create and edit listings and their images.
    ManageListings,
    /// Delete listings and images.
    RemoveListings,
    /// Use the administration endpoints.
    Administer,
    /// Keep favourites and exchange messages.
    Participate,
}

impl Capability {
    /// Roles granted this capability.
    #[must_use]
    pub const fn roles(self) -> &'static [Role] {
        match self {
            Self::ManageListings => &[Role::Owner, Role::Admin, Role::Sales],
            Self::RemoveListings | Self::Administer => &[Role::Owner, Role::Admin],
            Self::Participate => &Role::ALL,
        }
    }

    /// Whether `role` holds this capability.
    #[must_use]
    pub fn permits(self, role: Role) -> bool {
        self.roles().contains(&role)
    }
}

/// Check `role` against `capability`, failing with `forbidden`.
///
/// # Examples
/// ```
/// use carmarket::domain::{authorize, Capability, Role};
///
/// assert!(authorize(Role::Sales, Capability::ManageListings).is_ok());
/// assert!(authorize(Role::Sales, Capability::RemoveListings).is_err());
/// ```
pub fn authorize(role: Role, capability: Capability) -> Result<(), Error> {
    if capability.permits(role) {
        Ok(())
    } else {
        Err(Error::forbidden("Access denied"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(Role::Owner, Capability::ManageListings, true)]
    #[case(Role::Admin, Capability::ManageListings, true)]
    #[case(Role::Sales, Capability::ManageListings, true)]
    #[case(Role::Viewer, Capability::ManageListings, false)]
    #[case(Role::Owner, Capability::RemoveListings, true)]
    #[case(Role::Admin, Capability::RemoveListings, true)]
    #[case(Role::Sales, Capability::RemoveListings, false)]
    #[case(Role::Viewer, Capability::RemoveListings, false)]
    #[case(Role::Owner, Capability::Administer, true)]
    #[case(Role::Admin, Capability::Administer, true)]
    #[case(Role::Sales, Capability::Administer, false)]
    #[case(Role::Viewer, Capability::Administer, false)]
    #[case(Role::Viewer, Capability::Participate, true)]
    #[case(Role::Sales, Capability::Participate, true)]
    fn capability_table(#[case] role: Role, #[case] capability: Capability, #[case] allowed: bool) {
        assert_eq!(capability.permits(role), allowed);
    }

    #[rstest]
    fn authorize_rejects_with_forbidden() {
        let err = authorize(Role::Viewer, Capability::Administer).expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[case("owner", Role::Owner)]
    #[case("sales", Role::Sales)]
    #[case("admin", Role::Admin)]
    #[case("viewer", Role::Viewer)]
    fn parses_role_names(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(raw.parse::<Role>(), Ok(expected));
        assert_eq!(expected.to_string(), raw);
    }

    #[rstest]
    #[case("Owner")]
    #[case("superuser")]
    #[case("")]
    fn rejects_unknown_roles(#[case] raw: &str) {
        let err: Error = raw.parse::<Role>().expect_err("unknown").into();
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
