//! Integer identifiers for persisted entities.
//!
//! Identifiers are allocated by storage and are always positive. Parsing
//! from path segments rejects anything else, so handlers can turn a bad id
//! into a validation error before touching a port.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error returned when a textual identifier is not a positive integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identifier must be a positive integer: {raw}")]
pub struct InvalidId {
    raw: String,
}

impl InvalidId {
    /// The rejected input.
    #[must_use]
    pub fn raw(&self) -> &str {
        self.raw.as_str()
    }
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
            ToSchema,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a storage-assigned identifier.
            #[must_use]
            pub const fn new(raw: i32) -> Self {
                Self(raw)
            }

            /// The raw integer value.
            #[must_use]
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = InvalidId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.parse::<i32>() {
                    Ok(value) if value > 0 => Ok(Self(value)),
                    _ => Err(InvalidId { raw: s.to_owned() }),
                }
            }
        }
    };
}

define_id!(
    /// Identifier of a car listing.
    CarId
);
define_id!(
    /// Identifier of an image attached to a car.
    ImageId
);
define_id!(
    /// Identifier of a registered user.
    UserId
);
define_id!(
    /// Identifier of a direct message.
    MessageId
);
