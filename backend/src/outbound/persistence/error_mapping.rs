//! Shared Diesel and pool error mapping for the repository adapters.
//!
//! Every repository port error has `Connection` and `Query` variants; the
//! [`RepositoryError`] trait exposes their constructors so one pair of
//! mapping functions serves all adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{
    CarImagePersistenceError, CarPersistenceError, FavoritePersistenceError,
    MessagePersistenceError, UserPersistenceError,
};

use super::pool::PoolError;

/// Port errors with connection and query failure constructors.
pub(crate) trait RepositoryError: Sized {
    fn connection_failed(message: String) -> Self;
    fn query_failed(message: String) -> Self;
}

macro_rules! impl_repository_error {
    ($($error:ty),* $(,)?) => {
        $(
            impl RepositoryError for $error {
                fn connection_failed(message: String) -> Self {
                    Self::connection(message)
                }

                fn query_failed(message: String) -> Self {
                    Self::query(message)
                }
            }
        )*
    };
}

impl_repository_error!(
    CarPersistenceError,
    CarImagePersistenceError,
    FavoritePersistenceError,
    MessagePersistenceError,
    UserPersistenceError,
);

/// Map a pool checkout or build failure to a connection error.
pub(crate) fn map_pool_error<E: RepositoryError>(error: PoolError) -> E {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            E::connection_failed(message)
        }
    }
}

/// Map a Diesel failure to a connection or query error.
///
/// Database messages are logged at debug level and replaced by a generic
/// description so SQL detail never reaches the domain.
pub(crate) fn map_diesel_error<E: RepositoryError>(error: DieselError) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => E::query_failed("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => E::query_failed("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::connection_failed("database connection error".to_owned())
        }
        _ => E::query_failed("database error".to_owned()),
    }
}

/// Whether `error` reports a unique-constraint violation.
pub(crate) fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

/// Whether `error` reports a foreign-key violation, i.e. the referenced
/// row was removed before the write landed.
pub(crate) fn is_foreign_key_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)
    )
}
