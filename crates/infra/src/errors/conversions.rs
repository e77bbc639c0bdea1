//! Conversions from external infrastructure errors into domain errors.

use rusqlite::Error as SqlError;
use stillmint_domain::StillMintError;
use tokio::task::JoinError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub StillMintError);

impl From<InfraError> for StillMintError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<StillMintError> for InfraError {
    fn from(value: StillMintError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoStillMintError {
    fn into_stillmint(self) -> StillMintError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → StillMintError */
/* -------------------------------------------------------------------------- */

impl IntoStillMintError for SqlError {
    fn into_stillmint(self) -> StillMintError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        StillMintError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        StillMintError::Database("database is locked".into())
                    }
                    // SQLITE_CONSTRAINT_PRIMARYKEY / SQLITE_CONSTRAINT_UNIQUE
                    (ErrorCode::ConstraintViolation, 1555 | 2067) => {
                        StillMintError::InvalidInput(format!("unique constraint violation: {message}"))
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        StillMintError::Database("foreign key constraint violation".into())
                    }
                    _ => StillMintError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => StillMintError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                StillMintError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                StillMintError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => {
                StillMintError::Database("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidPath(path) => StillMintError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => StillMintError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_stillmint())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → StillMintError */
/* -------------------------------------------------------------------------- */

impl IntoStillMintError for r2d2::Error {
    fn into_stillmint(self) -> StillMintError {
        StillMintError::Database(format!("connection pool error: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(value.into_stillmint())
    }
}

/* -------------------------------------------------------------------------- */
/* tokio::task::JoinError → StillMintError */
/* -------------------------------------------------------------------------- */

impl IntoStillMintError for JoinError {
    fn into_stillmint(self) -> StillMintError {
        if self.is_cancelled() {
            StillMintError::Internal("blocking task cancelled".into())
        } else {
            StillMintError::Internal(format!("blocking task failed: {self}"))
        }
    }
}

impl From<JoinError> for InfraError {
    fn from(value: JoinError) -> Self {
        InfraError(value.into_stillmint())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → StillMintError */
/* -------------------------------------------------------------------------- */

impl IntoStillMintError for serde_json::Error {
    fn into_stillmint(self) -> StillMintError {
        StillMintError::InvalidInput(format!(
            "invalid JSON at line {} column {}: {self}",
            self.line(),
            self.column()
        ))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_stillmint())
    }
}

/// Shorthand used by repositories: map any supported error straight into the
/// domain error.
pub(crate) fn to_domain<E>(err: E) -> StillMintError
where
    InfraError: From<E>,
{
    InfraError::from(err).into()
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use rusqlite::ffi::{Error as FfiError, ErrorCode};

    use super::*;

    #[test]
    fn sqlite_busy_maps_to_database_error() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::DatabaseBusy, extended_code: 5 },
            Some("database is locked".into()),
        );

        let mapped: StillMintError = InfraError::from(err).into();
        match mapped {
            StillMintError::Database(msg) => {
                assert!(msg.contains("busy") || msg.contains("locked"));
            }
            other => panic!("expected database error, got {:?}", other),
        }
    }

    #[test]
    fn primary_key_violation_maps_to_invalid_input() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::ConstraintViolation, extended_code: 1555 },
            Some("UNIQUE constraint failed: users.id".into()),
        );

        let mapped = to_domain(err);
        assert!(matches!(mapped, StillMintError::InvalidInput(ref m) if m.contains("users.id")));
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let mapped = to_domain(SqlError::QueryReturnedNoRows);
        assert!(matches!(mapped, StillMintError::NotFound(_)));
    }

    #[test]
    fn json_errors_carry_position() {
        let err = serde_json::from_str::<serde_json::Value>("{\n  \"x\": ").unwrap_err();
        match to_domain(err) {
            StillMintError::InvalidInput(msg) => assert!(msg.contains("line 2")),
            other => panic!("expected invalid input, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn cancelled_task_maps_to_internal() {
        let handle = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        });
        handle.abort();
        let err = handle.await.unwrap_err();

        let mapped = to_domain(err);
        assert_eq!(mapped, StillMintError::Internal("blocking task cancelled".into()));
    }
}
