use scylla::transport::errors::{DbError, NewSessionError, QueryError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("schema error: {0}")]
    Schema(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("operation on closed cluster handle")]
    UseAfterClose,

    #[error("cluster handle already closed")]
    AlreadyClosed,

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<NewSessionError> for ClientError {
    fn from(err: NewSessionError) -> Self {
        ClientError::Connection(err.to_string())
    }
}

/// Classify a driver error raised by an INSERT. Unavailability and write
/// timeouts mean the requested consistency was not met; a server-side
/// "invalid" rejection of a bound statement means a value did not match the
/// column's declared type (identifiers are validated before the statement is
/// built, so malformed names never reach the server).
pub(crate) fn classify_write_error(err: QueryError) -> ClientError {
    match err {
        QueryError::DbError(
            db @ (DbError::Unavailable { .. }
            | DbError::WriteTimeout { .. }
            | DbError::WriteFailure { .. }),
            msg,
        ) => ClientError::Write(format!("consistency not met ({:?}): {}", db, msg)),
        QueryError::DbError(DbError::Invalid, msg) => ClientError::TypeMismatch(msg),
        QueryError::RequestTimeout(msg) => ClientError::Timeout(msg),
        other => ClientError::Write(other.to_string()),
    }
}

/// Classify a driver error raised by a SELECT.
pub(crate) fn classify_read_error(err: QueryError) -> ClientError {
    match err {
        QueryError::DbError(
            db @ (DbError::Unavailable { .. }
            | DbError::ReadTimeout { .. }
            | DbError::ReadFailure { .. }),
            msg,
        ) => ClientError::Read(format!("consistency not met ({:?}): {}", db, msg)),
        QueryError::RequestTimeout(msg) => ClientError::Timeout(msg),
        other => ClientError::Read(other.to_string()),
    }
}

/// Classify a driver error raised by DDL. `AlreadyExists` is handled by the
/// caller (idempotent create), everything else is a schema rejection.
pub(crate) fn classify_schema_error(err: QueryError) -> ClientError {
    match err {
        QueryError::DbError(DbError::SyntaxError | DbError::Invalid | DbError::Unauthorized, msg) => {
            ClientError::Schema(msg)
        }
        QueryError::RequestTimeout(msg) => ClientError::Timeout(msg),
        other => ClientError::Schema(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scylla::statement::Consistency;

    #[test]
    fn unavailable_write_is_consistency_failure() {
        let err = QueryError::DbError(
            DbError::Unavailable {
                consistency: Consistency::Quorum,
                required: 2,
                alive: 1,
            },
            "not enough replicas".to_string(),
        );
        let classified = classify_write_error(err);
        assert!(matches!(classified, ClientError::Write(_)));
        assert!(classified.to_string().contains("consistency not met"));
    }

    #[test]
    fn invalid_write_is_type_mismatch() {
        let err = QueryError::DbError(DbError::Invalid, "expected int, got text".to_string());
        assert!(matches!(
            classify_write_error(err),
            ClientError::TypeMismatch(_)
        ));
    }

    #[test]
    fn syntax_rejection_is_schema_error() {
        let err = QueryError::DbError(DbError::SyntaxError, "line 1: ...".to_string());
        assert!(matches!(classify_schema_error(err), ClientError::Schema(_)));
    }

    #[test]
    fn unavailable_read_is_read_error() {
        let err = QueryError::DbError(
            DbError::Unavailable {
                consistency: Consistency::One,
                required: 1,
                alive: 0,
            },
            "no replicas alive".to_string(),
        );
        assert!(matches!(classify_read_error(err), ClientError::Read(_)));
    }
}
