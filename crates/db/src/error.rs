//! Error taxonomy surfaced by every record service.

/// SQLite extended result code for a violated `UNIQUE` index
/// (`SQLITE_CONSTRAINT_UNIQUE`). Primary-key collisions carry a different
/// code and are treated as store failures, not duplicates.
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";

/// Failure of a record-service operation.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A natural-key collision: the caller should re-present the input with
    /// the conflicting field flagged.
    #[error("{0}")]
    DuplicateRecord(String),

    /// A legitimate "not found" outcome of a credential flow.
    #[error("{0}")]
    RecordNotFound(String),

    /// A store or transaction failure. Fatal to the current operation.
    #[error("{message}")]
    Application {
        message: String,
        #[source]
        source: Option<sqlx::Error>,
    },
}

/// Convenience alias for record-service return values.
pub type ModelResult<T> = Result<T, ModelError>;

impl ModelError {
    pub fn duplicate(message: impl Into<String>) -> Self {
        ModelError::DuplicateRecord(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ModelError::RecordNotFound(message.into())
    }

    pub fn application(message: impl Into<String>) -> Self {
        ModelError::Application {
            message: message.into(),
            source: None,
        }
    }

    /// A rollback that failed while handling `cause`. Both errors stay visible.
    pub fn rollback_failed(rollback: sqlx::Error, cause: &ModelError) -> Self {
        ModelError::Application {
            message: format!("Rollback failed: {rollback} (while handling: {cause})"),
            source: Some(rollback),
        }
    }

    /// Classify a store error raised by a write.
    ///
    /// A unique-index violation maps to [`ModelError::DuplicateRecord`]
    /// carrying `duplicate`; everything else is an application error.
    pub fn from_write(err: sqlx::Error, duplicate: &str) -> Self {
        if is_unique_violation(&err) {
            return ModelError::DuplicateRecord(duplicate.to_owned());
        }
        ModelError::from(err)
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, ModelError::DuplicateRecord(_))
    }
}

impl From<sqlx::Error> for ModelError {
    fn from(err: sqlx::Error) -> Self {
        ModelError::Application {
            message: format!("Database error: {err}"),
            source: Some(err),
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(SQLITE_CONSTRAINT_UNIQUE)
        }
        _ => false,
    }
}
