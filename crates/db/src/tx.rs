//! Commit-or-rollback plumbing shared by every write.

use sqlx::{Sqlite, Transaction};

use crate::error::{ModelError, ModelResult};
use crate::DbPool;

/// A record type as seen by the write path.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Entity {
    pub name: &'static str,
    /// Reported when the natural key is already taken, whether the pre-write
    /// lookup or the store's unique index catches it.
    pub duplicate: &'static str,
}

/// Open a write transaction holding SQLite's write lock from the start.
///
/// Key allocation reads `MAX(id)` before inserting; with a deferred `BEGIN`
/// two writers could read the same maximum and one would fail to upgrade its
/// lock. `BEGIN IMMEDIATE` serializes writers instead, each waiting out the
/// connection's busy timeout.
pub(crate) async fn begin_write(
    pool: &DbPool,
) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

/// Finish a write transaction.
///
/// On success the transaction is committed. On failure it is rolled back
/// and the original error is classified for `entity`; a failed rollback is
/// reported as an application error that still names the original failure.
pub(crate) async fn settle<T>(
    tx: Transaction<'_, Sqlite>,
    outcome: Result<T, sqlx::Error>,
    entity: Entity,
) -> ModelResult<T> {
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            let cause = ModelError::from_write(err, entity.duplicate);
            if let Err(rollback) = tx.rollback().await {
                tracing::error!(
                    entity = entity.name,
                    error = %rollback,
                    cause = %cause,
                    "Rollback failed"
                );
                return Err(ModelError::rollback_failed(rollback, &cause));
            }
            tracing::warn!(entity = entity.name, error = %cause, "Write rolled back");
            Err(cause)
        }
    }
}
