//! Audit fields carried by every record.

use campus_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Who created and last modified a record, and when.
///
/// The caller supplies these values; the store never fills them in.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Audit {
    pub created_by: String,
    pub modified_by: String,
    pub created_datetime: Timestamp,
    pub modified_datetime: Timestamp,
}

impl Audit {
    /// Audit block for a record created by `actor` at `at`.
    pub fn new(actor: impl Into<String>, at: Timestamp) -> Self {
        let actor = actor.into();
        Self {
            created_by: actor.clone(),
            modified_by: actor,
            created_datetime: at,
            modified_datetime: at,
        }
    }

    /// Audit block for a record created by `actor` now.
    pub fn now(actor: impl Into<String>) -> Self {
        Self::new(actor, chrono::Utc::now())
    }

    /// Record a modification. Creation fields are left untouched.
    pub fn touch(&mut self, actor: impl Into<String>, at: Timestamp) {
        self.modified_by = actor.into();
        self.modified_datetime = at;
    }
}
