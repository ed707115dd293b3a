//! Subject entity model and DTOs.

use campus_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::audit::Audit;

/// A subject row from the `subjects` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Subject {
    pub id: DbId,
    pub name: String,
    pub course_id: DbId,
    /// Snapshot of the course name taken at write time.
    pub course_name: String,
    pub description: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
}

/// DTO for creating a new subject. The course name is resolved on write.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubject {
    pub name: String,
    pub course_id: DbId,
    pub description: String,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubjectCriteria {
    pub id: Option<DbId>,
    pub name: Option<String>,
    pub course_id: Option<DbId>,
    pub course_name: Option<String>,
}
