//! Course entity model and DTOs.

use campus_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::audit::Audit;

/// A course row from the `courses` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Course {
    pub id: DbId,
    pub name: String,
    /// Free text, e.g. `"4 years"`.
    pub duration: String,
    pub description: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
}

/// DTO for creating a new course.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourse {
    pub name: String,
    pub duration: String,
    pub description: String,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseCriteria {
    pub id: Option<DbId>,
    pub name: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
}
