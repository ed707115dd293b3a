//! Faculty entity model and DTOs.

use campus_core::types::{Date, DbId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::audit::Audit;

/// A faculty member row from the `faculty` table.
///
/// `college_name`, `course_name` and `subject_name` are snapshots taken
/// at write time.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Faculty {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub dob: Option<Date>,
    pub email: String,
    pub mobile_no: String,
    pub college_id: DbId,
    pub college_name: String,
    pub course_id: DbId,
    pub course_name: String,
    pub subject_id: DbId,
    pub subject_name: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
}

/// DTO for creating a new faculty member.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFaculty {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub dob: Option<Date>,
    pub email: String,
    pub mobile_no: String,
    pub college_id: DbId,
    pub course_id: DbId,
    pub subject_id: DbId,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FacultyCriteria {
    pub id: Option<DbId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub college_id: Option<DbId>,
    pub course_id: Option<DbId>,
    pub subject_id: Option<DbId>,
}
