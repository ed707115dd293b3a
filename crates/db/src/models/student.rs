//! Student entity model and DTOs.

use campus_core::types::{Date, DbId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::audit::Audit;

/// A student row from the `students` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Student {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<Date>,
    pub gender: String,
    pub mobile_no: String,
    pub email: String,
    pub college_id: DbId,
    /// Snapshot of the college name taken at write time.
    pub college_name: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// DTO for creating a new student. The college name is resolved on write.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudent {
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<Date>,
    pub gender: String,
    pub mobile_no: String,
    pub email: String,
    pub college_id: DbId,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentCriteria {
    pub id: Option<DbId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub college_id: Option<DbId>,
    pub college_name: Option<String>,
}
