//! Marksheet entity model and DTOs.

use campus_core::marksheet;
use campus_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::audit::Audit;

/// A marksheet row from the `marksheets` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Marksheet {
    pub id: DbId,
    pub roll_no: String,
    pub student_id: DbId,
    /// Student's full name, captured at write time.
    pub name: String,
    pub physics: i32,
    pub chemistry: i32,
    pub maths: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
}

impl Marksheet {
    pub fn total(&self) -> i32 {
        marksheet::total(self.physics, self.chemistry, self.maths)
    }

    pub fn percentage(&self) -> f64 {
        marksheet::percentage(self.physics, self.chemistry, self.maths)
    }

    pub fn is_pass(&self) -> bool {
        marksheet::is_pass(self.physics, self.chemistry, self.maths)
    }
}

/// DTO for creating a new marksheet. The student name is resolved on write.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMarksheet {
    pub roll_no: String,
    pub student_id: DbId,
    pub physics: i32,
    pub chemistry: i32,
    pub maths: i32,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarksheetCriteria {
    pub id: Option<DbId>,
    pub roll_no: Option<String>,
    pub name: Option<String>,
    pub student_id: Option<DbId>,
}
