//! Timetable entity model and DTOs.

use campus_core::types::{Date, DbId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::audit::Audit;

/// An exam slot row from the `timetables` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Timetable {
    pub id: DbId,
    pub course_id: DbId,
    pub course_name: String,
    pub subject_id: DbId,
    pub subject_name: String,
    /// Semester label, e.g. `"3rd"`.
    pub semester: String,
    pub description: String,
    pub exam_date: Date,
    /// Free text, e.g. `"10:00 AM to 1:00 PM"`.
    pub exam_time: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
}

impl Timetable {
    pub fn slot(&self) -> TimetableSlot {
        TimetableSlot {
            course_id: self.course_id,
            subject_id: self.subject_id,
            semester: self.semester.clone(),
            exam_date: self.exam_date,
            exam_time: self.exam_time.clone(),
            description: self.description.clone(),
        }
    }
}

/// DTO for creating a new timetable entry. Names are resolved on write.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTimetable {
    pub course_id: DbId,
    pub subject_id: DbId,
    pub semester: String,
    pub description: String,
    pub exam_date: Date,
    pub exam_time: String,
    #[serde(flatten)]
    pub audit: Audit,
}

impl CreateTimetable {
    pub fn slot(&self) -> TimetableSlot {
        TimetableSlot {
            course_id: self.course_id,
            subject_id: self.subject_id,
            semester: self.semester.clone(),
            exam_date: self.exam_date,
            exam_time: self.exam_time.clone(),
            description: self.description.clone(),
        }
    }
}

/// The fields the conflict probes match on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableSlot {
    pub course_id: DbId,
    pub subject_id: DbId,
    pub semester: String,
    pub exam_date: Date,
    pub exam_time: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimetableCriteria {
    pub id: Option<DbId>,
    pub course_id: Option<DbId>,
    pub course_name: Option<String>,
    pub subject_id: Option<DbId>,
    pub subject_name: Option<String>,
    pub semester: Option<String>,
    pub exam_date: Option<Date>,
}
