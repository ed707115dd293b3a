//! Resolution of referenced records for denormalized names.
//!
//! Names are read from the parent record at write time and copied into the
//! child row. Later renames of the parent are not propagated.

use campus_core::types::DbId;

use crate::error::{ModelError, ModelResult};
use crate::repositories::{CollegeRepo, CourseRepo, RoleRepo, StudentRepo, SubjectRepo};
use crate::DbPool;

fn missing(entity: &str, id: DbId) -> ModelError {
    ModelError::application(format!("{entity} with id {id} does not exist"))
}

pub(crate) async fn college_name(pool: &DbPool, id: DbId) -> ModelResult<String> {
    CollegeRepo::find_by_id(pool, id)
        .await?
        .map(|c| c.name)
        .ok_or_else(|| missing("College", id))
}

pub(crate) async fn course_name(pool: &DbPool, id: DbId) -> ModelResult<String> {
    CourseRepo::find_by_id(pool, id)
        .await?
        .map(|c| c.name)
        .ok_or_else(|| missing("Course", id))
}

pub(crate) async fn subject_name(pool: &DbPool, id: DbId) -> ModelResult<String> {
    SubjectRepo::find_by_id(pool, id)
        .await?
        .map(|s| s.name)
        .ok_or_else(|| missing("Subject", id))
}

/// Full name of a student, as printed on a marksheet.
pub(crate) async fn student_name(pool: &DbPool, id: DbId) -> ModelResult<String> {
    StudentRepo::find_by_id(pool, id)
        .await?
        .map(|s| s.full_name())
        .ok_or_else(|| missing("Student", id))
}

pub(crate) async fn ensure_role(pool: &DbPool, id: DbId) -> ModelResult<()> {
    match RoleRepo::find_by_id(pool, id).await? {
        Some(_) => Ok(()),
        None => Err(missing("Role", id)),
    }
}
