//! Repository for the `timetables` table.
//!
//! Every write is gated by the [`ConflictValidator`]: inserts run the
//! three coarse probes, updates only the exact-slot probe.

use campus_core::paging::PageRequest;
use campus_core::timetable::{WriteKind, TIMETABLE_EXISTS};
use campus_core::types::DbId;

use crate::conflict::ConflictValidator;
use crate::error::ModelResult;
use crate::keys::{next_pk, Table};
use crate::models::timetable::{CreateTimetable, Timetable, TimetableCriteria};
use crate::repositories::refs;
use crate::search::SearchFilter;
use crate::tx::{begin_write, settle, Entity};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, course_id, course_name, subject_id, subject_name, \
                                  semester, description, exam_date, exam_time, \
                                  created_by, modified_by, created_datetime, modified_datetime";

const ENTITY: Entity = Entity {
    name: "Timetable",
    duplicate: TIMETABLE_EXISTS,
};

/// Provides CRUD and search operations for exam timetables.
pub struct TimetableRepo;

impl TimetableRepo {
    /// Insert a new timetable entry, returning its allocated id.
    ///
    /// Fails with `DuplicateRecord` when the course already has an exam on
    /// that date, or the subject/semester is already scheduled that day.
    #[tracing::instrument(skip(pool, input), fields(course_id = input.course_id, subject_id = input.subject_id, exam_date = %input.exam_date))]
    pub async fn create(pool: &DbPool, input: &CreateTimetable) -> ModelResult<DbId> {
        let course_name = refs::course_name(pool, input.course_id).await?;
        let subject_name = refs::subject_name(pool, input.subject_id).await?;
        ConflictValidator::validate(pool, WriteKind::Insert, &input.slot(), 0).await?;

        let mut tx = begin_write(pool).await?;
        let outcome = async {
            let pk = next_pk(&mut *tx, Table::Timetables).await?;
            let query = format!(
                "INSERT INTO timetables ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
            );
            sqlx::query(&query)
                .bind(pk)
                .bind(input.course_id)
                .bind(&course_name)
                .bind(input.subject_id)
                .bind(&subject_name)
                .bind(&input.semester)
                .bind(&input.description)
                .bind(input.exam_date)
                .bind(&input.exam_time)
                .bind(&input.audit.created_by)
                .bind(&input.audit.modified_by)
                .bind(input.audit.created_datetime)
                .bind(input.audit.modified_datetime)
                .execute(&mut *tx)
                .await?;
            Ok::<DbId, sqlx::Error>(pk)
        }
        .await;

        let pk = settle(tx, outcome, ENTITY).await?;
        tracing::info!(pk, "Timetable entry created");
        Ok(pk)
    }

    /// Update every mutable field of an entry by id, refreshing course and
    /// subject names.
    ///
    /// Only an exact duplicate of another entry is rejected; an update may
    /// move an entry onto a course/date another entry already occupies.
    #[tracing::instrument(skip(pool, record), fields(id = record.id))]
    pub async fn update(pool: &DbPool, record: &Timetable) -> ModelResult<()> {
        let course_name = refs::course_name(pool, record.course_id).await?;
        let subject_name = refs::subject_name(pool, record.subject_id).await?;
        ConflictValidator::validate(pool, WriteKind::Update, &record.slot(), record.id).await?;

        let mut tx = begin_write(pool).await?;
        let outcome = sqlx::query(
            "UPDATE timetables SET
                course_id = ?, course_name = ?, subject_id = ?, subject_name = ?,
                semester = ?, description = ?, exam_date = ?, exam_time = ?,
                modified_by = ?, modified_datetime = ?
             WHERE id = ?",
        )
        .bind(record.course_id)
        .bind(&course_name)
        .bind(record.subject_id)
        .bind(&subject_name)
        .bind(&record.semester)
        .bind(&record.description)
        .bind(record.exam_date)
        .bind(&record.exam_time)
        .bind(&record.audit.modified_by)
        .bind(record.audit.modified_datetime)
        .bind(record.id)
        .execute(&mut *tx)
        .await
        .map(|_| ());

        settle(tx, outcome, ENTITY).await
    }

    /// Permanently delete an entry by id. Missing ids are a no-op.
    #[tracing::instrument(skip(pool))]
    pub async fn delete(pool: &DbPool, id: DbId) -> ModelResult<()> {
        let mut tx = begin_write(pool).await?;
        let outcome = sqlx::query("DELETE FROM timetables WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map(|r| r.rows_affected());

        let removed = settle(tx, outcome, ENTITY).await?;
        tracing::info!(removed, "Timetable entry deleted");
        Ok(())
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> ModelResult<Option<Timetable>> {
        let query = format!("SELECT {COLUMNS} FROM timetables WHERE id = ?");
        Ok(sqlx::query_as::<_, Timetable>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?)
    }

    pub async fn search(
        pool: &DbPool,
        criteria: Option<&TimetableCriteria>,
        page: PageRequest,
    ) -> ModelResult<Vec<Timetable>> {
        let filter = match criteria {
            Some(c) => SearchFilter::new()
                .id("id", c.id)
                .id("course_id", c.course_id)
                .prefix("course_name", c.course_name.as_deref())
                .id("subject_id", c.subject_id)
                .prefix("subject_name", c.subject_name.as_deref())
                .prefix("semester", c.semester.as_deref())
                .date("exam_date", c.exam_date),
            None => SearchFilter::new(),
        };
        Ok(filter.fetch(pool, Table::Timetables, COLUMNS, page).await?)
    }

    pub async fn list(pool: &DbPool) -> ModelResult<Vec<Timetable>> {
        Self::search(pool, None, PageRequest::unbounded()).await
    }
}
