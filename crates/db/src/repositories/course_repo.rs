//! Repository for the `courses` table.

use campus_core::paging::PageRequest;
use campus_core::types::DbId;

use crate::error::{ModelError, ModelResult};
use crate::keys::{next_pk, Table};
use crate::models::course::{Course, CourseCriteria, CreateCourse};
use crate::search::SearchFilter;
use crate::tx::{begin_write, settle, Entity};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, duration, description, \
                       created_by, modified_by, created_datetime, modified_datetime";

const ENTITY: Entity = Entity {
    name: "Course",
    duplicate: "Course name already exists",
};

/// Provides CRUD and search operations for courses. Natural key: `name`.
pub struct CourseRepo;

impl CourseRepo {
    /// Insert a new course, returning its allocated id.
    #[tracing::instrument(skip(pool, input), fields(name = %input.name))]
    pub async fn create(pool: &DbPool, input: &CreateCourse) -> ModelResult<DbId> {
        if Self::find_by_name(pool, &input.name).await?.is_some() {
            tracing::warn!("Duplicate course name");
            return Err(ModelError::duplicate(ENTITY.duplicate));
        }

        let mut tx = begin_write(pool).await?;
        let outcome = async {
            let pk = next_pk(&mut *tx, Table::Courses).await?;
            let query = format!("INSERT INTO courses ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)");
            sqlx::query(&query)
                .bind(pk)
                .bind(&input.name)
                .bind(&input.duration)
                .bind(&input.description)
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
        tracing::info!(pk, "Course created");
        Ok(pk)
    }

    /// Update every mutable field of a course by id.
    #[tracing::instrument(skip(pool, record), fields(id = record.id))]
    pub async fn update(pool: &DbPool, record: &Course) -> ModelResult<()> {
        if let Some(existing) = Self::find_by_name(pool, &record.name).await? {
            if existing.id != record.id {
                tracing::warn!(existing_id = existing.id, "Duplicate course name");
                return Err(ModelError::duplicate(ENTITY.duplicate));
            }
        }

        let mut tx = begin_write(pool).await?;
        let outcome = sqlx::query(
            "UPDATE courses SET
                name = ?, duration = ?, description = ?,
                modified_by = ?, modified_datetime = ?
             WHERE id = ?",
        )
        .bind(&record.name)
        .bind(&record.duration)
        .bind(&record.description)
        .bind(&record.audit.modified_by)
        .bind(record.audit.modified_datetime)
        .bind(record.id)
        .execute(&mut *tx)
        .await
        .map(|_| ());

        settle(tx, outcome, ENTITY).await
    }

    /// Permanently delete a course by id. Missing ids are a no-op.
    #[tracing::instrument(skip(pool))]
    pub async fn delete(pool: &DbPool, id: DbId) -> ModelResult<()> {
        let mut tx = begin_write(pool).await?;
        let outcome = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map(|r| r.rows_affected());

        let removed = settle(tx, outcome, ENTITY).await?;
        tracing::info!(removed, "Course deleted");
        Ok(())
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> ModelResult<Option<Course>> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = ?");
        Ok(sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?)
    }

    pub async fn find_by_name(pool: &DbPool, name: &str) -> ModelResult<Option<Course>> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE name = ?");
        Ok(sqlx::query_as::<_, Course>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await?)
    }

    pub async fn search(
        pool: &DbPool,
        criteria: Option<&CourseCriteria>,
        page: PageRequest,
    ) -> ModelResult<Vec<Course>> {
        let filter = match criteria {
            Some(c) => SearchFilter::new()
                .id("id", c.id)
                .prefix("name", c.name.as_deref())
                .prefix("duration", c.duration.as_deref())
                .prefix("description", c.description.as_deref()),
            None => SearchFilter::new(),
        };
        Ok(filter.fetch(pool, Table::Courses, COLUMNS, page).await?)
    }

    pub async fn list(pool: &DbPool) -> ModelResult<Vec<Course>> {
        Self::search(pool, None, PageRequest::unbounded()).await
    }
}
