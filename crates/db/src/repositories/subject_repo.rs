//! Repository for the `subjects` table.

use campus_core::paging::PageRequest;
use campus_core::types::DbId;

use crate::error::{ModelError, ModelResult};
use crate::keys::{next_pk, Table};
use crate::models::subject::{CreateSubject, Subject, SubjectCriteria};
use crate::repositories::refs;
use crate::search::SearchFilter;
use crate::tx::{begin_write, settle, Entity};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, course_id, course_name, description, \
                       created_by, modified_by, created_datetime, modified_datetime";

const ENTITY: Entity = Entity {
    name: "Subject",
    duplicate: "Subject name already exists",
};

/// Provides CRUD and search operations for subjects. Natural key: `name`.
///
/// `course_name` is copied from the referenced course on every write.
pub struct SubjectRepo;

impl SubjectRepo {
    /// Insert a new subject, returning its allocated id.
    #[tracing::instrument(skip(pool, input), fields(name = %input.name, course_id = input.course_id))]
    pub async fn create(pool: &DbPool, input: &CreateSubject) -> ModelResult<DbId> {
        if Self::find_by_name(pool, &input.name).await?.is_some() {
            tracing::warn!("Duplicate subject name");
            return Err(ModelError::duplicate(ENTITY.duplicate));
        }
        let course_name = refs::course_name(pool, input.course_id).await?;

        let mut tx = begin_write(pool).await?;
        let outcome = async {
            let pk = next_pk(&mut *tx, Table::Subjects).await?;
            let query = format!("INSERT INTO subjects ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)");
            sqlx::query(&query)
                .bind(pk)
                .bind(&input.name)
                .bind(input.course_id)
                .bind(&course_name)
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
        tracing::info!(pk, "Subject created");
        Ok(pk)
    }

    /// Update every mutable field of a subject by id.
    ///
    /// The course name is re-read from the current course; the value on
    /// `record` is ignored.
    #[tracing::instrument(skip(pool, record), fields(id = record.id))]
    pub async fn update(pool: &DbPool, record: &Subject) -> ModelResult<()> {
        let course_name = refs::course_name(pool, record.course_id).await?;
        if let Some(existing) = Self::find_by_name(pool, &record.name).await? {
            if existing.id != record.id {
                tracing::warn!(existing_id = existing.id, "Duplicate subject name");
                return Err(ModelError::duplicate(ENTITY.duplicate));
            }
        }

        let mut tx = begin_write(pool).await?;
        let outcome = sqlx::query(
            "UPDATE subjects SET
                name = ?, course_id = ?, course_name = ?, description = ?,
                modified_by = ?, modified_datetime = ?
             WHERE id = ?",
        )
        .bind(&record.name)
        .bind(record.course_id)
        .bind(&course_name)
        .bind(&record.description)
        .bind(&record.audit.modified_by)
        .bind(record.audit.modified_datetime)
        .bind(record.id)
        .execute(&mut *tx)
        .await
        .map(|_| ());

        settle(tx, outcome, ENTITY).await
    }

    /// Permanently delete a subject by id. Missing ids are a no-op.
    #[tracing::instrument(skip(pool))]
    pub async fn delete(pool: &DbPool, id: DbId) -> ModelResult<()> {
        let mut tx = begin_write(pool).await?;
        let outcome = sqlx::query("DELETE FROM subjects WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map(|r| r.rows_affected());

        let removed = settle(tx, outcome, ENTITY).await?;
        tracing::info!(removed, "Subject deleted");
        Ok(())
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> ModelResult<Option<Subject>> {
        let query = format!("SELECT {COLUMNS} FROM subjects WHERE id = ?");
        Ok(sqlx::query_as::<_, Subject>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?)
    }

    pub async fn find_by_name(pool: &DbPool, name: &str) -> ModelResult<Option<Subject>> {
        let query = format!("SELECT {COLUMNS} FROM subjects WHERE name = ?");
        Ok(sqlx::query_as::<_, Subject>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await?)
    }

    pub async fn search(
        pool: &DbPool,
        criteria: Option<&SubjectCriteria>,
        page: PageRequest,
    ) -> ModelResult<Vec<Subject>> {
        let filter = match criteria {
            Some(c) => SearchFilter::new()
                .id("id", c.id)
                .prefix("name", c.name.as_deref())
                .id("course_id", c.course_id)
                .prefix("course_name", c.course_name.as_deref()),
            None => SearchFilter::new(),
        };
        Ok(filter.fetch(pool, Table::Subjects, COLUMNS, page).await?)
    }

    pub async fn list(pool: &DbPool) -> ModelResult<Vec<Subject>> {
        Self::search(pool, None, PageRequest::unbounded()).await
    }
}
