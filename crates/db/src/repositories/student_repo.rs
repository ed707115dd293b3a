//! Repository for the `students` table.

use campus_core::paging::PageRequest;
use campus_core::types::DbId;

use crate::error::{ModelError, ModelResult};
use crate::keys::{next_pk, Table};
use crate::models::student::{CreateStudent, Student, StudentCriteria};
use crate::repositories::refs;
use crate::search::SearchFilter;
use crate::tx::{begin_write, settle, Entity};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, dob, gender, mobile_no, email, \
                       college_id, college_name, \
                       created_by, modified_by, created_datetime, modified_datetime";

const ENTITY: Entity = Entity {
    name: "Student",
    duplicate: "Email already exists",
};

/// Provides CRUD and search operations for students. Natural key: `email`.
pub struct StudentRepo;

impl StudentRepo {
    /// Insert a new student, returning its allocated id.
    #[tracing::instrument(skip(pool, input), fields(college_id = input.college_id))]
    pub async fn create(pool: &DbPool, input: &CreateStudent) -> ModelResult<DbId> {
        if Self::find_by_email(pool, &input.email).await?.is_some() {
            tracing::warn!("Duplicate student email");
            return Err(ModelError::duplicate(ENTITY.duplicate));
        }
        let college_name = refs::college_name(pool, input.college_id).await?;

        let mut tx = begin_write(pool).await?;
        let outcome = async {
            let pk = next_pk(&mut *tx, Table::Students).await?;
            let query = format!(
                "INSERT INTO students ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
            );
            sqlx::query(&query)
                .bind(pk)
                .bind(&input.first_name)
                .bind(&input.last_name)
                .bind(input.dob)
                .bind(&input.gender)
                .bind(&input.mobile_no)
                .bind(&input.email)
                .bind(input.college_id)
                .bind(&college_name)
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
        tracing::info!(pk, "Student created");
        Ok(pk)
    }

    /// Update every mutable field of a student by id, refreshing the college name.
    #[tracing::instrument(skip(pool, record), fields(id = record.id))]
    pub async fn update(pool: &DbPool, record: &Student) -> ModelResult<()> {
        let college_name = refs::college_name(pool, record.college_id).await?;
        if let Some(existing) = Self::find_by_email(pool, &record.email).await? {
            if existing.id != record.id {
                tracing::warn!(existing_id = existing.id, "Duplicate student email");
                return Err(ModelError::duplicate(ENTITY.duplicate));
            }
        }

        let mut tx = begin_write(pool).await?;
        let outcome = sqlx::query(
            "UPDATE students SET
                first_name = ?, last_name = ?, dob = ?, gender = ?, mobile_no = ?,
                email = ?, college_id = ?, college_name = ?,
                modified_by = ?, modified_datetime = ?
             WHERE id = ?",
        )
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(record.dob)
        .bind(&record.gender)
        .bind(&record.mobile_no)
        .bind(&record.email)
        .bind(record.college_id)
        .bind(&college_name)
        .bind(&record.audit.modified_by)
        .bind(record.audit.modified_datetime)
        .bind(record.id)
        .execute(&mut *tx)
        .await
        .map(|_| ());

        settle(tx, outcome, ENTITY).await
    }

    /// Permanently delete a student by id. Missing ids are a no-op.
    #[tracing::instrument(skip(pool))]
    pub async fn delete(pool: &DbPool, id: DbId) -> ModelResult<()> {
        let mut tx = begin_write(pool).await?;
        let outcome = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map(|r| r.rows_affected());

        let removed = settle(tx, outcome, ENTITY).await?;
        tracing::info!(removed, "Student deleted");
        Ok(())
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> ModelResult<Option<Student>> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE id = ?");
        Ok(sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?)
    }

    /// Find a student by email (case-sensitive).
    pub async fn find_by_email(pool: &DbPool, email: &str) -> ModelResult<Option<Student>> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE email = ?");
        Ok(sqlx::query_as::<_, Student>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await?)
    }

    pub async fn search(
        pool: &DbPool,
        criteria: Option<&StudentCriteria>,
        page: PageRequest,
    ) -> ModelResult<Vec<Student>> {
        let filter = match criteria {
            Some(c) => SearchFilter::new()
                .id("id", c.id)
                .prefix("first_name", c.first_name.as_deref())
                .prefix("last_name", c.last_name.as_deref())
                .prefix("email", c.email.as_deref())
                .id("college_id", c.college_id)
                .prefix("college_name", c.college_name.as_deref()),
            None => SearchFilter::new(),
        };
        Ok(filter.fetch(pool, Table::Students, COLUMNS, page).await?)
    }

    pub async fn list(pool: &DbPool) -> ModelResult<Vec<Student>> {
        Self::search(pool, None, PageRequest::unbounded()).await
    }
}
