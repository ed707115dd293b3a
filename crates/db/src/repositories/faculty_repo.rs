//! Repository for the `faculty` table.

use campus_core::paging::PageRequest;
use campus_core::types::DbId;

use crate::error::{ModelError, ModelResult};
use crate::keys::{next_pk, Table};
use crate::models::faculty::{CreateFaculty, Faculty, FacultyCriteria};
use crate::repositories::refs;
use crate::search::SearchFilter;
use crate::tx::{begin_write, settle, Entity};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, gender, dob, email, mobile_no, \
                       college_id, college_name, course_id, course_name, subject_id, subject_name, \
                       created_by, modified_by, created_datetime, modified_datetime";

const ENTITY: Entity = Entity {
    name: "Faculty",
    duplicate: "Email already exists",
};

/// Names copied from the college, course and subject a faculty row references.
struct ParentNames {
    college: String,
    course: String,
    subject: String,
}

impl ParentNames {
    async fn resolve(
        pool: &DbPool,
        college_id: DbId,
        course_id: DbId,
        subject_id: DbId,
    ) -> ModelResult<Self> {
        Ok(Self {
            college: refs::college_name(pool, college_id).await?,
            course: refs::course_name(pool, course_id).await?,
            subject: refs::subject_name(pool, subject_id).await?,
        })
    }
}

/// Provides CRUD and search operations for faculty. Natural key: `email`.
pub struct FacultyRepo;

impl FacultyRepo {
    /// Insert a new faculty member, returning the allocated id.
    #[tracing::instrument(skip(pool, input), fields(college_id = input.college_id))]
    pub async fn create(pool: &DbPool, input: &CreateFaculty) -> ModelResult<DbId> {
        if Self::find_by_email(pool, &input.email).await?.is_some() {
            tracing::warn!("Duplicate faculty email");
            return Err(ModelError::duplicate(ENTITY.duplicate));
        }
        let names =
            ParentNames::resolve(pool, input.college_id, input.course_id, input.subject_id).await?;

        let mut tx = begin_write(pool).await?;
        let outcome = async {
            let pk = next_pk(&mut *tx, Table::Faculty).await?;
            let query = format!(
                "INSERT INTO faculty ({COLUMNS})
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
            );
            sqlx::query(&query)
                .bind(pk)
                .bind(&input.first_name)
                .bind(&input.last_name)
                .bind(&input.gender)
                .bind(input.dob)
                .bind(&input.email)
                .bind(&input.mobile_no)
                .bind(input.college_id)
                .bind(&names.college)
                .bind(input.course_id)
                .bind(&names.course)
                .bind(input.subject_id)
                .bind(&names.subject)
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
        tracing::info!(pk, "Faculty created");
        Ok(pk)
    }

    /// Update every mutable field by id, refreshing all three parent names.
    #[tracing::instrument(skip(pool, record), fields(id = record.id))]
    pub async fn update(pool: &DbPool, record: &Faculty) -> ModelResult<()> {
        let names =
            ParentNames::resolve(pool, record.college_id, record.course_id, record.subject_id)
                .await?;
        if let Some(existing) = Self::find_by_email(pool, &record.email).await? {
            if existing.id != record.id {
                tracing::warn!(existing_id = existing.id, "Duplicate faculty email");
                return Err(ModelError::duplicate(ENTITY.duplicate));
            }
        }

        let mut tx = begin_write(pool).await?;
        let outcome = sqlx::query(
            "UPDATE faculty SET
                first_name = ?, last_name = ?, gender = ?, dob = ?, email = ?, mobile_no = ?,
                college_id = ?, college_name = ?, course_id = ?, course_name = ?,
                subject_id = ?, subject_name = ?,
                modified_by = ?, modified_datetime = ?
             WHERE id = ?",
        )
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(&record.gender)
        .bind(record.dob)
        .bind(&record.email)
        .bind(&record.mobile_no)
        .bind(record.college_id)
        .bind(&names.college)
        .bind(record.course_id)
        .bind(&names.course)
        .bind(record.subject_id)
        .bind(&names.subject)
        .bind(&record.audit.modified_by)
        .bind(record.audit.modified_datetime)
        .bind(record.id)
        .execute(&mut *tx)
        .await
        .map(|_| ());

        settle(tx, outcome, ENTITY).await
    }

    /// Permanently delete a faculty member by id. Missing ids are a no-op.
    #[tracing::instrument(skip(pool))]
    pub async fn delete(pool: &DbPool, id: DbId) -> ModelResult<()> {
        let mut tx = begin_write(pool).await?;
        let outcome = sqlx::query("DELETE FROM faculty WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map(|r| r.rows_affected());

        let removed = settle(tx, outcome, ENTITY).await?;
        tracing::info!(removed, "Faculty deleted");
        Ok(())
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> ModelResult<Option<Faculty>> {
        let query = format!("SELECT {COLUMNS} FROM faculty WHERE id = ?");
        Ok(sqlx::query_as::<_, Faculty>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?)
    }

    pub async fn find_by_email(pool: &DbPool, email: &str) -> ModelResult<Option<Faculty>> {
        let query = format!("SELECT {COLUMNS} FROM faculty WHERE email = ?");
        Ok(sqlx::query_as::<_, Faculty>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await?)
    }

    pub async fn search(
        pool: &DbPool,
        criteria: Option<&FacultyCriteria>,
        page: PageRequest,
    ) -> ModelResult<Vec<Faculty>> {
        let filter = match criteria {
            Some(c) => SearchFilter::new()
                .id("id", c.id)
                .prefix("first_name", c.first_name.as_deref())
                .prefix("last_name", c.last_name.as_deref())
                .prefix("email", c.email.as_deref())
                .id("college_id", c.college_id)
                .id("course_id", c.course_id)
                .id("subject_id", c.subject_id),
            None => SearchFilter::new(),
        };
        Ok(filter.fetch(pool, Table::Faculty, COLUMNS, page).await?)
    }

    pub async fn list(pool: &DbPool) -> ModelResult<Vec<Faculty>> {
        Self::search(pool, None, PageRequest::unbounded()).await
    }
}
