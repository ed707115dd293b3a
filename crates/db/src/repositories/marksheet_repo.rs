//! Repository for the `marksheets` table.

use campus_core::marksheet::PASS_MARK;
use campus_core::paging::{PageRequest, Window};
use campus_core::types::DbId;
use sqlx::{QueryBuilder, Sqlite};

use crate::error::{ModelError, ModelResult};
use crate::keys::{next_pk, Table};
use crate::models::marksheet::{CreateMarksheet, Marksheet, MarksheetCriteria};
use crate::repositories::refs;
use crate::search::SearchFilter;
use crate::tx::{begin_write, settle, Entity};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, roll_no, student_id, name, physics, chemistry, maths, \
                       created_by, modified_by, created_datetime, modified_datetime";

const ENTITY: Entity = Entity {
    name: "Marksheet",
    duplicate: "Roll number already exists",
};

/// Provides CRUD, search and merit-list operations for marksheets.
/// Natural key: `roll_no`.
pub struct MarksheetRepo;

impl MarksheetRepo {
    /// Insert a new marksheet, returning its allocated id.
    #[tracing::instrument(skip(pool, input), fields(roll_no = %input.roll_no, student_id = input.student_id))]
    pub async fn create(pool: &DbPool, input: &CreateMarksheet) -> ModelResult<DbId> {
        if Self::find_by_roll_no(pool, &input.roll_no).await?.is_some() {
            tracing::warn!("Duplicate roll number");
            return Err(ModelError::duplicate(ENTITY.duplicate));
        }
        let name = refs::student_name(pool, input.student_id).await?;

        let mut tx = begin_write(pool).await?;
        let outcome = async {
            let pk = next_pk(&mut *tx, Table::Marksheets).await?;
            let query =
                format!("INSERT INTO marksheets ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)");
            sqlx::query(&query)
                .bind(pk)
                .bind(&input.roll_no)
                .bind(input.student_id)
                .bind(&name)
                .bind(input.physics)
                .bind(input.chemistry)
                .bind(input.maths)
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
        tracing::info!(pk, "Marksheet created");
        Ok(pk)
    }

    /// Update every mutable field by id, refreshing the student name.
    #[tracing::instrument(skip(pool, record), fields(id = record.id))]
    pub async fn update(pool: &DbPool, record: &Marksheet) -> ModelResult<()> {
        let name = refs::student_name(pool, record.student_id).await?;
        if let Some(existing) = Self::find_by_roll_no(pool, &record.roll_no).await? {
            if existing.id != record.id {
                tracing::warn!(existing_id = existing.id, "Duplicate roll number");
                return Err(ModelError::duplicate(ENTITY.duplicate));
            }
        }

        let mut tx = begin_write(pool).await?;
        let outcome = sqlx::query(
            "UPDATE marksheets SET
                roll_no = ?, student_id = ?, name = ?,
                physics = ?, chemistry = ?, maths = ?,
                modified_by = ?, modified_datetime = ?
             WHERE id = ?",
        )
        .bind(&record.roll_no)
        .bind(record.student_id)
        .bind(&name)
        .bind(record.physics)
        .bind(record.chemistry)
        .bind(record.maths)
        .bind(&record.audit.modified_by)
        .bind(record.audit.modified_datetime)
        .bind(record.id)
        .execute(&mut *tx)
        .await
        .map(|_| ());

        settle(tx, outcome, ENTITY).await
    }

    /// Permanently delete a marksheet by id. Missing ids are a no-op.
    #[tracing::instrument(skip(pool))]
    pub async fn delete(pool: &DbPool, id: DbId) -> ModelResult<()> {
        let mut tx = begin_write(pool).await?;
        let outcome = sqlx::query("DELETE FROM marksheets WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map(|r| r.rows_affected());

        let removed = settle(tx, outcome, ENTITY).await?;
        tracing::info!(removed, "Marksheet deleted");
        Ok(())
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> ModelResult<Option<Marksheet>> {
        let query = format!("SELECT {COLUMNS} FROM marksheets WHERE id = ?");
        Ok(sqlx::query_as::<_, Marksheet>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?)
    }

    pub async fn find_by_roll_no(pool: &DbPool, roll_no: &str) -> ModelResult<Option<Marksheet>> {
        let query = format!("SELECT {COLUMNS} FROM marksheets WHERE roll_no = ?");
        Ok(sqlx::query_as::<_, Marksheet>(&query)
            .bind(roll_no)
            .fetch_optional(pool)
            .await?)
    }

    pub async fn search(
        pool: &DbPool,
        criteria: Option<&MarksheetCriteria>,
        page: PageRequest,
    ) -> ModelResult<Vec<Marksheet>> {
        let filter = match criteria {
            Some(c) => SearchFilter::new()
                .id("id", c.id)
                .prefix("roll_no", c.roll_no.as_deref())
                .prefix("name", c.name.as_deref())
                .id("student_id", c.student_id),
            None => SearchFilter::new(),
        };
        Ok(filter.fetch(pool, Table::Marksheets, COLUMNS, page).await?)
    }

    pub async fn list(pool: &DbPool) -> ModelResult<Vec<Marksheet>> {
        Self::search(pool, None, PageRequest::unbounded()).await
    }

    /// Passed marksheets ranked by total marks, highest first; ties by id.
    pub async fn merit_list(pool: &DbPool, page: PageRequest) -> ModelResult<Vec<Marksheet>> {
        let window = page.window();
        if window == Window::Empty {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM marksheets WHERE physics >= "));
        qb.push_bind(PASS_MARK)
            .push(" AND chemistry >= ")
            .push_bind(PASS_MARK)
            .push(" AND maths >= ")
            .push_bind(PASS_MARK)
            .push(" ORDER BY (physics + chemistry + maths) DESC, id ASC");
        if let Window::Slice { limit, offset } = window {
            qb.push(" LIMIT ").push_bind(limit).push(" OFFSET ").push_bind(offset);
        }

        Ok(qb.build_query_as::<Marksheet>().fetch_all(pool).await?)
    }
}
