//! Repository for the `colleges` table.

use campus_core::paging::PageRequest;
use campus_core::types::DbId;

use crate::error::{ModelError, ModelResult};
use crate::keys::{next_pk, Table};
use crate::models::college::{College, CollegeCriteria, CreateCollege};
use crate::search::SearchFilter;
use crate::tx::{begin_write, settle, Entity};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, address, state, city, phone_no, \
                       created_by, modified_by, created_datetime, modified_datetime";

const ENTITY: Entity = Entity {
    name: "College",
    duplicate: "College name already exists",
};

/// Provides CRUD and search operations for colleges. Natural key: `name`.
pub struct CollegeRepo;

impl CollegeRepo {
    /// Insert a new college, returning its allocated id.
    #[tracing::instrument(skip(pool, input), fields(name = %input.name))]
    pub async fn create(pool: &DbPool, input: &CreateCollege) -> ModelResult<DbId> {
        if Self::find_by_name(pool, &input.name).await?.is_some() {
            tracing::warn!("Duplicate college name");
            return Err(ModelError::duplicate(ENTITY.duplicate));
        }

        let mut tx = begin_write(pool).await?;
        let outcome = async {
            let pk = next_pk(&mut *tx, Table::Colleges).await?;
            let query = format!("INSERT INTO colleges ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)");
            sqlx::query(&query)
                .bind(pk)
                .bind(&input.name)
                .bind(&input.address)
                .bind(&input.state)
                .bind(&input.city)
                .bind(&input.phone_no)
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
        tracing::info!(pk, "College created");
        Ok(pk)
    }

    /// Update every mutable field of a college by id.
    ///
    /// Fails with `DuplicateRecord` when another college already has the name.
    #[tracing::instrument(skip(pool, record), fields(id = record.id))]
    pub async fn update(pool: &DbPool, record: &College) -> ModelResult<()> {
        if let Some(existing) = Self::find_by_name(pool, &record.name).await? {
            if existing.id != record.id {
                tracing::warn!(existing_id = existing.id, "Duplicate college name");
                return Err(ModelError::duplicate(ENTITY.duplicate));
            }
        }

        let mut tx = begin_write(pool).await?;
        let outcome = sqlx::query(
            "UPDATE colleges SET
                name = ?, address = ?, state = ?, city = ?, phone_no = ?,
                modified_by = ?, modified_datetime = ?
             WHERE id = ?",
        )
        .bind(&record.name)
        .bind(&record.address)
        .bind(&record.state)
        .bind(&record.city)
        .bind(&record.phone_no)
        .bind(&record.audit.modified_by)
        .bind(record.audit.modified_datetime)
        .bind(record.id)
        .execute(&mut *tx)
        .await
        .map(|_| ());

        settle(tx, outcome, ENTITY).await
    }

    /// Permanently delete a college by id. Missing ids are a no-op.
    #[tracing::instrument(skip(pool))]
    pub async fn delete(pool: &DbPool, id: DbId) -> ModelResult<()> {
        let mut tx = begin_write(pool).await?;
        let outcome = sqlx::query("DELETE FROM colleges WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map(|r| r.rows_affected());

        let removed = settle(tx, outcome, ENTITY).await?;
        tracing::info!(removed, "College deleted");
        Ok(())
    }

    /// Find a college by its id.
    pub async fn find_by_id(pool: &DbPool, id: DbId) -> ModelResult<Option<College>> {
        let query = format!("SELECT {COLUMNS} FROM colleges WHERE id = ?");
        Ok(sqlx::query_as::<_, College>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?)
    }

    /// Find a college by exact name.
    pub async fn find_by_name(pool: &DbPool, name: &str) -> ModelResult<Option<College>> {
        let query = format!("SELECT {COLUMNS} FROM colleges WHERE name = ?");
        Ok(sqlx::query_as::<_, College>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await?)
    }

    /// Search by criteria (prefix match on text, exact on ids), one page at a time.
    pub async fn search(
        pool: &DbPool,
        criteria: Option<&CollegeCriteria>,
        page: PageRequest,
    ) -> ModelResult<Vec<College>> {
        let filter = match criteria {
            Some(c) => SearchFilter::new()
                .id("id", c.id)
                .prefix("name", c.name.as_deref())
                .prefix("address", c.address.as_deref())
                .prefix("state", c.state.as_deref())
                .prefix("city", c.city.as_deref())
                .prefix("phone_no", c.phone_no.as_deref()),
            None => SearchFilter::new(),
        };
        Ok(filter.fetch(pool, Table::Colleges, COLUMNS, page).await?)
    }

    /// List every college ordered by id.
    pub async fn list(pool: &DbPool) -> ModelResult<Vec<College>> {
        Self::search(pool, None, PageRequest::unbounded()).await
    }
}
