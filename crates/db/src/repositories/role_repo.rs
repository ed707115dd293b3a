//! Repository for the `roles` table.

use campus_core::paging::PageRequest;
use campus_core::roles::RoleKind;
use campus_core::types::{DbId, Timestamp};

use crate::error::{ModelError, ModelResult};
use crate::keys::{next_pk, Table};
use crate::models::role::{CreateRole, Role, RoleCriteria};
use crate::search::SearchFilter;
use crate::tx::{begin_write, settle, Entity};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, \
                       created_by, modified_by, created_datetime, modified_datetime";

const ENTITY: Entity = Entity {
    name: "Role",
    duplicate: "Role already exists",
};

/// Provides CRUD and search operations for roles. Natural key: `name`.
pub struct RoleRepo;

impl RoleRepo {
    /// Insert a new role, returning its allocated id.
    #[tracing::instrument(skip(pool, input), fields(name = %input.name))]
    pub async fn create(pool: &DbPool, input: &CreateRole) -> ModelResult<DbId> {
        if Self::find_by_name(pool, &input.name).await?.is_some() {
            tracing::warn!("Duplicate role name");
            return Err(ModelError::duplicate(ENTITY.duplicate));
        }

        let mut tx = begin_write(pool).await?;
        let outcome = async {
            let pk = next_pk(&mut *tx, Table::Roles).await?;
            let query = format!("INSERT INTO roles ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)");
            sqlx::query(&query)
                .bind(pk)
                .bind(&input.name)
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
        tracing::info!(pk, "Role created");
        Ok(pk)
    }

    /// Insert every [`RoleKind`] under its fixed id, skipping rows that
    /// already hold exactly that id and name.
    ///
    /// Returns the number of roles inserted. A well-known id held by another
    /// name, or a well-known name held by another id, is an `Application`
    /// error and nothing is written.
    #[tracing::instrument(skip(pool))]
    pub async fn seed_well_known(pool: &DbPool, actor: &str, at: Timestamp) -> ModelResult<u64> {
        let mut tx = begin_write(pool).await?;
        let outcome = async {
            for kind in RoleKind::ALL {
                let holders: Vec<(DbId, String)> =
                    sqlx::query_as("SELECT id, name FROM roles WHERE id = ? OR name = ?")
                        .bind(kind.id())
                        .bind(kind.name())
                        .fetch_all(&mut *tx)
                        .await?;
                if let Some((id, name)) = holders
                    .into_iter()
                    .find(|(id, name)| *id != kind.id() || name != kind.name())
                {
                    return Ok(Err(format!(
                        "Role {} '{}' conflicts with existing role {id} '{name}'",
                        kind.id(),
                        kind.name()
                    )));
                }
            }

            let query = format!(
                "INSERT INTO roles ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?) \
                 ON CONFLICT(id) DO NOTHING"
            );
            let mut inserted = 0;
            for kind in RoleKind::ALL {
                inserted += sqlx::query(&query)
                    .bind(kind.id())
                    .bind(kind.name())
                    .bind(kind.description())
                    .bind(actor)
                    .bind(actor)
                    .bind(at)
                    .bind(at)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected();
            }
            Ok::<Result<u64, String>, sqlx::Error>(Ok(inserted))
        }
        .await;

        let inserted = settle(tx, outcome, ENTITY).await?.map_err(|conflict| {
            tracing::error!(%conflict, "Well-known role slot taken");
            ModelError::application(conflict)
        })?;
        tracing::info!(inserted, "Seeded well-known roles");
        Ok(inserted)
    }

    /// Update every mutable field of a role by id.
    #[tracing::instrument(skip(pool, record), fields(id = record.id))]
    pub async fn update(pool: &DbPool, record: &Role) -> ModelResult<()> {
        if let Some(existing) = Self::find_by_name(pool, &record.name).await? {
            if existing.id != record.id {
                tracing::warn!(existing_id = existing.id, "Duplicate role name");
                return Err(ModelError::duplicate(ENTITY.duplicate));
            }
        }

        let mut tx = begin_write(pool).await?;
        let outcome = sqlx::query(
            "UPDATE roles SET
                name = ?, description = ?,
                modified_by = ?, modified_datetime = ?
             WHERE id = ?",
        )
        .bind(&record.name)
        .bind(&record.description)
        .bind(&record.audit.modified_by)
        .bind(record.audit.modified_datetime)
        .bind(record.id)
        .execute(&mut *tx)
        .await
        .map(|_| ());

        settle(tx, outcome, ENTITY).await
    }

    /// Permanently delete a role by id. Missing ids are a no-op.
    #[tracing::instrument(skip(pool))]
    pub async fn delete(pool: &DbPool, id: DbId) -> ModelResult<()> {
        let mut tx = begin_write(pool).await?;
        let outcome = sqlx::query("DELETE FROM roles WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map(|r| r.rows_affected());

        let removed = settle(tx, outcome, ENTITY).await?;
        tracing::info!(removed, "Role deleted");
        Ok(())
    }

    /// Find a role by its id.
    pub async fn find_by_id(pool: &DbPool, id: DbId) -> ModelResult<Option<Role>> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE id = ?");
        Ok(sqlx::query_as::<_, Role>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?)
    }

    /// Find a role by name (case-sensitive).
    pub async fn find_by_name(pool: &DbPool, name: &str) -> ModelResult<Option<Role>> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE name = ?");
        Ok(sqlx::query_as::<_, Role>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await?)
    }

    pub async fn search(
        pool: &DbPool,
        criteria: Option<&RoleCriteria>,
        page: PageRequest,
    ) -> ModelResult<Vec<Role>> {
        let filter = match criteria {
            Some(c) => SearchFilter::new()
                .id("id", c.id)
                .prefix("name", c.name.as_deref())
                .prefix("description", c.description.as_deref()),
            None => SearchFilter::new(),
        };
        Ok(filter.fetch(pool, Table::Roles, COLUMNS, page).await?)
    }

    /// List all roles ordered by id ascending.
    pub async fn list(pool: &DbPool) -> ModelResult<Vec<Role>> {
        Self::search(pool, None, PageRequest::unbounded()).await
    }
}
