//! Repository for the `users` table.
//!
//! Besides CRUD this carries the credential flows (authenticate, change
//! and reset password). Those are the only operations that report
//! `RecordNotFound`; generic CRUD reports absence as `None`.

use campus_core::paging::PageRequest;
use campus_core::password::{generate_temp_password, hash_password, verify_password};
use campus_core::roles::RoleKind;
use campus_core::types::{DbId, Timestamp};

use crate::error::{ModelError, ModelResult};
use crate::keys::{next_pk, Table};
use crate::models::user::{CreateUser, User, UserCriteria};
use crate::repositories::refs;
use crate::search::SearchFilter;
use crate::tx::{begin_write, settle, Entity};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, login, password_hash, dob, mobile_no, \
                       role_id, gender, \
                       created_by, modified_by, created_datetime, modified_datetime";

const ENTITY: Entity = Entity {
    name: "User",
    duplicate: "Login Id already exists",
};

fn hash(password: &str) -> ModelResult<String> {
    hash_password(password).map_err(|e| ModelError::application(e.to_string()))
}

/// Provides CRUD, search and credential operations for users. Natural key: `login`.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning its allocated id. The password is hashed.
    #[tracing::instrument(skip(pool, input), fields(login = %input.login, role_id = input.role_id))]
    pub async fn create(pool: &DbPool, input: &CreateUser) -> ModelResult<DbId> {
        if Self::find_by_login(pool, &input.login).await?.is_some() {
            tracing::warn!("Duplicate login");
            return Err(ModelError::duplicate(ENTITY.duplicate));
        }
        refs::ensure_role(pool, input.role_id).await?;
        let password_hash = hash(&input.password)?;

        let mut tx = begin_write(pool).await?;
        let outcome = async {
            let pk = next_pk(&mut *tx, Table::Users).await?;
            let query = format!(
                "INSERT INTO users ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
            );
            sqlx::query(&query)
                .bind(pk)
                .bind(&input.first_name)
                .bind(&input.last_name)
                .bind(&input.login)
                .bind(&password_hash)
                .bind(input.dob)
                .bind(&input.mobile_no)
                .bind(input.role_id)
                .bind(&input.gender)
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
        tracing::info!(pk, "User created");
        Ok(pk)
    }

    /// Self-registration: create the user with the student role.
    pub async fn register(pool: &DbPool, input: &CreateUser) -> ModelResult<DbId> {
        let input = CreateUser {
            role_id: RoleKind::Student.id(),
            ..input.clone()
        };
        Self::create(pool, &input).await
    }

    /// Update every mutable profile field by id. The password is untouched;
    /// use [`UserRepo::change_password`] or [`UserRepo::reset_password`].
    #[tracing::instrument(skip(pool, record), fields(id = record.id))]
    pub async fn update(pool: &DbPool, record: &User) -> ModelResult<()> {
        refs::ensure_role(pool, record.role_id).await?;
        if let Some(existing) = Self::find_by_login(pool, &record.login).await? {
            if existing.id != record.id {
                tracing::warn!(existing_id = existing.id, "Duplicate login");
                return Err(ModelError::duplicate(ENTITY.duplicate));
            }
        }

        let mut tx = begin_write(pool).await?;
        let outcome = sqlx::query(
            "UPDATE users SET
                first_name = ?, last_name = ?, login = ?, dob = ?, mobile_no = ?,
                role_id = ?, gender = ?,
                modified_by = ?, modified_datetime = ?
             WHERE id = ?",
        )
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(&record.login)
        .bind(record.dob)
        .bind(&record.mobile_no)
        .bind(record.role_id)
        .bind(&record.gender)
        .bind(&record.audit.modified_by)
        .bind(record.audit.modified_datetime)
        .bind(record.id)
        .execute(&mut *tx)
        .await
        .map(|_| ());

        settle(tx, outcome, ENTITY).await
    }

    /// Permanently delete a user by id. Missing ids are a no-op.
    #[tracing::instrument(skip(pool))]
    pub async fn delete(pool: &DbPool, id: DbId) -> ModelResult<()> {
        let mut tx = begin_write(pool).await?;
        let outcome = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map(|r| r.rows_affected());

        let removed = settle(tx, outcome, ENTITY).await?;
        tracing::info!(removed, "User deleted");
        Ok(())
    }

    /// Find a user by internal id.
    pub async fn find_by_id(pool: &DbPool, id: DbId) -> ModelResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ?");
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?)
    }

    /// Find a user by login (case-sensitive).
    pub async fn find_by_login(pool: &DbPool, login: &str) -> ModelResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE login = ?");
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(login)
            .fetch_optional(pool)
            .await?)
    }

    pub async fn search(
        pool: &DbPool,
        criteria: Option<&UserCriteria>,
        page: PageRequest,
    ) -> ModelResult<Vec<User>> {
        let filter = match criteria {
            Some(c) => SearchFilter::new()
                .id("id", c.id)
                .prefix("first_name", c.first_name.as_deref())
                .prefix("last_name", c.last_name.as_deref())
                .prefix("login", c.login.as_deref())
                .id("role_id", c.role_id)
                .date("dob", c.dob),
            None => SearchFilter::new(),
        };
        Ok(filter.fetch(pool, Table::Users, COLUMNS, page).await?)
    }

    pub async fn list(pool: &DbPool) -> ModelResult<Vec<User>> {
        Self::search(pool, None, PageRequest::unbounded()).await
    }

    /// Check a login/password pair. A wrong password or unknown login is `None`.
    #[tracing::instrument(skip(pool, password))]
    pub async fn authenticate(
        pool: &DbPool,
        login: &str,
        password: &str,
    ) -> ModelResult<Option<User>> {
        let Some(user) = Self::find_by_login(pool, login).await? else {
            return Ok(None);
        };
        let matches = verify_password(password, &user.password_hash)
            .map_err(|e| ModelError::application(e.to_string()))?;
        if !matches {
            tracing::debug!("Password mismatch");
            return Ok(None);
        }
        Ok(Some(user))
    }

    /// Replace a user's password after checking the old one. `actor` and
    /// `at` are stamped into the modification audit fields.
    ///
    /// Unknown users and a mismatched old password are `RecordNotFound`.
    #[tracing::instrument(skip(pool, old_password, new_password))]
    pub async fn change_password(
        pool: &DbPool,
        id: DbId,
        old_password: &str,
        new_password: &str,
        actor: &str,
        at: Timestamp,
    ) -> ModelResult<()> {
        let user = Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| ModelError::not_found("User does not exist"))?;
        let matches = verify_password(old_password, &user.password_hash)
            .map_err(|e| ModelError::application(e.to_string()))?;
        if !matches {
            return Err(ModelError::not_found("Old password is invalid"));
        }

        let password_hash = hash(new_password)?;
        Self::store_password(pool, id, &password_hash, actor, at).await
    }

    /// Replace the password of `login` with a generated temporary password
    /// and return it for delivery to the user.
    #[tracing::instrument(skip(pool))]
    pub async fn reset_password(
        pool: &DbPool,
        login: &str,
        actor: &str,
        at: Timestamp,
    ) -> ModelResult<String> {
        let user = Self::find_by_login(pool, login)
            .await?
            .ok_or_else(|| ModelError::not_found("Login Id does not exist"))?;

        let temp = generate_temp_password();
        let password_hash = hash(&temp)?;
        Self::store_password(pool, user.id, &password_hash, actor, at).await?;
        tracing::info!(id = user.id, "Password reset");
        Ok(temp)
    }

    async fn store_password(
        pool: &DbPool,
        id: DbId,
        password_hash: &str,
        actor: &str,
        at: Timestamp,
    ) -> ModelResult<()> {
        let mut tx = begin_write(pool).await?;
        let outcome = sqlx::query(
            "UPDATE users SET password_hash = ?, modified_by = ?, modified_datetime = ?
             WHERE id = ?",
        )
        .bind(password_hash)
        .bind(actor)
        .bind(at)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map(|_| ());

        settle(tx, outcome, ENTITY).await
    }
}
