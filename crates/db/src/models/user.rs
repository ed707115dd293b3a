//! User entity model and DTOs.

use campus_core::roles::RoleKind;
use campus_core::types::{Date, DbId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::audit::Audit;

/// Full user row from the `users` table.
///
/// The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub login: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub dob: Option<Date>,
    pub mobile_no: String,
    pub role_id: DbId,
    pub gender: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
}

impl User {
    pub fn role(&self) -> Option<RoleKind> {
        RoleKind::try_from(self.role_id).ok()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// DTO for creating a new user. `password` is plaintext and hashed on write.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub login: String,
    pub password: String,
    pub dob: Option<Date>,
    pub mobile_no: String,
    pub role_id: DbId,
    pub gender: String,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserCriteria {
    pub id: Option<DbId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub login: Option<String>,
    pub role_id: Option<DbId>,
    pub dob: Option<Date>,
}
