//! Role entity model and DTOs.

use campus_core::roles::RoleKind;
use campus_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::audit::Audit;

/// A role row from the `roles` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub description: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
}

impl Role {
    /// The well-known role this row corresponds to, if any. Both the id and
    /// the name must match.
    pub fn kind(&self) -> Option<RoleKind> {
        RoleKind::try_from(self.id)
            .ok()
            .filter(|kind| kind.name() == self.name)
    }
}

/// DTO for creating a new role.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRole {
    pub name: String,
    pub description: String,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleCriteria {
    pub id: Option<DbId>,
    pub name: Option<String>,
    pub description: Option<String>,
}
