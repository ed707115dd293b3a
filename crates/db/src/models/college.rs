//! College entity model and DTOs.

use campus_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::audit::Audit;

/// A college row from the `colleges` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct College {
    pub id: DbId,
    pub name: String,
    pub address: String,
    pub state: String,
    pub city: String,
    pub phone_no: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
}

/// DTO for creating a new college.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCollege {
    pub name: String,
    pub address: String,
    pub state: String,
    pub city: String,
    pub phone_no: String,
    #[serde(flatten)]
    pub audit: Audit,
}

/// Sparse search criteria. Empty strings and zero ids are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollegeCriteria {
    pub id: Option<DbId>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub phone_no: Option<String>,
}
