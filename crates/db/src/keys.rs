//! Primary-key allocation.
//!
//! Keys are `MAX(id) + 1`, read on the connection of the transaction that
//! inserts the row. `id` is the table's primary key, so two writers that
//! read the same maximum cannot both commit: the loser fails with a store
//! error and rolls back.

use sqlx::SqliteConnection;

use campus_core::types::DbId;

/// Every entity table. Table names reach SQL text only through this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Colleges,
    Courses,
    Subjects,
    Roles,
    Users,
    Students,
    Faculty,
    Timetables,
    Marksheets,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Colleges => "colleges",
            Table::Courses => "courses",
            Table::Subjects => "subjects",
            Table::Roles => "roles",
            Table::Users => "users",
            Table::Students => "students",
            Table::Faculty => "faculty",
            Table::Timetables => "timetables",
            Table::Marksheets => "marksheets",
        }
    }
}

/// Compute the next primary key for `table`: `1` when empty.
pub async fn next_pk(conn: &mut SqliteConnection, table: Table) -> Result<DbId, sqlx::Error> {
    let query = format!("SELECT COALESCE(MAX(id), 0) + 1 FROM {}", table.name());
    let pk: DbId = sqlx::query_scalar(&query).fetch_one(conn).await?;
    tracing::debug!(table = table.name(), pk, "Allocated primary key");
    Ok(pk)
}
