//! Well-known roles and their persisted ids.
//!
//! The ids must match the rows seeded into the `roles` table by the
//! bootstrap binary.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// A well-known role. Each variant maps to a fixed `roles.id`.
#[repr(i64)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    Admin = 1,
    Student = 2,
    College = 3,
    Kiosk = 4,
    Faculty = 5,
}

impl RoleKind {
    pub const ALL: [RoleKind; 5] = [
        RoleKind::Admin,
        RoleKind::Student,
        RoleKind::College,
        RoleKind::Kiosk,
        RoleKind::Faculty,
    ];

    /// Return the persisted role id.
    pub fn id(self) -> DbId {
        self as DbId
    }

    /// Role name as stored in `roles.name`.
    pub fn name(self) -> &'static str {
        match self {
            RoleKind::Admin => "Admin",
            RoleKind::Student => "Student",
            RoleKind::College => "College",
            RoleKind::Kiosk => "Kiosk",
            RoleKind::Faculty => "Faculty",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RoleKind::Admin => "Full access to every record",
            RoleKind::Student => "Views own marksheet and timetable",
            RoleKind::College => "Manages students of one college",
            RoleKind::Kiosk => "Read-only public terminal",
            RoleKind::Faculty => "Manages timetables and marksheets",
        }
    }
}

impl From<RoleKind> for DbId {
    fn from(value: RoleKind) -> Self {
        value.id()
    }
}

/// Returned when a persisted id has no matching [`RoleKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role id: {0}")]
pub struct UnknownRole(pub DbId);

impl TryFrom<DbId> for RoleKind {
    type Error = UnknownRole;

    fn try_from(id: DbId) -> Result<Self, Self::Error> {
        RoleKind::ALL
            .into_iter()
            .find(|role| role.id() == id)
            .ok_or(UnknownRole(id))
    }
}
