//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the table row
//! - A `Deserialize` create DTO for inserts (no id, no denormalized names)
//! - A `Default` criteria struct whose `Option` fields drive searches

pub mod audit;
pub mod college;
pub mod course;
pub mod faculty;
pub mod marksheet;
pub mod role;
pub mod student;
pub mod subject;
pub mod timetable;
pub mod user;
