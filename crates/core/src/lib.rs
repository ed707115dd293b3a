//! Domain primitives shared by the campus record services.
//!
//! Nothing in here touches the store: paging arithmetic, criteria rules,
//! role ids, timetable conflict policy, marksheet scoring and password
//! hashing are all pure and unit-tested in place.

pub mod marksheet;
pub mod paging;
pub mod password;
pub mod roles;
pub mod search;
pub mod timetable;
pub mod types;
