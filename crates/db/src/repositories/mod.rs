//! Record services.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&DbPool` as the first argument. Writes check the natural
//! key first, then allocate a key and insert inside one transaction.

pub mod college_repo;
pub mod course_repo;
pub mod faculty_repo;
pub mod marksheet_repo;
pub(crate) mod refs;
pub mod role_repo;
pub mod student_repo;
pub mod subject_repo;
pub mod timetable_repo;
pub mod user_repo;

pub use college_repo::CollegeRepo;
pub use course_repo::CourseRepo;
pub use faculty_repo::FacultyRepo;
pub use marksheet_repo::MarksheetRepo;
pub use role_repo::RoleRepo;
pub use student_repo::StudentRepo;
pub use subject_repo::SubjectRepo;
pub use timetable_repo::TimetableRepo;
pub use user_repo::UserRepo;
