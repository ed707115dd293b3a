//! Timetable scheduling-conflict policy.
//!
//! Four probes, each stricter than the one before it. Which probes run
//! depends on whether an entry is being inserted or updated; the probes
//! themselves are executed against the store by the `db` crate.

/// Message surfaced when any conflict probe fires.
pub const TIMETABLE_EXISTS: &str = "Timetable already exists";

/// The kind of write a timetable entry is about to undergo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Insert,
    Update,
}

/// A field of a timetable slot that a probe can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotField {
    Course,
    Subject,
    Semester,
    ExamDate,
    ExamTime,
    Description,
}

/// One scheduling-collision probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictCheck {
    /// Two exams for one course on one day.
    CourseDate,
    /// The same subject scheduled twice on one day.
    CourseSubjectDate,
    /// The same subject scheduled twice on one day for one semester cohort.
    CourseSubjectSemesterDate,
    /// Every slot field identical.
    ExactSlot,
}

impl ConflictCheck {
    /// Fields that must all match for this probe to report a hit.
    pub fn fields(self) -> &'static [SlotField] {
        use SlotField::*;
        match self {
            ConflictCheck::CourseDate => &[Course, ExamDate],
            ConflictCheck::CourseSubjectDate => &[Course, Subject, ExamDate],
            ConflictCheck::CourseSubjectSemesterDate => &[Course, Subject, Semester, ExamDate],
            ConflictCheck::ExactSlot => {
                &[Course, Subject, Semester, ExamDate, ExamTime, Description]
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConflictCheck::CourseDate => "course_date",
            ConflictCheck::CourseSubjectDate => "course_subject_date",
            ConflictCheck::CourseSubjectSemesterDate => "course_subject_semester_date",
            ConflictCheck::ExactSlot => "exact_slot",
        }
    }
}

/// Probes applied before a write, in the order they run.
///
/// Inserts run the three coarse probes. Updates run only the exact-slot
/// probe, because the coarse probes would always match the entry being
/// edited. An update can therefore move an entry onto a course/date that
/// another entry already occupies.
pub fn conflict_checks_for(kind: WriteKind) -> &'static [ConflictCheck] {
    match kind {
        WriteKind::Insert => &[
            ConflictCheck::CourseDate,
            ConflictCheck::CourseSubjectDate,
            ConflictCheck::CourseSubjectSemesterDate,
        ],
        WriteKind::Update => &[ConflictCheck::ExactSlot],
    }
}

/// Whether the entry's own id is excluded from probe hits.
pub fn excludes_own_id(kind: WriteKind) -> bool {
    kind == WriteKind::Update
}
