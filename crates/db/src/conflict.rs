//! Timetable conflict validator.
//!
//! Runs the probes chosen by [`conflict_checks_for`] against current rows.
//! Stateless: every probe is a single read.

use campus_core::timetable::{
    conflict_checks_for, excludes_own_id, ConflictCheck, SlotField, WriteKind, TIMETABLE_EXISTS,
};
use campus_core::types::DbId;

use crate::error::{ModelError, ModelResult};
use crate::keys::Table;
use crate::models::timetable::{Timetable, TimetableSlot};
use crate::repositories::timetable_repo::COLUMNS;
use crate::search::SearchFilter;
use crate::DbPool;

pub struct ConflictValidator;

impl ConflictValidator {
    /// Run one probe. Returns the first entry matching every field of `check`,
    /// ignoring the entry with id `exclude` when given.
    pub async fn probe(
        pool: &DbPool,
        check: ConflictCheck,
        slot: &TimetableSlot,
        exclude: Option<DbId>,
    ) -> ModelResult<Option<Timetable>> {
        let mut filter = SearchFilter::new();
        for field in check.fields() {
            filter = match field {
                SlotField::Course => filter.id("course_id", Some(slot.course_id)),
                SlotField::Subject => filter.id("subject_id", Some(slot.subject_id)),
                SlotField::Semester => filter.text_eq("semester", &slot.semester),
                SlotField::ExamDate => filter.date("exam_date", Some(slot.exam_date)),
                SlotField::ExamTime => filter.text_eq("exam_time", &slot.exam_time),
                SlotField::Description => filter.text_eq("description", &slot.description),
            };
        }
        if let Some(id) = exclude {
            filter = filter.exclude_id(id);
        }
        Ok(filter.first(pool, Table::Timetables, COLUMNS).await?)
    }

    /// Reject a write whose slot collides with an existing entry.
    ///
    /// `own_id` is the id of the entry being updated; it is ignored for inserts.
    pub async fn validate(
        pool: &DbPool,
        kind: WriteKind,
        slot: &TimetableSlot,
        own_id: DbId,
    ) -> ModelResult<()> {
        let exclude = excludes_own_id(kind).then_some(own_id);
        for &check in conflict_checks_for(kind) {
            if let Some(hit) = Self::probe(pool, check, slot, exclude).await? {
                tracing::warn!(
                    check = check.label(),
                    conflicting_id = hit.id,
                    "Timetable conflict"
                );
                return Err(ModelError::duplicate(TIMETABLE_EXISTS));
            }
        }
        Ok(())
    }
}
