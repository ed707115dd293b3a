//! Integration tests for record-service CRUD.
//!
//! Exercises the repositories against a real SQLite database:
//! - Monotonic key allocation
//! - Natural-key duplicate rejection on create and update
//! - Delete semantics
//! - Denormalized parent names on dependent records

use assert_matches::assert_matches;
use sqlx::SqlitePool;

use campus_core::roles::RoleKind;
use campus_db::models::role::CreateRole;
use campus_db::repositories::{
    CollegeRepo, CourseRepo, FacultyRepo, RoleRepo, StudentRepo, SubjectRepo,
};
use campus_db::ModelError;

mod common;
use common::*;

// ---------------------------------------------------------------------------
// Test: Key allocation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_keys_start_at_one_and_increase(pool: SqlitePool) {
    let a = CollegeRepo::create(&pool, &new_college("Alpha")).await.unwrap();
    let b = CollegeRepo::create(&pool, &new_college("Beta")).await.unwrap();
    let c = CollegeRepo::create(&pool, &new_college("Gamma")).await.unwrap();
    assert_eq!((a, b, c), (1, 2, 3));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_key_follows_current_maximum(pool: SqlitePool) {
    seed_college(&pool, "Alpha").await;
    seed_college(&pool, "Beta").await;
    let third = seed_college(&pool, "Gamma").await;

    // Removing the highest row frees its key for the next insert.
    CollegeRepo::delete(&pool, third).await.unwrap();
    let next = seed_college(&pool, "Delta").await;
    assert_eq!(next, 3);

    // A gap below the maximum is never reused.
    CollegeRepo::delete(&pool, 1).await.unwrap();
    let after_gap = seed_college(&pool, "Epsilon").await;
    assert_eq!(after_gap, 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_key_sequences_are_per_table(pool: SqlitePool) {
    seed_college(&pool, "Alpha").await;
    seed_college(&pool, "Beta").await;
    let course = seed_course(&pool, "B.Tech").await;
    assert_eq!(course, 1);
}

// ---------------------------------------------------------------------------
// Test: Create / read round trip
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_then_find_returns_stored_fields(pool: SqlitePool) {
    let input = new_college("Holkar Science College");
    let id = CollegeRepo::create(&pool, &input).await.unwrap();

    let found = CollegeRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.name, input.name);
    assert_eq!(found.city, "Indore");
    assert_eq!(found.audit.created_by, ACTOR);

    let by_name = CollegeRepo::find_by_name(&pool, "Holkar Science College")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_name.id, id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_missing_is_none(pool: SqlitePool) {
    assert!(CollegeRepo::find_by_id(&pool, 42).await.unwrap().is_none());
    assert!(CollegeRepo::find_by_name(&pool, "Nowhere").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Test: Duplicate natural keys
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_college_name_rejected(pool: SqlitePool) {
    seed_college(&pool, "Alpha").await;

    let err = CollegeRepo::create(&pool, &new_college("Alpha"))
        .await
        .unwrap_err();
    assert_matches!(err, ModelError::DuplicateRecord(ref msg) if msg == "College name already exists");
    assert_eq!(count(&pool, "colleges").await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_may_keep_own_name(pool: SqlitePool) {
    let id = seed_college(&pool, "Alpha").await;
    let mut college = CollegeRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    college.city = "Bhopal".to_string();
    college.audit.touch("editor", chrono::Utc::now());

    CollegeRepo::update(&pool, &college).await.unwrap();

    let stored = CollegeRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Alpha");
    assert_eq!(stored.city, "Bhopal");
    assert_eq!(stored.audit.modified_by, "editor");
    assert_eq!(stored.audit.created_by, ACTOR);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_onto_another_name_rejected(pool: SqlitePool) {
    seed_college(&pool, "Alpha").await;
    let beta = seed_college(&pool, "Beta").await;

    let mut college = CollegeRepo::find_by_id(&pool, beta).await.unwrap().unwrap();
    college.name = "Alpha".to_string();
    let err = CollegeRepo::update(&pool, &college).await.unwrap_err();
    assert!(err.is_duplicate());

    let stored = CollegeRepo::find_by_id(&pool, beta).await.unwrap().unwrap();
    assert_eq!(stored.name, "Beta");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_messages_name_the_field(pool: SqlitePool) {
    let course = seed_course(&pool, "B.Tech").await;
    let err = CourseRepo::create(&pool, &new_course("B.Tech"))
        .await
        .unwrap_err();
    assert_matches!(err, ModelError::DuplicateRecord(ref msg) if msg == "Course name already exists");

    seed_subject(&pool, course, "Physics").await;
    let err = SubjectRepo::create(&pool, &new_subject(course, "Physics"))
        .await
        .unwrap_err();
    assert_matches!(err, ModelError::DuplicateRecord(ref msg) if msg == "Subject name already exists");

    let college = seed_college(&pool, "Alpha").await;
    seed_student(&pool, college, "priya@campus.test").await;
    let err = StudentRepo::create(
        &pool,
        &new_student(college, "Other", "Person", "priya@campus.test"),
    )
    .await
    .unwrap_err();
    assert_matches!(err, ModelError::DuplicateRecord(ref msg) if msg == "Email already exists");
}

// ---------------------------------------------------------------------------
// Test: Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_removes_row(pool: SqlitePool) {
    let id = seed_college(&pool, "Alpha").await;
    CollegeRepo::delete(&pool, id).await.unwrap();
    assert!(CollegeRepo::find_by_id(&pool, id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_missing_is_noop(pool: SqlitePool) {
    seed_college(&pool, "Alpha").await;
    CollegeRepo::delete(&pool, 99).await.unwrap();
    assert_eq!(count(&pool, "colleges").await, 1);
}

// ---------------------------------------------------------------------------
// Test: Denormalized parent names
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_child_captures_parent_name_on_create(pool: SqlitePool) {
    let college = seed_college(&pool, "Alpha").await;
    let course = seed_course(&pool, "B.Tech").await;
    let subject = seed_subject(&pool, course, "Physics").await;

    let student = seed_student(&pool, college, "priya@campus.test").await;
    let student = StudentRepo::find_by_id(&pool, student).await.unwrap().unwrap();
    assert_eq!(student.college_name, "Alpha");

    let subject = SubjectRepo::find_by_id(&pool, subject).await.unwrap().unwrap();
    assert_eq!(subject.course_name, "B.Tech");

    let faculty = FacultyRepo::create(
        &pool,
        &new_faculty(college, course, subject.id, "meera@campus.test"),
    )
    .await
    .unwrap();
    let faculty = FacultyRepo::find_by_id(&pool, faculty).await.unwrap().unwrap();
    assert_eq!(faculty.college_name, "Alpha");
    assert_eq!(faculty.course_name, "B.Tech");
    assert_eq!(faculty.subject_name, "Physics");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_parent_rename_leaves_child_stale_until_child_update(pool: SqlitePool) {
    let college = seed_college(&pool, "Alpha").await;
    let student_id = seed_student(&pool, college, "priya@campus.test").await;

    let mut parent = CollegeRepo::find_by_id(&pool, college).await.unwrap().unwrap();
    parent.name = "Alpha Institute".to_string();
    CollegeRepo::update(&pool, &parent).await.unwrap();

    let stale = StudentRepo::find_by_id(&pool, student_id).await.unwrap().unwrap();
    assert_eq!(stale.college_name, "Alpha");

    StudentRepo::update(&pool, &stale).await.unwrap();
    let refreshed = StudentRepo::find_by_id(&pool, student_id).await.unwrap().unwrap();
    assert_eq!(refreshed.college_name, "Alpha Institute");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_resolves_new_parent_name(pool: SqlitePool) {
    let alpha = seed_college(&pool, "Alpha").await;
    let beta = seed_college(&pool, "Beta").await;
    let student_id = seed_student(&pool, alpha, "priya@campus.test").await;

    let mut student = StudentRepo::find_by_id(&pool, student_id).await.unwrap().unwrap();
    student.college_id = beta;
    // Whatever the caller carries in the name field is overwritten.
    student.college_name = "ignored".to_string();
    StudentRepo::update(&pool, &student).await.unwrap();

    let stored = StudentRepo::find_by_id(&pool, student_id).await.unwrap().unwrap();
    assert_eq!(stored.college_id, beta);
    assert_eq!(stored.college_name, "Beta");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_parent_is_application_error(pool: SqlitePool) {
    let err = StudentRepo::create(&pool, &new_student(7, "Priya", "Sharma", "p@campus.test"))
        .await
        .unwrap_err();
    assert_matches!(err, ModelError::Application { ref message, .. } if message == "College with id 7 does not exist");
    assert_eq!(count(&pool, "students").await, 0);

    let err = SubjectRepo::create(&pool, &new_subject(3, "Physics"))
        .await
        .unwrap_err();
    assert_matches!(err, ModelError::Application { .. });
}

// ---------------------------------------------------------------------------
// Test: Roles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_seed_well_known_roles_is_idempotent(pool: SqlitePool) {
    let now = chrono::Utc::now();
    let first = RoleRepo::seed_well_known(&pool, "bootstrap", now).await.unwrap();
    assert_eq!(first, RoleKind::ALL.len() as u64);

    let second = RoleRepo::seed_well_known(&pool, "bootstrap", now).await.unwrap();
    assert_eq!(second, 0);

    for kind in RoleKind::ALL {
        let role = RoleRepo::find_by_id(&pool, kind.id()).await.unwrap().unwrap();
        assert_eq!(role.name, kind.name());
        assert_eq!(role.kind(), Some(kind));
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_custom_role_allocated_after_well_known(pool: SqlitePool) {
    RoleRepo::seed_well_known(&pool, "bootstrap", chrono::Utc::now())
        .await
        .unwrap();

    let id = RoleRepo::create(
        &pool,
        &CreateRole {
            name: "Librarian".to_string(),
            description: "Library staff".to_string(),
            audit: audit(),
        },
    )
    .await
    .unwrap();
    assert_eq!(id, RoleKind::ALL.len() as i64 + 1);

    let role = RoleRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(role.kind(), None);
}

fn new_role(name: &str) -> CreateRole {
    CreateRole {
        name: name.to_string(),
        description: String::new(),
        audit: audit(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_seeding_refuses_well_known_id_held_by_other_role(pool: SqlitePool) {
    let id = RoleRepo::create(&pool, &new_role("Librarian")).await.unwrap();
    assert_eq!(id, RoleKind::Admin.id());

    let err = RoleRepo::seed_well_known(&pool, "bootstrap", chrono::Utc::now())
        .await
        .unwrap_err();
    assert_matches!(err, ModelError::Application { ref message, .. } if message.contains("Librarian"));

    // Nothing was seeded, and the squatting row is not mistaken for Admin.
    assert_eq!(count(&pool, "roles").await, 1);
    assert!(RoleRepo::find_by_name(&pool, "Admin").await.unwrap().is_none());
    let squatter = RoleRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(squatter.kind(), None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_seeding_refuses_well_known_name_at_other_id(pool: SqlitePool) {
    let now = chrono::Utc::now();
    RoleRepo::seed_well_known(&pool, "bootstrap", now).await.unwrap();

    // Leave id 5 empty and put the "Faculty" name on id 6.
    let tutor = RoleRepo::create(&pool, &new_role("Tutor")).await.unwrap();
    RoleRepo::delete(&pool, RoleKind::Faculty.id()).await.unwrap();
    let mut moved = RoleRepo::find_by_id(&pool, tutor).await.unwrap().unwrap();
    moved.name = "Faculty".to_string();
    RoleRepo::update(&pool, &moved).await.unwrap();

    let err = RoleRepo::seed_well_known(&pool, "bootstrap", now)
        .await
        .unwrap_err();
    assert_matches!(err, ModelError::Application { ref message, .. } if message.contains("existing role 6"));
    assert!(RoleRepo::find_by_id(&pool, RoleKind::Faculty.id()).await.unwrap().is_none());

    let moved = RoleRepo::find_by_id(&pool, tutor).await.unwrap().unwrap();
    assert_eq!(moved.kind(), None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_seeding_restores_a_missing_well_known_role(pool: SqlitePool) {
    let now = chrono::Utc::now();
    RoleRepo::seed_well_known(&pool, "bootstrap", now).await.unwrap();
    RoleRepo::delete(&pool, RoleKind::Kiosk.id()).await.unwrap();

    let inserted = RoleRepo::seed_well_known(&pool, "bootstrap", now).await.unwrap();
    assert_eq!(inserted, 1);
    let kiosk = RoleRepo::find_by_id(&pool, RoleKind::Kiosk.id()).await.unwrap().unwrap();
    assert_eq!(kiosk.kind(), Some(RoleKind::Kiosk));
}
