//! Fixture builders shared by the integration tests.

#![allow(dead_code)]

use campus_core::roles::RoleKind;
use campus_core::types::{Date, DbId};
use campus_db::models::audit::Audit;
use campus_db::models::college::CreateCollege;
use campus_db::models::course::CreateCourse;
use campus_db::models::faculty::CreateFaculty;
use campus_db::models::marksheet::CreateMarksheet;
use campus_db::models::student::CreateStudent;
use campus_db::models::subject::CreateSubject;
use campus_db::models::timetable::CreateTimetable;
use campus_db::models::user::CreateUser;
use campus_db::repositories::{CollegeRepo, CourseRepo, StudentRepo, SubjectRepo};
use campus_db::DbPool;

pub const ACTOR: &str = "tester@campus.test";

pub fn audit() -> Audit {
    Audit::now(ACTOR)
}

pub fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn new_college(name: &str) -> CreateCollege {
    CreateCollege {
        name: name.to_string(),
        address: "12 MG Road".to_string(),
        state: "Madhya Pradesh".to_string(),
        city: "Indore".to_string(),
        phone_no: "0731000000".to_string(),
        audit: audit(),
    }
}

pub fn new_course(name: &str) -> CreateCourse {
    CreateCourse {
        name: name.to_string(),
        duration: "4 years".to_string(),
        description: format!("{name} programme"),
        audit: audit(),
    }
}

pub fn new_subject(course_id: DbId, name: &str) -> CreateSubject {
    CreateSubject {
        name: name.to_string(),
        course_id,
        description: String::new(),
        audit: audit(),
    }
}

pub fn new_student(college_id: DbId, first: &str, last: &str, email: &str) -> CreateStudent {
    CreateStudent {
        first_name: first.to_string(),
        last_name: last.to_string(),
        dob: Some(date(2004, 5, 17)),
        gender: "F".to_string(),
        mobile_no: "9800000000".to_string(),
        email: email.to_string(),
        college_id,
        audit: audit(),
    }
}

pub fn new_faculty(
    college_id: DbId,
    course_id: DbId,
    subject_id: DbId,
    email: &str,
) -> CreateFaculty {
    CreateFaculty {
        first_name: "Meera".to_string(),
        last_name: "Iyer".to_string(),
        gender: "F".to_string(),
        dob: Some(date(1980, 1, 2)),
        email: email.to_string(),
        mobile_no: "9811111111".to_string(),
        college_id,
        course_id,
        subject_id,
        audit: audit(),
    }
}

pub fn new_user(login: &str, password: &str, role: RoleKind) -> CreateUser {
    CreateUser {
        first_name: "Arjun".to_string(),
        last_name: "Rao".to_string(),
        login: login.to_string(),
        password: password.to_string(),
        dob: Some(date(1999, 9, 9)),
        mobile_no: "9822222222".to_string(),
        role_id: role.id(),
        gender: "M".to_string(),
        audit: audit(),
    }
}

pub fn new_timetable(
    course_id: DbId,
    subject_id: DbId,
    semester: &str,
    exam_date: Date,
    exam_time: &str,
) -> CreateTimetable {
    CreateTimetable {
        course_id,
        subject_id,
        semester: semester.to_string(),
        description: "End semester".to_string(),
        exam_date,
        exam_time: exam_time.to_string(),
        audit: audit(),
    }
}

pub fn new_marksheet(student_id: DbId, roll_no: &str, marks: (i32, i32, i32)) -> CreateMarksheet {
    CreateMarksheet {
        roll_no: roll_no.to_string(),
        student_id,
        physics: marks.0,
        chemistry: marks.1,
        maths: marks.2,
        audit: audit(),
    }
}

pub async fn seed_college(pool: &DbPool, name: &str) -> DbId {
    CollegeRepo::create(pool, &new_college(name)).await.unwrap()
}

pub async fn seed_course(pool: &DbPool, name: &str) -> DbId {
    CourseRepo::create(pool, &new_course(name)).await.unwrap()
}

pub async fn seed_subject(pool: &DbPool, course_id: DbId, name: &str) -> DbId {
    SubjectRepo::create(pool, &new_subject(course_id, name))
        .await
        .unwrap()
}

pub async fn seed_student(pool: &DbPool, college_id: DbId, email: &str) -> DbId {
    StudentRepo::create(pool, &new_student(college_id, "Priya", "Sharma", email))
        .await
        .unwrap()
}

pub async fn count(pool: &DbPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}
