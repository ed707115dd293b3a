//! Integration tests for write atomicity and store-error classification.

use assert_matches::assert_matches;
use sqlx::SqlitePool;

use campus_db::repositories::CollegeRepo;
use campus_db::ModelError;

mod common;
use common::*;

async fn reject_college_inserts(pool: &SqlitePool) {
    sqlx::query(
        "CREATE TRIGGER reject_college_insert BEFORE INSERT ON colleges
         BEGIN SELECT RAISE(ABORT, 'forced failure'); END",
    )
    .execute(pool)
    .await
    .unwrap();
}

// ---------------------------------------------------------------------------
// Test: Failed insert leaves nothing behind
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_insert_is_rolled_back(pool: SqlitePool) {
    reject_college_inserts(&pool).await;

    let err = CollegeRepo::create(&pool, &new_college("Alpha"))
        .await
        .unwrap_err();
    assert_matches!(err, ModelError::Application { source: Some(_), .. });
    assert!(CollegeRepo::find_by_id(&pool, 1).await.unwrap().is_none());
    assert_eq!(count(&pool, "colleges").await, 0);

    // The key read inside the failed transaction was not consumed.
    sqlx::query("DROP TRIGGER reject_college_insert")
        .execute(&pool)
        .await
        .unwrap();
    let id = seed_college(&pool, "Alpha").await;
    assert_eq!(id, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_insert_keeps_existing_rows(pool: SqlitePool) {
    seed_college(&pool, "Alpha").await;
    reject_college_inserts(&pool).await;

    CollegeRepo::create(&pool, &new_college("Beta"))
        .await
        .unwrap_err();

    let all = CollegeRepo::list(&pool).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Alpha");
}

// ---------------------------------------------------------------------------
// Test: Store-level constraint classification
// ---------------------------------------------------------------------------

async fn raw_insert(pool: &SqlitePool, id: i64, name: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO colleges (id, name, address, state, city, phone_no,
             created_by, modified_by, created_datetime, modified_datetime)
         VALUES (?, ?, '', '', '', '', 'raw', 'raw', '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
    )
    .bind(id)
    .bind(name)
    .execute(pool)
    .await
    .map(|_| ())
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unique_index_violation_is_duplicate(pool: SqlitePool) {
    raw_insert(&pool, 1, "Alpha").await.unwrap();
    let err = raw_insert(&pool, 2, "Alpha").await.unwrap_err();

    let classified = ModelError::from_write(err, "College name already exists");
    assert_matches!(classified, ModelError::DuplicateRecord(ref msg) if msg == "College name already exists");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_primary_key_collision_is_application_error(pool: SqlitePool) {
    raw_insert(&pool, 1, "Alpha").await.unwrap();
    let err = raw_insert(&pool, 1, "Beta").await.unwrap_err();

    let classified = ModelError::from_write(err, "College name already exists");
    assert_matches!(classified, ModelError::Application { .. });
    assert!(!classified.is_duplicate());
}

// ---------------------------------------------------------------------------
// Test: Concurrent writers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_racing_creates_for_one_name_yield_one_duplicate(pool: SqlitePool) {
    for round in 0..20 {
        let name = format!("College {round}");
        let input = new_college(&name);
        let (a, b) = tokio::join!(
            CollegeRepo::create(&pool, &input),
            CollegeRepo::create(&pool, &input),
        );

        let (winner, loser) = match (a, b) {
            (Ok(id), Err(err)) | (Err(err), Ok(id)) => (id, err),
            other => panic!("round {round}: expected one success, got {other:?}"),
        };
        assert_matches!(loser, ModelError::DuplicateRecord(ref msg) if msg == "College name already exists");
        let stored = CollegeRepo::find_by_name(&pool, &name).await.unwrap().unwrap();
        assert_eq!(stored.id, winner);
    }
    assert_eq!(count(&pool, "colleges").await, 20);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_racing_creates_for_distinct_names_all_succeed(pool: SqlitePool) {
    let mut ids = Vec::new();
    for round in 0..20 {
        let first = new_college(&format!("North {round}"));
        let second = new_college(&format!("South {round}"));
        let (a, b) = tokio::join!(
            CollegeRepo::create(&pool, &first),
            CollegeRepo::create(&pool, &second),
        );
        ids.push(a.unwrap());
        ids.push(b.unwrap());
    }

    ids.sort_unstable();
    assert_eq!(ids, (1..=40).collect::<Vec<_>>());
}
