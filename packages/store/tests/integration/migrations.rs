use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use sea_orm_migration::SchemaManager;

use store::migration::{migrate_down, migrate_up, migration_status};

use crate::common::TestDb;

const ALL_TABLES: &[&str] = &[
    "users",
    "password_reset_tokens",
    "sessions",
    "schools",
    "challenges",
    "questions",
    "participants",
    "challenge_participants",
    "attempts",
    "challenge_attempts",
    "attempted_questions",
];

/// The schema as SQLite stores it, excluding the migration bookkeeping table.
async fn schema_snapshot(db: &DatabaseConnection) -> Vec<(String, String, Option<String>)> {
    let rows = db
        .query_all_raw(Statement::from_string(
            DbBackend::Sqlite,
            "SELECT type, name, sql FROM sqlite_master \
             WHERE name NOT LIKE 'sqlite_%' AND tbl_name != 'seaql_migrations' \
             ORDER BY type, name"
                .to_string(),
        ))
        .await
        .expect("Failed to read sqlite_master");

    rows.iter()
        .map(|row| {
            (
                row.try_get::<String>("", "type").unwrap(),
                row.try_get::<String>("", "name").unwrap(),
                row.try_get::<Option<String>>("", "sql").unwrap(),
            )
        })
        .collect()
}

#[tokio::test]
async fn up_creates_every_table() {
    let test = TestDb::spawn().await;
    let manager = SchemaManager::new(&test.db);

    for table in ALL_TABLES {
        assert!(manager.has_table(*table).await.unwrap(), "missing {table}");
    }
}

#[tokio::test]
async fn status_reports_applied_and_pending() {
    let test = TestDb::spawn().await;

    let report = migration_status(&test.db).await.unwrap();
    assert_eq!(report.applied.len(), 2);
    assert!(report.pending.is_empty());

    migrate_down(&test.db, Some(1)).await.unwrap();
    let report = migration_status(&test.db).await.unwrap();
    assert_eq!(report.applied.len(), 1);
    assert_eq!(report.pending.len(), 1);
    assert!(report.pending[0].contains("create_challenge_tables"));
}

#[tokio::test]
async fn rolling_back_one_step_keeps_account_tables() {
    let test = TestDb::spawn().await;
    migrate_down(&test.db, Some(1)).await.unwrap();

    let manager = SchemaManager::new(&test.db);
    assert!(manager.has_table("users").await.unwrap());
    assert!(manager.has_table("sessions").await.unwrap());
    assert!(!manager.has_table("challenges").await.unwrap());
    assert!(!manager.has_table("attempted_questions").await.unwrap());
}

#[tokio::test]
async fn full_rollback_drops_everything() {
    let test = TestDb::spawn().await;
    migrate_down(&test.db, None).await.unwrap();

    let manager = SchemaManager::new(&test.db);
    for table in ALL_TABLES {
        assert!(!manager.has_table(*table).await.unwrap(), "{table} survived");
    }
}

#[tokio::test]
async fn down_then_up_matches_fresh_schema() {
    let test = TestDb::spawn().await;
    let fresh = schema_snapshot(&test.db).await;
    assert!(!fresh.is_empty());

    migrate_down(&test.db, None).await.unwrap();
    migrate_up(&test.db, None).await.unwrap();

    assert_eq!(schema_snapshot(&test.db).await, fresh);
}

#[tokio::test]
async fn down_is_idempotent_on_missing_tables() {
    let test = TestDb::spawn().await;
    test.db
        .execute_unprepared("DROP TABLE attempted_questions")
        .await
        .unwrap();

    migrate_down(&test.db, None).await.unwrap();
}
