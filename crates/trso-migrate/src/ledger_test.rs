use super::*;
use chrono::TimeZone;
use trso_db::{DuckDbBackend, SqliteBackend};

#[tokio::test]
async fn test_ensure_is_idempotent() {
    let db = SqliteBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, "migrations");

    ledger.ensure().await.unwrap();
    ledger.record("001_init.sql").await.unwrap();
    ledger.ensure().await.unwrap();

    let applied = ledger.load_applied().await.unwrap();
    assert_eq!(applied.len(), 1);
    assert!(applied.contains("001_init.sql"));
}

#[tokio::test]
async fn test_load_applied_empty() {
    let db = SqliteBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, "migrations");
    ledger.ensure().await.unwrap();

    assert!(ledger.load_applied().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_load_applied_without_table_is_storage_error() {
    let db = SqliteBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, "migrations");

    let err = ledger.load_applied().await.unwrap_err();
    assert!(matches!(
        err,
        MigrateError::Storage {
            operation: "read",
            ..
        }
    ));
}

#[tokio::test]
async fn test_older_id_file_name_layout_is_reported() {
    let db = SqliteBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE migrations (id INTEGER PRIMARY KEY AUTOINCREMENT, file_name TEXT);
         INSERT INTO migrations (file_name) VALUES ('001_init.sql');",
    )
    .await
    .unwrap();
    let ledger = Ledger::new(&db, "migrations");

    ledger.ensure().await.unwrap();
    let err = ledger.load_applied().await.unwrap_err();

    assert!(matches!(&err, MigrateError::LegacyLedger { table } if table == "migrations"));
    assert_eq!(err.kind(), "StorageError");
    assert!(err.to_string().starts_with("[M005]"));
    assert!(matches!(
        ledger.list().await.unwrap_err(),
        MigrateError::LegacyLedger { .. }
    ));
}

#[tokio::test]
async fn test_record_rejects_duplicates() {
    let db = SqliteBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, "migrations");
    ledger.ensure().await.unwrap();

    ledger.record("001_init.sql").await.unwrap();
    let err = ledger.record("001_init.sql").await.unwrap_err();

    match err {
        MigrateError::DuplicateRecord { name } => assert_eq!(name, "001_init.sql"),
        other => panic!("expected DuplicateRecord, got {other:?}"),
    }
    assert_eq!(ledger.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_record_escapes_quotes() {
    let db = SqliteBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, "migrations");
    ledger.ensure().await.unwrap();

    ledger.record("003_o'brien.sql").await.unwrap();

    assert!(ledger.contains("003_o'brien.sql").await.unwrap());
    assert!(!ledger.contains("003_obrien.sql").await.unwrap());
}

#[tokio::test]
async fn test_list_round_trips_timestamps() {
    let db = SqliteBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, "migrations");
    ledger.ensure().await.unwrap();

    let first = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
    let second = Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 5).unwrap();
    ledger.record_at("002_users.sql", second).await.unwrap();
    ledger.record_at("001_init.sql", first).await.unwrap();

    let rows = ledger.list().await.unwrap();
    assert_eq!(
        rows,
        vec![
            AppliedMigration {
                name: "001_init.sql".to_string(),
                applied_at: first,
            },
            AppliedMigration {
                name: "002_users.sql".to_string(),
                applied_at: second,
            },
        ]
    );
}

#[tokio::test]
async fn test_timestamp_column_format() {
    let db = SqliteBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, "migrations");
    ledger.ensure().await.unwrap();

    let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    ledger.record_at("001_init.sql", at).await.unwrap();

    let rows = db
        .query("SELECT applied_at FROM migrations")
        .await
        .unwrap();
    assert_eq!(
        rows.scalar(),
        Some(&SqlValue::Text("2024-01-02 03:04:05.000".to_string()))
    );
}

#[tokio::test]
async fn test_list_rejects_bad_timestamp() {
    let db = SqliteBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, "migrations");
    ledger.ensure().await.unwrap();
    db.execute("INSERT INTO migrations VALUES ('001_init.sql', 'yesterday')")
        .await
        .unwrap();

    let err = ledger.list().await.unwrap_err();
    assert!(matches!(err, MigrateError::Storage { .. }));
    assert!(err.to_string().contains("yesterday"));
}

#[tokio::test]
async fn test_custom_table_name() {
    let db = SqliteBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, "schema history");
    ledger.ensure().await.unwrap();
    ledger.record("001_init.sql").await.unwrap();

    let rows = db
        .query(r#"SELECT name FROM "schema history""#)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_duckdb_ledger() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, "migrations");
    ledger.ensure().await.unwrap();

    ledger.record("001_init.sql").await.unwrap();
    ledger.record("002_users.sql").await.unwrap();

    assert!(ledger.contains("002_users.sql").await.unwrap());
    let names: Vec<String> = ledger
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, vec!["001_init.sql", "002_users.sql"]);
}
