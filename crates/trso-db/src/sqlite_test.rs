use super::*;

#[tokio::test]
async fn test_in_memory() {
    let db = SqliteBackend::in_memory().unwrap();
    assert_eq!(db.db_type(), "sqlite");
}

#[tokio::test]
async fn test_execute_returns_affected_rows() {
    let db = SqliteBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (1), (2), (3);")
        .await
        .unwrap();

    let affected = db.execute("UPDATE t SET x = x + 1 WHERE x > 1").await.unwrap();
    assert_eq!(affected, 2);
}

#[tokio::test]
async fn test_query_returns_columns_and_values() {
    let db = SqliteBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE items (id INTEGER, name TEXT, price REAL, data BLOB);
         INSERT INTO items VALUES (1, 'apple', 1.5, x'0102'), (2, NULL, NULL, NULL);",
    )
    .await
    .unwrap();

    let rows = db
        .query("SELECT id, name, price, data FROM items ORDER BY id")
        .await
        .unwrap();

    assert_eq!(rows.columns, vec!["id", "name", "price", "data"]);
    assert_eq!(
        rows.rows[0],
        vec![
            SqlValue::Integer(1),
            SqlValue::Text("apple".to_string()),
            SqlValue::Real(1.5),
            SqlValue::Blob(vec![1, 2]),
        ]
    );
    assert!(rows.rows[1][1..].iter().all(|v| *v == SqlValue::Null));
}

#[tokio::test]
async fn test_query_empty_result() {
    let db = SqliteBackend::in_memory().unwrap();
    db.execute("CREATE TABLE t (x INTEGER)").await.unwrap();

    let rows = db.query("SELECT x FROM t").await.unwrap();

    assert!(rows.is_empty());
    assert_eq!(rows.columns, vec!["x"]);
}

#[tokio::test]
async fn test_execute_batch_is_atomic() {
    let db = SqliteBackend::in_memory().unwrap();
    db.execute("CREATE TABLE t (x INTEGER)").await.unwrap();

    let result = db
        .execute_batch("INSERT INTO t VALUES (1); INSERT INTO missing VALUES (2);")
        .await;

    assert!(matches!(result, Err(DbError::ExecutionError(_))));
    let count = db.query("SELECT COUNT(*) FROM t").await.unwrap();
    assert_eq!(count.scalar().and_then(SqlValue::as_i64), Some(0));
}

#[tokio::test]
async fn test_execute_batch_rolls_back_ddl() {
    let db = SqliteBackend::in_memory().unwrap();

    let result = db
        .execute_batch("CREATE TABLE t (x INTEGER); THIS IS NOT SQL;")
        .await;

    assert!(result.is_err());
    let tables = db
        .query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = 't'")
        .await
        .unwrap();
    assert!(tables.is_empty());
}

#[tokio::test]
async fn test_file_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.db");

    {
        let db = SqliteBackend::new(path.to_str().unwrap()).unwrap();
        db.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (42);")
            .await
            .unwrap();
    }

    let db = SqliteBackend::from_path(&path).unwrap();
    let rows = db.query("SELECT x FROM t").await.unwrap();
    assert_eq!(rows.scalar(), Some(&SqlValue::Integer(42)));
}

#[tokio::test]
async fn test_open_in_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("app.db");

    let result = SqliteBackend::from_path(&path);

    assert!(matches!(result, Err(DbError::ConnectionError(_))));
}
