use super::*;
use wiremock::matchers::header;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn is_remote_failure(err: &DbError) -> bool {
    matches!(
        err,
        DbError::ConnectionError(_) | DbError::ExecutionError(_)
    )
}

#[test]
fn test_check_url() {
    assert!(check_url("libsql://app-org.turso.io").is_ok());
    assert!(check_url("https://app-org.turso.io/").is_ok());
    assert!(check_url("HTTP://127.0.0.1:8080").is_ok());
    assert!(check_url("app.db").is_err());
    assert!(check_url("ftp://example.com").is_err());
    assert!(check_url("libsql://").is_err());
}

#[test]
fn test_new_does_not_connect() {
    let db = RemoteBackend::new("libsql://app-org.turso.io", "secret").unwrap();
    assert_eq!(db.db_type(), "libsql-remote");
}

#[tokio::test]
async fn test_unreachable_server() {
    let db = RemoteBackend::new("http://127.0.0.1:1", "secret").unwrap();

    let err = db.execute("SELECT 1").await.unwrap_err();

    assert!(is_remote_failure(&err));
}

#[tokio::test]
async fn test_requests_carry_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1..)
        .mount(&server)
        .await;

    let db = RemoteBackend::new(&server.uri(), "secret").unwrap();
    let err = db.query("SELECT 1").await.unwrap_err();

    assert!(is_remote_failure(&err));
}

#[tokio::test]
async fn test_rejected_batch_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let db = RemoteBackend::new(&server.uri(), "wrong").unwrap();
    let err = db
        .execute_batch("CREATE TABLE t (x INT); INSERT INTO t VALUES (1);")
        .await
        .unwrap_err();

    assert!(is_remote_failure(&err));
}
