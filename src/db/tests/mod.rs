use crate::db::*;
use tempfile::NamedTempFile;

#[tokio::test]
async fn test_cursor_defaults_when_absent() {
    // A fresh database has no cursor records; reads must default, not fail
    let temp_file = NamedTempFile::new().unwrap();
    let db = Database::new(temp_file.path()).await.unwrap();

    let cursor = db.read_cursor().await.unwrap();
    assert_eq!(cursor.total_sent, 0);
    assert!(cursor.last_receiver.is_none());
    assert!(cursor.last_sender.is_none());

    db.close().await;
}

#[tokio::test]
async fn test_advance_cursor_roundtrip() {
    let temp_file = NamedTempFile::new().unwrap();
    let db = Database::new(temp_file.path()).await.unwrap();

    db.advance_cursor(1, "r1@x", "a@x").await.unwrap();
    let cursor = db.read_cursor().await.unwrap();
    assert_eq!(cursor.total_sent, 1);
    assert_eq!(cursor.last_receiver.as_deref(), Some("r1@x"));
    assert_eq!(cursor.last_sender.as_deref(), Some("a@x"));

    // Advancing again overwrites all three records as a pair
    db.advance_cursor(2, "r3@x", "b@x").await.unwrap();
    let cursor = db.read_cursor().await.unwrap();
    assert_eq!(cursor.total_sent, 2);
    assert_eq!(cursor.last_receiver.as_deref(), Some("r3@x"));
    assert_eq!(cursor.last_sender.as_deref(), Some("b@x"));

    db.close().await;
}

#[tokio::test]
async fn test_cursor_survives_reopen() {
    // The cursor must survive a process restart (new connection to same file)
    let temp_file = NamedTempFile::new().unwrap();

    {
        let db = Database::new(temp_file.path()).await.unwrap();
        db.advance_cursor(5, "r5@x", "b@x").await.unwrap();
        db.close().await;
    }

    {
        let db = Database::new(temp_file.path()).await.unwrap();
        let cursor = db.read_cursor().await.unwrap();
        assert_eq!(cursor.total_sent, 5);
        assert_eq!(cursor.last_receiver.as_deref(), Some("r5@x"));
        assert_eq!(cursor.last_sender.as_deref(), Some("b@x"));
        db.close().await;
    }
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let temp_file = NamedTempFile::new().unwrap();

    let db = Database::new(temp_file.path()).await.unwrap();
    db.close().await;

    // Opening the same file again must not re-apply or fail migrations
    let db = Database::new(temp_file.path()).await.unwrap();
    let version: i64 = sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(version, 1);
    db.close().await;
}

#[tokio::test]
async fn test_unparseable_total_sent_treated_as_zero() {
    let temp_file = NamedTempFile::new().unwrap();
    let db = Database::new(temp_file.path()).await.unwrap();

    sqlx::query("INSERT INTO campaign_state (key, value, updated_at) VALUES ('total_sent', 'garbage', 0)")
        .execute(db.pool())
        .await
        .unwrap();

    let cursor = db.read_cursor().await.unwrap();
    assert_eq!(cursor.total_sent, 0);

    db.close().await;
}
