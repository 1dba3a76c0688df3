use super::*;

#[tokio::test]
async fn memory_store_returns_latest_value() {
    let store = MemoryStore::new();
    store.set("coffee_settings", "first", 30).await.expect("set");
    store.set("coffee_settings", "second", 30).await.expect("set");

    let value = store.get("coffee_settings").await.expect("get");
    assert_eq!(value.as_deref(), Some("second"));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn memory_store_treats_missing_key_as_absent() {
    let store = MemoryStore::new();
    assert_eq!(store.get("nothing").await.expect("get"), None);
}

#[tokio::test]
async fn memory_store_drops_expired_entries_on_read() {
    let store = MemoryStore::new();
    store.set("coffee_settings", "stale", 0).await.expect("set");

    assert_eq!(store.get("coffee_settings").await.expect("get"), None);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn memory_store_rejects_out_of_range_ttl() {
    let store = MemoryStore::new();
    let err = store
        .set("coffee_settings", "{}", u32::MAX)
        .await
        .expect_err("ttl overflow");
    assert!(err.to_string().contains("out of range"));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn sqlite_store_rejects_out_of_range_ttl_and_keeps_old_value() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.set("k", "kept", 30).await.expect("set");

    assert!(storage.set("k", "lost", u32::MAX).await.is_err());
    assert_eq!(storage.get("k").await.expect("get").as_deref(), Some("kept"));
}

#[tokio::test]
async fn sqlite_store_round_trips_value() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .set("coffee_settings", r#"{"view":[true,false,true]}"#, 30)
        .await
        .expect("set");

    let value = storage.get("coffee_settings").await.expect("get");
    assert_eq!(value.as_deref(), Some(r#"{"view":[true,false,true]}"#));
}

#[tokio::test]
async fn sqlite_store_overwrites_existing_key() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.set("k", "one", 30).await.expect("set one");
    storage.set("k", "two", 30).await.expect("set two");

    assert_eq!(storage.get("k").await.expect("get").as_deref(), Some("two"));
    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_entries")
        .fetch_one(storage.pool())
        .await
        .expect("count");
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn sqlite_store_hides_and_purges_expired_entries() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.set("old", "value", 0).await.expect("set old");
    storage.set("fresh", "value", 30).await.expect("set fresh");

    assert_eq!(storage.get("old").await.expect("get old"), None);
    assert_eq!(storage.purge_expired().await.expect("purge"), 1);
    assert_eq!(
        storage.get("fresh").await.expect("get fresh").as_deref(),
        Some("value")
    );
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("prefs.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );
}

#[test]
fn sqlite_path_ignores_memory_and_foreign_urls() {
    assert_eq!(sqlite_path("sqlite::memory:"), None);
    assert_eq!(sqlite_path("postgres://localhost/db"), None);
    assert_eq!(
        sqlite_path("sqlite://./data/prefs.db?mode=rwc"),
        Some(PathBuf::from("./data/prefs.db"))
    );
}
