use super::*;

#[tokio::test]
async fn stores_and_reads_value() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.set_value("favorites", "[]").await.expect("set");
    let value = storage.get_value("favorites").await.expect("get");
    assert_eq!(value.as_deref(), Some("[]"));
}

#[tokio::test]
async fn missing_key_reads_as_none() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let value = storage.get_value("nope").await.expect("get");
    assert!(value.is_none());
}

#[tokio::test]
async fn set_overwrites_existing_value() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.set_value("k", "first").await.expect("set first");
    storage.set_value("k", "second").await.expect("set second");
    assert_eq!(
        storage.get_value("k").await.expect("get").as_deref(),
        Some("second")
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
    let db_path = temp_root.path().join("nested").join("storage.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );
}

#[tokio::test]
async fn values_survive_reopening_file_database() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("kv.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    {
        let storage = Storage::new(&database_url).await.expect("db");
        storage.set_value("favorites", "[1]").await.expect("set");
    }

    let reopened = Storage::new(&database_url).await.expect("reopen");
    assert_eq!(
        reopened.get_value("favorites").await.expect("get").as_deref(),
        Some("[1]")
    );
}

#[tokio::test]
async fn storage_is_usable_through_trait_object() {
    let storage: std::sync::Arc<dyn KeyValueStore> =
        std::sync::Arc::new(Storage::new("sqlite::memory:").await.expect("db"));
    storage.set("k", "v").await.expect("set");
    assert_eq!(storage.get("k").await.expect("get").as_deref(), Some("v"));
}

#[tokio::test]
async fn memory_store_rejects_writes_when_configured() {
    let store = MemoryStore::with_value("k", "old");
    store.set_fail_writes(true);
    let err = store.set("k", "new").await.expect_err("write must fail");
    assert!(err.to_string().contains("write rejected"));
    assert_eq!(store.raw("k").await.as_deref(), Some("old"));

    store.set_fail_writes(false);
    store.set("k", "new").await.expect("write");
    assert_eq!(store.get("k").await.expect("get").as_deref(), Some("new"));
}

#[tokio::test]
async fn memory_store_rejects_reads_when_configured() {
    let store = MemoryStore::with_value("k", "v");
    store.set_fail_reads(true);
    let err = store.get("k").await.expect_err("read must fail");
    assert!(err.to_string().contains("read rejected"));

    store.set_fail_reads(false);
    assert_eq!(store.get("k").await.expect("get").as_deref(), Some("v"));
}

#[test]
fn sqlite_path_ignores_memory_and_query_suffix() {
    assert!(sqlite_path("sqlite::memory:").is_none());
    assert!(sqlite_path("postgres://db").is_none());
    assert_eq!(
        sqlite_path("sqlite://./data/app.db?mode=rwc"),
        Some(PathBuf::from("./data/app.db"))
    );
}
