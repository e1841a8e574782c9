use tempfile::TempDir;
use tessera_storage::{FileStore, StorageError};

async fn open(temp: &TempDir, namespace: &str) -> FileStore {
    FileStore::builder().root(temp.path()).namespace(namespace).connect().await.unwrap()
}

#[tokio::test]
async fn write_read_roundtrip() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp, "session").await;

    store.write("access_token", "token-1").await.unwrap();
    assert_eq!(store.read("access_token").await.unwrap().as_deref(), Some("token-1"));

    store.write("access_token", "token-2").await.unwrap();
    assert_eq!(store.read("access_token").await.unwrap().as_deref(), Some("token-2"));
}

#[tokio::test]
async fn missing_key_reads_as_none() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp, "session").await;

    assert!(store.read("refresh_token").await.unwrap().is_none());
    assert!(!store.delete("refresh_token").await.unwrap());
}

#[tokio::test]
async fn entries_survive_reopen() {
    let temp = TempDir::new().unwrap();
    open(&temp, "session").await.write("user", "{\"id\":\"u-1\"}").await.unwrap();

    let reopened = open(&temp, "session").await;
    assert_eq!(reopened.read("user").await.unwrap().as_deref(), Some("{\"id\":\"u-1\"}"));
}

#[tokio::test]
async fn traversal_keys_are_rejected() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp, "session").await;

    for key in ["../escape", "nested/key", ".hidden", ""] {
        let err = store.write(key, "x").await.expect_err("key must be rejected");
        assert!(matches!(err, StorageError::InvalidKey { .. }), "unexpected error for {key:?}");
    }
}

#[tokio::test]
async fn invalid_namespace_is_rejected() {
    let temp = TempDir::new().unwrap();
    let result = FileStore::builder().root(temp.path()).namespace("../up").connect().await;
    assert!(matches!(result, Err(StorageError::InvalidKey { .. })));
}

#[tokio::test]
async fn clear_only_touches_own_namespace() {
    let temp = TempDir::new().unwrap();
    let session = open(&temp, "session").await;
    let settings = open(&temp, "settings").await;

    session.write("access_token", "a").await.unwrap();
    session.write("tenant_id", "acme").await.unwrap();
    settings.write("theme", "dark").await.unwrap();
    std::fs::write(session.dir().join("README.txt"), "keep me").unwrap();

    assert_eq!(session.clear().await.unwrap(), 2);
    assert!(session.keys().await.unwrap().is_empty());
    assert!(session.dir().join("README.txt").exists());
    assert_eq!(settings.read("theme").await.unwrap().as_deref(), Some("dark"));
}

#[tokio::test]
async fn keys_are_listed_sorted_without_temp_files() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp, "session").await;

    store.write("user", "u").await.unwrap();
    store.write("access_token", "a").await.unwrap();
    std::fs::write(store.dir().join("user.entry.tstmp.99"), "partial").unwrap();

    assert_eq!(store.keys().await.unwrap(), vec!["access_token".to_owned(), "user".to_owned()]);
}

#[tokio::test]
async fn connect_without_create_requires_directory() {
    let temp = TempDir::new().unwrap();
    let result = FileStore::builder()
        .root(temp.path().join("absent"))
        .namespace("session")
        .create(false)
        .connect()
        .await;
    assert!(matches!(result, Err(StorageError::Io { .. })));
}
