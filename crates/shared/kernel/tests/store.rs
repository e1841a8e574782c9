use std::sync::Arc;
use tessera_kernel::CredentialStore;
use tessera_kernel::MemoryCredentialStore;
use tessera_storage::FileStore;

async fn exercise(store: &dyn CredentialStore) {
    assert_eq!(store.read("access_token").await.unwrap(), None);

    store.write("access_token", "abc").await.unwrap();
    store.write("tenant_id", "acme").await.unwrap();
    assert_eq!(store.read("access_token").await.unwrap().as_deref(), Some("abc"));

    store.write("access_token", "def").await.unwrap();
    assert_eq!(store.read("access_token").await.unwrap().as_deref(), Some("def"));

    store.delete("access_token").await.unwrap();
    store.delete("access_token").await.unwrap();
    assert_eq!(store.read("access_token").await.unwrap(), None);

    store.clear().await.unwrap();
    assert_eq!(store.read("tenant_id").await.unwrap(), None);
}

#[tokio::test]
async fn memory_store_contract() {
    let store = MemoryCredentialStore::new();
    exercise(&store).await;
    assert!(store.is_empty());
}

#[tokio::test]
async fn file_store_contract() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::builder()
        .root(dir.path())
        .namespace("session")
        .create(true)
        .connect()
        .await
        .unwrap();
    exercise(&store).await;
}

#[tokio::test]
async fn file_store_rejects_traversal_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn CredentialStore> = Arc::new(
        FileStore::builder().root(dir.path()).create(true).connect().await.unwrap(),
    );

    assert!(store.write("../escape", "x").await.is_err());
    assert!(store.read("a/b").await.is_err());
}

#[test]
fn seeded_memory_store() {
    let store = MemoryCredentialStore::with_entries([("user", "{}"), ("tenant_id", "acme")]);
    assert_eq!(store.len(), 2);
    assert_eq!(store.get("tenant_id").as_deref(), Some("acme"));
}
