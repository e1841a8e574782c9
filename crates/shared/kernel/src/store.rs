use async_trait::async_trait;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::borrow::Cow;
use std::fmt::Debug;
use tessera_storage::{FileStore, StorageError};

#[tessera_derive::tessera_error]
pub enum StoreError {
    #[error("Credential store backend error{}: {source}", format_context(.context))]
    Backend { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("Internal credential store error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Secure key/value persistence for session material.
///
/// Encryption at rest, if any, is the implementation's business.
#[async_trait]
pub trait CredentialStore: Send + Sync + Debug {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Removes every entry this store owns.
    async fn clear(&self) -> Result<(), StoreError>;
}

/// Process-local store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<FxHashMap<String, String>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store, mostly to stage a persisted session in tests.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self { entries: RwLock::new(entries) }
    }

    /// Synchronous peek, handy for assertions.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get(key))
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.write().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.entries.write().clear();
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FileStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(Self::read(self, key).await?)
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Ok(Self::write(self, key, value).await?)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        Self::delete(self, key).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        Self::clear(self).await?;
        Ok(())
    }
}
