//! The [`FileStore`] handle: one file per key, atomic replacement on write.

use crate::builder::FileStoreBuilder;
use crate::error::{StorageError, StorageErrorExt};
use crate::maintenance;
use crate::security;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

#[derive(Debug)]
pub(crate) struct FileStoreInner {
    /// Canonical `<root>/<namespace>` directory.
    pub(crate) dir: PathBuf,
    pub(crate) namespace: String,
    /// Source of unique temp file names for concurrent writers.
    pub(crate) tmp_counter: AtomicU64,
}

/// A thread-safe handle to a file-backed key/value namespace.
///
/// The handle is reference-counted and cheap to clone.
#[derive(Debug, Clone)]
pub struct FileStore {
    pub(crate) inner: Arc<FileStoreInner>,
}

impl FileStore {
    #[must_use = "The store is not opened until you call .connect()"]
    pub fn builder() -> FileStoreBuilder {
        FileStoreBuilder::new()
    }

    /// The directory holding this namespace's entries.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.inner.dir
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    /// Physical path of the entry backing `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] if the key is not a legal entry name.
    pub fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        security::entry_path(&self.inner.dir, key)
    }

    /// Reads the value stored under `key`, or `None` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] on hardware or permission failures and
    /// [`StorageError::Encoding`] if the entry is not UTF-8.
    pub async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.resolve(key)?;

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(StorageError::Io {
                    source: err,
                    context: Some(format!("Read failed: {}", path.display()).into()),
                });
            },
        };

        String::from_utf8(bytes).map(Some).context(format!("Entry '{key}'"))
    }

    /// Stores `value` under `key`, replacing any previous value atomically.
    ///
    /// The value is written to a unique temp file, synced to disk, then renamed over the
    /// entry. A crash leaves either the old or the new value in place.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] for illegal keys and [`StorageError::Io`] if the
    /// disk write fails.
    pub async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.resolve(key)?;
        let temp = self.unique_tmp_path(&path);

        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(value.as_bytes()).await.context("Write failed")?;
            file.sync_all().await.context("Hardware sync failed")?;
        }

        if let Err(err) = fs::rename(&temp, &path).await {
            // Some platforms refuse to rename over an existing file.
            if err.kind() == ErrorKind::AlreadyExists {
                fs::remove_file(&path)
                    .await
                    .context(format!("Failed to replace entry: {}", path.display()))?;
                fs::rename(&temp, &path).await.context(format!(
                    "Atomic swap failed: {} -> {}",
                    temp.display(),
                    path.display()
                ))?;
            } else {
                let _ = fs::remove_file(&temp).await;
                return Err(StorageError::Io {
                    source: err,
                    context: Some(format!("Atomic swap failed: {}", path.display()).into()),
                });
            }
        }

        self.sync_dir().await;

        debug!(namespace = %self.inner.namespace, key, "Entry saved atomically");
        Ok(())
    }

    /// Removes `key`. Returns whether an entry existed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the entry exists but cannot be removed.
    pub async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(namespace = %self.inner.namespace, key, "Entry deleted");
                Ok(true)
            },
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(StorageError::Io {
                source: err,
                context: Some(format!("Failed to delete: {}", path.display()).into()),
            }),
        }
    }

    /// Lists the keys currently stored in this namespace, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the namespace directory cannot be listed.
    pub async fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut dir = fs::read_dir(&self.inner.dir)
            .await
            .context(format!("Failed to list: {}", self.inner.dir.display()))?;

        let mut keys = Vec::new();
        while let Some(entry) = dir.next_entry().await.context("Failed to read directory entry")? {
            if let Some(key) = security::key_of(&entry.path()) {
                keys.push(key.to_owned());
            }
        }
        keys.sort_unstable();
        Ok(keys)
    }

    /// Removes every entry of this namespace. Files that are not entries are left alone.
    ///
    /// Returns the number of removed entries.
    ///
    /// # Errors
    ///
    /// Returns the first [`StorageError`] hit; entries removed before it stay removed.
    pub async fn clear(&self) -> Result<usize, StorageError> {
        let mut removed = 0;
        for key in self.keys().await? {
            if self.delete(&key).await? {
                removed += 1;
            }
        }
        debug!(namespace = %self.inner.namespace, removed, "Namespace cleared");
        Ok(removed)
    }

    pub async fn purge_tmp(&self) {
        maintenance::purge_tmp(&self.inner.dir).await;
    }

    fn unique_tmp_path(&self, target: &Path) -> PathBuf {
        let counter = self.inner.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("entry");
        target.with_file_name(format!("{file_name}{}{counter}", security::TMP_MARKER))
    }

    async fn sync_dir(&self) {
        let dir = &self.inner.dir;
        match fs::File::open(dir).await {
            Ok(handle) => {
                if let Err(err) = handle.sync_all().await {
                    warn!(path = %dir.display(), error = %err, "Directory sync failed");
                }
            },
            Err(err) => {
                warn!(path = %dir.display(), error = %err, "Directory open failed");
            },
        }
    }
}
