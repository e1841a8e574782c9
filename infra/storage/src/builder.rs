use crate::error::{StorageError, StorageErrorExt};
use crate::security;
use crate::store::{FileStore, FileStoreInner};
use private::Sealed;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::fs;
use tracing::info;

const DEFAULT_NAMESPACE: &str = "default";

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

#[allow(private_bounds)]
#[derive(Debug)]
pub struct FileStoreBuilder<S: Sealed = NoRoot> {
    state: S,
    namespace: String,
    create: bool,
}

impl Default for FileStoreBuilder<NoRoot> {
    fn default() -> Self {
        Self { state: NoRoot, namespace: DEFAULT_NAMESPACE.to_owned(), create: true }
    }
}

#[allow(private_bounds)]
impl<S: Sealed> FileStoreBuilder<S> {
    /// Sets the sub-directory all keys of this store live in.
    #[must_use = "Sets the namespace of the store"]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    #[must_use = "Sets whether missing directories are created on connect"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.create = enable;
        self
    }

    fn transition<N: Sealed>(self, state: N) -> FileStoreBuilder<N> {
        FileStoreBuilder { state, namespace: self.namespace, create: self.create }
    }
}

impl FileStoreBuilder<NoRoot> {
    #[must_use = "Creates a new store builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the root directory of the store"]
    pub fn root(self, path: impl Into<PathBuf>) -> FileStoreBuilder<WithRoot> {
        self.transition(WithRoot(path.into()))
    }
}

impl FileStoreBuilder<WithRoot> {
    /// Validates the configuration and opens the store.
    ///
    /// Boot sequence: validate the namespace, create `<root>/<namespace>` when `create(true)`,
    /// canonicalize it, then purge temp files orphaned by earlier crashes.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] for an illegal namespace and
    /// [`StorageError::Io`] when the directory is missing (with `create(false)`) or cannot be
    /// resolved.
    pub async fn connect(self) -> Result<FileStore, StorageError> {
        security::validate_name("namespace", &self.namespace)?;
        let dir = self.state.0.join(&self.namespace);

        if self.create {
            fs::create_dir_all(&dir)
                .await
                .context(format!("Failed to bootstrap store directory: {}", dir.display()))?;
            info!(path = %dir.display(), "Bootstrapped credential store directory");
        }

        let canonical = fs::canonicalize(&dir)
            .await
            .context(format!("Failed to resolve store directory: {}", dir.display()))?;

        let store = FileStore {
            inner: Arc::new(FileStoreInner {
                dir: canonical,
                namespace: self.namespace,
                tmp_counter: AtomicU64::new(1),
            }),
        };

        store.purge_tmp().await;

        Ok(store)
    }
}
