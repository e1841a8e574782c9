//! A small, sandboxed key/value store on top of the filesystem.
//!
//! Every key maps to one file under `<root>/<namespace>/`. The store backs the session
//! core's credential persistence, so it favors integrity over throughput.
//!
//! # Core Features
//!
//! - **Sandboxed Keys**: keys are validated so they can never address a path outside the
//!   namespace directory.
//! - **Atomic Writes**: unique temp file + `fsync` + `rename`; an entry is either the old or
//!   the new value, never a torn write.
//! - **Self-Healing**: orphaned temp files from crashed writes are purged on connect.
//!
//! # Example
//!
//! ```rust
//! use tessera_storage::{FileStore, StorageError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), StorageError> {
//!     # let tmp = tempfile::tempdir().unwrap();
//!     let store = FileStore::builder().root(tmp.path()).namespace("session").connect().await?;
//!
//!     store.write("access_token", "abc").await?;
//!     assert_eq!(store.read("access_token").await?.as_deref(), Some("abc"));
//!
//!     store.clear().await?;
//!     assert!(store.read("access_token").await?.is_none());
//!     Ok(())
//! }
//! ```

mod builder;
mod error;
mod maintenance;
mod security;
mod store;

pub use builder::FileStoreBuilder;
pub use error::{StorageError, StorageErrorExt};
pub use store::FileStore;
