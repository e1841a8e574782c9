//! Kernel of the composition layer: everything a feature unit needs to plug into an
//! application without knowing about the others.
//!
//! * [`module::FeatureUnit`] is the contract every unit implements.
//! * [`registry::ModuleRegistry`] orders units by their declared dependencies, initializes
//!   them and aggregates their routes.
//! * [`context::ModuleContext`] is handed to each initializer; it carries configuration, the
//!   credential store and a type-keyed [`services::ServiceMap`].
//! * [`store::CredentialStore`] is the secure key/value capability the session core persists to.
//!
//! ## ID generation
//! Use `safe_nanoid!` for URL-safe, unambiguous IDs:
//! ```rust
//! # use tessera_kernel::safe_nanoid;
//! let id = safe_nanoid!();
//! assert_eq!(id.len(), 12);
//! ```
//!
//! ## Config loading
//! ```rust,ignore
//! use tessera_kernel::config::load_config;
//! use tessera_kernel::domain::config::ClientConfig;
//!
//! let cfg: ClientConfig = load_config(Some("tessera.toml")).unwrap();
//! ```
pub mod config;
pub mod context;
pub mod error;
pub mod module;
pub mod registry;
pub mod routes;
pub mod services;
pub mod store;

// Alphabet excludes visually ambiguous characters (I, O, l, 0, 1).
pub const SAFE_ALPHABET: &[char; 55] = &[
    '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L',
    'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f',
    'g', 'h', 'j', 'k', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

pub use nanoid::nanoid;
pub use tessera_domain as domain;

pub use context::ModuleContext;
pub use error::{RegistryError, RegistryErrorExt};
pub use module::{BoxError, FeatureUnit, ModuleDescriptor};
pub use registry::ModuleRegistry;
pub use routes::{Route, RouteGuard, RouteMatch, RouteParams, RouteTable, View};
pub use services::ServiceMap;
pub use store::{CredentialStore, MemoryCredentialStore, StoreError, StoreErrorExt};

/// Generates an unambiguous `NanoID` (no visually confusing characters).
#[macro_export]
macro_rules! safe_nanoid {
    () => {
        $crate::nanoid!(12, $crate::SAFE_ALPHABET)
    };
    ($size:expr) => {
        $crate::nanoid!($size, $crate::SAFE_ALPHABET)
    };
}
