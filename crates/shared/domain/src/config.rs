use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level client configuration shared across slices.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfigInner {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub navigation: NavigationConfig,
    pub tenant: TenantConfig,
    /// Opaque per-unit settings keyed by feature unit name.
    pub modules: BTreeMap<String, ModuleConfig>,
}

/// Thin Arc-wrapped config for inexpensive cloning into feature units.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(flatten)]
    inner: Arc<ClientConfigInner>,
}

impl ClientConfig {
    /// Settings of a single feature unit, empty when none are configured.
    #[must_use]
    pub fn module(&self, name: &str) -> ModuleConfig {
        self.inner.modules.get(name).cloned().unwrap_or_default()
    }
}

impl Deref for ClientConfig {
    type Target = ClientConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ClientConfig {
    fn deref_mut(&mut self) -> &mut ClientConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Opaque configuration map of a feature unit.
pub type ModuleConfig = BTreeMap<String, Value>;

/// Remote API endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Request timeout enforced by the HTTP transport.
    pub timeout_seconds: u64,
    pub tenant_header: String,
    pub user_agent: String,
}

/// Where the credential store keeps its entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub namespace: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: Option<PathBuf>,
    pub json: bool,
}

/// Routes the shell starts from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub home_route: String,
    pub login_route: String,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TenantConfig {
    pub default_id: Option<String>,
}

// --- Default ---

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4583/api".to_owned(),
            timeout_seconds: 30,
            tenant_header: crate::constants::headers::TENANT.to_owned(),
            user_agent: concat!("tessera/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: PathBuf::from(".tessera"), namespace: "session".to_owned() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), directory: None, json: false }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            home_route: crate::constants::routes::DASHBOARD.to_owned(),
            login_route: crate::constants::routes::LOGIN.to_owned(),
        }
    }
}
