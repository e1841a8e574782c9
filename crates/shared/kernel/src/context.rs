use crate::domain::config::{ClientConfig, ModuleConfig};
use crate::services::ServiceMap;
use crate::store::CredentialStore;
use std::ops::Deref;
use std::sync::Arc;

#[derive(Debug)]
pub struct ModuleContextInner {
    pub config: ClientConfig,
    pub store: Arc<dyn CredentialStore>,
    pub services: ServiceMap,
}

/// Everything an initializer may reach: configuration, the credential store and the shared
/// services other units (or the bootstrap) published. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ModuleContext {
    inner: Arc<ModuleContextInner>,
}

impl ModuleContext {
    #[must_use]
    pub fn new(config: ClientConfig, store: Arc<dyn CredentialStore>) -> Self {
        Self { inner: Arc::new(ModuleContextInner { config, store, services: ServiceMap::new() }) }
    }

    /// Settings configured for the unit called `name`.
    #[must_use]
    pub fn module_config(&self, name: &str) -> ModuleConfig {
        self.inner.config.module(name)
    }
}

impl Deref for ModuleContext {
    type Target = ModuleContextInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
