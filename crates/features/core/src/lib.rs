//! Core feature unit. Every other unit depends on it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tessera_domain::constants::{modules, routes};
use tessera_domain::features::FeatureKind;
use tessera_kernel::{BoxError, FeatureUnit, ModuleContext, ModuleDescriptor, Route};
use tracing::info;

/// Facts about the running application, published for other units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub api_base_url: String,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct CoreModule {
    descriptor: ModuleDescriptor,
}

impl CoreModule {
    #[must_use]
    pub fn new() -> Self {
        Self { descriptor: ModuleDescriptor::new(modules::CORE, FeatureKind::Core) }
    }
}

impl Default for CoreModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeatureUnit for CoreModule {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    async fn initialize(&self, ctx: &ModuleContext) -> Result<(), BoxError> {
        let settings = ctx.module_config(modules::CORE);
        let name = settings
            .get("app_name")
            .and_then(|v| v.as_str())
            .unwrap_or("Tessera")
            .to_owned();

        let info = AppInfo {
            name,
            version: env!("CARGO_PKG_VERSION").to_owned(),
            api_base_url: ctx.config.api.base_url.clone(),
            started_at: Utc::now(),
        };
        info!(app = %info.name, version = %info.version, api = %info.api_base_url, "Core ready");

        ctx.services.provide(info);
        Ok(())
    }

    fn register_routes(&self) -> Vec<Route> {
        vec![Route::screen(routes::ROOT, "home"), Route::screen(routes::NOT_FOUND, "not_found")]
    }
}
