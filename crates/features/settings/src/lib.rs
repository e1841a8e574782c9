//! Settings feature unit.
//!
//! Preferences are stored as one JSON document under [`PREFERENCES_KEY`] in the credential
//! store, next to (but never overlapping) the session entries. Defaults come from the
//! `[modules.settings]` configuration table.

mod error;
mod preferences;

pub use error::{SettingsError, SettingsErrorExt};
pub use preferences::{PREFERENCES_KEY, Preferences, SettingsService, Theme};

use async_trait::async_trait;
use tessera_domain::constants::{modules, routes};
use tessera_domain::features::FeatureKind;
use tessera_kernel::{BoxError, FeatureUnit, ModuleContext, ModuleDescriptor, Route, RouteGuard};
use tracing::debug;

#[derive(Debug)]
pub struct SettingsModule {
    descriptor: ModuleDescriptor,
}

impl SettingsModule {
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: ModuleDescriptor::new(modules::SETTINGS, FeatureKind::Settings)
                .depends_on(modules::CORE),
        }
    }
}

impl Default for SettingsModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeatureUnit for SettingsModule {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    async fn initialize(&self, ctx: &ModuleContext) -> Result<(), BoxError> {
        let defaults = Preferences::from_config(&ctx.module_config(modules::SETTINGS))?;
        debug!(?defaults, "Settings defaults resolved");
        ctx.services.provide(SettingsService::new(ctx.store.clone(), defaults));
        Ok(())
    }

    fn register_routes(&self) -> Vec<Route> {
        vec![Route::screen(routes::SETTINGS, "settings").guard(RouteGuard::Authenticated)]
    }
}
