//! Dashboard feature unit.

mod error;
mod service;

pub use error::{DashboardError, DashboardErrorExt};
pub use service::{Activity, DashboardService, DashboardSummary};

use async_trait::async_trait;
use tessera_auth::ApiClient;
use tessera_domain::constants::{modules, routes};
use tessera_domain::features::FeatureKind;
use tessera_kernel::{BoxError, FeatureUnit, ModuleContext, ModuleDescriptor, Route, RouteGuard};

#[derive(Debug)]
pub struct DashboardModule {
    descriptor: ModuleDescriptor,
}

impl DashboardModule {
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: ModuleDescriptor::new(modules::DASHBOARD, FeatureKind::Dashboard)
                .depends_on(modules::CORE)
                .depends_on(modules::AUTH),
        }
    }
}

impl Default for DashboardModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeatureUnit for DashboardModule {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    async fn initialize(&self, ctx: &ModuleContext) -> Result<(), BoxError> {
        let client = ctx.services.require::<ApiClient>()?;
        ctx.services.provide(DashboardService::new(ApiClient::clone(&client)));
        Ok(())
    }

    fn register_routes(&self) -> Vec<Route> {
        vec![Route::screen(routes::DASHBOARD, "dashboard").guard(RouteGuard::Authenticated)]
    }
}
