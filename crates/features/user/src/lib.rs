//! User feature unit: profile screens and the service behind them.

mod error;
mod service;

pub use error::{UserError, UserErrorExt};
pub use service::{ProfileUpdate, UserService};

use async_trait::async_trait;
use tessera_auth::ApiClient;
use tessera_domain::constants::{modules, routes};
use tessera_domain::features::FeatureKind;
use tessera_kernel::{BoxError, FeatureUnit, ModuleContext, ModuleDescriptor, Route, RouteGuard};

#[derive(Debug)]
pub struct UserModule {
    descriptor: ModuleDescriptor,
}

impl UserModule {
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: ModuleDescriptor::new(modules::USER, FeatureKind::User)
                .depends_on(modules::CORE)
                .depends_on(modules::AUTH),
        }
    }
}

impl Default for UserModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeatureUnit for UserModule {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    async fn initialize(&self, ctx: &ModuleContext) -> Result<(), BoxError> {
        let client = ctx.services.require::<ApiClient>()?;
        ctx.services.provide(UserService::new(ApiClient::clone(&client)));
        Ok(())
    }

    fn register_routes(&self) -> Vec<Route> {
        vec![
            Route::screen(routes::PROFILE, "profile").guard(RouteGuard::Authenticated),
            Route::screen(routes::USER_DETAILS, "user_details").guard(RouteGuard::Authenticated),
        ]
    }
}
