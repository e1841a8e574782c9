use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tessera_domain::constants::{modules, routes};
use tessera_domain::features::FeatureKind;
use tessera_domain::session::SessionEvent;
use tessera_kernel::{
    BoxError, FeatureUnit, ModuleContext, ModuleDescriptor, Route, RouteGuard,
};
use tracing::info;

use crate::listener::ListenerId;
use crate::session::SessionManager;

/// Restores the persisted session during start-up and serves the sign-in screens.
///
/// Expects the bootstrap to have published a [`SessionManager`] in the context services.
#[derive(Debug)]
pub struct AuthModule {
    descriptor: ModuleDescriptor,
    installed: Mutex<Option<(SessionManager, ListenerId)>>,
}

impl AuthModule {
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: ModuleDescriptor::new(modules::AUTH, FeatureKind::Auth)
                .depends_on(modules::CORE),
            installed: Mutex::new(None),
        }
    }
}

impl Default for AuthModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeatureUnit for AuthModule {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    async fn initialize(&self, ctx: &ModuleContext) -> Result<(), BoxError> {
        let session = ctx.services.require::<SessionManager>()?;

        let id = session.add_listener(Arc::new(|event: &SessionEvent| {
            info!(
                change = ?event.change,
                authenticated = event.snapshot.authenticated,
                "Session changed"
            );
        }));
        *self.installed.lock() = Some((SessionManager::clone(&session), id));

        session.restore().await;
        Ok(())
    }

    fn register_routes(&self) -> Vec<Route> {
        vec![
            Route::screen(routes::LOGIN, "login").guard(RouteGuard::GuestOnly),
            Route::screen(routes::REGISTER, "register").guard(RouteGuard::GuestOnly),
        ]
    }

    fn dispose(&self) {
        if let Some((session, id)) = self.installed.lock().take() {
            session.remove_listener(id);
        }
    }
}
