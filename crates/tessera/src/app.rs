use crate::error::{AppError, AppErrorExt};
use crate::features::built_in;
use std::sync::Arc;
use std::time::Duration;
use tessera_auth::{ApiClient, SessionManager};
use tessera_domain::config::ClientConfig;
use tessera_domain::constants::routes;
use tessera_http::{HttpTransport, Transport};
use tessera_kernel::{
    CredentialStore, FeatureUnit, ModuleContext, ModuleRegistry, RouteGuard, RouteTable, View,
};
use tessera_storage::FileStore;
use tracing::{debug, info};

/// A fluent builder for configuring and starting an [`App`].
#[must_use = "builders do nothing unless you call .start()"]
#[derive(Debug, Default)]
pub struct AppBuilder {
    config: ClientConfig,
    store: Option<Arc<dyn CredentialStore>>,
    transport: Option<Arc<dyn Transport>>,
    modules: Vec<Arc<dyn FeatureUnit>>,
    skip_built_in: bool,
}

impl AppBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the file-backed credential store derived from `storage`.
    pub fn store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replaces the `reqwest` transport derived from `api`.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Adds a unit registered after the built-in ones.
    pub fn module(mut self, unit: Arc<dyn FeatureUnit>) -> Self {
        self.modules.push(unit);
        self
    }

    /// Starts with only the units added through [`AppBuilder::module`].
    pub const fn without_built_in(mut self) -> Self {
        self.skip_built_in = true;
        self
    }

    async fn init_store(&self) -> Result<Arc<dyn CredentialStore>, AppError> {
        if let Some(store) = &self.store {
            return Ok(store.clone());
        }

        let storage = &self.config.storage;
        let store = FileStore::builder()
            .root(&storage.data_dir)
            .namespace(&storage.namespace)
            .create(true)
            .connect()
            .await
            .context("Failed to open the session store")?;
        info!(dir = %store.dir().display(), "Credential store ready");
        Ok(Arc::new(store))
    }

    fn init_transport(&self) -> Result<Arc<dyn Transport>, AppError> {
        if let Some(transport) = &self.transport {
            return Ok(transport.clone());
        }

        let api = &self.config.api;
        let transport = HttpTransport::builder()
            .timeout(Duration::from_secs(api.timeout_seconds))
            .user_agent(&api.user_agent)
            .base_url(&api.base_url)
            .build()
            .context("Failed to build the API transport")?;
        Ok(Arc::new(transport))
    }

    /// Builds the session core and runs every unit's initializer.
    ///
    /// # Process
    /// 1. Opens the credential store and the transport (custom ones win).
    /// 2. Builds the [`SessionManager`] and the authenticated [`ApiClient`].
    /// 3. Publishes both in the module context for units to consume.
    /// 4. Registers the built-in units, then the added ones.
    /// 5. Initializes in dependency order and collects the route table.
    ///
    /// # Errors
    ///
    /// Fails when storage or transport cannot be set up, or when module composition fails
    /// (duplicate, missing dependency, cycle, initializer error).
    pub async fn start(self) -> Result<App, AppError> {
        let store = self.init_store().await?;
        let transport = self.init_transport()?;

        let session = SessionManager::builder()
            .transport(transport.clone())
            .store(store.clone())
            .tenant_header(&self.config.api.tenant_header)
            .build()
            .context("Failed to build the session manager")?;
        let client = ApiClient::with_session(transport, session.clone());

        let ctx = ModuleContext::new(self.config.clone(), store);
        ctx.services.provide(session.clone());
        ctx.services.provide(client.clone());

        let mut registry = ModuleRegistry::new();
        if !self.skip_built_in {
            registry.register_all(built_in())?;
        }
        registry.register_all(self.modules)?;

        info!(order = ?registry.resolve_order()?, "Starting modules");
        registry.initialize_all(&ctx).await?;

        let routes = registry.routes();
        info!(
            modules = registry.len(),
            routes = routes.len(),
            authenticated = session.is_authenticated(),
            "Application started"
        );

        Ok(App { config: self.config, registry, routes, ctx, session, client })
    }
}

/// Result of resolving a path against the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// The path actually presented after guards and fallbacks.
    pub path: String,
    pub view: View,
    pub redirected: bool,
}

/// A started application: initialized units, their routes and the shared session.
#[derive(Debug)]
pub struct App {
    config: ClientConfig,
    registry: ModuleRegistry,
    routes: RouteTable,
    ctx: ModuleContext,
    session: SessionManager,
    client: ApiClient,
}

impl App {
    pub fn builder() -> AppBuilder {
        AppBuilder::default()
    }

    #[must_use]
    pub const fn session(&self) -> &SessionManager {
        &self.session
    }

    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub const fn routes(&self) -> &RouteTable {
        &self.routes
    }

    #[must_use]
    pub const fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn context(&self) -> &ModuleContext {
        &self.ctx
    }

    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Where the shell starts: the home route with a session, the login route without.
    #[must_use]
    pub fn initial_route(&self) -> &str {
        let nav = &self.config.navigation;
        if self.session.is_authenticated() { &nav.home_route } else { &nav.login_route }
    }

    /// Resolves `path`, applying route guards against the current session.
    ///
    /// Guarded routes redirect once: to the login route without a session, to the home route
    /// with one. Unknown paths land on `/not-found`.
    #[must_use]
    pub fn navigate(&self, path: &str) -> Navigation {
        let Some(found) = self.routes.resolve(path) else {
            debug!(path, "No route matched");
            return self.not_found();
        };

        let authenticated = self.session.is_authenticated();
        let nav = &self.config.navigation;
        let redirect = match found.route.access() {
            RouteGuard::Authenticated if !authenticated => Some(nav.login_route.as_str()),
            RouteGuard::GuestOnly if authenticated => Some(nav.home_route.as_str()),
            _ => None,
        };

        match redirect {
            Some(target) if target != path => {
                info!(from = %path, to = %target, guard = %found.route.access(), "Redirected");
                let mut next = self.resolve_unguarded(target);
                next.redirected = true;
                next
            },
            _ => Navigation { path: path.to_owned(), view: found.render(), redirected: false },
        }
    }

    /// Disposes every unit. The app is unusable afterwards.
    pub fn shutdown(mut self) {
        self.registry.dispose_all();
        info!("Application stopped");
    }

    fn resolve_unguarded(&self, path: &str) -> Navigation {
        self.routes.resolve(path).map_or_else(
            || self.not_found(),
            |found| Navigation { path: path.to_owned(), view: found.render(), redirected: false },
        )
    }

    fn not_found(&self) -> Navigation {
        let view = self
            .routes
            .resolve(routes::NOT_FOUND)
            .map_or_else(|| View::new("not_found"), |found| found.render());
        Navigation { path: routes::NOT_FOUND.to_owned(), view, redirected: true }
    }
}
