#![allow(dead_code, unreachable_pub)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tessera::domain::config::ClientConfig;
use tessera::domain::features::FeatureKind;
use tessera::http::{HttpError, HttpRequest, HttpResponse, Method, Transport};
use tessera::kernel::{
    BoxError, FeatureUnit, MemoryCredentialStore, ModuleContext, ModuleDescriptor, Route,
};
use tessera::{App, AppBuilder};

pub const TENANT: &str = "acme";

/// Replies queued per `METHOD path`; anything unscripted gets a `404`.
#[derive(Debug, Default)]
pub struct MockTransport {
    scripts: Mutex<HashMap<String, VecDeque<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, method: Method, path: &str, status: u16, body: Value) {
        self.scripts
            .lock()
            .entry(format!("{method} {path}"))
            .or_default()
            .push_back(HttpResponse::with_json(status, &body));
    }

    pub fn calls(&self, path: &str) -> usize {
        self.requests.lock().iter().filter(|r| r.path() == path).count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let key = format!("{} {}", request.method(), request.path());
        self.requests.lock().push(request);
        let scripted = self.scripts.lock().get_mut(&key).and_then(VecDeque::pop_front);
        Ok(scripted.unwrap_or_else(|| HttpResponse::with_json(404, &json!({ "message": key }))))
    }
}

/// Unit recording its lifecycle into a shared journal.
#[derive(Debug)]
pub struct Extension {
    descriptor: ModuleDescriptor,
    journal: Arc<Mutex<Vec<String>>>,
    routes: Vec<Route>,
}

impl Extension {
    pub fn new(
        name: &'static str,
        deps: &[&'static str],
        journal: &Arc<Mutex<Vec<String>>>,
    ) -> Self {
        let descriptor = deps
            .iter()
            .fold(ModuleDescriptor::new(name, FeatureKind::Extension), |d, dep| d.depends_on(*dep));
        Self { descriptor, journal: Arc::clone(journal), routes: Vec::new() }
    }

    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn arc(self) -> Arc<dyn FeatureUnit> {
        Arc::new(self)
    }
}

#[async_trait]
impl FeatureUnit for Extension {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    async fn initialize(&self, _ctx: &ModuleContext) -> Result<(), BoxError> {
        self.journal.lock().push(format!("init:{}", self.name()));
        Ok(())
    }

    fn register_routes(&self) -> Vec<Route> {
        self.routes.clone()
    }

    fn dispose(&self) {
        self.journal.lock().push(format!("dispose:{}", self.name()));
    }
}

pub fn user_json() -> Value {
    json!({
        "id": "u-1",
        "email": "ada@acme.io",
        "display_name": "Ada",
        "tenant_id": TENANT,
        "created_at": "2026-01-01T00:00:00Z",
        "updated_at": "2026-01-02T00:00:00Z"
    })
}

pub fn persisted_store() -> Arc<MemoryCredentialStore> {
    Arc::new(MemoryCredentialStore::with_entries([
        ("access_token", "access-1".to_owned()),
        ("refresh_token", "refresh-1".to_owned()),
        ("tenant_id", TENANT.to_owned()),
        ("user", user_json().to_string()),
    ]))
}

/// Builder wired to in-memory doubles.
pub fn builder(transport: &Arc<MockTransport>, store: Arc<MemoryCredentialStore>) -> AppBuilder {
    App::builder().config(ClientConfig::default()).transport(transport.clone()).store(store)
}
