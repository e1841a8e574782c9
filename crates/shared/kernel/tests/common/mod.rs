#![allow(dead_code, unreachable_pub)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tessera_kernel::domain::config::ClientConfig;
use tessera_kernel::domain::features::FeatureKind;
use tessera_kernel::{
    BoxError, FeatureUnit, MemoryCredentialStore, ModuleContext, ModuleDescriptor, Route,
};

/// Shared journal of lifecycle calls, e.g. `init:core`, `dispose:auth`.
pub type Journal = Arc<Mutex<Vec<String>>>;

#[derive(Debug)]
pub struct TestUnit {
    descriptor: ModuleDescriptor,
    journal: Journal,
    routes: Vec<(&'static str, &'static str)>,
    fail: bool,
}

impl TestUnit {
    pub fn new(name: &'static str, deps: &[&'static str], journal: &Journal) -> Self {
        Self::tagged(name, FeatureKind::Extension, deps, journal)
    }

    pub fn tagged(
        name: &'static str,
        kind: FeatureKind,
        deps: &[&'static str],
        journal: &Journal,
    ) -> Self {
        let descriptor =
            deps.iter().fold(ModuleDescriptor::new(name, kind), |d, dep| d.depends_on(*dep));
        Self { descriptor, journal: Arc::clone(journal), routes: Vec::new(), fail: false }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn route(mut self, path: &'static str, screen: &'static str) -> Self {
        self.routes.push((path, screen));
        self
    }

    pub fn arc(self) -> Arc<dyn FeatureUnit> {
        Arc::new(self)
    }
}

#[async_trait]
impl FeatureUnit for TestUnit {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    async fn initialize(&self, _ctx: &ModuleContext) -> Result<(), BoxError> {
        if self.fail {
            self.journal.lock().push(format!("fail:{}", self.name()));
            return Err(format!("{} refused to start", self.name()).into());
        }
        self.journal.lock().push(format!("init:{}", self.name()));
        Ok(())
    }

    fn register_routes(&self) -> Vec<Route> {
        self.routes.iter().map(|(path, screen)| Route::screen(*path, screen)).collect()
    }

    fn dispose(&self) {
        self.journal.lock().push(format!("dispose:{}", self.name()));
    }
}

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().clone()
}

pub fn context() -> ModuleContext {
    ModuleContext::new(ClientConfig::default(), Arc::new(MemoryCredentialStore::new()))
}
