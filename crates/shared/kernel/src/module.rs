use crate::context::ModuleContext;
use crate::domain::config::ModuleConfig;
use crate::domain::features::FeatureKind;
use crate::routes::Route;
use async_trait::async_trait;
use std::borrow::Cow;
use std::fmt::Debug;

/// Error type returned by unit initializers; the registry wraps it with the unit's name.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Static description of a feature unit: who it is and what it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDescriptor {
    name: Cow<'static, str>,
    kind: FeatureKind,
    dependencies: Vec<Cow<'static, str>>,
    config: ModuleConfig,
}

impl ModuleDescriptor {
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>, kind: FeatureKind) -> Self {
        Self { name: name.into(), kind, dependencies: Vec::new(), config: ModuleConfig::new() }
    }

    #[must_use]
    pub fn depends_on(mut self, dependency: impl Into<Cow<'static, str>>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: ModuleConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> FeatureKind {
        self.kind
    }

    #[must_use]
    pub fn dependencies(&self) -> &[Cow<'static, str>] {
        &self.dependencies
    }

    #[must_use]
    pub const fn config(&self) -> &ModuleConfig {
        &self.config
    }
}

/// A self-contained feature contributing services and routes to the application.
///
/// Units are registered into a [`ModuleRegistry`](crate::registry::ModuleRegistry), which
/// initializes them after every unit named in [`dependencies`](Self::dependencies). State a
/// unit builds during `initialize` lives behind interior mutability or is published into the
/// context's [`ServiceMap`](crate::services::ServiceMap).
///
/// ```rust
/// use async_trait::async_trait;
/// use tessera_kernel::domain::features::FeatureKind;
/// use tessera_kernel::{BoxError, FeatureUnit, ModuleContext, ModuleDescriptor, Route};
///
/// #[derive(Debug)]
/// struct Reports {
///     descriptor: ModuleDescriptor,
/// }
///
/// #[async_trait]
/// impl FeatureUnit for Reports {
///     fn descriptor(&self) -> &ModuleDescriptor {
///         &self.descriptor
///     }
///
///     async fn initialize(&self, _ctx: &ModuleContext) -> Result<(), BoxError> {
///         Ok(())
///     }
///
///     fn register_routes(&self) -> Vec<Route> {
///         vec![Route::screen("/reports", "reports")]
///     }
/// }
///
/// let unit = Reports {
///     descriptor: ModuleDescriptor::new("reports", FeatureKind::Extension).depends_on("auth"),
/// };
/// assert_eq!(unit.dependencies(), ["auth"]);
/// ```
#[async_trait]
pub trait FeatureUnit: Send + Sync + Debug {
    fn descriptor(&self) -> &ModuleDescriptor;

    /// Unique, non-empty name within a registry.
    fn name(&self) -> &str {
        self.descriptor().name()
    }

    fn kind(&self) -> FeatureKind {
        self.descriptor().kind()
    }

    fn dependencies(&self) -> &[Cow<'static, str>] {
        self.descriptor().dependencies()
    }

    /// Runs once, after all dependencies initialized successfully.
    async fn initialize(&self, ctx: &ModuleContext) -> Result<(), BoxError>;

    /// Path to handler contributions; consulted only after initialization.
    fn register_routes(&self) -> Vec<Route> {
        Vec::new()
    }

    /// Releases whatever `initialize` acquired.
    fn dispose(&self) {}
}
