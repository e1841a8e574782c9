//! Dependency-ordered composition of feature units.
//!
//! Ordering is a depth-first traversal over units in registration order, with every unit in
//! one of three states: unvisited, in progress (on the current traversal path) or done.
//! Reaching an in-progress unit again means the dependency graph has a cycle.
//!
//! [`ModuleRegistry::initialize_all`] checks every declared dependency up front, so a missing
//! dependency is reported before any initializer runs. It then initializes the units each
//! traversal root completes before moving to the next root: when a cycle is only reachable
//! from a later root, the units ordered before it are already initialized once the error
//! surfaces.

use crate::context::ModuleContext;
use crate::domain::features::FeatureKind;
use crate::error::RegistryError;
use crate::module::FeatureUnit;
use crate::routes::RouteTable;
use fxhash::{FxHashMap, FxHashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Owns the registered units and tracks which of them initialized.
#[derive(Default)]
pub struct ModuleRegistry {
    units: Vec<Arc<dyn FeatureUnit>>,
    index: FxHashMap<String, usize>,
    initialized: FxHashSet<usize>,
    /// Indices in the order their initializers succeeded.
    init_order: Vec<usize>,
}

impl ModuleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a unit.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidModule`] for an empty name, [`RegistryError::DuplicateModule`]
    /// when the name is taken.
    pub fn register(&mut self, unit: Arc<dyn FeatureUnit>) -> Result<(), RegistryError> {
        let name = unit.name();
        if name.trim().is_empty() {
            return Err(RegistryError::InvalidModule {
                message: "Module name must not be empty".into(),
                context: Some(format!("kind {}", unit.kind()).into()),
            });
        }
        if self.index.contains_key(name) {
            return Err(RegistryError::DuplicateModule { unit: name.to_owned() });
        }

        debug!(module = %name, kind = %unit.kind(), "Module registered");
        self.index.insert(name.to_owned(), self.units.len());
        self.units.push(unit);
        Ok(())
    }

    /// Registers units in order, stopping at the first failure. Units registered before the
    /// failure stay registered.
    pub fn register_all<I>(&mut self, units: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = Arc<dyn FeatureUnit>>,
    {
        units.into_iter().try_for_each(|unit| self.register(unit))
    }

    /// Initializes every registered unit after its dependencies.
    ///
    /// Units are initialized one at a time and marked initialized only once their initializer
    /// succeeded. A failure stops the run without undoing earlier units; calling again skips
    /// what already initialized.
    ///
    /// # Errors
    ///
    /// * [`RegistryError::MissingDependency`] before any initializer runs.
    /// * [`RegistryError::CircularDependency`] naming the unit the cycle was detected at.
    /// * [`RegistryError::Initialization`] wrapping the failing unit's error.
    pub async fn initialize_all(&mut self, ctx: &ModuleContext) -> Result<(), RegistryError> {
        self.check_dependencies()?;

        let mut marks = vec![None; self.units.len()];
        for root in 0..self.units.len() {
            let mut batch = Vec::new();
            self.visit(root, &mut marks, &mut batch)?;
            for idx in batch {
                self.initialize_unit(idx, ctx).await?;
            }
        }

        info!(modules = self.init_order.len(), "All modules initialized");
        Ok(())
    }

    /// The initialization order, computed without running anything.
    ///
    /// # Errors
    ///
    /// Same ordering errors as [`initialize_all`](Self::initialize_all).
    pub fn resolve_order(&self) -> Result<Vec<&str>, RegistryError> {
        self.check_dependencies()?;

        let mut marks = vec![None; self.units.len()];
        let mut order = Vec::with_capacity(self.units.len());
        for root in 0..self.units.len() {
            self.visit(root, &mut marks, &mut order)?;
        }
        Ok(order.into_iter().map(|idx| self.units[idx].name()).collect())
    }

    /// Union of every unit's routes, in registration order. A later unit registering an
    /// existing path replaces the earlier handler.
    #[must_use]
    pub fn routes(&self) -> RouteTable {
        let mut table = RouteTable::new();
        for unit in &self.units {
            for route in unit.register_routes() {
                let route = route.with_owner(unit.name());
                if let Some(previous) = table.insert(route) {
                    warn!(
                        path = %previous.path(),
                        previous = %previous.owner(),
                        module = %unit.name(),
                        "Route registered twice, keeping the later handler"
                    );
                }
            }
        }
        table
    }

    /// First registered unit tagged with `kind`.
    #[must_use]
    pub fn get_module(&self, kind: FeatureKind) -> Option<Arc<dyn FeatureUnit>> {
        self.units.iter().find(|unit| unit.kind() == kind).cloned()
    }

    #[must_use]
    pub fn get_module_by_name(&self, name: &str) -> Option<Arc<dyn FeatureUnit>> {
        self.index.get(name).map(|&idx| Arc::clone(&self.units[idx]))
    }

    #[must_use]
    pub fn is_initialized(&self, name: &str) -> bool {
        self.index.get(name).is_some_and(|idx| self.initialized.contains(idx))
    }

    /// Names of initialized units, in initialization order.
    #[must_use]
    pub fn initialized_modules(&self) -> Vec<&str> {
        self.init_order.iter().map(|&idx| self.units[idx].name()).collect()
    }

    /// Names of registered units, in registration order.
    #[must_use]
    pub fn module_names(&self) -> Vec<&str> {
        self.units.iter().map(|unit| unit.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Tears every unit down and forgets all of them.
    ///
    /// Initialized units are disposed in reverse initialization order, then the remaining ones
    /// in reverse registration order.
    pub fn dispose_all(&mut self) {
        for &idx in self.init_order.iter().rev() {
            debug!(module = %self.units[idx].name(), "Disposing module");
            self.units[idx].dispose();
        }
        for (idx, unit) in self.units.iter().enumerate().rev() {
            if !self.initialized.contains(&idx) {
                debug!(module = %unit.name(), "Disposing uninitialized module");
                unit.dispose();
            }
        }

        info!(modules = self.units.len(), "All modules disposed");
        self.units.clear();
        self.index.clear();
        self.initialized.clear();
        self.init_order.clear();
    }

    fn check_dependencies(&self) -> Result<(), RegistryError> {
        for unit in &self.units {
            if let Some(missing) =
                unit.dependencies().iter().find(|dep| !self.index.contains_key(dep.as_ref()))
            {
                return Err(RegistryError::MissingDependency {
                    unit: unit.name().to_owned(),
                    dependency: missing.to_string(),
                });
            }
        }
        Ok(())
    }

    fn visit(
        &self,
        idx: usize,
        marks: &mut [Option<Mark>],
        order: &mut Vec<usize>,
    ) -> Result<(), RegistryError> {
        let unit = &self.units[idx];
        match marks[idx] {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::InProgress) => {
                return Err(RegistryError::CircularDependency { unit: unit.name().to_owned() });
            }
            None => {}
        }

        marks[idx] = Some(Mark::InProgress);
        for dependency in unit.dependencies() {
            let dep_idx = self.index.get(dependency.as_ref()).copied().ok_or_else(|| {
                RegistryError::MissingDependency {
                    unit: unit.name().to_owned(),
                    dependency: dependency.to_string(),
                }
            })?;
            self.visit(dep_idx, marks, order)?;
        }
        marks[idx] = Some(Mark::Done);
        order.push(idx);
        Ok(())
    }

    async fn initialize_unit(
        &mut self,
        idx: usize,
        ctx: &ModuleContext,
    ) -> Result<(), RegistryError> {
        if self.initialized.contains(&idx) {
            return Ok(());
        }

        let unit = Arc::clone(&self.units[idx]);
        unit.initialize(ctx).await.map_err(|source| {
            warn!(module = %unit.name(), error = %source, "Module failed to initialize");
            RegistryError::Initialization { unit: unit.name().to_owned(), source, context: None }
        })?;

        info!(module = %unit.name(), "Module initialized");
        self.initialized.insert(idx);
        self.init_order.push(idx);
        Ok(())
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.module_names())
            .field("initialized", &self.initialized_modules())
            .finish()
    }
}
