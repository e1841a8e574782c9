use crate::error::RegistryError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

type Entry = (&'static str, Arc<dyn Any + Send + Sync>);

/// Type-keyed container of shared services.
///
/// Units publish what they build during initialization and later units look it up by type.
/// Clones share the same container.
#[derive(Clone, Default)]
pub struct ServiceMap {
    inner: Arc<RwLock<FxHashMap<TypeId, Entry>>>,
}

impl ServiceMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `service`, returning the instance it replaced, if any.
    pub fn provide<T: Send + Sync + 'static>(&self, service: T) -> Option<Arc<T>> {
        self.provide_arc(Arc::new(service))
    }

    pub fn provide_arc<T: Send + Sync + 'static>(&self, service: Arc<T>) -> Option<Arc<T>> {
        let entry: Entry = (type_name::<T>(), service);
        let previous = self.inner.write().insert(TypeId::of::<T>(), entry)?;
        previous.1.downcast::<T>().ok()
    }

    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let entry = self.inner.read().get(&TypeId::of::<T>())?.1.clone();
        entry.downcast::<T>().ok()
    }

    /// Like [`get`](Self::get), for services a unit cannot work without.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MissingService`] when nothing of type `T` was provided.
    pub fn require<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, RegistryError> {
        self.get::<T>().ok_or(RegistryError::MissingService { service: type_name::<T>() })
    }

    #[must_use]
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.inner.read().contains_key(&TypeId::of::<T>())
    }

    pub fn remove<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.inner.write().remove(&TypeId::of::<T>())?.1.downcast::<T>().ok()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl fmt::Debug for ServiceMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.inner.read();
        let mut names: Vec<&str> = guard.values().map(|(name, _)| *name).collect();
        names.sort_unstable();
        f.debug_struct("ServiceMap").field("services", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Greeter(&'static str);

    #[test]
    fn provide_get_and_replace() {
        let services = ServiceMap::new();
        assert!(services.get::<Greeter>().is_none());

        assert!(services.provide(Greeter("hello")).is_none());
        assert_eq!(services.get::<Greeter>().unwrap().0, "hello");

        let previous = services.provide(Greeter("hi")).unwrap();
        assert_eq!(previous.0, "hello");
        assert_eq!(services.len(), 1);
    }

    #[test]
    fn clones_share_the_container() {
        let services = ServiceMap::new();
        let view = services.clone();
        services.provide(42_u32);
        assert_eq!(*view.require::<u32>().unwrap(), 42);
    }

    #[test]
    fn require_names_the_missing_type() {
        let err = ServiceMap::new().require::<Greeter>().unwrap_err();
        assert!(matches!(err, RegistryError::MissingService { service } if service.ends_with("Greeter")));
    }

    #[test]
    fn debug_lists_type_names() {
        let services = ServiceMap::new();
        services.provide(Greeter("x"));
        assert!(format!("{services:?}").contains("Greeter"));
    }
}
