mod common;

use common::{TestUnit, context, entries, journal};
use tessera_kernel::domain::features::FeatureKind;
use tessera_kernel::{ModuleRegistry, RegistryError};

#[tokio::test]
async fn initializes_dependencies_first() {
    let log = journal();
    let mut registry = ModuleRegistry::new();
    registry
        .register_all([
            TestUnit::new("user", &["core", "auth"], &log).arc(),
            TestUnit::new("core", &[], &log).arc(),
            TestUnit::new("auth", &["core"], &log).arc(),
        ])
        .unwrap();

    assert_eq!(registry.resolve_order().unwrap(), ["core", "auth", "user"]);
    assert!(entries(&log).is_empty(), "resolving must not run initializers");

    registry.initialize_all(&context()).await.unwrap();

    assert_eq!(entries(&log), ["init:core", "init:auth", "init:user"]);
    assert_eq!(registry.initialized_modules(), ["core", "auth", "user"]);
    assert!(["core", "auth", "user"].iter().all(|name| registry.is_initialized(name)));
}

#[tokio::test]
async fn duplicate_name_is_rejected() {
    let log = journal();
    let mut registry = ModuleRegistry::new();
    registry.register(TestUnit::new("core", &[], &log).arc()).unwrap();

    let err = registry.register(TestUnit::new("core", &[], &log).arc()).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateModule { ref unit } if unit == "core"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn empty_name_is_rejected() {
    let log = journal();
    let mut registry = ModuleRegistry::new();
    let err = registry.register(TestUnit::new("  ", &[], &log).arc()).unwrap_err();
    assert!(matches!(err, RegistryError::InvalidModule { .. }));
    assert!(registry.is_empty());
}

#[test]
fn register_all_stops_at_first_failure() {
    let log = journal();
    let mut registry = ModuleRegistry::new();
    let result = registry.register_all([
        TestUnit::new("core", &[], &log).arc(),
        TestUnit::new("core", &[], &log).arc(),
        TestUnit::new("auth", &[], &log).arc(),
    ]);

    assert!(matches!(result, Err(RegistryError::DuplicateModule { .. })));
    assert_eq!(registry.module_names(), ["core"]);
}

#[tokio::test]
async fn missing_dependency_fails_before_any_initializer() {
    let log = journal();
    let mut registry = ModuleRegistry::new();
    registry
        .register_all([
            TestUnit::new("core", &[], &log).arc(),
            TestUnit::new("dashboard", &["analytics"], &log).arc(),
        ])
        .unwrap();

    let err = registry.initialize_all(&context()).await.unwrap_err();

    assert!(matches!(
        err,
        RegistryError::MissingDependency { ref unit, ref dependency }
            if unit == "dashboard" && dependency == "analytics"
    ));
    assert!(entries(&log).is_empty());
    assert!(!registry.is_initialized("core"));
}

#[tokio::test]
async fn cycle_is_reported_and_earlier_units_stay_initialized() {
    let log = journal();
    let mut registry = ModuleRegistry::new();
    registry
        .register_all([
            TestUnit::new("core", &[], &log).arc(),
            TestUnit::new("a", &["b"], &log).arc(),
            TestUnit::new("b", &["a"], &log).arc(),
        ])
        .unwrap();

    let err = registry.initialize_all(&context()).await.unwrap_err();

    assert!(matches!(err, RegistryError::CircularDependency { ref unit } if unit == "a"));
    assert_eq!(entries(&log), ["init:core"]);
    assert!(registry.is_initialized("core"));
    assert!(!registry.is_initialized("a"));
    assert!(!registry.is_initialized("b"));
}

#[test]
fn self_dependency_is_a_cycle() {
    let log = journal();
    let mut registry = ModuleRegistry::new();
    registry.register(TestUnit::new("loop", &["loop"], &log).arc()).unwrap();

    let err = registry.resolve_order().unwrap_err();
    assert!(matches!(err, RegistryError::CircularDependency { ref unit } if unit == "loop"));
}

#[tokio::test]
async fn failed_initializer_aborts_and_retry_skips_initialized_units() {
    let log = journal();
    let mut registry = ModuleRegistry::new();
    registry
        .register_all([
            TestUnit::new("core", &[], &log).arc(),
            TestUnit::new("auth", &["core"], &log).failing().arc(),
            TestUnit::new("user", &["auth"], &log).arc(),
        ])
        .unwrap();

    let err = registry.initialize_all(&context()).await.unwrap_err();
    assert!(matches!(err, RegistryError::Initialization { ref unit, .. } if unit == "auth"));
    assert!(err.to_string().contains("auth refused to start"));
    assert_eq!(entries(&log), ["init:core", "fail:auth"]);
    assert!(registry.is_initialized("core"));
    assert!(!registry.is_initialized("auth"));
    assert!(!registry.is_initialized("user"));

    // Second run: core is not initialized again.
    let _ = registry.initialize_all(&context()).await;
    assert_eq!(entries(&log), ["init:core", "fail:auth", "fail:auth"]);
}

#[tokio::test]
async fn second_run_is_a_no_op() {
    let log = journal();
    let mut registry = ModuleRegistry::new();
    registry.register(TestUnit::new("core", &[], &log).arc()).unwrap();

    registry.initialize_all(&context()).await.unwrap();
    registry.initialize_all(&context()).await.unwrap();

    assert_eq!(entries(&log), ["init:core"]);
}

#[test]
fn routes_are_merged_and_later_registration_wins() {
    let log = journal();
    let mut registry = ModuleRegistry::new();
    registry
        .register_all([
            TestUnit::new("core", &[], &log).route("/", "home").route("/help", "help").arc(),
            TestUnit::new("docs", &[], &log).route("/help", "docs").arc(),
        ])
        .unwrap();

    let routes = registry.routes();

    assert_eq!(routes.paths().collect::<Vec<_>>(), ["/", "/help"]);
    let help = routes.get("/help").unwrap();
    assert_eq!(help.owner(), "docs");
    assert_eq!(routes.resolve("/help").unwrap().render().screen, "docs");
    assert_eq!(routes.get("/").unwrap().owner(), "core");
}

#[test]
fn lookup_by_kind_returns_first_match() {
    let log = journal();
    let mut registry = ModuleRegistry::new();
    registry
        .register_all([
            TestUnit::tagged("core", FeatureKind::Core, &[], &log).arc(),
            TestUnit::tagged("reports", FeatureKind::Extension, &[], &log).arc(),
            TestUnit::tagged("audit", FeatureKind::Extension, &[], &log).arc(),
        ])
        .unwrap();

    assert_eq!(registry.get_module(FeatureKind::Extension).unwrap().name(), "reports");
    assert_eq!(registry.get_module(FeatureKind::Core).unwrap().name(), "core");
    assert!(registry.get_module(FeatureKind::Settings).is_none());
    assert_eq!(registry.get_module_by_name("audit").unwrap().kind(), FeatureKind::Extension);
    assert!(registry.get_module_by_name("missing").is_none());
}

#[tokio::test]
async fn dispose_runs_in_reverse_initialization_order_and_clears() {
    let log = journal();
    let mut registry = ModuleRegistry::new();
    registry
        .register_all([
            TestUnit::new("user", &["auth"], &log).arc(),
            TestUnit::new("core", &[], &log).arc(),
            TestUnit::new("auth", &["core"], &log).arc(),
        ])
        .unwrap();
    registry.initialize_all(&context()).await.unwrap();
    log.lock().clear();

    registry.dispose_all();

    assert_eq!(entries(&log), ["dispose:user", "dispose:auth", "dispose:core"]);
    assert!(registry.is_empty());
    assert!(!registry.is_initialized("core"));
    assert!(registry.routes().is_empty());
}

#[test]
fn dispose_reaches_units_that_never_initialized() {
    let log = journal();
    let mut registry = ModuleRegistry::new();
    registry
        .register_all([
            TestUnit::new("core", &[], &log).arc(),
            TestUnit::new("auth", &[], &log).arc(),
        ])
        .unwrap();

    registry.dispose_all();

    assert_eq!(entries(&log), ["dispose:auth", "dispose:core"]);
}
