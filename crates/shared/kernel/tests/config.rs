use std::collections::HashMap;
use std::fs;
use tessera_kernel::config::{environment, load_config, load_env, load_with_env};
use tessera_kernel::domain::config::ClientConfig;

const FILE: &str = r#"
[api]
base_url = "https://api.acme.test"
timeout_seconds = 10

[navigation]
home_route = "/overview"

[modules.settings]
theme = "dark"
"#;

fn write_config(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("tessera.toml");
    fs::write(&path, FILE).unwrap();
    path
}

#[test]
fn loads_file_with_defaults_for_missing_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir);

    let cfg: ClientConfig =
        load_with_env(Some(&path), environment().source(Some(HashMap::new()))).unwrap();

    assert_eq!(cfg.api.base_url, "https://api.acme.test");
    assert_eq!(cfg.api.timeout_seconds, 10);
    assert_eq!(cfg.api.tenant_header, "x-tenant-id");
    assert_eq!(cfg.navigation.home_route, "/overview");
    assert_eq!(cfg.navigation.login_route, "/login");
    assert_eq!(cfg.storage.namespace, "session");
    assert_eq!(cfg.module("settings").get("theme").and_then(|v| v.as_str()), Some("dark"));
    assert!(cfg.module("dashboard").is_empty());
}

#[test]
fn environment_overrides_file_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir);

    let env = HashMap::from([
        ("TESSERA__API__BASE_URL".to_owned(), "https://staging.acme.test".to_owned()),
        ("TESSERA__TENANT__DEFAULT_ID".to_owned(), "acme".to_owned()),
    ]);
    let cfg: ClientConfig = load_with_env(Some(&path), environment().source(Some(env))).unwrap();

    assert_eq!(cfg.api.base_url, "https://staging.acme.test");
    assert_eq!(cfg.api.timeout_seconds, 10);
    assert_eq!(cfg.tenant.default_id.as_deref(), Some("acme"));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_config::<ClientConfig>(Some(dir.path().join("absent.toml")));
    assert!(result.is_err());
}

#[test]
fn environment_alone_fills_defaults() {
    let env = HashMap::from([
        ("TESSERA__API__TIMEOUT_SECONDS".to_owned(), "5".to_owned()),
        ("TESSERA__STORAGE__NAMESPACE".to_owned(), "work".to_owned()),
    ]);

    let cfg: ClientConfig = load_env(environment().source(Some(env))).unwrap();

    assert_eq!(cfg.api.timeout_seconds, 5);
    assert_eq!(cfg.storage.namespace, "work");
    assert_eq!(cfg.navigation.home_route, "/dashboard");
}
