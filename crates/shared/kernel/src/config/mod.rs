use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable prefix for overrides, e.g. `TESSERA__API__BASE_URL`.
pub const ENV_PREFIX: &str = "TESSERA";

const DEFAULT_PATH: &str = "tessera";

#[tessera_derive::tessera_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads configuration from a file layered with environment overrides.
///
/// 1. **Base file**: `path`, or `tessera` (any format the `config` crate recognizes by
///    extension) in the working directory.
/// 2. **Environment**: variables prefixed with `TESSERA__`; nested keys are separated by a
///    double underscore, so `TESSERA__API__BASE_URL` maps to `api.base_url`.
///
/// # Errors
///
/// Fails when the file is missing or its content does not match `T`.
///
/// # Example
/// ```rust
/// use tessera_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct ShellConfig {
///     port: u16,
/// }
///
/// let cfg: ShellConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_with_env(path, environment())
}

/// Same as [`load_config`] but with an explicit environment source, so callers (and tests)
/// can supply overrides without touching the process environment.
pub fn load_with_env<T>(
    path: Option<impl AsRef<Path>>,
    env: Environment,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_PATH), |p| p.as_ref().to_path_buf());

    info!("Loading config from {}", effective_path.display());

    Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(env)
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}

/// The `TESSERA__`-prefixed environment source used by [`load_config`].
#[must_use]
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).prefix_separator("__").separator("__").try_parsing(true)
}

/// Builds `T` from an environment source alone, for runs without a configuration file.
/// Fields the environment does not set keep their serde defaults.
///
/// # Errors
///
/// Fails when a variable cannot be deserialized into its field.
pub fn load_env<T>(env: Environment) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    Config::builder()
        .add_source(env)
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}
