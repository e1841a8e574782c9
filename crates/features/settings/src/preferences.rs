use crate::error::{SettingsError, SettingsErrorExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use strum::{AsRefStr, Display, EnumString};
use tessera_domain::config::ModuleConfig;
use tessera_kernel::CredentialStore;
use tracing::warn;

/// Store key of the preferences document.
pub const PREFERENCES_KEY: &str = "settings.preferences";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub language: String,
    pub notifications: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self { theme: Theme::System, language: "en".to_owned(), notifications: true }
    }
}

impl Preferences {
    /// Reads defaults from a unit config table; absent fields keep the built-in defaults.
    pub fn from_config(config: &ModuleConfig) -> Result<Self, SettingsError> {
        let table = config.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        serde_json::from_value(Value::Object(table)).context("modules.settings")
    }
}

/// Loads and saves [`Preferences`].
#[derive(Debug, Clone)]
pub struct SettingsService {
    store: Arc<dyn CredentialStore>,
    defaults: Preferences,
}

impl SettingsService {
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>, defaults: Preferences) -> Self {
        Self { store, defaults }
    }

    #[must_use]
    pub const fn defaults(&self) -> &Preferences {
        &self.defaults
    }

    /// Stored preferences, or the defaults when nothing (or nothing readable) is stored.
    pub async fn load(&self) -> Result<Preferences, SettingsError> {
        let Some(raw) = self.store.read(PREFERENCES_KEY).await.context("Reading preferences")?
        else {
            return Ok(self.defaults.clone());
        };

        match serde_json::from_str(&raw) {
            Ok(preferences) => Ok(preferences),
            Err(err) => {
                warn!(error = %err, "Stored preferences are unreadable, using defaults");
                Ok(self.defaults.clone())
            }
        }
    }

    pub async fn save(&self, preferences: &Preferences) -> Result<(), SettingsError> {
        let raw = serde_json::to_string(preferences).context("Encoding preferences")?;
        self.store.write(PREFERENCES_KEY, &raw).await.context("Writing preferences")
    }

    /// Applies `change` to the current preferences and saves the result.
    pub async fn update<F>(&self, change: F) -> Result<Preferences, SettingsError>
    where
        F: FnOnce(&mut Preferences) + Send,
    {
        let mut preferences = self.load().await?;
        change(&mut preferences);
        self.save(&preferences).await?;
        Ok(preferences)
    }

    /// Forgets stored preferences so the defaults apply again.
    pub async fn reset(&self) -> Result<(), SettingsError> {
        self.store.delete(PREFERENCES_KEY).await.context("Removing preferences")
    }
}
