//! Facade crate for Tessera applications.
//! Re-exports the shared crates and composes the built-in feature units into an [`App`].
//! Keep this crate thin: it wires other crates together, business logic lives in the features.
//!
//! ## Usage
//! ```rust,no_run
//! use tessera::App;
//! use tessera::domain::config::ClientConfig;
//!
//! # async fn run() -> Result<(), tessera::AppError> {
//! let app = App::builder().config(ClientConfig::default()).start().await?;
//! let first = app.navigate(app.initial_route());
//! println!("{}", first.view.screen);
//! app.shutdown();
//! # Ok(())
//! # }
//! ```

mod app;
mod error;

pub use app::{App, AppBuilder, Navigation};
pub use error::{AppError, AppErrorExt};

pub use tessera_auth as auth;
pub use tessera_domain as domain;
pub use tessera_http as http;
pub use tessera_kernel as kernel;
pub use tessera_storage as storage;

/// Built-in feature units.
pub mod features {
    use std::sync::Arc;
    use tessera_domain::constants::modules;
    use tessera_kernel::FeatureUnit;

    pub use tessera_auth::AuthModule;
    pub use tessera_core as core;
    pub use tessera_dashboard as dashboard;
    pub use tessera_settings as settings;
    pub use tessera_user as user;

    /// Names of the units every [`App`](crate::App) starts with, in registration order.
    pub const BUILT_IN: [&str; 5] =
        [modules::CORE, modules::AUTH, modules::DASHBOARD, modules::USER, modules::SETTINGS];

    #[must_use]
    pub fn is_built_in(name: &str) -> bool {
        BUILT_IN.contains(&name)
    }

    /// Fresh instances of the built-in units, in [`BUILT_IN`] order.
    #[must_use]
    pub fn built_in() -> Vec<Arc<dyn FeatureUnit>> {
        vec![
            Arc::new(core::CoreModule::new()),
            Arc::new(AuthModule::new()),
            Arc::new(dashboard::DashboardModule::new()),
            Arc::new(user::UserModule::new()),
            Arc::new(settings::SettingsModule::new()),
        ]
    }
}
