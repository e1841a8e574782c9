mod args;

use anyhow::Context;
use args::Cli;
use clap::Parser;
use tessera::App;
use tessera::domain::config::ClientConfig;
use tessera::kernel::config::{environment, load_config, load_env};
use tessera_logger::Logger;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg: ClientConfig = match &cli.config {
        Some(path) => load_config(Some(path)).context("Critical: Configuration is malformed")?,
        None => env_only()?,
    };

    let _log = Logger::from_config(env!("CARGO_BIN_NAME"), &cfg.logging)?;

    let app = App::builder().config(cfg).start().await?;
    info!(order = ?app.registry().initialized_modules(), "Modules ready");

    let target = cli.route.as_deref().unwrap_or_else(|| app.initial_route()).to_owned();
    let nav = app.navigate(&target);
    info!(
        requested = %target,
        path = %nav.path,
        screen = %nav.view.screen,
        params = ?nav.view.params,
        redirected = nav.redirected,
        "Route resolved"
    );

    app.shutdown();
    Ok(())
}

/// Defaults layered with `TESSERA__*` variables, for runs without a config file.
fn env_only() -> anyhow::Result<ClientConfig> {
    load_env(environment())
        .context("Critical: Environment configuration is malformed")
}
