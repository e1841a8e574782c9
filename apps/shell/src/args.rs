use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "tessera", version, about = "Starts the Tessera client and resolves a route")]
pub(crate) struct Cli {
    /// Configuration file; built-in defaults plus `TESSERA__*` overrides when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Route to open instead of the session-dependent initial route.
    #[arg(short, long, value_name = "PATH")]
    pub(crate) route: Option<String>,
}
