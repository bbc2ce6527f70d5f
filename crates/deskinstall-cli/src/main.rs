mod dispatch;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use deskinstall_core::InstallAction;
use tracing_subscriber::EnvFilter;

use crate::dispatch::run_cli;

const LOG_ENV_VAR: &str = "DESKINSTALL_LOG";

#[derive(Parser, Debug)]
#[command(name = "deskinstall")]
#[command(about = "Installer for the AnythingLLM desktop application", long_about = None, version)]
struct Cli {
    /// Directory holding the files to install (defaults to `payload` next to this executable)
    #[arg(long, global = true)]
    payload_dir: Option<PathBuf>,
    /// Installer state file to read and write
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect the current installation and print the recommended action
    Detect,
    /// Copy the payload, save installer state and create shortcuts
    Install {
        #[arg(long)]
        path: Option<PathBuf>,
        #[arg(long, value_parser = parse_action_arg)]
        action: Option<InstallAction>,
        #[arg(long)]
        no_desktop_shortcut: bool,
        #[arg(long)]
        no_menu_shortcut: bool,
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the resolved installer locations
    Doctor,
}

fn parse_action_arg(value: &str) -> Result<InstallAction, String> {
    InstallAction::parse(value).map_err(|err| err.to_string())
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run_cli(cli)
}

#[cfg(test)]
mod tests;
