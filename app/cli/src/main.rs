//! `climux`: run the agent CLI, check commands against the security
//! policy, and manage tmux sessions.

mod commands;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use climux_config::ClimuxConfig;
use climux_config::ConfigLoader;

use crate::commands::policy::PolicyCommand;
use crate::commands::run::RunArgs;
use crate::commands::tmux::TmuxCommand;

#[derive(Parser)]
#[command(name = "climux")]
#[command(about = "Supervise agent CLI invocations and sessions")]
struct Cli {
    /// Config file (default: $CLIMUX_HOME/config.json or ~/.climux/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set (e.g. "debug", "climux_process=trace")
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send a prompt to the agent
    Run(RunArgs),

    /// Evaluate the security policy
    #[command(subcommand)]
    Policy(PolicyCommand),

    /// Manage tmux sessions
    #[command(subcommand)]
    Tmux(TmuxCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = ClimuxConfig::load_with(&ConfigLoader::default(), cli.config.as_deref())?;
    let _logging = logging::init_logging(&config.logging, cli.log_level.as_deref());
    tracing::debug!(cli_path = %config.cli_path, "Configuration loaded");

    match cli.command {
        Command::Run(args) => commands::run::run(&config, args).await,
        Command::Policy(command) => commands::policy::run(&config, command),
        Command::Tmux(command) => commands::tmux::run(&config, command).await,
    }
}
