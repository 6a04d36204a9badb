use std::process::ExitCode;
use std::time::Duration;

use anyhow::bail;
use clap::Subcommand;
use climux_config::ClimuxConfig;
use climux_config::TmuxSettings;
use climux_process::ProcessExecutor;
use climux_tmux::TmuxOptions;
use climux_tmux::TmuxSessionManager;

#[derive(Subcommand, Debug)]
pub enum TmuxCommand {
    /// List sessions on the tmux server
    List,

    /// Kill a session
    Kill {
        /// Session name; the configured prefix is added when missing
        name: String,
    },

    /// Type a command into a session and print the pane afterwards
    Exec {
        /// Session name; the configured prefix is added when missing
        name: String,
        /// Text typed into the pane, followed by Enter
        text: String,
        /// How long to let the command run before capturing
        #[arg(long, default_value = "500")]
        settle_ms: u64,
        /// Leave the session running afterwards
        #[arg(long)]
        keep: bool,
    },
}

/// Prefix `name` with the configured session prefix unless it already has it.
pub fn session_name(settings: &TmuxSettings, name: &str) -> String {
    if name.starts_with(&settings.default_session_prefix) {
        name.to_string()
    } else {
        format!("{}{name}", settings.default_session_prefix)
    }
}

pub async fn run(config: &ClimuxConfig, command: TmuxCommand) -> anyhow::Result<ExitCode> {
    if !config.tmux.enabled {
        bail!("tmux integration is disabled in the config");
    }
    let executor = ProcessExecutor::new(&config.executor);
    let manager =
        TmuxSessionManager::new(executor.clone()).with_program(config.tmux.program.clone());

    let result = dispatch(&config.tmux, &manager, command).await;
    executor.shutdown().await;
    result.map(|()| ExitCode::SUCCESS)
}

async fn dispatch(
    settings: &TmuxSettings,
    manager: &TmuxSessionManager,
    command: TmuxCommand,
) -> anyhow::Result<()> {
    match command {
        TmuxCommand::List => {
            for name in manager.list_sessions().await {
                println!("{name}");
            }
        }
        TmuxCommand::Kill { name } => {
            manager.kill_session(&session_name(settings, &name)).await?;
        }
        TmuxCommand::Exec {
            name,
            text,
            settle_ms,
            keep,
        } => {
            let name = session_name(settings, &name);
            let pane = exec_in_session(manager, &name, &text, settle_ms).await;
            if settings.auto_cleanup_on_shutdown && !keep {
                manager.kill_all_sessions().await;
            }
            print!("{}", pane?);
        }
    }
    Ok(())
}

async fn exec_in_session(
    manager: &TmuxSessionManager,
    name: &str,
    text: &str,
    settle_ms: u64,
) -> anyhow::Result<String> {
    manager.create_session(name, TmuxOptions::default()).await?;
    manager.send_command(name, text).await?;
    tokio::time::sleep(Duration::from_millis(settle_ms)).await;
    Ok(manager.capture_pane(name).await?)
}

#[cfg(test)]
#[path = "tmux.test.rs"]
mod tests;
