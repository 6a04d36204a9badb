use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Args;
use climux_config::ClimuxConfig;
use climux_protocol::AgentResponse;
use climux_protocol::ExecutionOptions;
use climux_protocol::ResponseStatus;
use climux_session::AgentClient;
use climux_session::SessionLayout;
use climux_session::SessionRegistry;
use tracing::info;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Prompt sent to the agent
    pub prompt: String,

    /// Model override for this call
    #[arg(long)]
    pub model: Option<String>,

    /// Run inside a named session, with its history and context files
    #[arg(long)]
    pub session: Option<String>,

    /// Print output lines as they arrive instead of a JSON response
    #[arg(long)]
    pub stream: bool,

    /// Working directory for the agent process
    #[arg(long)]
    pub working_dir: Option<PathBuf>,
}

/// Per-call options taken from the command line.
pub fn call_options(args: &RunArgs) -> ExecutionOptions {
    ExecutionOptions {
        model: args.model.clone(),
        working_directory: args.working_dir.clone(),
        ..ExecutionOptions::default()
    }
}

pub async fn run(config: &ClimuxConfig, args: RunArgs) -> anyhow::Result<ExitCode> {
    Ok(if execute(config, &args).await? {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Run the prompt and report whether the agent succeeded.
async fn execute(config: &ClimuxConfig, args: &RunArgs) -> anyhow::Result<bool> {
    let client = Arc::new(AgentClient::from_config(config)?);
    let registry =
        SessionRegistry::new(Arc::clone(&client)).with_layout(SessionLayout::from_config(config));

    let result = dispatch(&client, &registry, args).await;
    registry.shutdown().await;
    result
}

async fn dispatch(
    client: &AgentClient,
    registry: &SessionRegistry,
    args: &RunArgs,
) -> anyhow::Result<bool> {
    let options = call_options(args);
    let session = args
        .session
        .as_deref()
        .map(|id| registry.create_session(id, ExecutionOptions::default()));

    if args.stream {
        let stream = match &session {
            Some(session) => session.send_stream(&args.prompt, &options)?,
            None => client.execute_stream(&args.prompt, &options),
        };
        let exit = stream
            .for_each_line(|line| println!("{line}"), |line| eprintln!("{line}"))
            .await;
        info!(exit_code = exit.exit_code, timed_out = exit.timed_out, "Stream finished");
        return Ok(exit.exit_code == 0 && !exit.timed_out);
    }

    let mut response = match &session {
        Some(session) => session.send(&args.prompt, &options).await?,
        None => client.execute(&args.prompt, &options).await,
    };
    client.review_commands(&mut response);
    println!("{}", render(&response)?);
    Ok(response.status == ResponseStatus::Success)
}

pub fn render(response: &AgentResponse) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(response)?)
}

#[cfg(test)]
#[path = "run.test.rs"]
mod tests;
