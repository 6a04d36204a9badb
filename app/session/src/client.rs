use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::RwLock;
use std::task::Context;
use std::task::Poll;

use climux_config::ClimuxConfig;
use climux_policy::ApprovalDecision;
use climux_policy::CommandSecurityPolicy;
use climux_policy::DefaultSecurityPolicy;
use climux_process::OutputStream;
use climux_process::PendingOutcome;
use climux_process::ProcessExecutor;
use climux_protocol::AgentResponse;
use climux_protocol::CommandBuilder;
use climux_protocol::CommandInvocation;
use climux_protocol::ExecutionOptions;
use snafu::ResultExt;
use tracing::debug;
use tracing::info;

use crate::error::Result;
use crate::error::session_error::InvalidPolicySnafu;

/// Output format forced on streaming invocations.
pub const STREAM_OUTPUT_FORMAT: &str = "stream-json";

/// Stateless entry point for running the agent.
///
/// Per-call options are overlaid on the client defaults, turned into an
/// invocation by the [`CommandBuilder`], and run on the shared
/// [`ProcessExecutor`].
pub struct AgentClient {
    executor: ProcessExecutor,
    builder: CommandBuilder,
    defaults: RwLock<ExecutionOptions>,
    policy: Option<Arc<dyn CommandSecurityPolicy>>,
}

impl std::fmt::Debug for AgentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentClient")
            .field("executor", &self.executor)
            .field("builder", &self.builder)
            .field("has_policy", &self.policy.is_some())
            .finish_non_exhaustive()
    }
}

impl AgentClient {
    pub fn new(executor: ProcessExecutor, builder: CommandBuilder) -> Self {
        Self {
            executor,
            builder,
            defaults: RwLock::new(ExecutionOptions::default()),
            policy: None,
        }
    }

    /// Build a client from the loaded configuration.
    ///
    /// The security policy is only installed when `security.enabled` is set.
    pub fn from_config(config: &ClimuxConfig) -> Result<Self> {
        let executor = ProcessExecutor::new(&config.executor);
        let builder = CommandBuilder::new(config.cli_path.clone())
            .with_multiplexer_program(config.tmux.program.clone());
        let client = Self::new(executor, builder).with_defaults(config.default_options());
        if !config.security.enabled {
            return Ok(client);
        }
        let policy = DefaultSecurityPolicy::new(config.security.policy.clone())
            .context(InvalidPolicySnafu)?;
        Ok(client.with_policy(Arc::new(policy)))
    }

    pub fn with_defaults(self, defaults: ExecutionOptions) -> Self {
        self.update_default_options(defaults);
        self
    }

    pub fn with_policy(mut self, policy: Arc<dyn CommandSecurityPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn executor(&self) -> &ProcessExecutor {
        &self.executor
    }

    pub fn policy(&self) -> Option<&Arc<dyn CommandSecurityPolicy>> {
        self.policy.as_ref()
    }

    pub fn default_options(&self) -> ExecutionOptions {
        match self.defaults.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the client defaults.
    pub fn update_default_options(&self, options: ExecutionOptions) {
        match self.defaults.write() {
            Ok(mut guard) => *guard = options,
            Err(poisoned) => *poisoned.into_inner() = options,
        }
    }

    pub async fn execute(&self, prompt: &str, options: &ExecutionOptions) -> AgentResponse {
        self.execute_in(None, prompt, options).await
    }

    pub fn execute_async(&self, prompt: &str, options: &ExecutionOptions) -> PendingResponse {
        self.execute_async_in(None, prompt, options)
    }

    /// Run with `--output-format stream-json` and hand back the output lines.
    pub fn execute_stream(&self, prompt: &str, options: &ExecutionOptions) -> OutputStream {
        let invocation = self.stream_invocation(prompt, options);
        info!(command = %invocation.display(), "Streaming agent invocation");
        self.executor.run_streaming(&invocation)
    }

    /// Stamp each reported command with the policy's verdict.
    ///
    /// Returns the decisions in order, or nothing when no policy is installed.
    pub fn review_commands(&self, response: &mut AgentResponse) -> Vec<ApprovalDecision> {
        let Some(policy) = self.policy.as_ref() else {
            return Vec::new();
        };
        response
            .command_executions
            .iter_mut()
            .map(|execution| {
                let decision = policy.requires_approval(Some(&*execution));
                execution.approved = decision.approved_flag();
                debug!(command = %execution.command, decision = decision.as_ref(), "Reviewed command");
                decision
            })
            .collect()
    }

    pub(crate) async fn execute_in(
        &self,
        session_id: Option<&str>,
        prompt: &str,
        options: &ExecutionOptions,
    ) -> AgentResponse {
        let invocation = self.invocation(prompt, options);
        info!(session_id = ?session_id, command = %invocation.display(), "Running agent");
        let outcome = self.executor.run(&invocation).await;
        let response = AgentResponse::from_outcome(session_id, prompt, &outcome);
        debug!(
            session_id = ?session_id,
            exit_code = response.exit_code,
            status = response.status.as_ref(),
            "Agent finished"
        );
        response
    }

    pub(crate) fn execute_async_in(
        &self,
        session_id: Option<&str>,
        prompt: &str,
        options: &ExecutionOptions,
    ) -> PendingResponse {
        let invocation = self.invocation(prompt, options);
        info!(session_id = ?session_id, command = %invocation.display(), "Running agent in background");
        PendingResponse {
            outcome: self.executor.run_async(invocation),
            session_id: session_id.map(str::to_string),
            prompt: prompt.to_string(),
        }
    }

    pub(crate) fn stream_invocation(
        &self,
        prompt: &str,
        options: &ExecutionOptions,
    ) -> CommandInvocation {
        let overlay = ExecutionOptions {
            output_format: Some(STREAM_OUTPUT_FORMAT.to_string()),
            ..ExecutionOptions::default()
        };
        self.invocation(prompt, &options.merge(&overlay))
    }

    fn invocation(&self, prompt: &str, options: &ExecutionOptions) -> CommandInvocation {
        let effective = self.default_options().merge(options);
        self.builder.build(prompt, &effective)
    }
}

/// Future returned by [`AgentClient::execute_async`] and
/// [`AgentSession::send_async`](crate::AgentSession::send_async).
#[derive(Debug)]
pub struct PendingResponse {
    outcome: PendingOutcome,
    session_id: Option<String>,
    prompt: String,
}

impl Future for PendingResponse {
    type Output = AgentResponse;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        Pin::new(&mut this.outcome).poll(cx).map(|outcome| {
            AgentResponse::from_outcome(this.session_id.as_deref(), &this.prompt, &outcome)
        })
    }
}

#[cfg(test)]
#[path = "client.test.rs"]
mod tests;
