use climux_process::ProcessExecutor;
use climux_protocol::CommandInvocation;
use climux_protocol::ProcessOutcome;
use dashmap::DashMap;
use snafu::ensure;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::TmuxOptions;
use crate::error::Result;
use crate::error::tmux_error::CommandFailedSnafu;
use crate::error::tmux_error::CreateFailedSnafu;
use crate::error::tmux_error::SessionNotFoundSnafu;

pub const DEFAULT_TMUX_PROGRAM: &str = "tmux";

/// Handle for a tmux session created or adopted by a [`TmuxSessionManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmuxSession {
    name: String,
    options: TmuxOptions,
}

impl TmuxSession {
    fn new(name: &str, options: TmuxOptions) -> Self {
        Self {
            name: name.to_string(),
            options,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &TmuxOptions {
        &self.options
    }
}

/// Creates, drives, and tears down named tmux sessions.
///
/// The manager keeps a cache of the sessions it created or adopted; the tmux
/// server remains the source of truth and every operation re-checks it.
#[derive(Debug)]
pub struct TmuxSessionManager {
    executor: ProcessExecutor,
    program: String,
    sessions: DashMap<String, TmuxSession>,
}

impl TmuxSessionManager {
    pub fn new(executor: ProcessExecutor) -> Self {
        Self {
            executor,
            program: DEFAULT_TMUX_PROGRAM.to_string(),
            sessions: DashMap::new(),
        }
    }

    /// Use a different tmux binary.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Cached handle for `name`, if this manager created or adopted it.
    pub fn get_session(&self, name: &str) -> Option<TmuxSession> {
        self.sessions.get(name).map(|entry| entry.value().clone())
    }

    /// Create a detached session, or return the existing one.
    ///
    /// A session that already exists on the server is never created twice:
    /// the cached handle is returned, or the session is adopted with
    /// `options` when this manager has not seen it before.
    pub async fn create_session(&self, name: &str, options: TmuxOptions) -> Result<TmuxSession> {
        if self.session_exists(name).await {
            if let Some(cached) = self.get_session(name) {
                warn!(session = %name, "Tmux session already exists");
                return Ok(cached);
            }
            let adopted = self.cache(TmuxSession::new(name, options));
            info!(session = %name, "Adopted existing tmux session");
            return Ok(adopted);
        }

        let mut args = vec!["new-session", "-d", "-s", name];
        if let Some(window) = options.window_name.as_deref() {
            args.extend(["-n", window]);
        }
        let outcome = self.tmux(&args).await;
        ensure!(
            outcome.is_success(),
            CreateFailedSnafu {
                name,
                stderr: outcome.stderr.trim(),
            }
        );

        let session = self.cache(TmuxSession::new(name, options));
        info!(session = %name, "Created tmux session");
        Ok(session)
    }

    /// Type `text` into the session and press Enter.
    pub async fn send_command(&self, name: &str, text: &str) -> Result<()> {
        self.require_session(name).await?;
        let outcome = self.tmux(&["send-keys", "-t", name, text, "Enter"]).await;
        check("send-keys", &outcome)?;
        debug!(session = %name, "Sent keys to tmux session");
        Ok(())
    }

    /// Visible contents of the session's active pane.
    ///
    /// A failed capture is logged and yields an empty string.
    pub async fn capture_pane(&self, name: &str) -> Result<String> {
        self.require_session(name).await?;
        let outcome = self.tmux(&["capture-pane", "-t", name, "-p"]).await;
        if !outcome.is_success() {
            warn!(
                session = %name,
                exit_code = outcome.exit_code,
                stderr = %outcome.stderr.trim(),
                "Failed to capture tmux pane"
            );
            return Ok(String::new());
        }
        Ok(outcome.stdout)
    }

    pub async fn attach_session(&self, name: &str) -> Result<()> {
        self.require_session(name).await?;
        let outcome = self.tmux(&["attach-session", "-t", name]).await;
        check("attach-session", &outcome)
    }

    /// Kill the session. Killing a session that is already gone succeeds.
    ///
    /// A session that survives a failed kill stays tracked, so a later
    /// [`Self::kill_all_sessions`] retries it.
    pub async fn kill_session(&self, name: &str) -> Result<()> {
        let outcome = self.tmux(&["kill-session", "-t", name]).await;
        if outcome.is_success() {
            self.sessions.remove(name);
            info!(session = %name, "Killed tmux session");
            return Ok(());
        }
        if !self.session_exists(name).await {
            self.sessions.remove(name);
            debug!(session = %name, "Tmux session already gone");
            return Ok(());
        }
        check("kill-session", &outcome)
    }

    pub async fn session_exists(&self, name: &str) -> bool {
        self.tmux(&["has-session", "-t", name]).await.is_success()
    }

    /// Names of all sessions on the tmux server, empty when no server runs.
    pub async fn list_sessions(&self) -> Vec<String> {
        let outcome = self
            .tmux(&["list-sessions", "-F", "#{session_name}"])
            .await;
        if !outcome.is_success() {
            debug!(stderr = %outcome.stderr.trim(), "No tmux sessions listed");
            return Vec::new();
        }
        outcome
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()
    }

    /// Kill every session this manager created or adopted.
    pub async fn kill_all_sessions(&self) {
        let names: Vec<String> = self
            .sessions
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        for name in names {
            if let Err(err) = self.kill_session(&name).await {
                warn!(session = %name, error = %err, "Failed to kill tmux session");
            }
        }
    }

    fn cache(&self, session: TmuxSession) -> TmuxSession {
        self.sessions
            .entry(session.name.clone())
            .or_insert(session)
            .value()
            .clone()
    }

    async fn require_session(&self, name: &str) -> Result<()> {
        ensure!(self.session_exists(name).await, SessionNotFoundSnafu { name });
        Ok(())
    }

    async fn tmux(&self, args: &[&str]) -> ProcessOutcome {
        let invocation =
            CommandInvocation::new(std::iter::once(self.program.as_str()).chain(args.iter().copied()));
        self.executor.run(&invocation).await
    }
}

fn check(command: &str, outcome: &ProcessOutcome) -> Result<()> {
    ensure!(
        outcome.is_success(),
        CommandFailedSnafu {
            command,
            exit_code: outcome.exit_code,
            stderr: outcome.stderr.trim(),
        }
    );
    Ok(())
}

#[cfg(test)]
#[path = "manager.test.rs"]
mod tests;
