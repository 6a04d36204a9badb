use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::RwLock;
use std::sync::Weak;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use climux_process::OutputStream;
use climux_protocol::AgentResponse;
use climux_protocol::ExecutionOptions;
use dashmap::DashMap;
use snafu::ensure;
use tracing::debug;
use tracing::info;

use crate::AgentClient;
use crate::PendingResponse;
use crate::SessionLayout;
use crate::error::Result;
use crate::error::session_error::SessionClosedSnafu;

pub(crate) type SessionMap = DashMap<String, Arc<AgentSession>>;

/// A named conversation with the agent.
///
/// Every send carries the session's history and context files, on top of
/// the session defaults. Once closed, a session stays closed.
pub struct AgentSession {
    id: String,
    client: Arc<AgentClient>,
    defaults: RwLock<ExecutionOptions>,
    history_file: PathBuf,
    context_file: PathBuf,
    scoped: ExecutionOptions,
    active: AtomicBool,
    registry: Weak<SessionMap>,
}

impl std::fmt::Debug for AgentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentSession")
            .field("id", &self.id)
            .field("history_file", &self.history_file)
            .field("context_file", &self.context_file)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

impl AgentSession {
    pub(crate) fn new(
        id: &str,
        client: Arc<AgentClient>,
        defaults: ExecutionOptions,
        layout: &SessionLayout,
        registry: Weak<SessionMap>,
    ) -> Self {
        let history_file = layout.history_file(id);
        let context_file = layout.context_file(id);
        let scoped = ExecutionOptions {
            history_file: layout.persist_history.then(|| history_file.clone()),
            context_file: layout.persist_context.then(|| context_file.clone()),
            ..ExecutionOptions::default()
        };
        Self {
            id: id.to_string(),
            client,
            defaults: RwLock::new(defaults),
            history_file,
            context_file,
            scoped,
            active: AtomicBool::new(true),
            registry,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn history_file(&self) -> &Path {
        &self.history_file
    }

    pub fn context_file(&self) -> &Path {
        &self.context_file
    }

    pub fn default_options(&self) -> ExecutionOptions {
        match self.defaults.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the session defaults used by later sends.
    pub fn update_default_options(&self, options: ExecutionOptions) {
        match self.defaults.write() {
            Ok(mut guard) => *guard = options,
            Err(poisoned) => *poisoned.into_inner() = options,
        }
    }

    /// Options a send with `overrides` would run with, before the client
    /// defaults are applied underneath.
    ///
    /// Session defaults come first, then the history and context files,
    /// then the per-call overrides.
    pub fn effective_options(&self, overrides: &ExecutionOptions) -> ExecutionOptions {
        self.default_options().merge(&self.scoped).merge(overrides)
    }

    pub async fn send(&self, prompt: &str, overrides: &ExecutionOptions) -> Result<AgentResponse> {
        self.ensure_active()?;
        let options = self.effective_options(overrides);
        Ok(self.client.execute_in(Some(&self.id), prompt, &options).await)
    }

    pub fn send_async(&self, prompt: &str, overrides: &ExecutionOptions) -> Result<PendingResponse> {
        self.ensure_active()?;
        let options = self.effective_options(overrides);
        Ok(self.client.execute_async_in(Some(&self.id), prompt, &options))
    }

    pub fn send_stream(&self, prompt: &str, overrides: &ExecutionOptions) -> Result<OutputStream> {
        self.ensure_active()?;
        let options = self.effective_options(overrides);
        Ok(self.client.execute_stream(prompt, &options))
    }

    /// Deactivate the session and drop it from its registry.
    ///
    /// A registry entry that has since been replaced by a newer session with
    /// the same id is left alone.
    pub fn close(&self) {
        let was_active = self.active.swap(false, Ordering::SeqCst);
        if let Some(sessions) = self.registry.upgrade() {
            sessions.remove_if(&self.id, |_, current| std::ptr::eq(Arc::as_ptr(current), self));
        }
        if was_active {
            info!(session_id = %self.id, "Session closed");
        } else {
            debug!(session_id = %self.id, "Session already closed");
        }
    }

    fn ensure_active(&self) -> Result<()> {
        ensure!(self.is_active(), SessionClosedSnafu { id: &self.id });
        Ok(())
    }
}

#[cfg(test)]
#[path = "session.test.rs"]
mod tests;
