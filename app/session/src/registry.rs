use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use climux_protocol::ExecutionOptions;
use climux_tmux::TmuxSessionManager;
use dashmap::DashMap;
use snafu::OptionExt;
use tracing::info;
use tracing::warn;

use crate::AgentClient;
use crate::AgentSession;
use crate::SessionLayout;
use crate::error::Result;
use crate::error::session_error::NotFoundSnafu;
use crate::session::SessionMap;

/// Owns the live sessions and tears everything down on [`shutdown`].
///
/// [`shutdown`]: SessionRegistry::shutdown
#[derive(Debug)]
pub struct SessionRegistry {
    client: Arc<AgentClient>,
    layout: SessionLayout,
    sessions: Arc<SessionMap>,
    tmux: Option<Arc<TmuxSessionManager>>,
    shut_down: AtomicBool,
}

impl SessionRegistry {
    pub fn new(client: Arc<AgentClient>) -> Self {
        Self {
            client,
            layout: SessionLayout::default(),
            sessions: Arc::new(DashMap::new()),
            tmux: None,
            shut_down: AtomicBool::new(false),
        }
    }

    pub fn with_layout(mut self, layout: SessionLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Kill the manager's tmux sessions on shutdown.
    pub fn with_tmux_cleanup(mut self, tmux: Arc<TmuxSessionManager>) -> Self {
        self.tmux = Some(tmux);
        self
    }

    pub fn client(&self) -> &Arc<AgentClient> {
        &self.client
    }

    pub fn layout(&self) -> &SessionLayout {
        &self.layout
    }

    /// Start a session under `id`.
    ///
    /// An existing session with the same id is replaced and closed.
    pub fn create_session(&self, id: &str, defaults: ExecutionOptions) -> Arc<AgentSession> {
        let session = Arc::new(AgentSession::new(
            id,
            Arc::clone(&self.client),
            defaults,
            &self.layout,
            Arc::downgrade(&self.sessions),
        ));
        if let Some(replaced) = self.sessions.insert(id.to_string(), Arc::clone(&session)) {
            warn!(session_id = %id, "Replacing existing session");
            replaced.close();
        }
        info!(session_id = %id, history_file = %session.history_file().display(), "Session created");
        session
    }

    pub fn get_session(&self, id: &str) -> Option<Arc<AgentSession>> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Like [`get_session`](Self::get_session), but a missing id is an error.
    pub fn session(&self, id: &str) -> Result<Arc<AgentSession>> {
        self.get_session(id).context(NotFoundSnafu { id })
    }

    /// Remove and close the session. Unknown ids are ignored.
    pub fn destroy_session(&self, id: &str) {
        if let Some((_, session)) = self.sessions.remove(id) {
            session.close();
        }
    }

    pub fn is_session_active(&self, id: &str) -> bool {
        self.sessions
            .get(id)
            .is_some_and(|entry| entry.value().is_active())
    }

    pub fn active_session_ids(&self) -> Vec<String> {
        self.sessions
            .iter()
            .filter(|entry| entry.value().is_active())
            .map(|entry| entry.key().clone())
            .collect()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    /// Close every session, then shut down the executor. Runs once.
    pub async fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        let sessions: Vec<Arc<AgentSession>> = self
            .sessions
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        info!(sessions = sessions.len(), "Shutting down session registry");
        for session in &sessions {
            session.close();
        }
        self.sessions.clear();

        if let Some(tmux) = &self.tmux {
            tmux.kill_all_sessions().await;
        }
        self.client.executor().shutdown().await;
    }
}

#[cfg(test)]
#[path = "registry.test.rs"]
mod tests;
