use std::path::PathBuf;

use climux_config::ClimuxConfig;

pub const DEFAULT_PATH_PREFIX: &str = "claude-session";

/// Where session history and context files live, and whether the agent is
/// told about them.
///
/// Files are named `<prefix>-<id>.history` and `<prefix>-<id>.context`.
/// Nothing here reads or writes them; only the agent does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLayout {
    pub history_dir: PathBuf,
    pub context_dir: PathBuf,
    pub prefix: String,
    pub persist_history: bool,
    pub persist_context: bool,
}

impl Default for SessionLayout {
    fn default() -> Self {
        let dir = std::env::temp_dir();
        Self {
            history_dir: dir.clone(),
            context_dir: dir,
            prefix: DEFAULT_PATH_PREFIX.to_string(),
            persist_history: true,
            persist_context: true,
        }
    }
}

impl SessionLayout {
    pub fn from_config(config: &ClimuxConfig) -> Self {
        Self {
            history_dir: config.history_dir(),
            context_dir: config.context_dir(),
            prefix: config.session.path_prefix.clone(),
            persist_history: config.session.persist_history,
            persist_context: config.session.persist_context,
        }
    }

    /// Put both files in `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            history_dir: dir.clone(),
            context_dir: dir,
            ..Self::default()
        }
    }

    pub fn history_file(&self, session_id: &str) -> PathBuf {
        self.history_dir
            .join(format!("{}-{session_id}.history", self.prefix))
    }

    pub fn context_file(&self, session_id: &str) -> PathBuf {
        self.context_dir
            .join(format!("{}-{session_id}.context", self.prefix))
    }
}

#[cfg(test)]
#[path = "layout.test.rs"]
mod tests;
