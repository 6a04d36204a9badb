use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use crate::ExecutionMode;

/// A fully resolved request to run one external program.
///
/// Built once per call and not modified afterwards; the process engine only
/// reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    argv: Vec<String>,
    mode: ExecutionMode,
    working_dir: Option<PathBuf>,
    env: BTreeMap<String, String>,
}

impl CommandInvocation {
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
            mode: ExecutionMode::Direct,
            working_dir: None,
            env: BTreeMap::new(),
        }
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Add environment overrides on top of whatever is already set.
    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// The program to execute, `None` for an empty vector.
    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or_default()
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Space-joined argv for log lines.
    pub fn display(&self) -> String {
        self.argv.join(" ")
    }
}

#[cfg(test)]
#[path = "invocation.test.rs"]
mod tests;
