//! Sparse execution options and the overlay merge.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use strum::AsRefStr;

/// How an agent invocation is launched.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExecutionMode {
    /// Spawn the agent directly.
    #[default]
    Direct,
    /// Wrap the agent in a new terminal-multiplexer session.
    Multiplexed,
    /// Spawn directly; callers fan out several invocations at once.
    Parallel,
}

/// Options for the multiplexer wrapper used in [`ExecutionMode::Multiplexed`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct MultiplexerOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detached: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

/// Sparse record of agent options.
///
/// Every field is optional and `None` means "unset", which is different
/// from `Some(String::new())`. Records are combined with
/// [`ExecutionOptions::merge`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ExecutionOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dangerously_skip_permissions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continue_conversation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Raw flags appended verbatim before the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_flags: Option<Vec<String>>,
    /// Merged into the inherited environment of the child.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_variables: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_mode: Option<ExecutionMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplexer: Option<MultiplexerOptions>,
}

impl ExecutionOptions {
    /// Overlay `overlay` on top of `self`.
    ///
    /// Each field is taken from `overlay` when it is set there and from
    /// `self` otherwise. Fields never influence each other, and collection
    /// fields are replaced as a whole rather than combined.
    pub fn merge(&self, overlay: &ExecutionOptions) -> ExecutionOptions {
        ExecutionOptions {
            model: pick(&self.model, &overlay.model),
            output_format: pick(&self.output_format, &overlay.output_format),
            api_key: pick(&self.api_key, &overlay.api_key),
            api_url: pick(&self.api_url, &overlay.api_url),
            dangerously_skip_permissions: pick(
                &self.dangerously_skip_permissions,
                &overlay.dangerously_skip_permissions,
            ),
            continue_conversation: pick(
                &self.continue_conversation,
                &overlay.continue_conversation,
            ),
            verbose: pick(&self.verbose, &overlay.verbose),
            context_file: pick(&self.context_file, &overlay.context_file),
            history_file: pick(&self.history_file, &overlay.history_file),
            output_file: pick(&self.output_file, &overlay.output_file),
            max_tokens: pick(&self.max_tokens, &overlay.max_tokens),
            temperature: pick(&self.temperature, &overlay.temperature),
            additional_flags: pick(&self.additional_flags, &overlay.additional_flags),
            environment_variables: pick(
                &self.environment_variables,
                &overlay.environment_variables,
            ),
            working_directory: pick(&self.working_directory, &overlay.working_directory),
            execution_mode: pick(&self.execution_mode, &overlay.execution_mode),
            multiplexer: pick(&self.multiplexer, &overlay.multiplexer),
        }
    }

    /// Effective execution mode, `Direct` when unset.
    pub fn mode(&self) -> ExecutionMode {
        self.execution_mode.unwrap_or_default()
    }
}

fn pick<T: Clone>(base: &Option<T>, overlay: &Option<T>) -> Option<T> {
    overlay.as_ref().or(base.as_ref()).cloned()
}

#[cfg(test)]
#[path = "options.test.rs"]
mod tests;
