//! Maps [`ExecutionOptions`] onto the agent's command line.

use crate::CommandInvocation;
use crate::ExecutionMode;
use crate::ExecutionOptions;
use crate::MultiplexerOptions;

/// Default agent executable, resolved through `PATH`.
pub const DEFAULT_CLI_PATH: &str = "claude";

const DEFAULT_MULTIPLEXER_PROGRAM: &str = "tmux";

/// Builds argument vectors for the agent CLI.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    cli_path: String,
    multiplexer_program: String,
}

impl Default for CommandBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_CLI_PATH)
    }
}

impl CommandBuilder {
    pub fn new(cli_path: impl Into<String>) -> Self {
        Self {
            cli_path: cli_path.into(),
            multiplexer_program: DEFAULT_MULTIPLEXER_PROGRAM.to_string(),
        }
    }

    pub fn with_multiplexer_program(mut self, program: impl Into<String>) -> Self {
        self.multiplexer_program = program.into();
        self
    }

    pub fn cli_path(&self) -> &str {
        &self.cli_path
    }

    /// Build the invocation for `prompt`.
    ///
    /// Flags appear in a fixed order and the prompt always comes last after
    /// `--`, so a prompt starting with `-` is never read as a flag.
    pub fn build(&self, prompt: &str, options: &ExecutionOptions) -> CommandInvocation {
        let mode = options.mode();
        let mut argv = Vec::new();

        if mode == ExecutionMode::Multiplexed {
            self.push_multiplexer_prefix(&mut argv, options.multiplexer.as_ref());
        }

        argv.push(self.cli_path.clone());

        push_value(&mut argv, "--model", options.model.as_deref());
        push_value(&mut argv, "--output-format", options.output_format.as_deref());
        push_value(&mut argv, "--api-key", options.api_key.as_deref());
        push_value(&mut argv, "--api-url", options.api_url.as_deref());

        push_switch(
            &mut argv,
            "--dangerously-skip-permissions",
            options.dangerously_skip_permissions,
        );
        push_switch(&mut argv, "--continue", options.continue_conversation);
        push_switch(&mut argv, "--verbose", options.verbose);

        push_path(&mut argv, "--context", options.context_file.as_deref());
        push_path(&mut argv, "--history", options.history_file.as_deref());
        push_path(&mut argv, "--output", options.output_file.as_deref());

        if let Some(max_tokens) = options.max_tokens {
            argv.push("--max-tokens".to_string());
            argv.push(max_tokens.to_string());
        }
        if let Some(temperature) = options.temperature {
            argv.push("--temperature".to_string());
            argv.push(temperature.to_string());
        }

        if let Some(flags) = &options.additional_flags {
            argv.extend(flags.iter().cloned());
        }

        if !prompt.is_empty() {
            argv.push("--".to_string());
            argv.push(prompt.to_string());
        }

        let mut invocation = CommandInvocation::new(argv).with_mode(mode);
        if let Some(dir) = &options.working_directory {
            invocation = invocation.with_working_dir(dir);
        }
        if let Some(env) = &options.environment_variables {
            invocation = invocation.with_env(env.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        invocation
    }

    fn push_multiplexer_prefix(&self, argv: &mut Vec<String>, opts: Option<&MultiplexerOptions>) {
        argv.push(self.multiplexer_program.clone());
        argv.push("new-session".to_string());

        if let Some(opts) = opts {
            push_value(argv, "-s", opts.session_name.as_deref());
            push_value(argv, "-n", opts.window_name.as_deref());
            push_switch(argv, "-d", opts.detached);
        }

        argv.push("--".to_string());
    }
}

fn push_value(argv: &mut Vec<String>, flag: &str, value: Option<&str>) {
    if let Some(value) = value {
        argv.push(flag.to_string());
        argv.push(value.to_string());
    }
}

fn push_switch(argv: &mut Vec<String>, flag: &str, enabled: Option<bool>) {
    if enabled == Some(true) {
        argv.push(flag.to_string());
    }
}

fn push_path(argv: &mut Vec<String>, flag: &str, path: Option<&std::path::Path>) {
    if let Some(path) = path {
        argv.push(flag.to_string());
        argv.push(path.to_string_lossy().into_owned());
    }
}

#[cfg(test)]
#[path = "command_builder.test.rs"]
mod tests;
