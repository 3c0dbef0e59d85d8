//! Routing of parsed subcommands to their [`Command`] implementations.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::cli::args::{CheckArgs, Cli, Commands};
use crate::error::Result;
use crate::ui::UserInterface;

use super::cache::CacheCommand;
use super::check::CheckCommand;
use super::completions::CompletionsCommand;
use super::config::ConfigCommand;

/// A runnable subcommand.
pub trait Command {
    /// Run against `ui`. Errors abort with exit code 1; a failed
    /// environment is reported through the returned [`CommandResult`].
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Outcome of a subcommand that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResult {
    pub success: bool,
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Process exit status; values outside `0..=255` map to 1.
    pub fn exit_status(self) -> u8 {
        u8::try_from(self.exit_code).unwrap_or(1)
    }

    pub fn to_exit_code(self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}

/// Runs subcommands relative to one working directory.
pub struct CommandDispatcher {
    working_dir: PathBuf,
}

impl CommandDispatcher {
    pub fn new(working_dir: PathBuf) -> Self {
        Self { working_dir }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    fn command_for(&self, command: Option<&Commands>) -> Box<dyn Command> {
        let dir = self.working_dir.as_path();
        match command {
            Some(Commands::Check(args)) => Box::new(CheckCommand::new(dir, args.clone())),
            Some(Commands::Config(args)) => Box::new(ConfigCommand::new(dir, args.clone())),
            Some(Commands::Cache(args)) => Box::new(CacheCommand::new(dir, args.clone())),
            Some(Commands::Completions(args)) => Box::new(CompletionsCommand::new(args.clone())),
            // `environaut` alone runs the checks.
            None => Box::new(CheckCommand::new(dir, CheckArgs::default())),
        }
    }

    /// Execute the subcommand selected on the command line.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        tracing::debug!("Dispatching in {}", self.working_dir.display());
        self.command_for(cli.command.as_ref()).execute(ui)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn result_constructors() {
        assert_eq!(
            CommandResult::success(),
            CommandResult {
                success: true,
                exit_code: 0
            }
        );
        let failed = CommandResult::failure(3);
        assert!(!failed.success);
        assert_eq!(failed.exit_code, 3);
    }

    #[test]
    fn out_of_range_exit_code_maps_to_one() {
        assert_eq!(CommandResult::failure(300).exit_status(), 1);
        assert_eq!(CommandResult::failure(-1).exit_status(), 1);
        assert_eq!(CommandResult::failure(2).exit_status(), 2);
    }

    #[test]
    fn dispatches_config_in_working_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("environaut.json"), r#"{"name": "routed"}"#).unwrap();

        let dispatcher = CommandDispatcher::new(temp.path().to_path_buf());
        assert_eq!(dispatcher.working_dir(), temp.path());

        let cli = Cli::parse_from(["environaut", "config"]);
        let mut ui = MockUI::new();
        let result = dispatcher.dispatch(&cli, &mut ui).unwrap();
        assert!(result.success);
        assert!(ui.has_output("routed"));
    }

    #[test]
    fn bare_invocation_runs_checks() {
        let temp = TempDir::new().unwrap();
        let config = serde_json::json!({
            "name": "bare",
            "export": {"formatters": [
                {"type": "json", "location": temp.path().join("out.json").to_str().unwrap()}
            ]}
        });
        std::fs::write(temp.path().join("environaut.json"), config.to_string()).unwrap();

        let dispatcher = CommandDispatcher::new(temp.path().to_path_buf());
        let cli = Cli::parse_from(["environaut"]);
        let mut ui = MockUI::new();
        dispatcher.dispatch(&cli, &mut ui).unwrap();
        assert_eq!(ui.headers(), ["bare"]);
    }
}
