//! Config command implementation.
//!
//! The `environaut config` command prints the merged configuration.

use std::path::{Path, PathBuf};

use crate::cli::args::ConfigArgs;
use crate::error::{EnvironautError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::load_config;

/// The config command implementation.
pub struct ConfigCommand {
    working_dir: PathBuf,
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(working_dir: &Path, args: ConfigArgs) -> Self {
        Self {
            working_dir: working_dir.to_path_buf(),
            args,
        }
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_config(&self.working_dir, &self.args.config)?;

        let output = if self.args.yaml {
            serde_yaml::to_string(config.as_value()).map_err(|e| EnvironautError::Other(e.into()))?
        } else {
            serde_json::to_string_pretty(config.as_value())
                .map_err(|e| EnvironautError::Other(e.into()))?
        };
        ui.data(&output);

        Ok(CommandResult::success())
    }
}
