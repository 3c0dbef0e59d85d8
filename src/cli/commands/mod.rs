//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations.

pub mod cache;
pub mod check;
pub mod completions;
pub mod config;
pub mod dispatcher;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};

use std::path::{Path, PathBuf};

use crate::config::{Config, ConfigHandler};
use crate::error::Result;

/// Merge the config found at `locations`, or in `root` when none are given.
///
/// Relative locations are resolved against `root`.
pub(crate) fn load_config(root: &Path, locations: &[PathBuf]) -> Result<Config> {
    let mut handler = ConfigHandler::new();
    if locations.is_empty() {
        handler.add_location(root)?;
    }
    for location in locations {
        handler.add_location(root.join(location))?;
    }
    handler.get_config()
}
